//! Integration tests for winner picks and how they move through later rounds.

mod common;

use bracket_predictions_web::{
    apply_choice, refresh_statuses, submit_bracket, Bracket, BracketError, Side, SlotStatus,
};
use chrono::Duration;
use common::{bracket, feed, fill, first_kickoff, team};

fn prediction(b: &Bracket, slot: usize) -> Option<&str> {
    b.slot(slot).unwrap().prediction.as_deref()
}

fn team_a(b: &Bracket, slot: usize) -> Option<&str> {
    b.slot(slot).unwrap().team_a.as_deref()
}

fn team_b(b: &Bracket, slot: usize) -> Option<&str> {
    b.slot(slot).unwrap().team_b.as_deref()
}

#[test]
fn pick_is_written_into_next_match() {
    let mut b = bracket();
    apply_choice(&mut b, 0, team("Spain")).unwrap();
    apply_choice(&mut b, 1, team("Norway")).unwrap();

    assert_eq!(prediction(&b, 0), Some("Spain"));
    assert_eq!(team_a(&b, 8), Some("Spain"));
    assert_eq!(team_b(&b, 8), Some("Norway"));
    assert_eq!(prediction(&b, 8), None);
}

#[test]
fn changed_pick_replaces_inherited_predictions_up_to_the_final() {
    let mut b = bracket();
    fill(&mut b, Side::A); // Spain wins 0, 8, 12 and 14
    assert_eq!(prediction(&b, 14), Some("Spain"));

    apply_choice(&mut b, 0, team("Japan")).unwrap();

    for slot in [0, 8, 12, 14] {
        assert_eq!(prediction(&b, slot), Some("Japan"), "slot {}", slot);
    }
    assert_eq!(team_a(&b, 8), Some("Japan"));
    assert_eq!(team_a(&b, 12), Some("Japan"));
    assert_eq!(team_a(&b, 14), Some("Japan"));
    // Other side of the tree untouched
    assert_eq!(team_b(&b, 14), Some("Australia"));
}

#[test]
fn cascade_stops_where_a_different_team_was_picked() {
    let mut b = bracket();
    apply_choice(&mut b, 0, team("Spain")).unwrap();
    apply_choice(&mut b, 1, team("Switzerland")).unwrap();
    apply_choice(&mut b, 8, team("Switzerland")).unwrap();
    apply_choice(&mut b, 2, team("Netherlands")).unwrap();
    apply_choice(&mut b, 3, team("Sweden")).unwrap();
    apply_choice(&mut b, 9, team("Netherlands")).unwrap();
    apply_choice(&mut b, 12, team("Switzerland")).unwrap();

    apply_choice(&mut b, 0, team("Japan")).unwrap();

    assert_eq!(team_a(&b, 8), Some("Japan"));
    assert_eq!(prediction(&b, 8), Some("Switzerland"));
    assert_eq!(team_a(&b, 12), Some("Switzerland"));
    assert_eq!(prediction(&b, 12), Some("Switzerland"));
}

#[test]
fn clearing_a_pick_leaves_later_rounds_undecided() {
    let mut b = bracket();
    apply_choice(&mut b, 0, team("Spain")).unwrap();
    apply_choice(&mut b, 8, team("Spain")).unwrap();

    apply_choice(&mut b, 0, None).unwrap();

    assert_eq!(prediction(&b, 0), None);
    assert_eq!(team_a(&b, 8), None);
    assert_eq!(prediction(&b, 8), None);
    assert_eq!(team_a(&b, 12), None);
}

#[test]
fn same_choice_twice_is_the_same_as_once() {
    let mut b = bracket();
    fill(&mut b, Side::A);
    apply_choice(&mut b, 2, team("South Africa")).unwrap();
    let once = b.clone();

    apply_choice(&mut b, 2, team("South Africa")).unwrap();

    assert_eq!(b, once);
}

#[test]
fn switching_a_pick_matches_picking_directly() {
    let mut switched = bracket();
    apply_choice(&mut switched, 0, team("Spain")).unwrap();
    apply_choice(&mut switched, 0, team("Japan")).unwrap();

    let mut direct = bracket();
    apply_choice(&mut direct, 0, team("Japan")).unwrap();

    assert_eq!(switched, direct);
}

#[test]
fn team_not_in_the_match_is_rejected() {
    let mut b = bracket();
    let before = b.clone();

    let err = apply_choice(&mut b, 0, team("France")).unwrap_err();

    assert_eq!(
        err,
        BracketError::InvalidChoice {
            slot: 0,
            choice: team("France")
        }
    );
    assert_eq!(b, before);
}

#[test]
fn later_round_needs_its_teams_first() {
    let mut b = bracket();
    assert!(matches!(
        apply_choice(&mut b, 8, team("Spain")),
        Err(BracketError::InvalidChoice { slot: 8, .. })
    ));
}

#[test]
fn submitted_bracket_is_locked() {
    let mut b = bracket();
    fill(&mut b, Side::A);
    submit_bracket(&mut b).unwrap();
    let before = b.clone();

    assert_eq!(
        apply_choice(&mut b, 3, team("United States")),
        Err(BracketError::LockedSlot(3))
    );
    assert_eq!(b, before);
}

#[test]
fn started_match_without_pick_is_locked() {
    let mut b = bracket();
    // Slot 0 has kicked off, slot 1 not yet.
    let now = first_kickoff() + Duration::hours(12);
    refresh_statuses(&mut b, &feed(), now);
    assert_eq!(b.slot(0).unwrap().status, SlotStatus::NotVoted);
    let before = b.clone();

    assert_eq!(
        apply_choice(&mut b, 0, team("Spain")),
        Err(BracketError::LockedSlot(0))
    );
    assert_eq!(b, before);
    assert!(apply_choice(&mut b, 1, team("Norway")).is_ok());
}

#[test]
fn unknown_slot_is_rejected() {
    let mut b = bracket();
    assert_eq!(apply_choice(&mut b, 15, None), Err(BracketError::UnknownSlot(15)));
}

#[test]
fn stale_prediction_is_reset() {
    let mut b = bracket();
    apply_choice(&mut b, 0, team("Spain")).unwrap();
    let mut value = serde_json::to_value(&b).unwrap();
    value["slots"][8]["prediction"] = serde_json::json!("Brazil");
    let mut stored: Bracket = serde_json::from_value(value).unwrap();

    assert_eq!(stored.heal_predictions(), vec![8]);
    assert_eq!(prediction(&stored, 8), None);
    assert_eq!(prediction(&stored, 0), Some("Spain"));
}
