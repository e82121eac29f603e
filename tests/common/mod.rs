//! Shared fixtures: a round-of-16 feed, brackets filled along one side, finished results.
#![allow(dead_code)]

use bracket_predictions_web::{
    apply_choice, Bracket, LiveFeed, LiveMatch, Side, SlotIndex, FINAL_SLOT, SLOT_COUNT,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub const ROUND_OF_16: [(&str, &str); 8] = [
    ("Spain", "Japan"),
    ("Switzerland", "Norway"),
    ("Netherlands", "South Africa"),
    ("Sweden", "United States"),
    ("Australia", "Denmark"),
    ("England", "Nigeria"),
    ("France", "Morocco"),
    ("Colombia", "Jamaica"),
];

/// Kickoff of slot 0; slot i kicks off i days later.
pub fn first_kickoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 8, 5, 7, 0, 0).unwrap()
}

pub fn kickoff(slot: SlotIndex) -> DateTime<Utc> {
    first_kickoff() + Duration::days(slot as i64)
}

/// Before any match started.
pub fn before_tournament() -> DateTime<Utc> {
    first_kickoff() - Duration::days(1)
}

/// Every match started.
pub fn after_tournament() -> DateTime<Utc> {
    first_kickoff() + Duration::days(30)
}

/// Feed with the round of 16 known and later rounds undecided. Slot i feeds
/// slot 8 + i/2, even slots on side A.
pub fn feed() -> LiveFeed {
    (0..SLOT_COUNT)
        .map(|i| {
            let (team_a, team_b) = match ROUND_OF_16.get(i) {
                Some((a, b)) => (Some(a.to_string()), Some(b.to_string())),
                None => (None, None),
            };
            let next = (i != FINAL_SLOT).then(|| 8 + i / 2);
            let side = if i % 2 == 0 { Side::A } else { Side::B };
            (i, LiveMatch::scheduled(team_a, team_b, kickoff(i), next, side))
        })
        .collect()
}

pub fn bracket() -> Bracket {
    Bracket::from_feed(&feed()).unwrap()
}

pub fn team(name: &str) -> Option<String> {
    Some(name.to_string())
}

/// Pick the given side in every match, round by round.
pub fn fill(bracket: &mut Bracket, side: Side) {
    for i in 0..SLOT_COUNT {
        let pick = bracket.slot(i).unwrap().team(side).map(str::to_string);
        apply_choice(bracket, i, pick).unwrap();
    }
}

/// Feed where every match was played with this bracket's teams and its picks won 1:0 or 0:1.
pub fn results_matching(bracket: &Bracket) -> LiveFeed {
    let mut feed = feed();
    for (i, slot) in bracket.slots().iter().enumerate() {
        let live = feed.get_mut(i).unwrap();
        live.team_a = slot.team_a.clone();
        live.team_b = slot.team_b.clone();
        if slot.prediction.is_some() && slot.prediction == slot.team_a {
            live.finish(1, 0, Side::A);
        } else {
            live.finish(0, 1, Side::B);
        }
    }
    feed
}
