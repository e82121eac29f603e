//! Integration tests for the live feed CSV import.

use bracket_predictions_web::{carry_forward_missing, parse_feed, parse_kickoff, Bracket, Side};
use chrono::{TimeZone, Utc};

const DEMO_FEED: &str = include_str!("../demos/live_feed.csv");

const HEADER: &str = "TeamA,TeamB,goalsA,goalsB,winner,datetime,done,nextMatch,nextTeam\n";

#[test]
fn demo_feed_parses() {
    let feed = parse_feed(DEMO_FEED.as_bytes()).unwrap();
    assert_eq!(feed.len(), 15);

    let first = feed.get(0).unwrap();
    assert_eq!(first.team_a.as_deref(), Some("Switzerland"));
    assert_eq!(first.winner.as_deref(), Some("Spain"));
    assert!(first.done);
    assert_eq!((first.goals_a, first.goals_b), (1, 5));
    assert_eq!(first.next_match, Some(8));
    assert_eq!(first.next_team, Side::A);
    assert_eq!(first.kickoff, Utc.with_ymd_and_hms(2023, 8, 5, 5, 0, 0).unwrap());

    let quarter = feed.get(8).unwrap();
    assert_eq!(quarter.winner, None);
    assert!(!quarter.done);

    assert_eq!(feed.get(12).unwrap().team_a, None);
    assert_eq!(feed.get(14).unwrap().next_match, None);
}

#[test]
fn demo_feed_has_the_knockout_shape() {
    let feed = parse_feed(DEMO_FEED.as_bytes()).unwrap();
    let bracket = Bracket::from_feed(&feed).unwrap();
    assert_eq!(bracket.children(14), [Some(12), Some(13)]);
    assert_eq!(bracket.slot(1).unwrap().team_b.as_deref(), Some("South Africa"));
}

#[test]
fn bad_row_is_skipped_without_shifting_the_rest() {
    let text = format!(
        "{}{}{}{}",
        HEADER,
        "Spain,Japan,2,1,Spain,2023-08-05T17:00:00+12:00,TRUE,8,TeamA\n",
        "Norway,Sweden,,,NONE,whenever,FALSE,8,TeamB\n",
        "France,Morocco,,,NONE,2023-08-08T21:00:00+10:00,FALSE,9,TeamA\n",
    );

    let feed = parse_feed(text.as_bytes()).unwrap();

    assert_eq!(feed.len(), 2);
    assert!(feed.get(1).is_none());
    assert_eq!(feed.get(2).unwrap().team_a.as_deref(), Some("France"));
}

#[test]
fn spreadsheet_values_are_tolerated() {
    let text = format!(
        "{}{}{}{}",
        HEADER,
        "Spain,Japan,2.0,1.0,Spain,2023-08-05 17:00:00+12:00,true,8,A\n",
        "Norway,Sweden,0,0,Sweden,2023-08-06T14:00:00+10:00,Yes,8,B\n",
        "France,Morocco,,,,2023-08-08T21:00:00+10:00,0,9,TeamA\n",
    );

    let feed = parse_feed(text.as_bytes()).unwrap();

    let first = feed.get(0).unwrap();
    assert!(first.done);
    assert_eq!((first.goals_a, first.goals_b), (2, 1));
    assert_eq!(first.next_team, Side::A);
    // Drawn, decided on penalties.
    assert_eq!(feed.get(1).unwrap().winner.as_deref(), Some("Sweden"));
    assert_eq!(feed.get(1).unwrap().next_team, Side::B);
    let third = feed.get(2).unwrap();
    assert!(!third.done);
    assert_eq!(third.winner, None);
    assert_eq!((third.goals_a, third.goals_b), (0, 0));
}

#[test]
fn kickoff_formats() {
    let expected = Utc.with_ymd_and_hms(2023, 8, 5, 5, 0, 0).unwrap();
    assert_eq!(parse_kickoff("2023-08-05T17:00:00+12:00"), Some(expected));
    assert_eq!(parse_kickoff("2023-08-05 17:00:00+12:00"), Some(expected));
    assert_eq!(parse_kickoff("2023-08-05T05:00:00Z"), Some(expected));
    assert_eq!(parse_kickoff("2023-08-05T17:00+12:00"), Some(expected));
    assert_eq!(parse_kickoff("2023-08-05 17:00+12:00"), Some(expected));
    assert_eq!(parse_kickoff("2023-08-05 17:00:00+12"), Some(expected));
    assert_eq!(parse_kickoff("2023-08-05T17:00:00+1200"), Some(expected));
    assert_eq!(parse_kickoff("2023-08-05T17:00:00.000+12:00"), Some(expected));
    assert_eq!(parse_kickoff("5 August"), None);
    assert_eq!(parse_kickoff("2023-08-05T17:00:00"), None);
}

#[test]
fn reload_with_a_bad_row_keeps_the_previous_match() {
    let previous = parse_feed(DEMO_FEED.as_bytes()).unwrap();
    let broken = DEMO_FEED.replace("2023-08-11T13:00:00+12:00", "next Friday");
    let mut reloaded = parse_feed(broken.as_bytes()).unwrap();
    assert_eq!(reloaded.len(), 14);

    let carried = carry_forward_missing(&mut reloaded, &previous);

    assert_eq!(carried, vec![8]);
    assert_eq!(reloaded.len(), 15);
    assert_eq!(reloaded.get(8), previous.get(8));
    assert!(Bracket::from_feed(&reloaded).is_ok());
}

#[test]
fn reload_keeps_fresh_rows() {
    let previous = parse_feed(DEMO_FEED.as_bytes()).unwrap();
    let updated = DEMO_FEED.replace(
        "Spain,Netherlands,,,NONE,2023-08-11T13:00:00+12:00,FALSE",
        "Spain,Netherlands,2,1,Spain,2023-08-11T13:00:00+12:00,TRUE",
    );
    let mut reloaded = parse_feed(updated.as_bytes()).unwrap();

    assert!(carry_forward_missing(&mut reloaded, &previous).is_empty());
    assert_eq!(reloaded.get(8).unwrap().winner.as_deref(), Some("Spain"));
}
