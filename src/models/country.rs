//! Three-letter country codes used in bracket labels and the points breakdown.

/// Code for a team; `___` while undecided. Unknown names use their first three letters.
pub fn country_code(team: Option<&str>) -> String {
    let Some(team) = team else {
        return "___".to_string();
    };
    let known = match team {
        "Switzerland" => "SUI",
        "Spain" => "ESP",
        "Netherlands" => "NED",
        "South Africa" => "ZAF",
        "Japan" => "JPN",
        "Norway" => "NOR",
        "Sweden" => "SWE",
        "United States" => "USA",
        "Australia" => "AUS",
        "Denmark" => "DEN",
        "France" => "FRA",
        "Morocco" => "MAR",
        "England" => "ENG",
        "Nigeria" => "NGA",
        // The feed has used both spellings.
        "Columbia" | "Colombia" => "COL",
        "Jamaica" => "JAM",
        other => {
            return other
                .chars()
                .filter(|c| c.is_alphabetic())
                .take(3)
                .collect::<String>()
                .to_uppercase()
        }
    };
    known.to_string()
}
