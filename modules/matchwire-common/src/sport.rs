//! Sport category display names and push-topic derivation.

/// Display label for a sport category code.
///
/// Known codes map to their fixed display names; anything else is
/// title-cased per underscore-separated word, so unrecognized categories
/// still render reasonably.
pub fn display_name(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "football" => "Football".to_string(),
        "soccer" => "Soccer".to_string(),
        "basketball" => "Basketball".to_string(),
        "cricket" => "Cricket".to_string(),
        "tennis" => "Tennis".to_string(),
        "baseball" => "Baseball".to_string(),
        "hockey" => "Hockey".to_string(),
        "volleyball" => "Volleyball".to_string(),
        "rugby" => "Rugby".to_string(),
        "golf" => "Golf".to_string(),
        "athletics" => "Athletics".to_string(),
        "swimming" => "Swimming".to_string(),
        "boxing" => "Boxing".to_string(),
        "wrestling" => "Wrestling".to_string(),
        "weightlifting" => "Weightlifting".to_string(),
        other => title_case_code(other),
    }
}

/// Per-category delivery topic: `sport_<code lowercased>`.
pub fn sport_topic(code: &str) -> String {
    format!("sport_{}", code.to_lowercase())
}

fn title_case_code(code: &str) -> String {
    code.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(display_name("football"), "Football");
        assert_eq!(display_name("weightlifting"), "Weightlifting");
    }

    #[test]
    fn test_known_code_is_case_insensitive() {
        assert_eq!(display_name("Tennis"), "Tennis");
        assert_eq!(display_name("HOCKEY"), "Hockey");
    }

    #[test]
    fn test_unknown_code_title_cased() {
        assert_eq!(display_name("extreme_ironing"), "Extreme Ironing");
        assert_eq!(display_name("table_tennis"), "Table Tennis");
        assert_eq!(display_name("esports"), "Esports");
    }

    #[test]
    fn test_sport_topic_lowercases() {
        assert_eq!(sport_topic("Football"), "sport_football");
        assert_eq!(sport_topic("extreme_ironing"), "sport_extreme_ironing");
    }
}
