use crate::domain::model::DisclosurePeriod;
use chrono::Month;
use regex::Regex;
use std::sync::OnceLock;

/// Month spellings found in disclosure file names, in calendar order.
const MONTH_SPELLINGS: [(&str, Month); 24] = [
    ("jan", Month::January),
    ("january", Month::January),
    ("feb", Month::February),
    ("february", Month::February),
    ("mar", Month::March),
    ("march", Month::March),
    ("apr", Month::April),
    ("april", Month::April),
    ("may", Month::May),
    ("jun", Month::June),
    ("june", Month::June),
    ("jul", Month::July),
    ("july", Month::July),
    ("aug", Month::August),
    ("august", Month::August),
    ("sep", Month::September),
    ("sept", Month::September),
    ("september", Month::September),
    ("oct", Month::October),
    ("october", Month::October),
    ("nov", Month::November),
    ("november", Month::November),
    ("dec", Month::December),
    ("december", Month::December),
];

fn year_pattern() -> &'static Regex {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    YEAR.get_or_init(|| Regex::new(r"20\d{2}").expect("year pattern is valid"))
}

fn month_from_tokens(name: &str) -> Option<Month> {
    name.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|token| !token.is_empty())
        .find_map(|token| {
            MONTH_SPELLINGS
                .iter()
                .find(|(spelling, _)| *spelling == token)
                .map(|(_, month)| *month)
        })
}

fn month_from_substring(name: &str) -> Option<Month> {
    MONTH_SPELLINGS
        .iter()
        .find(|(spelling, _)| name.contains(spelling))
        .map(|(_, month)| *month)
}

/// Derives the disclosure month and year from a file name such as `maebf-jan2025.xlsx`.
///
/// A whole alphabetic token naming a month is preferred; otherwise the first month
/// spelling contained anywhere in the name is used.
pub fn resolve_period(file_name: &str) -> Option<DisclosurePeriod> {
    let name = file_name.to_lowercase();
    let year = year_pattern().find(&name)?.as_str().parse::<i32>().ok()?;
    let month = month_from_tokens(&name).or_else(|| month_from_substring(&name))?;
    Some(DisclosurePeriod { month, year })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(name: &str) -> Option<(&'static str, i32)> {
        resolve_period(name).map(|p| (p.month_name(), p.year))
    }

    #[test]
    fn test_abbreviated_and_full_month_names() {
        assert_eq!(resolved("maebf-jan2025.xlsx"), Some(("January", 2025)));
        assert_eq!(resolved("Portfolio_September_2024.xlsx"), Some(("September", 2024)));
        assert_eq!(resolved("CRLMCF-Sept-2023.xls"), Some(("September", 2023)));
        assert_eq!(resolved("holdings dec 2022.csv"), Some(("December", 2022)));
    }

    #[test]
    fn test_token_match_beats_incidental_substring() {
        assert_eq!(resolved("summary-may-2024.xlsx"), Some(("May", 2024)));
    }

    #[test]
    fn test_substring_fallback() {
        assert_eq!(resolved("portfoliojun2024.xlsx"), Some(("June", 2024)));
    }

    #[test]
    fn test_unresolvable_names() {
        assert_eq!(resolved("portfolio.xlsx"), None);
        assert_eq!(resolved("portfolio-march.xlsx"), None);
        assert_eq!(resolved("holdings-2024.xlsx"), None);
    }
}
