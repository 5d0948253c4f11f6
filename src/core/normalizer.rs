//! Company-name canonicalization.
//!
//! The canonical form is produced by a fixed pipeline of small rewrite rules:
//! whitespace collapse, footnote-marker stripping, parenthetical removal and
//! legal-suffix canonicalization. Each rule is a pure `&str -> String` function.
//! The pipeline is re-applied until the name stops changing, so
//! `normalize_company_name` is idempotent even when one rule exposes input for
//! an earlier one (e.g. a marker hidden behind a trailing parenthetical).

type Rule = fn(&str) -> String;

const PIPELINE: [Rule; 4] = [
    collapse_whitespace,
    strip_footnote_markers,
    strip_parentheticals,
    canonicalize_legal_suffix,
];

const MAX_PASSES: usize = 8;

/// Tokens that may trail a company name as part of its legal form.
const LEGAL_TOKENS: [&str; 9] = [
    "limited", "ltd", "ltd.", "pvt", "pvt.", "private", "pvt.ltd", "pvt.ltd.", "pvtltd",
];

/// Subset of [`LEGAL_TOKENS`] that actually denotes "limited".
const LIMITED_TOKENS: [&str; 6] = ["limited", "ltd", "ltd.", "pvt.ltd", "pvt.ltd.", "pvtltd"];

pub fn normalize_company_name(raw: &str) -> Option<String> {
    let mut current = collapse_whitespace(raw);
    for _ in 0..MAX_PASSES {
        let next = PIPELINE
            .iter()
            .fold(current.clone(), |name, rule| rule(&name));
        let next = collapse_whitespace(&next);
        if next == current {
            break;
        }
        current = next;
    }

    if current.is_empty() {
        None
    } else {
        Some(current)
    }
}

pub fn collapse_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes trailing footnote annotations such as `" A**"`.
pub fn strip_footnote_markers(name: &str) -> String {
    let mut current = name;
    loop {
        let Some(stem) = current.strip_suffix("**") else {
            break;
        };
        let mut chars = stem.chars();
        let Some(letter) = chars.next_back() else {
            break;
        };
        let before = chars.as_str();
        if !letter.is_ascii_uppercase() || !before.ends_with(char::is_whitespace) {
            break;
        }
        current = before.trim_end();
    }
    current.to_string()
}

/// Drops every non-empty `(...)` segment together with the whitespace around it.
pub fn strip_parentheticals(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;

    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        match after.find(')') {
            Some(close) if close > 0 => {
                out.push_str(rest[..open].trim_end());
                out.push(' ');
                rest = after[close + 1..].trim_start();
            }
            _ => {
                out.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    collapse_whitespace(&out)
}

/// Rewrites a trailing legal form ("Limited", "Pvt. Ltd.", "Private Limited", "Ltd")
/// to `Ltd.`. The company name itself is never consumed.
pub fn canonicalize_legal_suffix(name: &str) -> String {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    let mut keep = tokens.len();
    let mut saw_limited = false;

    while keep > 1 {
        let token = tokens[keep - 1].to_ascii_lowercase();
        if !LEGAL_TOKENS.contains(&token.as_str()) {
            break;
        }
        saw_limited |= LIMITED_TOKENS.contains(&token.as_str());
        keep -= 1;
    }

    if !saw_limited {
        return name.to_string();
    }

    let mut canonical = tokens[..keep].join(" ");
    canonical.push_str(" Ltd.");
    canonical
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(name: &str) -> String {
        normalize_company_name(name).unwrap()
    }

    #[test]
    fn test_suffix_variants_share_canonical_form() {
        assert_eq!(norm("ABC Private Limited"), "ABC Ltd.");
        assert_eq!(norm("ABC Pvt. Ltd."), "ABC Ltd.");
        assert_eq!(norm("ABC Pvt Ltd"), "ABC Ltd.");
        assert_eq!(norm("ABC Ltd"), "ABC Ltd.");
        assert_eq!(norm("ABC Limited"), "ABC Ltd.");
        assert_eq!(norm("ABC ltd."), "ABC Ltd.");
        assert_eq!(norm("ABC LIMITED"), "ABC Ltd.");
    }

    #[test]
    fn test_parenthetical_segments_are_removed() {
        assert_eq!(norm("SKF India (Industrial) Ltd."), "SKF India Ltd.");
        assert_eq!(norm("Tata Motors (DVR)"), "Tata Motors");
        assert_eq!(norm("HDFC Bank (Demat) Ltd."), "HDFC Bank Ltd.");
        assert_eq!(norm("HDFC Bank Ltd (Demat)"), "HDFC Bank Ltd.");
        assert_eq!(norm("Odd () Name"), "Odd () Name");
    }

    #[test]
    fn test_footnote_markers_are_stripped() {
        assert_eq!(norm("Infosys Ltd A**"), "Infosys Ltd.");
        assert_eq!(norm("Infosys Limited B** C**"), "Infosys Ltd.");
        assert_eq!(norm("Infosys A** (Tech)"), "Infosys");
        assert_eq!(norm("Infosys a**"), "Infosys a**");
    }

    #[test]
    fn test_private_alone_is_not_a_legal_suffix() {
        assert_eq!(norm("Kotak Private"), "Kotak Private");
        assert_eq!(norm("Limited"), "Limited");
        assert_eq!(norm("Pvt Ltd"), "Pvt Ltd.");
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        assert_eq!(norm("  Larsen   &  Toubro\tLimited "), "Larsen & Toubro Ltd.");
    }

    #[test]
    fn test_empty_names_are_unusable() {
        assert_eq!(normalize_company_name(""), None);
        assert_eq!(normalize_company_name("   "), None);
        assert_eq!(normalize_company_name("(Demat)"), None);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "ABC Private Limited",
            "ABC Pvt. Ltd.",
            "SKF India (Industrial) Ltd.",
            "Tata Motors Ltd (DVR) A**",
            "Foo A** (x)",
            "X Pvt Limited",
            "Bharti Airtel Ltd. (Partly Paid)",
            "  Mahindra &   Mahindra Limited  ",
            "Pvt Ltd",
            "Ltd Ltd",
            "Odd (unclosed name",
            "ITC (a (b) c) Ltd",
        ];
        for input in inputs {
            let once = norm(input);
            assert_eq!(norm(&once), once, "not idempotent for {input:?}");
        }
    }
}
