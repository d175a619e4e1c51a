//! Free-text Irish address helpers.
//!
//! Everything here is total: input that does not parse yields `None` or an
//! empty string, which simply zeroes the scoring rule that depends on it.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref LEADING_NUMBER: Regex = Regex::new(r"^\s*(\d+[A-Za-z]?)\b").unwrap();
    static ref ANY_NUMBER: Regex = Regex::new(r"\b(\d+[A-Za-z]?)\b").unwrap();

    // Checked in this order, first match wins.
    static ref RANGE_PATTERNS: [Regex; 3] = [
        Regex::new(r"(\d+)\s*-\s*(\d+)").unwrap(),
        Regex::new(r"(?i)(\d+)\s+to\s+(\d+)").unwrap(),
        Regex::new(r"(\d+)\s*/\s*(\d+)").unwrap(),
    ];

    static ref LEADING_HOUSE: Regex =
        Regex::new(r"(?i)^\s*\d+[a-z]?(?:\s*(?:-|/|\bto\b)\s*\d+[a-z]?)?\b[\s,]*").unwrap();
    static ref POSTCODE_CLAUSE: Regex = Regex::new(
        r"(?i)(?:^|,|\s)\s*(?:(?:co\.?\s*dublin|dublin(?:\s*\d{1,2}[a-z]?)?|d\s?\d{1,2}[a-z]?(?:\s*[a-z0-9]{4})?)\s*(?:,.*)?|d[uú]n\s+laoghaire.*)$"
    )
    .unwrap();
    static ref STREET_TYPE: Regex =
        Regex::new(r"(?i)street|road|avenue|drive|lane|close|crescent|place|court").unwrap();
    static ref STREET_ABBREVIATION: Regex =
        Regex::new(r"\b(street|road|avenue|close|crescent)\b").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref DUBLIN_POSTCODE: Regex =
        Regex::new(r"(?i)^\s*(?:dublin|d)\s*(\d{1,2})(w)?\b").unwrap();
}

/// Leading house number of an address, e.g. `"123A"` in `"123A Main Street"`.
pub fn extract_house_number(address: &str) -> Option<String> {
    LEADING_NUMBER
        .captures(address)
        .map(|caps| caps[1].to_owned())
}

/// Every number-like token in an address, in order of appearance.
pub fn extract_all_numbers(address: &str) -> Vec<String> {
    ANY_NUMBER
        .captures_iter(address)
        .map(|caps| caps[1].to_owned())
        .collect()
}

/// First numeric range written as `N-M`, `N to M` or `N/M`, as written.
pub fn find_number_range(address: &str) -> Option<(u32, u32)> {
    RANGE_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(address)?;
        let start = caps[1].parse::<u32>().ok()?;
        let end = caps[2].parse::<u32>().ok()?;
        Some((start, end))
    })
}

/// Numeric part of a house number, ignoring any letter suffix.
pub fn house_number_value(house_number: &str) -> Option<u32> {
    let digits: String = house_number
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// The part of an address that names the street.
///
/// Drops the house number and the trailing Dublin postcode clause, then picks
/// the last comma-separated part mentioning a street type. Falls back to the
/// last part.
pub fn extract_street_name(address: &str) -> String {
    let without_number = LEADING_HOUSE.replace(address, "");
    let without_postcode = POSTCODE_CLAUSE.replace(&without_number, "");

    let parts: Vec<&str> = without_postcode
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    parts
        .iter()
        .rev()
        .find(|p| STREET_TYPE.is_match(p))
        .or_else(|| parts.last())
        .map(|p| p.to_string())
        .unwrap_or_default()
}

/// Lowercase, abbreviated and space-free form used for comparison.
pub fn normalize_street(street: &str) -> String {
    let lower = street.to_lowercase();
    let abbreviated = STREET_ABBREVIATION.replace_all(&lower, |caps: &Captures| {
        match &caps[1] {
            "street" => "st",
            "road" => "rd",
            "avenue" => "ave",
            "close" => "cl",
            _ => "cres",
        }
        .to_owned()
    });
    WHITESPACE.replace_all(&abbreviated, "").into_owned()
}

/// Similarity in `[0, 1]` between two street names.
pub fn street_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_street(a);
    let b = normalize_street(b);

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if a.contains(b.as_str()) || b.contains(a.as_str()) {
        return 0.9;
    }

    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (&a, &b)
    } else {
        (&b, &a)
    };
    let shared = shorter.chars().filter(|c| longer.contains(*c)).count();
    shared as f64 / longer.chars().count() as f64
}

/// `"D7"`, `"d 07"` and `"Dublin 7"` all become `"D07"`; `"Dublin 6W"` becomes `"D06W"`.
pub fn normalize_postcode(postcode: &str) -> Option<String> {
    let caps = DUBLIN_POSTCODE.captures(postcode)?;
    let district = caps[1].parse::<u32>().ok()?;
    let suffix = if caps.get(2).is_some() { "W" } else { "" };
    Some(format!("D{:02}{}", district, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_extract_a_leading_house_number() {
        assert_eq!(extract_house_number("123 Main Street"), Some("123".to_owned()));
        assert_eq!(extract_house_number("  14b Oak Road"), Some("14b".to_owned()));
        assert_eq!(extract_house_number("Apartment 4, Main Street"), None);
        assert_eq!(extract_house_number(""), None);
    }

    #[test]
    fn it_should_extract_every_number() {
        assert_eq!(
            extract_all_numbers("120-126 Main Street, Dublin 4"),
            vec!["120", "126", "4"]
        );
        assert!(extract_all_numbers("The Old Mill").is_empty());
    }

    #[test]
    fn it_should_find_ranges_in_pattern_order() {
        assert_eq!(find_number_range("120-126 Main Street"), Some((120, 126)));
        assert_eq!(find_number_range("Nos. 5 to 9 High Street"), Some((5, 9)));
        assert_eq!(find_number_range("12/14 Oak Road"), Some((12, 14)));
        assert_eq!(find_number_range("8 to 10 Oak Road, 1-2 Mews"), Some((1, 2)));
        assert_eq!(find_number_range("7 Oak Road"), None);
    }

    #[test]
    fn it_should_read_the_numeric_part_of_a_house_number() {
        assert_eq!(house_number_value("123A"), Some(123));
        assert_eq!(house_number_value("A1"), None);
    }

    #[test]
    fn it_should_extract_the_street_name() {
        assert_eq!(extract_street_name("123 Main Street, Dublin 4"), "Main Street");
        assert_eq!(extract_street_name("120-126 Main Street"), "Main Street");
        assert_eq!(
            extract_street_name("Flat 2, 14 Oak Road, Ranelagh, Dublin 6"),
            "14 Oak Road"
        );
        assert_eq!(
            extract_street_name("3 Sandycove Avenue, Dún Laoghaire, Co. Dublin"),
            "Sandycove Avenue"
        );
        assert_eq!(extract_street_name("5 Main St, D04 X2Y3"), "Main St");
    }

    #[test]
    fn it_should_fall_back_to_the_last_part() {
        assert_eq!(extract_street_name("The Old Mill, Ballymun"), "Ballymun");
        assert_eq!(extract_street_name("The Old Mill"), "The Old Mill");
        assert_eq!(extract_street_name(""), "");
        assert_eq!(extract_street_name("Dublin 8"), "");
    }

    #[test]
    fn it_should_strip_the_postcode_without_a_comma() {
        assert_eq!(extract_street_name("1 Ash Lane Dublin 14"), "Ash Lane");
        assert_eq!(extract_street_name("7 Elm Close D6W"), "Elm Close");
        assert_eq!(extract_street_name("3 Oak Drive Co. Dublin"), "Oak Drive");
        assert_eq!(extract_street_name("12 Dublin Road"), "Dublin Road");
    }

    #[test]
    fn it_should_find_street_types_inside_words() {
        assert_eq!(extract_street_name("The Courtyard, Ballymun"), "The Courtyard");
        assert_eq!(extract_street_name("Roadstone Close, Ballymun"), "Roadstone Close");
    }

    #[test]
    fn it_should_keep_a_street_named_after_dublin() {
        assert_eq!(extract_street_name("12 Dublin Road, Co. Dublin"), "Dublin Road");
        assert_eq!(
            extract_street_name("4 Main Street, Dublin 6W, Dublin 6"),
            "Main Street"
        );
    }

    #[test]
    fn it_should_normalize_street_names() {
        assert_eq!(normalize_street("Main Street"), "mainst");
        assert_eq!(normalize_street("Oak  Crescent"), "oakcres");
        assert_eq!(normalize_street("Elm Close"), "elmcl");
        assert_eq!(normalize_street("Lower Road"), "lowerrd");
        assert_eq!(normalize_street("Park Avenue"), "parkave");
    }

    #[test]
    fn it_should_score_street_similarity() {
        assert_eq!(street_similarity("Main Street", "main st"), 1.0);
        assert_eq!(street_similarity("Main Street", "Main Street Upper"), 0.9);
        assert_eq!(street_similarity("", "Main Street"), 0.0);

        let partial = street_similarity("abc", "abxy");
        assert!((partial - 0.5).abs() < 1e-9);
    }

    #[test]
    fn it_should_normalize_postcodes() {
        assert_eq!(normalize_postcode("D7"), Some("D07".to_owned()));
        assert_eq!(normalize_postcode("Dublin 7"), Some("D07".to_owned()));
        assert_eq!(normalize_postcode("d 17"), Some("D17".to_owned()));
        assert_eq!(normalize_postcode("Dublin 6W"), Some("D06W".to_owned()));
        assert_eq!(normalize_postcode("D04 X2Y3"), Some("D04".to_owned()));
        assert_eq!(normalize_postcode("Co. Dublin"), None);
        assert_eq!(normalize_postcode(""), None);
        assert_ne!(normalize_postcode("D17"), normalize_postcode("D7"));
    }
}
