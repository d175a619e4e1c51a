use super::address;
use super::match_types::{MatchContext, PlanningApplication, RuleHit};

/// One independent scoring rule. `None` means the rule did not fire.
pub type ScoringRule = fn(&PlanningApplication, &MatchContext) -> Option<RuleHit>;

pub const HOUSE_NUMBER_POINTS: u32 = 3;
pub const STREET_POINTS: u32 = 2;
pub const POSTCODE_POINTS: u32 = 1;
pub const STREET_SIMILARITY_THRESHOLD: f64 = 0.8;

/// The rules applied by a default matcher, in evaluation order.
pub const DEFAULT_RULES: [ScoringRule; 4] = [
    search_radius_rule,
    house_number_rule,
    street_name_rule,
    postcode_rule,
];

/// Tighter searches are stronger evidence.
pub fn search_radius_rule(_application: &PlanningApplication, context: &MatchContext) -> Option<RuleHit> {
    let points = match context.search_radius {
        30 => 3,
        75 => 2,
        150 => 1,
        _ => return None,
    };
    Some(RuleHit::new(
        points,
        format!("Within {}m radius", context.search_radius),
    ))
}

pub fn house_number_rule(application: &PlanningApplication, context: &MatchContext) -> Option<RuleHit> {
    let target = address::extract_house_number(&context.property_address)?;

    let exact = address::extract_all_numbers(&application.address)
        .iter()
        .any(|n| n.eq_ignore_ascii_case(&target));
    if exact {
        return Some(RuleHit::new(
            HOUSE_NUMBER_POINTS,
            format!("House number match: {}", target),
        ));
    }

    let value = address::house_number_value(&target)?;
    let (start, end) = address::find_number_range(&application.address)?;
    if start.min(end) <= value && value <= start.max(end) {
        return Some(RuleHit::new(
            HOUSE_NUMBER_POINTS,
            format!("House number in range: {}-{}", start, end),
        ));
    }

    None
}

pub fn street_name_rule(application: &PlanningApplication, context: &MatchContext) -> Option<RuleHit> {
    let property_street = address::extract_street_name(&context.property_address);
    let application_street = address::extract_street_name(&application.address);

    let similarity = address::street_similarity(&property_street, &application_street);
    if similarity >= STREET_SIMILARITY_THRESHOLD {
        Some(RuleHit::new(STREET_POINTS, "Street name match".to_owned()))
    } else {
        None
    }
}

pub fn postcode_rule(application: &PlanningApplication, context: &MatchContext) -> Option<RuleHit> {
    let property = address::normalize_postcode(context.dublin_postcode.as_ref()?)?;
    let candidate = address::normalize_postcode(application.postcode.as_ref()?)?;

    if property == candidate {
        Some(RuleHit::new(POSTCODE_POINTS, "Postcode match".to_owned()))
    } else {
        None
    }
}
