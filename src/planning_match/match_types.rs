use std::fmt;

use serde::{Deserialize, Serialize};

/// Search radii offered to the user, in metres.
pub const SEARCH_RADII: [u32; 3] = [30, 75, 150];

/// A planning application as published by a local authority.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanningApplication {
    pub authority: String,
    pub address: String,
    #[serde(default)]
    pub postcode: Option<String>,
    pub application_number: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default)]
    pub received_date: Option<String>,
}

impl PlanningApplication {
    pub fn new(authority: &str, address: &str, application_number: &str) -> PlanningApplication {
        PlanningApplication {
            authority: authority.to_owned(),
            address: address.to_owned(),
            postcode: None,
            application_number: application_number.to_owned(),
            description: None,
            decision: None,
            received_date: None,
        }
    }

    pub fn with_postcode(mut self, postcode: &str) -> PlanningApplication {
        self.postcode = Some(postcode.to_owned());
        self
    }
}

/// The property being looked up.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchContext {
    pub property_address: String,
    pub dublin_postcode: Option<String>,
    /// Metres. Values outside [`SEARCH_RADII`] earn no radius points.
    pub search_radius: u32,
}

impl MatchContext {
    pub fn new(property_address: &str, search_radius: u32) -> MatchContext {
        MatchContext {
            property_address: property_address.to_owned(),
            dublin_postcode: None,
            search_radius,
        }
    }

    pub fn with_postcode(mut self, postcode: &str) -> MatchContext {
        self.dublin_postcode = Some(postcode.to_owned());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub const HIGH_THRESHOLD: u32 = 6;
    pub const MEDIUM_THRESHOLD: u32 = 4;

    pub fn from_score(score: u32) -> Confidence {
        if score >= Confidence::HIGH_THRESHOLD {
            Confidence::High
        } else if score >= Confidence::MEDIUM_THRESHOLD {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        f.write_str(label)
    }
}

/// Points awarded by one scoring rule, with the reason shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleHit {
    pub points: u32,
    pub reason: String,
}

impl RuleHit {
    pub fn new(points: u32, reason: String) -> RuleHit {
        RuleHit { points, reason }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult<'a> {
    pub application: &'a PlanningApplication,
    pub score: u32,
    pub confidence: Confidence,
    /// In rule evaluation order.
    pub match_reasons: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfidenceGroups<'a> {
    pub high: Vec<MatchResult<'a>>,
    pub medium: Vec<MatchResult<'a>>,
    pub low: Vec<MatchResult<'a>>,
}

impl<'a> ConfidenceGroups<'a> {
    pub fn len(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_bucket_scores() {
        assert_eq!(Confidence::from_score(0), Confidence::Low);
        assert_eq!(Confidence::from_score(3), Confidence::Low);
        assert_eq!(Confidence::from_score(4), Confidence::Medium);
        assert_eq!(Confidence::from_score(5), Confidence::Medium);
        assert_eq!(Confidence::from_score(6), Confidence::High);
        assert_eq!(Confidence::from_score(9), Confidence::High);
    }

    #[test]
    fn it_should_display_confidence_in_lowercase() {
        assert_eq!(Confidence::Medium.to_string(), "medium");
    }
}
