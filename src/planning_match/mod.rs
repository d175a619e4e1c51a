pub mod address;
mod match_types;
mod matcher;
mod portal;
pub mod rules;

pub use self::match_types::{
    Confidence, ConfidenceGroups, MatchContext, MatchResult, PlanningApplication, RuleHit,
    SEARCH_RADII,
};
pub use self::matcher::{group_by_confidence, AddressMatcher};
pub use self::portal::portal_url;
pub use self::rules::ScoringRule;
