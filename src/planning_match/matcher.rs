use log::debug;

use super::match_types::{
    Confidence, ConfidenceGroups, MatchContext, MatchResult, PlanningApplication,
};
use super::rules::{ScoringRule, DEFAULT_RULES};

/// Scores planning applications against a property with an ordered rule chain.
#[derive(Clone)]
pub struct AddressMatcher {
    rules: Vec<ScoringRule>,
}

impl Default for AddressMatcher {
    fn default() -> AddressMatcher {
        AddressMatcher::with_rules(DEFAULT_RULES.to_vec())
    }
}

impl AddressMatcher {
    pub fn new() -> AddressMatcher {
        AddressMatcher::default()
    }

    pub fn with_rules(rules: Vec<ScoringRule>) -> AddressMatcher {
        AddressMatcher { rules }
    }

    /// Runs every rule (no early exit) and sums the points.
    pub fn score<'a>(
        &self,
        application: &'a PlanningApplication,
        context: &MatchContext,
    ) -> MatchResult<'a> {
        let mut score = 0;
        let mut match_reasons = Vec::new();

        for rule in &self.rules {
            if let Some(hit) = rule(application, context) {
                score += hit.points;
                match_reasons.push(hit.reason);
            }
        }

        debug!(
            "Scored {} ({}): {} {:?}",
            application.application_number, application.address, score, match_reasons
        );

        MatchResult {
            application,
            score,
            confidence: Confidence::from_score(score),
            match_reasons,
        }
    }

    /// Scores every application, best first. Equal scores keep input order.
    pub fn score_all<'a>(
        &self,
        applications: &'a [PlanningApplication],
        context: &MatchContext,
    ) -> Vec<MatchResult<'a>> {
        let mut results: Vec<_> = applications
            .iter()
            .map(|application| self.score(application, context))
            .collect();
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results
    }
}

pub fn group_by_confidence<'a>(results: Vec<MatchResult<'a>>) -> ConfidenceGroups<'a> {
    let mut groups = ConfidenceGroups::default();
    for result in results {
        match result.confidence {
            Confidence::High => groups.high.push(result),
            Confidence::Medium => groups.medium.push(result),
            Confidence::Low => groups.low.push(result),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning_match::match_types::RuleHit;

    fn application(number: &str, address: &str) -> PlanningApplication {
        PlanningApplication::new("Dublin City Council", address, number)
    }

    #[test]
    fn it_should_score_a_range_match_as_high() {
        let app = application("2001/24", "120-126 Main Street");
        let context = MatchContext::new("123 Main Street, Dublin 4", 75);

        let result = AddressMatcher::new().score(&app, &context);

        assert_eq!(result.score, 7);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(
            result.match_reasons,
            vec![
                "Within 75m radius",
                "House number in range: 120-126",
                "Street name match"
            ]
        );
    }

    #[test]
    fn it_should_add_every_rule() {
        let app = application("2002/24", "7 Oak Road, Dublin 6").with_postcode("Dublin 6");
        let context = MatchContext::new("7 Oak Road, Dublin 6", 30).with_postcode("D6");

        let result = AddressMatcher::new().score(&app, &context);

        assert_eq!(result.score, 9);
        assert_eq!(
            result.match_reasons,
            vec![
                "Within 30m radius",
                "House number match: 7",
                "Street name match",
                "Postcode match"
            ]
        );
    }

    #[test]
    fn it_should_degrade_to_low_for_unrelated_addresses() {
        let app = application("2003/24", "The Old Mill");
        let context = MatchContext::new("Main Street", 150);

        let result = AddressMatcher::new().score(&app, &context);

        assert_eq!(result.score, 1);
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.match_reasons, vec!["Within 150m radius"]);
    }

    #[test]
    fn it_should_not_match_streets_on_a_shared_postcode() {
        let app = application("2005/24", "1 Oak Lane Dublin 14");
        let context = MatchContext::new("1 Ash Lane Dublin 14", 150);

        let result = AddressMatcher::new().score(&app, &context);

        assert_eq!(result.score, 4);
        assert_eq!(result.confidence, Confidence::Medium);
        assert_eq!(
            result.match_reasons,
            vec!["Within 150m radius", "House number match: 1"]
        );
    }

    #[test]
    fn it_should_run_custom_rule_chains() {
        fn always(_: &PlanningApplication, _: &MatchContext) -> Option<RuleHit> {
            Some(RuleHit::new(4, "Always".to_owned()))
        }
        let app = application("2004/24", "1 Main Street");
        let context = MatchContext::new("1 Main Street", 999);

        let result = AddressMatcher::with_rules(vec![always as ScoringRule, always]).score(&app, &context);

        assert_eq!(result.score, 8);
        assert_eq!(result.match_reasons, vec!["Always", "Always"]);
    }

    #[test]
    fn it_should_rank_results_by_score() {
        let apps = vec![
            application("a", "The Old Mill"),
            application("b", "5 Main Street"),
            application("c", "9 Elm Park"),
        ];
        let context = MatchContext::new("5 Main Street", 75);

        let ranked: Vec<_> = AddressMatcher::new()
            .score_all(&apps, &context)
            .iter()
            .map(|r| r.application.application_number.clone())
            .collect();

        assert_eq!(ranked, vec!["b", "a", "c"]);
    }

    #[test]
    fn it_should_group_by_confidence_preserving_order() {
        let apps = vec![
            application("low", "The Old Mill"),
            application("high", "5 Main Street"),
            application("medium", "5 Elm Park"),
        ];
        let context = MatchContext::new("5 Main Street", 75);
        let matcher = AddressMatcher::new();
        let results: Vec<_> = apps.iter().map(|a| matcher.score(a, &context)).collect();

        let groups = group_by_confidence(results.clone());

        assert_eq!(groups.len(), 3);
        assert_eq!(groups.high, vec![results[1].clone()]);
        assert_eq!(groups.medium, vec![results[2].clone()]);
        assert_eq!(groups.low, vec![results[0].clone()]);
    }

    #[test]
    fn it_should_keep_relative_order_inside_a_group() {
        let apps = vec![
            application("first", "2 Main Street"),
            application("second", "The Old Mill"),
            application("third", "3 Main Street"),
        ];
        let context = MatchContext::new("Main Street", 150);
        let matcher = AddressMatcher::new();
        let results: Vec<_> = apps.iter().map(|a| matcher.score(a, &context)).collect();

        let groups = group_by_confidence(results);

        let low: Vec<_> = groups
            .low
            .iter()
            .map(|r| r.application.application_number.as_str())
            .collect();
        assert_eq!(low, vec!["first", "second", "third"]);
        assert!(groups.high.is_empty());
    }
}
