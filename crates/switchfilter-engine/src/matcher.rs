//! Match evaluation of switch identifiers against a rule set

use crate::rules::{FilterRule, FilterRuleSet, RuleMap};

/// Result of evaluating an identifier against a rule set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// The identifier matched this rule
    Match(FilterRule),
    /// No rule matched
    NoMatch,
}

impl MatchResult {
    /// Check if the result is a match
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Match(_))
    }

    /// The rule that matched, if any
    pub fn rule(&self) -> Option<&FilterRule> {
        match self {
            MatchResult::Match(rule) => Some(rule),
            MatchResult::NoMatch => None,
        }
    }
}

/// Evaluate an identifier against the current membership of a rule set.
///
/// Rules are tried in pattern order and the first match wins.
#[inline]
pub fn evaluate(identifier: &str, rules: &FilterRuleSet) -> MatchResult {
    evaluate_snapshot(identifier, &rules.snapshot())
}

/// Evaluate an identifier against an already loaded snapshot
pub fn evaluate_snapshot(identifier: &str, rules: &RuleMap) -> MatchResult {
    rules
        .values()
        .find(|rule| rule.is_match(identifier))
        .map_or(MatchResult::NoMatch, |rule| MatchResult::Match(rule.clone()))
}

/// Check whether an identifier fully matches at least one rule
#[inline]
pub fn matches(identifier: &str, rules: &FilterRuleSet) -> bool {
    rules
        .snapshot()
        .values()
        .any(|rule| rule.is_match(identifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_scenario() {
        let rules = FilterRuleSet::from_patterns(["^11.*"]).unwrap();
        assert!(matches("11:22:33:44:55:66:77:88", &rules));
        assert!(!matches("22:11:33:44:55:66:77:88", &rules));
    }

    #[test]
    fn test_not_substring_search() {
        let rules = FilterRuleSet::from_patterns(["11"]).unwrap();
        assert!(!matches("22:11:33:44:55:66:77:88", &rules));
        assert!(matches("11", &rules));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let rules = FilterRuleSet::new();
        assert!(!matches("11:22:33:44:55:66:77:88", &rules));
        assert_eq!(evaluate("11", &rules), MatchResult::NoMatch);
    }

    #[test]
    fn test_malformed_identifier_is_not_an_error() {
        let rules = FilterRuleSet::seeded();
        assert!(!matches("", &rules));
        assert!(!matches("not a dpid", &rules));
    }

    #[test]
    fn test_first_match_is_stable() {
        let rules = FilterRuleSet::from_patterns(["^11:22.*", "^11.*"]).unwrap();
        let result = evaluate("11:22:00:00:00:00:00:01", &rules);
        assert_eq!(result.rule().map(FilterRule::pattern), Some("^11.*"));

        for _ in 0..10 {
            assert_eq!(evaluate("11:22:00:00:00:00:00:01", &rules), result);
        }
    }

    #[test]
    fn test_duplicate_insert_keeps_decisions() {
        let rules = FilterRuleSet::seeded();
        let ids = ["11:00:00:00:00:00:00:01", "00:11:00:00:00:00:00:01", "11"];
        let before: Vec<bool> = ids.iter().map(|id| matches(id, &rules)).collect();

        rules.insert("^11.*").unwrap();
        let after: Vec<bool> = ids.iter().map(|id| matches(id, &rules)).collect();

        assert_eq!(before, after);
    }
}
