//! Filter rules for switch identifiers
//!
//! A [`FilterRule`] is a compiled whole-string regular expression. A
//! [`FilterRuleSet`] holds the rules behind an `ArcSwap`, so message handlers
//! read a complete snapshot without taking a lock while configuration code
//! publishes new membership with read-copy-update.

use arc_swap::ArcSwap;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use switchfilter_core::config::SEED_PATTERN;
use switchfilter_core::error::RuleError;
use tracing::debug;

/// Immutable snapshot of a rule set, ordered by pattern text.
pub type RuleMap = BTreeMap<String, FilterRule>;

/// A single pattern matched against the full switch identifier
#[derive(Debug, Clone)]
pub struct FilterRule {
    /// Anchored regex used for matching
    regex: Regex,
    /// Original pattern string as registered
    pattern: String,
}

impl FilterRule {
    /// Compile a pattern into a rule.
    ///
    /// The pattern is wrapped as `^(?:pattern)$`, so `"11"` matches only the
    /// identifier `"11"` and never a longer one containing it.
    pub fn new(pattern: &str) -> Result<Self, RuleError> {
        if pattern.trim().is_empty() {
            return Err(RuleError::EmptyPattern);
        }

        // The pattern must stand alone, or an unbalanced `)` could close the
        // anchoring group and leave a prefix match.
        Regex::new(pattern).map_err(|e| RuleError::invalid(pattern, e.to_string()))?;

        let anchored = format!("^(?:{})$", pattern);
        let regex = Regex::new(&anchored).map_err(|e| RuleError::invalid(pattern, e.to_string()))?;

        Ok(Self {
            regex,
            pattern: pattern.to_string(),
        })
    }

    /// Pattern text as registered
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Test an identifier against this rule
    #[inline]
    pub fn is_match(&self, identifier: &str) -> bool {
        self.regex.is_match(identifier)
    }
}

impl PartialEq for FilterRule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for FilterRule {}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Set of filter rules, unique by pattern text.
///
/// Readers call [`FilterRuleSet::snapshot`] (or the evaluator, which does it
/// for them) and never block on writers. Writers compile the pattern before
/// touching the set, so a reader only ever sees fully built rules.
pub struct FilterRuleSet {
    rules: ArcSwap<RuleMap>,
}

impl FilterRuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self {
            rules: ArcSwap::from_pointee(RuleMap::new()),
        }
    }

    /// Create a rule set holding the default seed pattern
    pub fn seeded() -> Self {
        let set = Self::new();
        // The seed pattern is a compile-time constant known to be valid.
        if let Ok(rule) = FilterRule::new(SEED_PATTERN) {
            set.publish(rule);
        }
        set
    }

    /// Build a rule set from patterns. Fails on the first malformed pattern
    /// and leaves nothing half-built.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = RuleMap::new();
        for pattern in patterns {
            let rule = FilterRule::new(pattern.as_ref())?;
            map.insert(rule.pattern.clone(), rule);
        }
        Ok(Self {
            rules: ArcSwap::from_pointee(map),
        })
    }

    /// Add a pattern.
    ///
    /// Returns `Ok(true)` if the pattern was new and `Ok(false)` if it was
    /// already present. Malformed patterns are rejected before the set is
    /// touched.
    pub fn insert(&self, pattern: &str) -> Result<bool, RuleError> {
        let rule = FilterRule::new(pattern)?;
        let inserted = self.publish(rule);
        debug!(pattern, inserted, "Filter pattern registered");
        Ok(inserted)
    }

    /// Remove a pattern, returning whether it was present
    pub fn remove(&self, pattern: &str) -> bool {
        let previous = self.rules.rcu(|current| {
            let mut next = RuleMap::clone(current);
            next.remove(pattern);
            next
        });
        let removed = previous.contains_key(pattern);
        debug!(pattern, removed, "Filter pattern removed");
        removed
    }

    /// Current rule membership
    #[inline]
    pub fn snapshot(&self) -> Arc<RuleMap> {
        self.rules.load_full()
    }

    /// Registered patterns in iteration order
    pub fn patterns(&self) -> Vec<String> {
        self.rules.load().keys().cloned().collect()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.load().len()
    }

    /// Check if the set holds no rules
    pub fn is_empty(&self) -> bool {
        self.rules.load().is_empty()
    }

    fn publish(&self, rule: FilterRule) -> bool {
        let previous = self.rules.rcu(|current| {
            if current.contains_key(&rule.pattern) {
                return Arc::clone(current);
            }
            let mut next = RuleMap::clone(current);
            next.insert(rule.pattern.clone(), rule.clone());
            Arc::new(next)
        });
        !previous.contains_key(&rule.pattern)
    }
}

impl Default for FilterRuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FilterRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRuleSet")
            .field("patterns", &self.patterns())
            .finish()
    }
}
