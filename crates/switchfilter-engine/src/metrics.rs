//! Metrics Collection
//!
//! Counts filter decisions with lock-free atomics and mirrors every count into
//! the `metrics` facade so whichever recorder the host installs picks them up.

use metrics::{counter, describe_counter};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counter
#[derive(Debug)]
pub struct FastCounter {
    count: AtomicU64,
}

impl FastCounter {
    /// Create a new counter
    pub const fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
        }
    }

    /// Increment the counter
    #[inline]
    pub fn increment(&self) {
        self.add(1);
    }

    /// Add to the counter
    #[inline]
    pub fn add(&self, n: u64) {
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    /// Get the current count
    #[inline]
    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Reset the counter
    #[inline]
    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}

impl Default for FastCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Filter metrics collector
#[derive(Debug)]
pub struct FilterMetrics {
    messages_evaluated: FastCounter,
    messages_passed: FastCounter,
    packet_in_suppressed: FastCounter,
    packet_out_observed: FastCounter,
    switches_matched: FastCounter,
    discovery_directives: FastCounter,
}

impl FilterMetrics {
    pub fn new() -> Self {
        describe_counter!(
            "switchfilter_messages_evaluated_total",
            "Messages checked against the filter rules"
        );
        describe_counter!(
            "switchfilter_messages_passed_total",
            "Messages handed back to the controller pipeline"
        );
        describe_counter!(
            "switchfilter_packet_in_suppressed_total",
            "PACKET_IN messages dropped for matching switches"
        );
        describe_counter!(
            "switchfilter_packet_out_observed_total",
            "PACKET_OUT messages to matching switches (not blockable)"
        );
        describe_counter!(
            "switchfilter_switches_matched_total",
            "Connected switches that matched a filter rule"
        );
        describe_counter!(
            "switchfilter_discovery_directives_total",
            "Discovery suppression directives issued"
        );

        Self {
            messages_evaluated: FastCounter::new(),
            messages_passed: FastCounter::new(),
            packet_in_suppressed: FastCounter::new(),
            packet_out_observed: FastCounter::new(),
            switches_matched: FastCounter::new(),
            discovery_directives: FastCounter::new(),
        }
    }

    pub fn record_evaluated(&self) {
        self.messages_evaluated.increment();
        counter!("switchfilter_messages_evaluated_total").increment(1);
    }

    pub fn record_passed(&self) {
        self.messages_passed.increment();
        counter!("switchfilter_messages_passed_total").increment(1);
    }

    pub fn record_packet_in_suppressed(&self) {
        self.packet_in_suppressed.increment();
        counter!("switchfilter_packet_in_suppressed_total").increment(1);
    }

    pub fn record_packet_out_observed(&self) {
        self.packet_out_observed.increment();
        counter!("switchfilter_packet_out_observed_total").increment(1);
    }

    pub fn record_switch_matched(&self) {
        self.switches_matched.increment();
        counter!("switchfilter_switches_matched_total").increment(1);
    }

    pub fn record_discovery_directives(&self, count: u64) {
        self.discovery_directives.add(count);
        counter!("switchfilter_discovery_directives_total").increment(count);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> FilterStats {
        FilterStats {
            evaluated: self.messages_evaluated.get(),
            passed: self.messages_passed.get(),
            packet_in_suppressed: self.packet_in_suppressed.get(),
            packet_out_observed: self.packet_out_observed.get(),
            switches_matched: self.switches_matched.get(),
            discovery_directives: self.discovery_directives.get(),
        }
    }

    /// Reset statistics
    pub fn reset(&self) {
        self.messages_evaluated.reset();
        self.messages_passed.reset();
        self.packet_in_suppressed.reset();
        self.packet_out_observed.reset();
        self.switches_matched.reset();
        self.discovery_directives.reset();
    }
}

impl Default for FilterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for filter decisions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// PACKET_IN and PACKET_OUT messages evaluated
    pub evaluated: u64,
    /// Evaluated messages that matched no rule
    pub passed: u64,
    /// PACKET_IN messages stopped
    pub packet_in_suppressed: u64,
    /// PACKET_OUT messages matched
    pub packet_out_observed: u64,
    /// Added switches matching a rule
    pub switches_matched: u64,
    /// Suppression directives sent to discovery
    pub discovery_directives: u64,
}

impl FilterStats {
    /// Share of evaluated messages that were stopped, as a percentage
    pub fn stop_rate(&self) -> f64 {
        if self.evaluated == 0 {
            0.0
        } else {
            ((self.packet_in_suppressed + self.packet_out_observed) as f64 / self.evaluated as f64)
                * 100.0
        }
    }
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FilterStats(evaluated: {}, passed: {}, packet_in_suppressed: {}, packet_out_observed: {}, switches_matched: {}, discovery_directives: {}, stop_rate: {:.2}%)",
            self.evaluated,
            self.passed,
            self.packet_in_suppressed,
            self.packet_out_observed,
            self.switches_matched,
            self.discovery_directives,
            self.stop_rate()
        )
    }
}
