//! Property-based tests for logpipe using proptest

use logpipe::prelude::*;
use logpipe::{Encoder, LogEntry, LogSampler};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::time::Duration;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Both renderings parse back to the same level
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let upper: LogLevel = level.to_str().parse().expect("upper-case name");
        let lower: LogLevel = level.to_lowercase_str().parse().expect("lower-case name");
        prop_assert_eq!(upper, level);
        prop_assert_eq!(lower, level);
    }

    /// Ordering follows the numeric severity
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 > level2, val1 > val2);
    }

    /// Configuration parsing never fails and only falls back to info
    #[test]
    fn test_parse_or_default_total(input in "\\PC{0,16}") {
        let parsed = LogLevel::parse_or_default(&input);
        match input.parse::<LogLevel>() {
            Ok(level) => prop_assert_eq!(parsed, level),
            Err(_) => prop_assert_eq!(parsed, LogLevel::Info),
        }
    }

    /// A controller set from any thread-visible clone reads back the same value
    #[test]
    fn test_level_controller_shared(levels in prop::collection::vec(any_level(), 1..20)) {
        let controller = LevelController::default();
        let clone = controller.clone();
        for level in levels {
            clone.set(level);
            prop_assert_eq!(controller.get(), level);
        }
    }
}

// ============================================================================
// Sampler Tests
// ============================================================================

proptest! {
    /// Within one window, the number of passed events follows the policy arithmetic
    #[test]
    fn test_sampler_pass_count(
        initial in 1u64..20,
        thereafter in 0u64..10,
        events in 0u64..200,
    ) {
        let sampler = LogSampler::with_tick(
            SamplingPolicy::new(initial, thereafter),
            Duration::from_secs(3600),
        );

        let passed = (0..events)
            .filter(|_| sampler.should_sample(LogLevel::Info, "repeated"))
            .count() as u64;

        let beyond = events.saturating_sub(initial);
        let expected = events.min(initial) + if thereafter > 0 { beyond / thereafter } else { 0 };
        prop_assert_eq!(passed, expected);
        prop_assert_eq!(sampler.metrics().dropped_count(), events - expected);
    }

    /// Distinct messages never share a counter
    #[test]
    fn test_sampler_keys_independent(messages in prop::collection::btree_set("[a-z]{1,8}", 1..20)) {
        let sampler = LogSampler::with_tick(SamplingPolicy::new(1, 0), Duration::from_secs(3600));
        for message in &messages {
            prop_assert!(sampler.should_sample(LogLevel::Warn, message));
        }
        for message in &messages {
            prop_assert!(!sampler.should_sample(LogLevel::Warn, message));
        }
    }
}

// ============================================================================
// Encoder Tests
// ============================================================================

proptest! {
    /// Every field written by the JSON encoder parses back unchanged
    #[test]
    fn test_json_fields_roundtrip(
        ints in prop::collection::btree_map("i_[a-z]{1,8}", any::<i64>(), 0..8),
        strings in prop::collection::btree_map("s_[a-z]{1,8}", "\\PC{0,24}", 0..8),
        message in "[\\PC\t\n\r]{0,40}",
        level in any_level(),
    ) {
        let mut fields = Fields::new();
        for (key, value) in &ints {
            fields.add(key.as_str(), *value);
        }
        for (key, value) in &strings {
            fields.add(key.as_str(), value.as_str());
        }

        let entry = LogEntry::new(level, message.as_str()).with_fields(fields);
        let bytes = Encoder::json().encode(&entry).expect("encode");
        prop_assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 1);

        let record: BTreeMap<String, serde_json::Value> =
            serde_json::from_slice(&bytes).expect("valid json");

        prop_assert_eq!(record["level"].as_str(), Some(level.to_lowercase_str()));
        prop_assert_eq!(record["message"].as_str(), Some(message.as_str()));
        prop_assert_eq!(record.len(), 3 + ints.len() + strings.len());

        for (key, value) in &ints {
            prop_assert_eq!(record[key].as_i64(), Some(*value));
        }
        for (key, value) in &strings {
            prop_assert_eq!(record[key].as_str(), Some(value.as_str()));
        }
    }

    /// Console records are always exactly one line
    #[test]
    fn test_console_single_line(message in "[\\PC\t\n\r]{0,40}", level in any_level()) {
        let entry = LogEntry::new(level, message);
        let bytes = Encoder::console_plain().encode(&entry).expect("encode");
        let text = String::from_utf8(bytes).expect("utf8");
        prop_assert_eq!(text.matches('\n').count(), 1);
        prop_assert!(text.ends_with('\n'));
    }
}
