//! Risk classifier: maps a normalized score to a qualitative level.

use serde::{Deserialize, Serialize};

/// Qualitative risk level, ordered from least to most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Below 20%.
    Minimal,
    /// 20% to 39%.
    Low,
    /// 40% to 69%.
    Medium,
    /// 70% and above.
    High,
}

impl RiskLevel {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Fixed human-readable description of the level.
    pub fn description(self) -> &'static str {
        match self {
            Self::High => "Highly likely to be a scam. Multiple strong indicators detected.",
            Self::Medium => "Moderate risk of being a scam. Some concerning patterns found.",
            Self::Low => "Low risk, but stay vigilant. Some concerning patterns detected.",
            Self::Minimal => "Minimal risk detected. Very few or no concerning patterns found.",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`classify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Risk level.
    pub level: RiskLevel,
    /// Description of the level.
    pub description: &'static str,
}

/// Classify a percentage. Thresholds are inclusive lower bounds, checked
/// high to low. Values above 100 classify as high.
pub fn classify(percentage: u8) -> Classification {
    let level = match percentage {
        70.. => RiskLevel::High,
        40..=69 => RiskLevel::Medium,
        20..=39 => RiskLevel::Low,
        _ => RiskLevel::Minimal,
    };
    Classification {
        level,
        description: level.description(),
    }
}

/// Normalize `raw` against `max` to a percentage in `0..=100`.
///
/// Rounds half up. Returns 100 only when `raw >= max`, so a partially
/// matched table never reads as 100%. A zero `max` yields 0.
pub fn percentage_of(raw: u64, max: u64) -> u8 {
    if max == 0 {
        return 0;
    }
    let raw = raw.min(max);
    if raw == max {
        return 100;
    }
    let rounded = (u128::from(raw) * 200 + u128::from(max)) / (2 * u128::from(max));
    u8::try_from(rounded.min(99)).unwrap_or(99)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── classify ────────────────────────────────────────────────────

    #[test]
    fn classifier_boundaries() {
        assert_eq!(classify(100).level, RiskLevel::High);
        assert_eq!(classify(70).level, RiskLevel::High);
        assert_eq!(classify(69).level, RiskLevel::Medium);
        assert_eq!(classify(40).level, RiskLevel::Medium);
        assert_eq!(classify(39).level, RiskLevel::Low);
        assert_eq!(classify(20).level, RiskLevel::Low);
        assert_eq!(classify(19).level, RiskLevel::Minimal);
        assert_eq!(classify(0).level, RiskLevel::Minimal);
    }

    #[test]
    fn classifier_descriptions() {
        assert_eq!(
            classify(85).description,
            "Highly likely to be a scam. Multiple strong indicators detected."
        );
        assert_eq!(
            classify(0).description,
            "Minimal risk detected. Very few or no concerning patterns found."
        );
    }

    #[test]
    fn risk_level_serde_and_display() {
        assert_eq!(serde_json::to_string(&RiskLevel::Medium).unwrap(), "\"medium\"");
        assert_eq!(RiskLevel::Low.to_string(), "low");
        assert!(RiskLevel::High > RiskLevel::Minimal);
    }

    // ── percentage_of ───────────────────────────────────────────────

    #[test]
    fn percentage_basic() {
        assert_eq!(percentage_of(0, 40), 0);
        assert_eq!(percentage_of(18, 40), 45);
        assert_eq!(percentage_of(22, 40), 55);
        assert_eq!(percentage_of(40, 40), 100);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage_of(1, 200), 1);
        assert_eq!(percentage_of(1, 3), 33);
        assert_eq!(percentage_of(2, 3), 67);
    }

    #[test]
    fn percentage_never_100_when_incomplete() {
        assert_eq!(percentage_of(999, 1000), 99);
    }

    #[test]
    fn percentage_zero_max() {
        assert_eq!(percentage_of(10, 0), 0);
    }

    #[test]
    fn percentage_clamps_overflowing_raw() {
        assert_eq!(percentage_of(500, 40), 100);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn percentage_bounded(raw in 0u64..100_000, max in 1u64..100_000) {
                let pct = percentage_of(raw, max);
                prop_assert!(pct <= 100);
                prop_assert_eq!(pct == 100, raw >= max);
            }

            #[test]
            fn percentage_monotonic_in_raw(a in 0u64..5_000, b in 0u64..5_000, max in 1u64..5_000) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(percentage_of(lo, max) <= percentage_of(hi, max));
            }

            #[test]
            fn classify_total(pct in 0u8..=255) {
                let c = classify(pct);
                prop_assert_eq!(c.description, c.level.description());
            }
        }
    }
}
