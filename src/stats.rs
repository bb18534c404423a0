/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Summary statistics over degree sequences and motif lists.
//!
//! Both tables are closed enums: [`DegreeStat::ALL`] and [`MotifStat::ALL`] fix
//! the set and the order of statistics, so every thread yields features with
//! the same names in the same order.
//!
//! Statistics that are undefined for a sequence (empty input, a single entry
//! where a runner-up is needed, or an all-zero sequence where a distribution
//! is needed) return the caller's `invalid` value.

use core::cmp::Reverse;
use core::fmt;

/// A summary statistic over one degree sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DegreeStat {
    /// Largest degree.
    Max,
    /// Index of the first largest degree.
    Argmax,
    /// Largest degree over total degree.
    NormMax,
    /// Second largest degree (ties count twice).
    SecondLargest,
    /// Index of the second entry of a stable descending sort.
    SecondArgmax,
    /// Second largest over total degree.
    NormSecondLargest,
    /// Mean degree.
    Mean,
    /// Mean over non-zero degrees.
    MeanNonzero,
    /// Fraction of nodes with non-zero degree.
    PropNonzero,
    /// Fraction of non-zero degrees greater than one.
    PropMultiple,
    /// Shannon entropy (nats) of the degree distribution.
    Entropy,
    /// Second largest over largest.
    SecondLargestOverMax,
}

impl DegreeStat {
    /// All statistics, in feature emission order.
    pub const ALL: [DegreeStat; 12] = [
        DegreeStat::Max,
        DegreeStat::Argmax,
        DegreeStat::NormMax,
        DegreeStat::SecondLargest,
        DegreeStat::SecondArgmax,
        DegreeStat::NormSecondLargest,
        DegreeStat::Mean,
        DegreeStat::MeanNonzero,
        DegreeStat::PropNonzero,
        DegreeStat::PropMultiple,
        DegreeStat::Entropy,
        DegreeStat::SecondLargestOverMax,
    ];

    /// Name used in feature labels.
    pub fn name(self) -> &'static str {
        match self {
            DegreeStat::Max => "max",
            DegreeStat::Argmax => "argmax",
            DegreeStat::NormMax => "norm.max",
            DegreeStat::SecondLargest => "2nd-largest",
            DegreeStat::SecondArgmax => "2nd-argmax",
            DegreeStat::NormSecondLargest => "norm.2nd-largest",
            DegreeStat::Mean => "mean",
            DegreeStat::MeanNonzero => "mean-nonzero",
            DegreeStat::PropNonzero => "prop-nonzero",
            DegreeStat::PropMultiple => "prop-multiple",
            DegreeStat::Entropy => "entropy",
            DegreeStat::SecondLargestOverMax => "2nd-largest / max",
        }
    }

    /// Evaluate on `degrees`, yielding `invalid` where undefined.
    pub fn apply(self, degrees: &[u32], invalid: f64) -> f64 {
        let n = degrees.len();
        let total: f64 = degrees.iter().map(|&d| f64::from(d)).sum();
        let max = degrees.iter().copied().max().map(f64::from);

        match self {
            DegreeStat::Max => max.unwrap_or(invalid),
            DegreeStat::Argmax => argmax(degrees).map_or(invalid, |i| i as f64),
            DegreeStat::NormMax => match max {
                Some(m) if total > 0.0 => m / total,
                _ => 0.0,
            },
            DegreeStat::SecondLargest => second_largest(degrees).unwrap_or(invalid),
            DegreeStat::SecondArgmax => {
                if n > 1 {
                    descending_order(degrees)[1] as f64
                } else {
                    invalid
                }
            }
            DegreeStat::NormSecondLargest => match second_largest(degrees) {
                Some(second) if total > 0.0 => second / total,
                _ => invalid,
            },
            DegreeStat::Mean => {
                if n > 0 {
                    total / n as f64
                } else {
                    invalid
                }
            }
            DegreeStat::MeanNonzero => {
                let nonzero = degrees.iter().filter(|&&d| d != 0).count();
                if nonzero > 0 {
                    total / nonzero as f64
                } else {
                    0.0
                }
            }
            DegreeStat::PropNonzero => {
                if n > 0 {
                    degrees.iter().filter(|&&d| d != 0).count() as f64 / n as f64
                } else {
                    invalid
                }
            }
            DegreeStat::PropMultiple => {
                let nonzero = degrees.iter().filter(|&&d| d != 0).count();
                if nonzero > 0 {
                    degrees.iter().filter(|&&d| d > 1).count() as f64 / nonzero as f64
                } else {
                    0.0
                }
            }
            DegreeStat::Entropy => {
                if total > 0.0 {
                    entropy(degrees, total)
                } else {
                    invalid
                }
            }
            DegreeStat::SecondLargestOverMax => match (second_largest(degrees), max) {
                (Some(second), Some(m)) if total > 0.0 => second / m,
                _ => invalid,
            },
        }
    }
}

impl fmt::Display for DegreeStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A summary statistic over one motif instance list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotifStat {
    /// 1.0 if at least one instance was found, else 0.0.
    IsPresent,
    /// Number of instances.
    Count,
}

impl MotifStat {
    /// All statistics, in feature emission order.
    pub const ALL: [MotifStat; 2] = [MotifStat::IsPresent, MotifStat::Count];

    /// Name used in feature labels.
    pub fn name(self) -> &'static str {
        match self {
            MotifStat::IsPresent => "is-present",
            MotifStat::Count => "count",
        }
    }

    /// Evaluate on the number of detected instances.
    pub fn apply(self, instances: usize) -> f64 {
        match self {
            MotifStat::IsPresent => {
                if instances > 0 {
                    1.0
                } else {
                    0.0
                }
            }
            MotifStat::Count => instances as f64,
        }
    }
}

impl fmt::Display for MotifStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn argmax(degrees: &[u32]) -> Option<usize> {
    let max = degrees.iter().copied().max()?;
    degrees.iter().position(|&d| d == max)
}

/// Indices sorted by descending degree; equal degrees keep index order.
fn descending_order(degrees: &[u32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..degrees.len()).collect();
    order.sort_by_key(|&i| Reverse(degrees[i]));
    order
}

fn second_largest(degrees: &[u32]) -> Option<f64> {
    if degrees.len() < 2 {
        return None;
    }
    let mut sorted = degrees.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    Some(f64::from(sorted[1]))
}

fn entropy(degrees: &[u32], total: f64) -> f64 {
    degrees
        .iter()
        .filter(|&&d| d > 0)
        .map(|&d| {
            let p = f64::from(d) / total;
            -p * p.ln()
        })
        .sum()
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const INVALID: f64 = -1.0;

    fn eval(stat: DegreeStat, degrees: &[u32]) -> f64 {
        stat.apply(degrees, INVALID)
    }

    #[test]
    fn test_names_unique_and_ordered() {
        let names: Vec<&str> = DegreeStat::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names[0], "max");
        assert_eq!(names[11], "2nd-largest / max");
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_max_and_argmax() {
        let d = [1, 3, 0, 3];
        assert_eq!(eval(DegreeStat::Max, &d), 3.0);
        assert_eq!(eval(DegreeStat::Argmax, &d), 1.0);
        assert!((eval(DegreeStat::NormMax, &d) - 3.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_second_largest_counts_ties() {
        let d = [1, 3, 0, 3];
        assert_eq!(eval(DegreeStat::SecondLargest, &d), 3.0);
        assert_eq!(eval(DegreeStat::SecondArgmax, &d), 3.0);
        assert_eq!(eval(DegreeStat::SecondLargestOverMax, &d), 1.0);
        assert!((eval(DegreeStat::NormSecondLargest, &d) - 3.0 / 7.0).abs() < 1e-12);

        let d = [5, 2, 4];
        assert_eq!(eval(DegreeStat::SecondLargest, &d), 4.0);
        assert_eq!(eval(DegreeStat::SecondArgmax, &d), 2.0);
    }

    #[test]
    fn test_means_and_proportions() {
        let d = [0, 2, 1, 0, 3];
        assert!((eval(DegreeStat::Mean, &d) - 1.2).abs() < 1e-12);
        assert!((eval(DegreeStat::MeanNonzero, &d) - 2.0).abs() < 1e-12);
        assert!((eval(DegreeStat::PropNonzero, &d) - 0.6).abs() < 1e-12);
        assert!((eval(DegreeStat::PropMultiple, &d) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_entropy() {
        // Uniform over two nodes: ln 2.
        assert!((eval(DegreeStat::Entropy, &[1, 1, 0]) - 2f64.ln()).abs() < 1e-12);
        // Point mass: zero.
        assert_eq!(eval(DegreeStat::Entropy, &[0, 4, 0]), 0.0);
        // All-zero is undefined.
        assert_eq!(eval(DegreeStat::Entropy, &[0, 0]), INVALID);
    }

    #[test]
    fn test_single_entry_sequence() {
        let d = [0];
        assert_eq!(eval(DegreeStat::Max, &d), 0.0);
        assert_eq!(eval(DegreeStat::Argmax, &d), 0.0);
        assert_eq!(eval(DegreeStat::NormMax, &d), 0.0);
        assert_eq!(eval(DegreeStat::SecondLargest, &d), INVALID);
        assert_eq!(eval(DegreeStat::SecondArgmax, &d), INVALID);
        assert_eq!(eval(DegreeStat::NormSecondLargest, &d), INVALID);
        assert_eq!(eval(DegreeStat::Mean, &d), 0.0);
        assert_eq!(eval(DegreeStat::MeanNonzero, &d), 0.0);
        assert_eq!(eval(DegreeStat::PropNonzero, &d), 0.0);
        assert_eq!(eval(DegreeStat::PropMultiple, &d), 0.0);
        assert_eq!(eval(DegreeStat::Entropy, &d), INVALID);
        assert_eq!(eval(DegreeStat::SecondLargestOverMax, &d), INVALID);
    }

    #[test]
    fn test_empty_sequence() {
        for stat in DegreeStat::ALL {
            let v = eval(stat, &[]);
            match stat {
                DegreeStat::NormMax | DegreeStat::MeanNonzero | DegreeStat::PropMultiple => {
                    assert_eq!(v, 0.0, "{stat}")
                }
                _ => assert_eq!(v, INVALID, "{stat}"),
            }
        }
    }

    #[test]
    fn test_nan_invalid_value_propagates() {
        assert!(DegreeStat::Mean.apply(&[], f64::NAN).is_nan());
    }

    #[test]
    fn test_motif_stats() {
        assert_eq!(MotifStat::IsPresent.apply(0), 0.0);
        assert_eq!(MotifStat::IsPresent.apply(4), 1.0);
        assert_eq!(MotifStat::Count.apply(4), 4.0);
        assert_eq!(MotifStat::Count.to_string(), "count");
    }
}
