/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Thread-level feature extraction.
//!
//! For each qualifying thread the extractor builds two hypergraphs from the
//! chronological prefix (the full prefix, and the prefix minus its root) and
//! emits, for each graph:
//!
//! - degree features: every [`DegreeStat`] over the degree sequences of every
//!   edge class (outdegrees only where the source kind is a hypernode);
//! - motif features: every [`MotifStat`] over every [`MotifKind`].
//!
//! ```text
//! utterances ─▶ chronological ─▶ prefix ─┬─▶ Hypergraph ─────────▶ features
//!                                        └─▶ mid-thread Hypergraph ─▶ "mid-thread" features
//! ```
//!
//! Every qualifying thread yields the same [`FeatureSet`] shape: the same
//! names in the same order.

use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::conversation::Conversation;
use crate::error::{HyperConvoError, Result};
use crate::hypergraph::{DegreeDirection, Hypergraph, HypernodeGrouping};
use crate::motif::{MotifKind, DEFAULT_DYADIC_THRESHOLD};
use crate::node::EdgeClass;
use crate::stats::{DegreeStat, MotifStat};
use crate::utterance::{chronological, UtteranceRecord};

/// Degree features emitted per hypergraph.
pub const DEGREE_FEATURES_PER_GRAPH: usize = 5 * DegreeStat::ALL.len();

/// Motif features emitted per hypergraph.
pub const MOTIF_FEATURES_PER_GRAPH: usize = MotifKind::ALL.len() * MotifStat::ALL.len();

/// Features emitted per qualifying thread (full plus mid-thread graph).
pub const FEATURES_PER_THREAD: usize = 2 * (DEGREE_FEATURES_PER_GRAPH + MOTIF_FEATURES_PER_GRAPH);

// ─── Config ─────────────────────────────────────────────────────────────────

/// Configuration for [`HyperConvo`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HyperConvoConfig {
    /// Chronologically-earliest utterances considered per thread.  Default: 10.
    pub prefix_len: usize,
    /// Threads with fewer utterances are skipped.  Default: 10.
    pub min_thread_len: usize,
    /// Metadata key features are attached under.  Default: `"hyperconvo"`.
    pub feat_name: String,
    /// Value emitted for undefined statistics.  Default: NaN.
    ///
    /// NaN is written as `null` when serialised.
    #[cfg_attr(feature = "serde", serde(with = "nan_as_null"))]
    pub invalid_val: f64,
    /// Minimum weight in at least one direction for a dyadic interaction.  Default: 2.
    pub dyadic_threshold: u32,
    /// Hypernode grouping policy.  Default: [`HypernodeGrouping::Turn`].
    ///
    /// Under `Turn`, C→C edges only point back to earlier turns, so the
    /// reciprocity and outgoing-triad features are always 0. Use
    /// [`HypernodeGrouping::Speaker`] to see mutual exchanges.
    pub grouping: HypernodeGrouping,
}

impl Default for HyperConvoConfig {
    fn default() -> Self {
        Self {
            prefix_len: 10,
            min_thread_len: 10,
            feat_name: "hyperconvo".to_owned(),
            invalid_val: f64::NAN,
            dyadic_threshold: DEFAULT_DYADIC_THRESHOLD,
            grouping: HypernodeGrouping::Turn,
        }
    }
}

impl HyperConvoConfig {
    /// Check field ranges.
    pub fn validate(&self) -> Result<()> {
        if self.dyadic_threshold == 0 {
            return Err(HyperConvoError::InvalidConfig {
                name: "dyadic_threshold",
                message: "must be at least 1",
            });
        }
        if self.feat_name.is_empty() {
            return Err(HyperConvoError::InvalidConfig {
                name: "feat_name",
                message: "must not be empty",
            });
        }
        Ok(())
    }
}

// ─── FeatureSet ─────────────────────────────────────────────────────────────

/// Named feature values in emission order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureSet {
    names: Vec<String>,
    #[cfg_attr(feature = "serde", serde(with = "nan_as_null::seq"))]
    values: Vec<f64>,
}

impl FeatureSet {
    /// Empty set with room for `capacity` features.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Append a feature.
    pub fn push(&mut self, name: String, value: f64) {
        self.names.push(name);
        self.values.push(value);
    }

    /// Value of the feature called `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` if no features were emitted.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Feature names in emission order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Feature values in emission order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `(name, value)` pairs in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Append every feature of `other`.
    pub fn extend(&mut self, other: FeatureSet) {
        self.names.extend(other.names);
        self.values.extend(other.values);
    }
}

/// JSON has no NaN, so undefined values travel as `null`.
#[cfg(feature = "serde")]
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    fn encode(value: f64) -> Option<f64> {
        (!value.is_nan()).then_some(value)
    }

    pub(super) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        encode(*value).serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }

    pub(super) mod seq {
        use super::encode;
        use serde::{Deserialize, Deserializer, Serializer};

        #[allow(clippy::ptr_arg)]
        pub(in crate::features) fn serialize<S: Serializer>(
            values: &Vec<f64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(values.iter().map(|&v| encode(v)))
        }

        pub(in crate::features) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<f64>, D::Error> {
            let values = Vec::<Option<f64>>::deserialize(deserializer)?;
            Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        }
    }
}

// ─── Naming ─────────────────────────────────────────────────────────────────

/// Name of a degree feature, e.g. `"max[indegree over c->c responses]"`.
pub fn degree_feature_name(
    stat: DegreeStat,
    direction: DegreeDirection,
    class: EdgeClass,
    mid_thread: bool,
) -> String {
    let ext = if mid_thread { "mid-thread " } else { "" };
    format!("{}[{} over {} {}responses]", stat.name(), direction.label(), class, ext)
}

/// Name of a motif feature, e.g. `"count[incoming triads over mid-thread]"`.
pub fn motif_feature_name(stat: MotifStat, kind: MotifKind, mid_thread: bool) -> String {
    let ext = if mid_thread { " over mid-thread" } else { "" };
    format!("{}[{}{}]", stat.name(), kind.label(), ext)
}

/// Directions emitted for `class`: indegree always, outdegree for hypernode sources.
fn directions(class: EdgeClass) -> &'static [DegreeDirection] {
    if class.from_kind().is_hyper() {
        &[DegreeDirection::Out, DegreeDirection::In]
    } else {
        &[DegreeDirection::In]
    }
}

// ─── HyperConvo ─────────────────────────────────────────────────────────────

/// Hypergraph feature extractor over conversation threads.
///
/// ```rust
/// use hyperconvo_core::{HyperConvo, HyperConvoConfig, Utterance};
///
/// let hc = HyperConvo::new(HyperConvoConfig {
///     min_thread_len: 2,
///     ..HyperConvoConfig::default()
/// })
/// .unwrap();
/// let thread = vec![
///     Utterance::new("a", "alice", None, 0),
///     Utterance::new("b", "bob", Some("a"), 1),
/// ];
/// let feats = hc.thread_features(&thread).unwrap();
/// assert_eq!(feats.get("count[reciprocity motif]"), Some(0.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct HyperConvo {
    config: HyperConvoConfig,
}

impl HyperConvo {
    /// Create an extractor, validating `config`.
    pub fn new(config: HyperConvoConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &HyperConvoConfig {
        &self.config
    }

    /// Names every qualifying thread yields, in emission order.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(FEATURES_PER_THREAD);
        for mid_thread in [false, true] {
            for class in EdgeClass::ALL {
                for stat in DegreeStat::ALL {
                    for &direction in directions(class) {
                        names.push(degree_feature_name(stat, direction, class, mid_thread));
                    }
                }
            }
            for kind in MotifKind::ALL {
                for stat in MotifStat::ALL {
                    names.push(motif_feature_name(stat, kind, mid_thread));
                }
            }
        }
        names
    }

    /// Features of one thread, or `None` if it is shorter than `min_thread_len`.
    pub fn thread_features<U: UtteranceRecord>(&self, utterances: &[U]) -> Option<FeatureSet> {
        if utterances.len() < self.config.min_thread_len {
            debug!(
                len = utterances.len(),
                min_thread_len = self.config.min_thread_len,
                "thread too short; skipped"
            );
            return None;
        }

        let ordered = chronological(utterances);
        let prefix = &ordered[..ordered.len().min(self.config.prefix_len)];
        let graph = Hypergraph::from_utterances_grouped(prefix, self.config.grouping);
        let mid = Hypergraph::mid_thread(prefix, self.config.grouping);

        let mut feats = FeatureSet::with_capacity(FEATURES_PER_THREAD);
        feats.extend(self.graph_features(&graph, false));
        feats.extend(self.graph_features(&mid, true));
        trace!(prefix = prefix.len(), features = feats.len(), "thread features");
        Some(feats)
    }

    /// Degree and motif features of one hypergraph.
    ///
    /// `mid_thread` selects the name extension only; the caller decides which
    /// graph is passed.
    pub fn graph_features(&self, graph: &Hypergraph, mid_thread: bool) -> FeatureSet {
        let invalid = self.config.invalid_val;
        let mut feats =
            FeatureSet::with_capacity(DEGREE_FEATURES_PER_GRAPH + MOTIF_FEATURES_PER_GRAPH);

        for class in EdgeClass::ALL {
            let sequences: Vec<(DegreeDirection, Vec<u32>)> = directions(class)
                .iter()
                .map(|&d| (d, graph.degree_sequence(class, d)))
                .collect();
            for stat in DegreeStat::ALL {
                for (direction, degrees) in &sequences {
                    feats.push(
                        degree_feature_name(stat, *direction, class, mid_thread),
                        stat.apply(degrees, invalid),
                    );
                }
            }
        }

        for kind in MotifKind::ALL {
            let found = graph.motifs(kind, self.config.dyadic_threshold).len();
            for stat in MotifStat::ALL {
                feats.push(motif_feature_name(stat, kind, mid_thread), stat.apply(found));
            }
        }
        feats
    }

    /// Features of every selected, long-enough conversation, keyed by id.
    pub fn retrieve_feats<F>(
        &self,
        conversations: &[Conversation],
        selector: F,
    ) -> HashMap<String, FeatureSet>
    where
        F: Fn(&Conversation) -> bool,
    {
        let feats: HashMap<String, FeatureSet> = conversations
            .iter()
            .filter(|c| selector(c))
            .filter_map(|c| {
                self.thread_features(&c.utterances)
                    .map(|f| (c.id.clone(), f))
            })
            .collect();
        debug!(
            conversations = conversations.len(),
            extracted = feats.len(),
            "retrieved hypergraph features"
        );
        feats
    }

    /// Attach features under `feat_name` in each conversation's metadata.
    ///
    /// Unselected and too-short conversations get `None`.
    pub fn transform<F>(&self, conversations: &mut [Conversation], selector: F)
    where
        F: Fn(&Conversation) -> bool,
    {
        let mut feats = self.retrieve_feats(conversations, selector);
        for convo in conversations.iter_mut() {
            let attached = feats.remove(&convo.id);
            convo.meta.insert(self.config.feat_name.clone(), attached);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utterance::Utterance;

    fn small_config() -> HyperConvoConfig {
        HyperConvoConfig {
            prefix_len: 10,
            min_thread_len: 3,
            invalid_val: -1.0,
            ..HyperConvoConfig::default()
        }
    }

    fn fan_in() -> Vec<Utterance> {
        vec![
            Utterance::new("a", "alice", None, 0),
            Utterance::new("b", "bob", Some("a"), 1),
            Utterance::new("c", "carol", Some("a"), 2),
        ]
    }

    #[test]
    fn test_default_config() {
        let cfg = HyperConvoConfig::default();
        assert_eq!(cfg.prefix_len, 10);
        assert_eq!(cfg.min_thread_len, 10);
        assert_eq!(cfg.feat_name, "hyperconvo");
        assert!(cfg.invalid_val.is_nan());
        assert_eq!(cfg.dyadic_threshold, 2);
        assert_eq!(cfg.grouping, HypernodeGrouping::Turn);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = HyperConvo::new(HyperConvoConfig {
            dyadic_threshold: 0,
            ..HyperConvoConfig::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            HyperConvoError::InvalidConfig {
                name: "dyadic_threshold",
                ..
            }
        ));

        let err = HyperConvo::new(HyperConvoConfig {
            feat_name: String::new(),
            ..HyperConvoConfig::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            HyperConvoError::InvalidConfig {
                name: "feat_name",
                ..
            }
        ));
    }

    #[test]
    fn test_feature_counts() {
        assert_eq!(DEGREE_FEATURES_PER_GRAPH, 60);
        assert_eq!(MOTIF_FEATURES_PER_GRAPH, 10);
        assert_eq!(FEATURES_PER_THREAD, 140);
        assert_eq!(HyperConvo::default().feature_names().len(), FEATURES_PER_THREAD);
    }

    #[test]
    fn test_names() {
        assert_eq!(
            degree_feature_name(DegreeStat::Max, DegreeDirection::In, EdgeClass::RawToRaw, false),
            "max[indegree over c->c responses]"
        );
        assert_eq!(
            degree_feature_name(
                DegreeStat::SecondLargestOverMax,
                DegreeDirection::Out,
                EdgeClass::HyperToHyper,
                true
            ),
            "2nd-largest / max[outdegree over C->C mid-thread responses]"
        );
        assert_eq!(
            motif_feature_name(MotifStat::IsPresent, MotifKind::Reciprocity, false),
            "is-present[reciprocity motif]"
        );
        assert_eq!(
            motif_feature_name(MotifStat::Count, MotifKind::IncomingTriad, true),
            "count[incoming triads over mid-thread]"
        );
    }

    #[test]
    fn test_emission_order() {
        let names = HyperConvo::default().feature_names();
        assert_eq!(names[0], "max[indegree over c->c responses]");
        assert_eq!(names[1], "argmax[indegree over c->c responses]");
        assert_eq!(names[12], "max[outdegree over C->c responses]");
        assert_eq!(names[13], "max[indegree over C->c responses]");
        assert_eq!(names[36], "max[outdegree over C->C responses]");
        assert_eq!(names[60], "is-present[reciprocity motif]");
        assert_eq!(names[69], "count[outgoing triads]");
        assert_eq!(names[70], "max[indegree over c->c mid-thread responses]");
        assert_eq!(names[139], "count[outgoing triads over mid-thread]");
    }

    #[test]
    fn test_thread_features_shape_matches_names() {
        let hc = HyperConvo::new(small_config()).unwrap();
        let feats = hc.thread_features(&fan_in()).unwrap();
        assert_eq!(feats.names(), hc.feature_names().as_slice());
        assert_eq!(feats.values().len(), FEATURES_PER_THREAD);
    }

    #[test]
    fn test_fan_in_values() {
        let hc = HyperConvo::new(small_config()).unwrap();
        let feats = hc.thread_features(&fan_in()).unwrap();

        assert_eq!(feats.get("max[indegree over c->c responses]"), Some(2.0));
        assert_eq!(feats.get("argmax[indegree over c->c responses]"), Some(0.0));
        assert_eq!(feats.get("max[outdegree over C->C responses]"), Some(1.0));
        assert_eq!(feats.get("prop-nonzero[outdegree over C->C responses]"), Some(2.0 / 3.0));
        assert_eq!(feats.get("count[incoming triads]"), Some(1.0));
        assert_eq!(feats.get("is-present[incoming triads]"), Some(1.0));
        assert_eq!(feats.get("count[external reciprocity motif]"), Some(2.0));

        // Root removed: both replies dangle, so the mid-thread graph has no edges.
        assert_eq!(feats.get("max[indegree over c->c mid-thread responses]"), Some(0.0));
        assert_eq!(feats.get("entropy[indegree over c->c mid-thread responses]"), Some(-1.0));
        assert_eq!(feats.get("count[incoming triads over mid-thread]"), Some(0.0));
    }

    #[test]
    fn test_short_thread_skipped() {
        let hc = HyperConvo::new(HyperConvoConfig {
            min_thread_len: 4,
            ..small_config()
        })
        .unwrap();
        assert!(hc.thread_features(&fan_in()).is_none());
    }

    #[test]
    fn test_prefix_truncation() {
        let hc = HyperConvo::new(HyperConvoConfig {
            prefix_len: 2,
            ..small_config()
        })
        .unwrap();
        let feats = hc.thread_features(&fan_in()).unwrap();
        // Only a and b are considered.
        assert_eq!(feats.get("max[indegree over c->c responses]"), Some(1.0));
        assert_eq!(feats.get("count[incoming triads]"), Some(0.0));
    }

    #[test]
    fn test_unsorted_input_is_ordered_first() {
        let mut thread = fan_in();
        thread.reverse();
        let hc = HyperConvo::new(small_config()).unwrap();
        let a = hc.thread_features(&thread).unwrap();
        let b = hc.thread_features(&fan_in()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_transform_attaches_features() {
        let hc = HyperConvo::new(small_config()).unwrap();
        let mut convos = vec![
            Conversation::new("long", fan_in()),
            Conversation::new("short", vec![Utterance::new("x", "alice", None, 0)]),
            Conversation::new("unselected", fan_in()),
        ];
        hc.transform(&mut convos, |c| c.id != "unselected");

        assert!(convos[0].features("hyperconvo").is_some());
        assert_eq!(convos[1].meta.get("hyperconvo"), Some(&None));
        assert_eq!(convos[2].meta.get("hyperconvo"), Some(&None));
    }

    #[test]
    fn test_retrieve_feats_keys() {
        let hc = HyperConvo::new(small_config()).unwrap();
        let convos = vec![
            Conversation::new("t1", fan_in()),
            Conversation::new("t2", vec![]),
        ];
        let feats = hc.retrieve_feats(&convos, |_| true);
        assert_eq!(feats.len(), 1);
        assert!(feats.contains_key("t1"));
    }

    #[test]
    fn test_dyadic_threshold_met_in_one_direction() {
        // Bob answers Alice twice in one turn; Alice never answers back.
        let thread = vec![
            Utterance::new("a", "alice", None, 0),
            Utterance::new("b1", "bob", Some("a"), 1),
            Utterance::new("b2", "bob", Some("a"), 2),
        ];
        let hc = HyperConvo::new(small_config()).unwrap();
        let feats = hc.thread_features(&thread).unwrap();
        assert_eq!(feats.get("count[dyadic interaction motif]"), Some(1.0));
        assert_eq!(feats.get("count[reciprocity motif]"), Some(0.0));
    }

    #[test]
    fn test_default_extractor_uses_default_config() {
        let cfg = HyperConvo::default().config().clone();
        assert!(cfg.invalid_val.is_nan());
        assert_eq!(
            HyperConvoConfig {
                invalid_val: 0.0,
                ..cfg
            },
            HyperConvoConfig {
                invalid_val: 0.0,
                ..HyperConvoConfig::default()
            }
        );
    }

    #[test]
    fn test_extractor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HyperConvo>();
        assert_send_sync::<Hypergraph>();
        assert_send_sync::<FeatureSet>();
    }
}
