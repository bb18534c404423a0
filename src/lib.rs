//! # hyperconvo-core
//!
//! Hypergraph features for threaded conversations.
//!
//! ---
//!
//! ## Two layers of nodes
//!
//! A thread is a set of utterances, each optionally replying to an earlier one.
//! The flat reply tree loses something: who talks to whom, and how often. This
//! crate keeps both views at once.
//!
//! **Raw nodes (c)**: one per utterance. Reply edges between them form the
//! ordinary reply tree.
//!
//! **Hypernodes (C)**: one per conversational turn, i.e. a run of consecutive
//! utterances by the same speaker that continue each other. Replies crossing a
//! turn boundary become weighted hypernode edges.
//!
//! Three edge classes connect the layers (c→c, C→c, C→C). There is no c→C class:
//! a single utterance never points into a larger aggregate.
//!
//! Degree distributions over each class and counts of small structural motifs
//! (reciprocity, unanswered replies, sustained exchanges, in/out triads)
//! summarise a thread as a fixed-shape feature vector.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! Utterances → chronological prefix → Hypergraph → degree sequences → DegreeStat ┐
//!                      │                   └─────→ motifs ──────────→ MotifStat  ├→ FeatureSet
//!                      └→ mid-thread Hypergraph (root removed) ── same again ────┘
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`utterance`] | [`UtteranceRecord`], [`Utterance`] | Platform-independent utterance view; chronological ordering |
//! | [`node`] | [`NodeKind`], [`EdgeClass`], [`RawNode`], [`Hypernode`] | Node and edge vocabulary |
//! | [`hypergraph`] | [`Hypergraph`], [`HypernodeGrouping`] | Builder and degree sequences |
//! | [`motif`] | [`Motif`], [`MotifKind`] | Reciprocity, dyadic and triad motif detection |
//! | [`stats`] | [`DegreeStat`], [`MotifStat`] | Summary statistics with an invalid-value policy |
//! | [`features`] | [`HyperConvo`], [`HyperConvoConfig`], [`FeatureSet`] | Thread-level feature extraction |
//! | [`conversation`] | [`Conversation`] | Batch container with attachable metadata |
//! | [`error`] | [`HyperConvoError`] | Crate error type |
//!
//! ## Quick start
//!
//! ```rust
//! use hyperconvo_core::{Hypergraph, NodeKind, Utterance};
//!
//! let thread = vec![
//!     Utterance::new("a", "alice", None, 0),
//!     Utterance::new("b", "bob", Some("a"), 1),
//!     Utterance::new("c", "carol", Some("a"), 2),
//! ];
//! let g = Hypergraph::from_utterances(&thread);
//! assert_eq!(g.indegrees(NodeKind::Raw, NodeKind::Raw).unwrap(), vec![2, 0, 0]);
//! assert_eq!(g.incoming_triad_motifs().len(), 1);
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` on every public data type.
//! - `python-ffi`: PyO3 bindings (module `hyperconvo_core`).
//!
//! ## License
//!
//! Business Source License 1.1. Free for evaluation and non-production use.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod utterance;
pub mod node;
pub mod hypergraph;
pub mod motif;
pub mod stats;
pub mod features;
pub mod conversation;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use conversation::Conversation;
pub use error::{HyperConvoError, Result};
pub use features::{FeatureSet, HyperConvo, HyperConvoConfig};
pub use hypergraph::{DegreeDirection, Hypergraph, HypernodeGrouping};
pub use motif::{Motif, MotifKind};
pub use node::{Edge, EdgeClass, Hypernode, NodeKind, RawNode};
pub use stats::{DegreeStat, MotifStat};
pub use utterance::{Utterance, UtteranceRecord};
