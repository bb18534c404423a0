//! Node and edge vocabulary of the conversation hypergraph.
//!
//! Two node kinds and three edge classes:
//!
//! ```text
//!   C ──C→C──▶ C        hypernode replies to hypernode
//!   C ──C→c──▶ c        hypernode replies to a single utterance
//!   c ──c→c──▶ c        utterance replies to utterance
//! ```
//!
//! There is no c→C class. A reply always targets one utterance, and the
//! replying side is accounted for at its own hypernode, so nothing ever points
//! from a single utterance into a larger aggregate.

use core::fmt;

use crate::error::{HyperConvoError, Result};

/// Node kind: hypernode ("C") or raw utterance node ("c").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Aggregated node ("C").
    Hyper,
    /// Single-utterance node ("c").
    Raw,
}

impl NodeKind {
    /// Short type name used in feature labels: `"C"` or `"c"`.
    pub fn symbol(self) -> &'static str {
        match self {
            NodeKind::Hyper => "C",
            NodeKind::Raw => "c",
        }
    }

    /// `true` for [`NodeKind::Hyper`].
    pub fn is_hyper(self) -> bool {
        matches!(self, NodeKind::Hyper)
    }
}

impl From<bool> for NodeKind {
    /// `true` selects [`NodeKind::Hyper`], `false` selects [`NodeKind::Raw`].
    fn from(is_hyper: bool) -> Self {
        if is_hyper {
            NodeKind::Hyper
        } else {
            NodeKind::Raw
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One of the three meaningful (from-kind, to-kind) edge classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeClass {
    /// Raw → raw (c→c).
    RawToRaw,
    /// Hyper → raw (C→c).
    HyperToRaw,
    /// Hyper → hyper (C→C).
    HyperToHyper,
}

impl EdgeClass {
    /// All classes, in feature emission order.
    pub const ALL: [EdgeClass; 3] = [
        EdgeClass::RawToRaw,
        EdgeClass::HyperToRaw,
        EdgeClass::HyperToHyper,
    ];

    /// Resolve a (from, to) pair. Fails for raw → hyper.
    pub fn between(from: NodeKind, to: NodeKind) -> Result<Self> {
        match (from, to) {
            (NodeKind::Raw, NodeKind::Raw) => Ok(EdgeClass::RawToRaw),
            (NodeKind::Hyper, NodeKind::Raw) => Ok(EdgeClass::HyperToRaw),
            (NodeKind::Hyper, NodeKind::Hyper) => Ok(EdgeClass::HyperToHyper),
            (NodeKind::Raw, NodeKind::Hyper) => {
                Err(HyperConvoError::InvalidEdgeClass { from, to })
            }
        }
    }

    /// Kind of the source endpoint.
    pub fn from_kind(self) -> NodeKind {
        match self {
            EdgeClass::RawToRaw => NodeKind::Raw,
            EdgeClass::HyperToRaw | EdgeClass::HyperToHyper => NodeKind::Hyper,
        }
    }

    /// Kind of the target endpoint.
    pub fn to_kind(self) -> NodeKind {
        match self {
            EdgeClass::RawToRaw | EdgeClass::HyperToRaw => NodeKind::Raw,
            EdgeClass::HyperToHyper => NodeKind::Hyper,
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            EdgeClass::RawToRaw => 0,
            EdgeClass::HyperToRaw => 1,
            EdgeClass::HyperToHyper => 2,
        }
    }
}

impl fmt::Display for EdgeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from_kind(), self.to_kind())
    }
}

/// A single utterance ("c").
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawNode {
    /// Utterance id.
    pub id: String,
    /// Speaker id.
    pub speaker_id: String,
    /// Caller-supplied chronological ordinal.
    pub timestamp: i64,
    /// Position within the prefix the hypergraph was built from.
    pub position: usize,
    /// Index of the owning hypernode.
    pub hypernode: usize,
}

/// An aggregated node ("C") owning one or more raw nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hypernode {
    /// Speaker shared by every member.
    pub speaker_id: String,
    /// Raw node indices, ascending. Never empty.
    pub members: Vec<usize>,
}

impl Hypernode {
    /// Number of utterances aggregated by this hypernode.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false` for hypernodes produced by the builder.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// `true` if raw node `raw` belongs to this hypernode.
    pub fn contains(&self, raw: usize) -> bool {
        self.members.binary_search(&raw).is_ok()
    }
}

/// A weighted, directed edge of one class.
///
/// `from` and `to` index the node list of the matching kind
/// ([`EdgeClass::from_kind`] / [`EdgeClass::to_kind`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Edge class.
    pub class: EdgeClass,
    /// Source node index.
    pub from: usize,
    /// Target node index.
    pub to: usize,
    /// Number of replies folded into this edge.
    pub weight: u32,
}
