/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Conversation hypergraph construction and degree sequences.
//!
//! # Model
//!
//! - One [`RawNode`] per utterance of the prefix.
//! - One [`Hypernode`] per conversational turn: a maximal run of consecutive
//!   same-speaker utterances where each follow-up replies either to the
//!   utterance just before it or to the same target as the run's opener.
//!   [`HypernodeGrouping::Speaker`] instead folds every utterance of a
//!   participant into one hypernode.
//! - For each reply whose target is an earlier utterance of the prefix:
//!   +1 on c→c (utterance → target); and, when the two utterances belong to
//!   different hypernodes, +1 on C→C (hypernode → hypernode) and +1 on C→c
//!   (hypernode → target utterance).
//!
//! # Invariants
//!
//! - Hypernode membership partitions the raw node set; no hypernode is empty.
//! - Parallel replies accumulate as weight on one edge, never as parallel edges.
//! - No c→C edges exist, and no C→C edge is a self-loop.
//! - For every edge class, Σ outdegree = Σ indegree = total edge weight.
//! - Construction is total: empty input gives an empty hypergraph and dangling
//!   replies are dropped.

use std::collections::BTreeMap;

use core::fmt;
use core::str::FromStr;

use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::error::{HyperConvoError, Result};
use crate::node::{Edge, EdgeClass, Hypernode, NodeKind, RawNode};
use crate::utterance::UtteranceRecord;

// ─── Grouping policy ────────────────────────────────────────────────────────

/// How raw utterance nodes are aggregated into hypernodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HypernodeGrouping {
    /// One hypernode per uninterrupted same-speaker turn.
    #[default]
    Turn,
    /// One hypernode per participant.
    Speaker,
}

impl HypernodeGrouping {
    /// Lowercase name: `"turn"` or `"speaker"`.
    pub fn as_str(self) -> &'static str {
        match self {
            HypernodeGrouping::Turn => "turn",
            HypernodeGrouping::Speaker => "speaker",
        }
    }
}

impl FromStr for HypernodeGrouping {
    type Err = HyperConvoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "turn" => Ok(HypernodeGrouping::Turn),
            "speaker" => Ok(HypernodeGrouping::Speaker),
            _ => Err(HyperConvoError::InvalidConfig {
                name: "grouping",
                message: "expected \"turn\" or \"speaker\"",
            }),
        }
    }
}

impl fmt::Display for HypernodeGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Degree direction ───────────────────────────────────────────────────────

/// Which endpoint a degree sequence is indexed by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DegreeDirection {
    /// One entry per source node: weight leaving it.
    Out,
    /// One entry per target node: weight arriving at it.
    In,
}

impl DegreeDirection {
    /// Label used in feature names: `"outdegree"` or `"indegree"`.
    pub fn label(self) -> &'static str {
        match self {
            DegreeDirection::Out => "outdegree",
            DegreeDirection::In => "indegree",
        }
    }
}

// ─── Edge storage ───────────────────────────────────────────────────────────

/// Weighted adjacency for one edge class, indexed both ways.
///
/// `BTreeMap` keeps neighbour iteration sorted so motif enumeration is
/// deterministic for a given hypergraph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct EdgeSet {
    out: Vec<BTreeMap<usize, u32>>,
    inc: Vec<BTreeMap<usize, u32>>,
}

impl EdgeSet {
    fn new(sources: usize, targets: usize) -> Self {
        Self {
            out: vec![BTreeMap::new(); sources],
            inc: vec![BTreeMap::new(); targets],
        }
    }

    fn add(&mut self, from: usize, to: usize) {
        *self.out[from].entry(to).or_insert(0) += 1;
        *self.inc[to].entry(from).or_insert(0) += 1;
    }

    pub(crate) fn out(&self, from: usize) -> &BTreeMap<usize, u32> {
        &self.out[from]
    }

    pub(crate) fn inc(&self, to: usize) -> &BTreeMap<usize, u32> {
        &self.inc[to]
    }

    pub(crate) fn weight(&self, from: usize, to: usize) -> u32 {
        self.out
            .get(from)
            .and_then(|m| m.get(&to))
            .copied()
            .unwrap_or(0)
    }

    fn edge_count(&self) -> usize {
        self.out.iter().map(BTreeMap::len).sum()
    }
}

// ─── Builder state ──────────────────────────────────────────────────────────

/// The currently open turn while grouping by [`HypernodeGrouping::Turn`].
struct OpenTurn<'a> {
    hypernode: usize,
    speaker: &'a str,
    first_target: Option<&'a str>,
    last_id: &'a str,
}

enum Grouper<'a> {
    Turn(Option<OpenTurn<'a>>),
    Speaker(HashMap<&'a str, usize>),
}

impl<'a> Grouper<'a> {
    fn new(grouping: HypernodeGrouping) -> Self {
        match grouping {
            HypernodeGrouping::Turn => Grouper::Turn(None),
            HypernodeGrouping::Speaker => Grouper::Speaker(HashMap::new()),
        }
    }

    /// Pick (or open) the hypernode for the next utterance in chronological order.
    fn assign<U: UtteranceRecord>(&mut self, utt: &'a U, hypernodes: &mut Vec<Hypernode>) -> usize {
        let speaker = utt.speaker_id();
        match self {
            Grouper::Turn(open) => {
                let reply_to = utt.reply_to();
                if let Some(turn) = open.as_mut() {
                    let continues = turn.speaker == speaker
                        && (reply_to == Some(turn.last_id) || reply_to == turn.first_target);
                    if continues {
                        turn.last_id = utt.id();
                        return turn.hypernode;
                    }
                }
                let hypernode = open_hypernode(hypernodes, speaker);
                *open = Some(OpenTurn {
                    hypernode,
                    speaker,
                    first_target: reply_to,
                    last_id: utt.id(),
                });
                hypernode
            }
            Grouper::Speaker(by_speaker) => *by_speaker
                .entry(speaker)
                .or_insert_with(|| open_hypernode(hypernodes, speaker)),
        }
    }
}

fn open_hypernode(hypernodes: &mut Vec<Hypernode>, speaker: &str) -> usize {
    hypernodes.push(Hypernode {
        speaker_id: speaker.to_owned(),
        members: Vec::new(),
    });
    hypernodes.len() - 1
}

// ─── Hypergraph ─────────────────────────────────────────────────────────────

/// Immutable hypergraph of one thread prefix.
///
/// Built once by [`Hypergraph::from_utterances`] (or one of its variants) and
/// never mutated. Owns its nodes and edges outright; the full-thread and
/// mid-thread graphs of one conversation share nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hypergraph {
    grouping: HypernodeGrouping,
    raw_nodes: Vec<RawNode>,
    hypernodes: Vec<Hypernode>,
    /// Indexed by [`EdgeClass::slot`].
    edges: [EdgeSet; 3],
}

impl Hypergraph {
    /// Build from utterances already in chronological order, grouping by turn.
    pub fn from_utterances<U: UtteranceRecord>(utterances: &[U]) -> Self {
        Self::from_utterances_grouped(utterances, HypernodeGrouping::Turn)
    }

    /// Build the mid-thread hypergraph: the same prefix without its root.
    ///
    /// Replies to the removed root become dangling and are dropped.
    pub fn mid_thread<U: UtteranceRecord>(utterances: &[U], grouping: HypernodeGrouping) -> Self {
        Self::from_utterances_grouped(utterances.get(1..).unwrap_or(&[]), grouping)
    }

    /// Build from utterances already in chronological order.
    pub fn from_utterances_grouped<U: UtteranceRecord>(
        utterances: &[U],
        grouping: HypernodeGrouping,
    ) -> Self {
        let n = utterances.len();
        let mut raw_nodes: Vec<RawNode> = Vec::with_capacity(n);
        let mut hypernodes: Vec<Hypernode> = Vec::new();
        let mut targets: Vec<Option<usize>> = Vec::with_capacity(n);
        // Only earlier utterances are visible, so a reply can never resolve forwards.
        let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(n);
        let mut grouper = Grouper::new(grouping);
        let mut dangling = 0usize;

        for (position, utt) in utterances.iter().enumerate() {
            let target = utt.reply_to().and_then(|id| by_id.get(id).copied());
            if utt.reply_to().is_some() && target.is_none() {
                dangling += 1;
            }

            let hypernode = grouper.assign(utt, &mut hypernodes);
            hypernodes[hypernode].members.push(position);
            raw_nodes.push(RawNode {
                id: utt.id().to_owned(),
                speaker_id: utt.speaker_id().to_owned(),
                timestamp: utt.timestamp(),
                position,
                hypernode,
            });
            targets.push(target);

            if by_id.contains_key(utt.id()) {
                warn!(id = utt.id(), position, "duplicate utterance id; replies resolve to the first occurrence");
            } else {
                by_id.insert(utt.id(), position);
            }
        }

        let mut edges = [
            EdgeSet::new(raw_nodes.len(), raw_nodes.len()),
            EdgeSet::new(hypernodes.len(), raw_nodes.len()),
            EdgeSet::new(hypernodes.len(), hypernodes.len()),
        ];
        for (from, target) in targets.iter().enumerate() {
            let Some(to) = *target else { continue };
            edges[EdgeClass::RawToRaw.slot()].add(from, to);

            let from_hyper = raw_nodes[from].hypernode;
            let to_hyper = raw_nodes[to].hypernode;
            if from_hyper != to_hyper {
                edges[EdgeClass::HyperToHyper.slot()].add(from_hyper, to_hyper);
                edges[EdgeClass::HyperToRaw.slot()].add(from_hyper, to);
            }
        }

        let graph = Self {
            grouping,
            raw_nodes,
            hypernodes,
            edges,
        };
        debug!(
            grouping = %grouping,
            raw_nodes = graph.raw_nodes.len(),
            hypernodes = graph.hypernodes.len(),
            edges = graph.edge_count(),
            dangling,
            "built hypergraph"
        );
        graph
    }

    // ── Nodes ──────────────────────────────────────────────────────────────

    /// Grouping policy this hypergraph was built with.
    pub fn grouping(&self) -> HypernodeGrouping {
        self.grouping
    }

    /// `true` if built from an empty prefix.
    pub fn is_empty(&self) -> bool {
        self.raw_nodes.is_empty()
    }

    /// Raw nodes in prefix order.
    pub fn raw_nodes(&self) -> &[RawNode] {
        &self.raw_nodes
    }

    /// Hypernodes in order of their first member.
    pub fn hypernodes(&self) -> &[Hypernode] {
        &self.hypernodes
    }

    /// Number of nodes of `kind`.
    pub fn node_count(&self, kind: NodeKind) -> usize {
        match kind {
            NodeKind::Hyper => self.hypernodes.len(),
            NodeKind::Raw => self.raw_nodes.len(),
        }
    }

    /// Index of the hypernode owning raw node `raw`.
    pub fn hypernode_of(&self, raw: usize) -> Option<usize> {
        self.raw_nodes.get(raw).map(|node| node.hypernode)
    }

    /// Raw node index of the utterance with id `id` (first occurrence).
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.raw_nodes.iter().position(|node| node.id == id)
    }

    // ── Edges ──────────────────────────────────────────────────────────────

    pub(crate) fn edge_set(&self, class: EdgeClass) -> &EdgeSet {
        &self.edges[class.slot()]
    }

    /// Number of distinct edges across all classes.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(EdgeSet::edge_count).sum()
    }

    /// Weight of the `class` edge from `from` to `to`, 0 if absent.
    pub fn weight(&self, class: EdgeClass, from: usize, to: usize) -> u32 {
        self.edge_set(class).weight(from, to)
    }

    /// Sum of edge weights of `class`.
    pub fn total_weight(&self, class: EdgeClass) -> u64 {
        self.edge_set(class)
            .out
            .iter()
            .flat_map(BTreeMap::values)
            .map(|&w| u64::from(w))
            .sum()
    }

    /// All edges of `class`, ordered by (from, to).
    pub fn edges(&self, class: EdgeClass) -> impl Iterator<Item = Edge> + '_ {
        self.edge_set(class)
            .out
            .iter()
            .enumerate()
            .flat_map(move |(from, targets)| {
                targets.iter().map(move |(&to, &weight)| Edge {
                    class,
                    from,
                    to,
                    weight,
                })
            })
    }

    // ── Degrees ────────────────────────────────────────────────────────────

    /// Degree sequence of `class` in `direction`.
    ///
    /// One entry per node of the indexed endpoint kind, in node order; nodes
    /// without matching edges contribute 0.
    pub fn degree_sequence(&self, class: EdgeClass, direction: DegreeDirection) -> Vec<u32> {
        let set = self.edge_set(class);
        let adjacency = match direction {
            DegreeDirection::Out => &set.out,
            DegreeDirection::In => &set.inc,
        };
        adjacency.iter().map(|m| m.values().sum::<u32>()).collect()
    }

    /// Outdegree sequence over `from`→`to` edges, one entry per `from`-kind node.
    ///
    /// Fails with [`HyperConvoError::InvalidEdgeClass`] for raw → hyper.
    pub fn outdegrees(&self, from: NodeKind, to: NodeKind) -> Result<Vec<u32>> {
        let class = EdgeClass::between(from, to)?;
        Ok(self.degree_sequence(class, DegreeDirection::Out))
    }

    /// Indegree sequence over `from`→`to` edges, one entry per `to`-kind node.
    ///
    /// Fails with [`HyperConvoError::InvalidEdgeClass`] for raw → hyper.
    pub fn indegrees(&self, from: NodeKind, to: NodeKind) -> Result<Vec<u32>> {
        let class = EdgeClass::between(from, to)?;
        Ok(self.degree_sequence(class, DegreeDirection::In))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
