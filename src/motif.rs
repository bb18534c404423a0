/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Interaction motifs over the C→C layer of a [`Hypergraph`].
//!
//! Five templates, each a small pattern of hypernodes:
//!
//! ```text
//!   reciprocity            A ⇄ B                 unordered pair, both directions
//!   external reciprocity   A → B, no B → A       ordered pair
//!   dyadic interaction     A ⇉ B (w ≥ threshold) unordered pair, either direction
//!   incoming triad         B → A ← C             target A, unordered sources {B, C}
//!   outgoing triad         B ← A → C             source A, unordered targets {B, C}
//! ```
//!
//! # Invariants
//!
//! - One instance per structurally distinct match; edge weights never multiply
//!   instance counts (except where the dyadic threshold reads them).
//! - Reciprocity and external reciprocity are disjoint: a directed C→C edge
//!   either has a reverse edge or it does not.
//! - Enumeration order is deterministic: ascending hypernode index, then
//!   ascending neighbour index.
//! - Every call rescans the hypergraph; nothing is cached.

use core::fmt;

use crate::hypergraph::Hypergraph;
use crate::node::EdgeClass;

/// Default minimum one-directional C→C weight for a dyadic interaction.
pub const DEFAULT_DYADIC_THRESHOLD: u32 = 2;

/// The five motif templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotifKind {
    /// Mutual reply between two hypernodes.
    Reciprocity,
    /// Reply that is not answered.
    ExternalReciprocity,
    /// Sustained one-directional exchange between two hypernodes.
    DyadicInteraction,
    /// Two hypernodes replying to the same third one.
    IncomingTriad,
    /// One hypernode replying to two others.
    OutgoingTriad,
}

impl MotifKind {
    /// All kinds, in feature emission order.
    pub const ALL: [MotifKind; 5] = [
        MotifKind::Reciprocity,
        MotifKind::ExternalReciprocity,
        MotifKind::DyadicInteraction,
        MotifKind::IncomingTriad,
        MotifKind::OutgoingTriad,
    ];

    /// Label used in feature names.
    pub fn label(self) -> &'static str {
        match self {
            MotifKind::Reciprocity => "reciprocity motif",
            MotifKind::ExternalReciprocity => "external reciprocity motif",
            MotifKind::DyadicInteraction => "dyadic interaction motif",
            MotifKind::IncomingTriad => "incoming triads",
            MotifKind::OutgoingTriad => "outgoing triads",
        }
    }
}

impl fmt::Display for MotifKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One detected motif instance. All indices are hypernode indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Motif {
    /// `a ⇄ b`, with `a < b`.
    Reciprocity {
        /// Lower-indexed hypernode.
        a: usize,
        /// Higher-indexed hypernode.
        b: usize,
    },
    /// `from → to` with no edge back.
    ExternalReciprocity {
        /// Replying hypernode.
        from: usize,
        /// Hypernode replied to.
        to: usize,
    },
    /// `a`–`b` exchange meeting the threshold, with `a < b`.
    DyadicInteraction {
        /// Lower-indexed hypernode.
        a: usize,
        /// Higher-indexed hypernode.
        b: usize,
    },
    /// `sources[0] → target ← sources[1]`, sources ascending.
    IncomingTriad {
        /// Shared reply target.
        target: usize,
        /// The two replying hypernodes.
        sources: [usize; 2],
    },
    /// `targets[0] ← source → targets[1]`, targets ascending.
    OutgoingTriad {
        /// Replying hypernode.
        source: usize,
        /// The two hypernodes replied to.
        targets: [usize; 2],
    },
}

impl Motif {
    /// Template this instance matches.
    pub fn kind(&self) -> MotifKind {
        match self {
            Motif::Reciprocity { .. } => MotifKind::Reciprocity,
            Motif::ExternalReciprocity { .. } => MotifKind::ExternalReciprocity,
            Motif::DyadicInteraction { .. } => MotifKind::DyadicInteraction,
            Motif::IncomingTriad { .. } => MotifKind::IncomingTriad,
            Motif::OutgoingTriad { .. } => MotifKind::OutgoingTriad,
        }
    }
}

/// All unordered pairs of a sorted slice, in lexicographic order.
fn unordered_pairs(nodes: &[usize]) -> impl Iterator<Item = [usize; 2]> + '_ {
    nodes
        .iter()
        .enumerate()
        .flat_map(move |(i, &x)| nodes[i + 1..].iter().map(move |&y| [x, y]))
}

impl Hypergraph {
    /// Unordered hypernode pairs with C→C edges in both directions.
    pub fn reciprocity_motifs(&self) -> Vec<Motif> {
        let cc = self.edge_set(EdgeClass::HyperToHyper);
        let mut motifs = Vec::new();
        for a in 0..self.hypernodes().len() {
            for &b in cc.out(a).keys().filter(|&&b| b > a) {
                if cc.weight(b, a) > 0 {
                    motifs.push(Motif::Reciprocity { a, b });
                }
            }
        }
        motifs
    }

    /// Directed C→C edges whose reverse edge is absent.
    pub fn external_reciprocity_motifs(&self) -> Vec<Motif> {
        let cc = self.edge_set(EdgeClass::HyperToHyper);
        let mut motifs = Vec::new();
        for from in 0..self.hypernodes().len() {
            for &to in cc.out(from).keys() {
                if cc.weight(to, from) == 0 {
                    motifs.push(Motif::ExternalReciprocity { from, to });
                }
            }
        }
        motifs
    }

    /// Dyadic interactions at [`DEFAULT_DYADIC_THRESHOLD`].
    pub fn dyadic_interaction_motifs(&self) -> Vec<Motif> {
        self.dyadic_interaction_motifs_with(DEFAULT_DYADIC_THRESHOLD)
    }

    /// Unordered hypernode pairs where the C→C weight in at least one direction
    /// reaches `threshold`. A threshold of 0 is treated as 1.
    pub fn dyadic_interaction_motifs_with(&self, threshold: u32) -> Vec<Motif> {
        let threshold = threshold.max(1);
        let cc = self.edge_set(EdgeClass::HyperToHyper);
        let mut motifs = Vec::new();
        for a in 0..self.hypernodes().len() {
            let mut partners: Vec<usize> = cc
                .out(a)
                .keys()
                .chain(cc.inc(a).keys())
                .copied()
                .filter(|&b| b > a)
                .collect();
            partners.sort_unstable();
            partners.dedup();
            for b in partners {
                if cc.weight(a, b) >= threshold || cc.weight(b, a) >= threshold {
                    motifs.push(Motif::DyadicInteraction { a, b });
                }
            }
        }
        motifs
    }

    /// Pairs of distinct hypernodes replying to a common target.
    pub fn incoming_triad_motifs(&self) -> Vec<Motif> {
        let cc = self.edge_set(EdgeClass::HyperToHyper);
        let mut motifs = Vec::new();
        for target in 0..self.hypernodes().len() {
            let sources: Vec<usize> = cc.inc(target).keys().copied().collect();
            motifs.extend(
                unordered_pairs(&sources).map(|pair| Motif::IncomingTriad {
                    target,
                    sources: pair,
                }),
            );
        }
        motifs
    }

    /// Pairs of distinct hypernodes replied to by a common source.
    pub fn outgoing_triad_motifs(&self) -> Vec<Motif> {
        let cc = self.edge_set(EdgeClass::HyperToHyper);
        let mut motifs = Vec::new();
        for source in 0..self.hypernodes().len() {
            let targets: Vec<usize> = cc.out(source).keys().copied().collect();
            motifs.extend(
                unordered_pairs(&targets).map(|pair| Motif::OutgoingTriad {
                    source,
                    targets: pair,
                }),
            );
        }
        motifs
    }

    /// Instances of `kind`, dyadic interactions at `dyadic_threshold`.
    pub fn motifs(&self, kind: MotifKind, dyadic_threshold: u32) -> Vec<Motif> {
        match kind {
            MotifKind::Reciprocity => self.reciprocity_motifs(),
            MotifKind::ExternalReciprocity => self.external_reciprocity_motifs(),
            MotifKind::DyadicInteraction => self.dyadic_interaction_motifs_with(dyadic_threshold),
            MotifKind::IncomingTriad => self.incoming_triad_motifs(),
            MotifKind::OutgoingTriad => self.outgoing_triad_motifs(),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
