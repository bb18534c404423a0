//! Error types used across `hyperconvo-core`.
//!
//! Hypergraph construction and analysis are total over valid input, so the
//! only failures are caller bugs: asking for a degree sequence over the
//! undefined c→C direction, or handing the extractor a nonsensical config.

use thiserror::Error;

use crate::node::NodeKind;

/// Result alias for `hyperconvo-core`.
pub type Result<T> = std::result::Result<T, HyperConvoError>;

/// Errors returned by the hypergraph accessors and the feature extractor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HyperConvoError {
    /// Requested a (from, to) node-kind pair that has no edge class.
    ///
    /// Only raw → hyper is undefined: a single utterance never points into a
    /// larger aggregate.
    #[error("no edge class {from}->{to}: raw nodes never point into hypernodes")]
    InvalidEdgeClass {
        /// Source node kind.
        from: NodeKind,
        /// Target node kind.
        to: NodeKind,
    },

    /// Invalid configuration value.
    #[error("invalid config '{name}': {message}")]
    InvalidConfig {
        /// Config field name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}
