//! Python FFI bindings via PyO3.
//!
//! Utterances cross the boundary as `(id, speaker_id, reply_to, timestamp)`
//! tuples, with `reply_to = None` for the thread root.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from hyperconvo_core import Hypergraph, HyperConvo
//!
//! thread = [
//!     ("a", "alice", None, 0),
//!     ("b", "bob", "a", 1),
//!     ("c", "carol", "a", 2),
//! ]
//! g = Hypergraph.from_utterances(thread)
//! print(g.indegrees(False, False))   # [2, 0, 0]
//! print(g.motif_counts())            # {'reciprocity motif': 0, ...}
//!
//! hc = HyperConvo(min_thread_len=3)
//! feats = hc.thread_features(thread)  # dict[str, float] or None
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::error::HyperConvoError;
use crate::features::{HyperConvo as RustHyperConvo, HyperConvoConfig};
use crate::hypergraph::{Hypergraph as RustHypergraph, HypernodeGrouping};
use crate::motif::{MotifKind, DEFAULT_DYADIC_THRESHOLD};
use crate::node::NodeKind;
use crate::utterance::Utterance;

/// Python-side utterance tuple.
type PyRecord = (String, String, Option<String>, i64);

fn to_py_err(err: HyperConvoError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn records_to_utterances(records: Vec<PyRecord>) -> Vec<Utterance> {
    records
        .into_iter()
        .map(|(id, speaker_id, reply_to, timestamp)| Utterance {
            id,
            speaker_id,
            reply_to,
            timestamp,
        })
        .collect()
}

fn parse_grouping(grouping: &str) -> PyResult<HypernodeGrouping> {
    grouping.parse().map_err(to_py_err)
}

// ── Hypergraph ────────────────────────────────────────────────────────────────

/// Two-layer reply hypergraph of one thread prefix.
///
/// Build with `Hypergraph.from_utterances(records)`; records must already be
/// in chronological order.
#[pyclass(name = "Hypergraph")]
pub struct PyHypergraph {
    inner: RustHypergraph,
}

#[pymethods]
impl PyHypergraph {
    /// Build from `(id, speaker_id, reply_to, timestamp)` tuples.
    ///
    /// Args:
    ///     records:  utterance tuples in chronological order
    ///     grouping: "turn" (default) or "speaker"
    #[staticmethod]
    #[pyo3(signature = (records, grouping="turn"))]
    pub fn from_utterances(records: Vec<PyRecord>, grouping: &str) -> PyResult<Self> {
        let grouping = parse_grouping(grouping)?;
        let utterances = records_to_utterances(records);
        Ok(Self {
            inner: RustHypergraph::from_utterances_grouped(&utterances, grouping),
        })
    }

    /// Number of raw utterance nodes.
    pub fn raw_node_count(&self) -> usize {
        self.inner.node_count(NodeKind::Raw)
    }

    /// Number of hypernodes.
    pub fn hypernode_count(&self) -> usize {
        self.inner.node_count(NodeKind::Hyper)
    }

    /// Number of distinct weighted edges across all classes.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Outdegree sequence over from→to edges.
    ///
    /// Raises ValueError for (from_hyper=False, to_hyper=True).
    pub fn outdegrees(&self, from_hyper: bool, to_hyper: bool) -> PyResult<Vec<u32>> {
        self.inner
            .outdegrees(from_hyper.into(), to_hyper.into())
            .map_err(to_py_err)
    }

    /// Indegree sequence over from→to edges.
    ///
    /// Raises ValueError for (from_hyper=False, to_hyper=True).
    pub fn indegrees(&self, from_hyper: bool, to_hyper: bool) -> PyResult<Vec<u32>> {
        self.inner
            .indegrees(from_hyper.into(), to_hyper.into())
            .map_err(to_py_err)
    }

    /// Motif instance counts keyed by motif label.
    #[pyo3(signature = (dyadic_threshold=DEFAULT_DYADIC_THRESHOLD))]
    pub fn motif_counts<'py>(
        &self,
        py: Python<'py>,
        dyadic_threshold: u32,
    ) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new_bound(py);
        for kind in MotifKind::ALL {
            dict.set_item(kind.label(), self.inner.motifs(kind, dyadic_threshold).len())?;
        }
        Ok(dict)
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "Hypergraph(raw_nodes={}, hypernodes={}, edges={}, grouping='{}')",
            self.inner.node_count(NodeKind::Raw),
            self.inner.node_count(NodeKind::Hyper),
            self.inner.edge_count(),
            self.inner.grouping(),
        )
    }
}

// ── HyperConvo ────────────────────────────────────────────────────────────────

/// Thread feature extractor.
///
/// Example::
///
///     hc = HyperConvo(prefix_len=10, min_thread_len=10)
///     feats = hc.thread_features(records)
///     if feats is not None:
///         print(feats["max[indegree over c->c responses]"])
#[pyclass(name = "HyperConvo")]
pub struct PyHyperConvo {
    inner: RustHyperConvo,
}

#[pymethods]
impl PyHyperConvo {
    /// Create an extractor.
    ///
    /// Args:
    ///     prefix_len:       utterances considered per thread (default 10)
    ///     min_thread_len:   shorter threads are skipped (default 10)
    ///     invalid_val:      value for undefined statistics (default nan)
    ///     dyadic_threshold: minimum weight in at least one direction for a dyadic motif (default 2)
    ///     grouping:         "turn" (default) or "speaker"
    #[new]
    #[pyo3(signature = (
        prefix_len=10,
        min_thread_len=10,
        invalid_val=f64::NAN,
        dyadic_threshold=DEFAULT_DYADIC_THRESHOLD,
        grouping="turn"
    ))]
    pub fn new(
        prefix_len: usize,
        min_thread_len: usize,
        invalid_val: f64,
        dyadic_threshold: u32,
        grouping: &str,
    ) -> PyResult<Self> {
        let config = HyperConvoConfig {
            prefix_len,
            min_thread_len,
            invalid_val,
            dyadic_threshold,
            grouping: parse_grouping(grouping)?,
            ..HyperConvoConfig::default()
        };
        Ok(Self {
            inner: RustHyperConvo::new(config).map_err(to_py_err)?,
        })
    }

    /// Feature names every qualifying thread yields, in order.
    pub fn feature_names(&self) -> Vec<String> {
        self.inner.feature_names()
    }

    /// Features of one thread as a dict, or None if the thread is too short.
    ///
    /// Records may be in any order; they are sorted by timestamp first.
    pub fn thread_features<'py>(
        &self,
        py: Python<'py>,
        records: Vec<PyRecord>,
    ) -> PyResult<Option<Bound<'py, PyDict>>> {
        let utterances = records_to_utterances(records);
        let Some(feats) = self.inner.thread_features(&utterances) else {
            return Ok(None);
        };
        let dict = PyDict::new_bound(py);
        for (name, value) in feats.iter() {
            dict.set_item(name, value)?;
        }
        Ok(Some(dict))
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        let c = self.inner.config();
        format!(
            "HyperConvo(prefix_len={}, min_thread_len={}, dyadic_threshold={}, grouping='{}')",
            c.prefix_len, c.min_thread_len, c.dyadic_threshold, c.grouping,
        )
    }
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Hypergraph features for threaded conversations.
#[pymodule]
pub fn hyperconvo_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyHypergraph>()?;
    m.add_class::<PyHyperConvo>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
