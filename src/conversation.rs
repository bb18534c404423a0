//! Conversation containers handed to the batch extractor.

use hashbrown::HashMap;

use crate::features::FeatureSet;
use crate::utterance::Utterance;

/// One thread: its utterances plus a metadata map the extractor writes into.
///
/// Utterances need not be in chronological order; the extractor sorts them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conversation {
    /// Conversation id, usually the root utterance id.
    pub id: String,
    /// Utterances of the thread.
    pub utterances: Vec<Utterance>,
    /// Attached feature sets keyed by feature name. `None` marks a thread
    /// that was skipped or not selected.
    pub meta: HashMap<String, Option<FeatureSet>>,
}

impl Conversation {
    /// Conversation with no metadata attached yet.
    pub fn new(id: impl Into<String>, utterances: Vec<Utterance>) -> Self {
        Self {
            id: id.into(),
            utterances,
            meta: HashMap::new(),
        }
    }

    /// Number of utterances.
    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    /// `true` if the thread has no utterances.
    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    /// Features attached under `key`, if the thread qualified.
    pub fn features(&self, key: &str) -> Option<&FeatureSet> {
        self.meta.get(key).and_then(Option::as_ref)
    }
}
