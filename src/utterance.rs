//! Utterance records: the platform-independent input to hypergraph construction.
//!
//! The builder never owns a corpus. It borrows any sequence of records that can
//! report an id, a speaker, an optional reply target and a timestamp.
//!
//! # Implementing for your own corpus type
//!
//! ```rust
//! use hyperconvo_core::utterance::UtteranceRecord;
//!
//! struct Post {
//!     post_id: String,
//!     author: String,
//!     parent: Option<String>,
//!     created: i64,
//! }
//!
//! impl UtteranceRecord for Post {
//!     fn id(&self) -> &str { &self.post_id }
//!     fn speaker_id(&self) -> &str { &self.author }
//!     fn reply_to(&self) -> Option<&str> { self.parent.as_deref() }
//!     fn timestamp(&self) -> i64 { self.created }
//! }
//! // Now Hypergraph::from_utterances(&posts) works on your own type.
//! ```

/// Read-only view of one utterance in a thread.
///
/// `reply_to` is `None` for the thread root. A reply target that is not an
/// earlier utterance of the slice handed to the builder is treated as dangling
/// and produces no edge.
pub trait UtteranceRecord {
    /// Stable utterance id, unique within a thread.
    fn id(&self) -> &str;

    /// Id of the speaker who produced the utterance.
    fn speaker_id(&self) -> &str;

    /// Id of the utterance this one replies to, `None` for roots.
    fn reply_to(&self) -> Option<&str>;

    /// Ordinal used for chronological ordering. Ties keep input order.
    fn timestamp(&self) -> i64;
}

impl<T: UtteranceRecord + ?Sized> UtteranceRecord for &T {
    fn id(&self) -> &str {
        (**self).id()
    }
    fn speaker_id(&self) -> &str {
        (**self).speaker_id()
    }
    fn reply_to(&self) -> Option<&str> {
        (**self).reply_to()
    }
    fn timestamp(&self) -> i64 {
        (**self).timestamp()
    }
}

/// Owned reference implementation of [`UtteranceRecord`].
///
/// ```rust
/// use hyperconvo_core::utterance::Utterance;
///
/// let root = Utterance::new("u0", "alice", None, 0);
/// let reply = Utterance::new("u1", "bob", Some("u0"), 1);
/// assert!(root.is_root());
/// assert_eq!(reply.reply_to.as_deref(), Some("u0"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Utterance {
    /// Stable utterance id.
    pub id: String,
    /// Speaker id.
    pub speaker_id: String,
    /// Reply target id, `None` for the thread root.
    pub reply_to: Option<String>,
    /// Chronological ordinal.
    pub timestamp: i64,
}

impl Utterance {
    /// Construct an utterance record.
    pub fn new(
        id: impl Into<String>,
        speaker_id: impl Into<String>,
        reply_to: Option<&str>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            speaker_id: speaker_id.into(),
            reply_to: reply_to.map(str::to_owned),
            timestamp,
        }
    }

    /// `true` if this utterance replies to nothing.
    pub fn is_root(&self) -> bool {
        self.reply_to.is_none()
    }
}

impl UtteranceRecord for Utterance {
    fn id(&self) -> &str {
        &self.id
    }
    fn speaker_id(&self) -> &str {
        &self.speaker_id
    }
    fn reply_to(&self) -> Option<&str> {
        self.reply_to.as_deref()
    }
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Borrow `utterances` in chronological order.
///
/// Sort is stable, so utterances sharing a timestamp keep their input order.
pub fn chronological<U: UtteranceRecord>(utterances: &[U]) -> Vec<&U> {
    let mut ordered: Vec<&U> = utterances.iter().collect();
    ordered.sort_by_key(|u| u.timestamp());
    ordered
}
