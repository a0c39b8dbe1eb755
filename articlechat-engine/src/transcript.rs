use std::sync::{Arc, PoisonError, RwLock};

use articlechat_core::transcript::TranscriptEntry;

/// Append-only log of completed turns, in completion order.
///
/// The turn controller is the only writer. Readers go through [`TranscriptView`].
#[derive(Debug, Default)]
pub struct Transcript {
    entries: RwLock<Vec<Arc<TranscriptEntry>>>,
}

impl Transcript {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn append(&self, entry: TranscriptEntry) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(entry));
    }

    /// A live view: every iteration re-reads the log, so appends made after the view was
    /// obtained show up on the next pass.
    pub fn all(self: &Arc<Self>) -> TranscriptView {
        TranscriptView {
            transcript: Arc::clone(self),
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn last(&self) -> Option<Arc<TranscriptEntry>> {
        self.read().last().cloned()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Arc<TranscriptEntry>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
pub struct TranscriptView {
    transcript: Arc<Transcript>,
}

impl TranscriptView {
    /// Entries present at the moment of the call, oldest first.
    pub fn iter(&self) -> std::vec::IntoIter<Arc<TranscriptEntry>> {
        self.transcript.read().clone().into_iter()
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Arc<TranscriptEntry>> {
        self.transcript.read().get(index).cloned()
    }
}

impl IntoIterator for &TranscriptView {
    type Item = Arc<TranscriptEntry>;
    type IntoIter = std::vec::IntoIter<Arc<TranscriptEntry>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
