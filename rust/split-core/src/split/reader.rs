// rust/split-core/src/split/reader.rs

use super::record::SplitRecord;

/// Position of a [`SequentialReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    Unstarted,
    Positioned(usize),
    Exhausted,
}

/// Forward-only iterator a worker uses to walk its split's references.
///
/// Yields `(index, reference)` pairs in split order.
#[derive(Debug)]
pub struct SequentialReader {
    record: SplitRecord,
    state: ReaderState,
}

impl SequentialReader {
    pub fn new(record: SplitRecord) -> Self {
        Self {
            record,
            state: ReaderState::Unstarted,
        }
    }

    /// Moves to the next reference.
    ///
    /// Returns `false` once the split is exhausted.
    pub fn advance(&mut self) -> bool {
        let next = match self.state {
            ReaderState::Unstarted => 0,
            ReaderState::Positioned(index) => index + 1,
            ReaderState::Exhausted => return false,
        };

        if next < self.record.len() {
            self.state = ReaderState::Positioned(next);
            true
        } else {
            self.state = ReaderState::Exhausted;
            false
        }
    }

    /// The current `(index, reference)`, if positioned on one.
    pub fn current(&self) -> Option<(usize, &str)> {
        match self.state {
            ReaderState::Positioned(index) => {
                Some((index, self.record.paths()[index].as_str()))
            }
            _ => None,
        }
    }

    /// Fraction of the split consumed, between 0.0 and 1.0.
    pub fn progress(&self) -> f32 {
        match self.state {
            ReaderState::Unstarted => 0.0,
            ReaderState::Positioned(index) => index as f32 / self.record.len() as f32,
            ReaderState::Exhausted => 1.0,
        }
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// The split being read.
    pub fn record(&self) -> &SplitRecord {
        &self.record
    }

    /// Releases the reader. Nothing is held open, so this only consumes it.
    pub fn close(self) {}
}

impl Iterator for SequentialReader {
    type Item = (usize, String);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.advance() {
            return None;
        }
        self.current()
            .map(|(index, reference)| (index, reference.to_string()))
    }
}
