//! Progress dots for the console.

/// Counts bytes per chunk and says when to print a marker.
///
/// At most one marker per chunk: the threshold is subtracted once even if a
/// single chunk covers several thresholds' worth of bytes.
#[derive(Debug, Clone)]
pub(crate) struct ProgressDots {
    counter: u64,
    threshold: u64,
}

impl ProgressDots {
    pub(crate) fn new(threshold: u64) -> Self {
        Self {
            counter: 0,
            threshold,
        }
    }

    /// Records a chunk of `len` bytes; true if a marker is due.
    pub(crate) fn record(&mut self, len: usize) -> bool {
        self.counter += len as u64;
        if self.counter >= self.threshold {
            self.counter -= self.threshold;
            return true;
        }
        false
    }
}
