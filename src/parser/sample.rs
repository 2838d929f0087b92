//! Weighted stack samples produced by the parsers.

use super::frame::Frame;

/// One observed call stack
///
/// Frames are stored root first. The profiler-script parser pushes them leaf
/// first, as perf prints them, and reverses them once when the sample ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSample<'a> {
    /// Frames in root→leaf order
    pub frames: Vec<Frame<'a>>,

    /// Occurrence count
    pub weight: u64,

    /// Command name from the sample header, if any
    pub process_name: Option<&'a str>,

    /// Sample time in microseconds, if the header carried one
    pub timestamp: Option<u64>,
}

impl Default for StackSample<'_> {
    fn default() -> Self {
        Self {
            frames: Vec::with_capacity(16),
            weight: 1,
            process_name: None,
            timestamp: None,
        }
    }
}

impl<'a> StackSample<'a> {
    /// Build a finished sample from frames already in root→leaf order
    pub fn new(frames: Vec<Frame<'a>>, weight: u64) -> Self {
        Self {
            frames,
            weight,
            process_name: None,
            timestamp: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.frames.is_empty() && self.weight > 0
    }

    /// Move this in-flight sample into `out` if it is valid
    ///
    /// Leaves a fresh sample behind, so readers can keep one buffer.
    pub(crate) fn finish_into(&mut self, out: &mut Vec<StackSample<'a>>) {
        let sample = std::mem::take(self);
        if sample.is_valid() {
            out.push(sample);
        }
    }

    /// Like [`finish_into`](Self::finish_into) for frames collected leaf first
    pub(crate) fn finish_reversed_into(&mut self, out: &mut Vec<StackSample<'a>>) {
        self.frames.reverse();
        self.finish_into(out);
    }
}
