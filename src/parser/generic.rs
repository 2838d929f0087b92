//! Parser for plain one-frame-per-line stacks.
//!
//! Each non-empty line is a function frame, root first, so
//! `main\nfoo\nbar` is the stack `main;foo;bar`. A blank line or a `#`
//! comment line ends the current sample.

use super::frame::Frame;
use super::sample::StackSample;

/// True for lines that end a generic-dialect sample
pub fn is_terminator(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// Line-at-a-time state machine for the generic dialect
#[derive(Debug, Default)]
pub struct GenericReader<'a> {
    current: StackSample<'a>,
}

impl<'a> GenericReader<'a> {
    pub fn feed(&mut self, line: &'a str, out: &mut Vec<StackSample<'a>>) {
        if is_terminator(line) {
            self.current.finish_into(out);
        } else {
            self.current.frames.push(Frame::function(line));
        }
    }

    pub fn finish(&mut self, out: &mut Vec<StackSample<'a>>) {
        self.current.finish_into(out);
    }
}
