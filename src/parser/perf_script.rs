//! Parser for `perf script` output.
//!
//! Format:
//! ```text
//! testprog 12345 1748678782.171698:     250000 cycles:u:
//!     7f0b8bf5766d malloc+0x5d (/usr/lib/libc.so.6)
//!     55d0c4a1b2c3 main+0x1f (/usr/bin/testprog)
//!
//! ```
//! Samples are separated by blank lines, frames are printed leaf first.

use super::frame::Frame;
use super::sample::StackSample;

const UNKNOWN_SYMBOL: &str = "[unknown]";

/// Line-at-a-time state machine for the profiler-script dialect
///
/// **Public** - driven by the sequential parser and by partition workers
#[derive(Debug, Default)]
pub struct PerfScriptReader<'a> {
    current: StackSample<'a>,
    reading_stack: bool,
}

impl<'a> PerfScriptReader<'a> {
    /// Consume one trimmed line
    pub fn feed(&mut self, line: &'a str, out: &mut Vec<StackSample<'a>>) {
        if line.is_empty() {
            // Blank line: the current stack ends
            if self.reading_stack {
                self.current.finish_reversed_into(out);
            }
            self.reading_stack = false;
            return;
        }

        if !self.reading_stack {
            if line.contains(':') {
                parse_sample_header(line, &mut self.current);
                self.reading_stack = true;
            }
            return;
        }

        if let Some(frame) = parse_frame_line(line) {
            self.current.frames.push(frame);
        }
    }

    /// Flush a sample left open at end of input
    pub fn finish(&mut self, out: &mut Vec<StackSample<'a>>) {
        if self.reading_stack {
            self.current.finish_reversed_into(out);
        }
        self.reading_stack = false;
    }
}

/// Extract process name and timestamp from a sample header
///
/// **Private** - internal helper for PerfScriptReader
fn parse_sample_header<'a>(line: &'a str, sample: &mut StackSample<'a>) {
    if let Some((name, _)) = line.split_once(char::is_whitespace) {
        sample.process_name = Some(name);
    }

    sample.timestamp = line.split_whitespace().find_map(parse_timestamp);
}

/// Parse a `<secs>.<fraction>:` token into microseconds
fn parse_timestamp(token: &str) -> Option<u64> {
    let value = token.strip_suffix(':')?;
    let (secs, fraction) = value.split_once('.')?;

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(secs) || !all_digits(fraction) {
        return None;
    }

    // Integer arithmetic keeps microseconds exact for epoch-sized values
    let seconds: u64 = secs.parse().ok()?;
    let micros = fraction
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(6)
        .fold(0u64, |acc, digit| acc * 10 + u64::from(digit - b'0'));

    seconds.checked_mul(1_000_000)?.checked_add(micros)
}

/// Parse a frame line like `7f0b8bf5766d malloc+0x5d (/usr/lib/libc.so.6)`
///
/// Returns `None` when the line carries neither a symbol nor a module.
pub fn parse_frame_line(line: &str) -> Option<Frame<'_>> {
    // Skip the address
    let (_, content) = line.split_once(char::is_whitespace)?;
    let content = content.trim();

    let (symbol, module) = split_module(content);
    let symbol = strip_offset(symbol);

    if !symbol.is_empty() && symbol != UNKNOWN_SYMBOL {
        return Some(Frame::function(symbol));
    }

    // No usable symbol, fall back to the library name
    module
        .filter(|module| !module.is_empty())
        .map(Frame::module)
}

/// Split `symbol (/path/to/module)` into the symbol and the module's file name
fn split_module(content: &str) -> (&str, Option<&str>) {
    let Some(open) = content.rfind('(') else {
        return (content, None);
    };
    let Some(len) = content[open..].find(')') else {
        return (content, None);
    };

    let path = content[open + 1..open + len].trim();
    let module = match path.rfind('/') {
        Some(slash) => &path[slash + 1..],
        None => path,
    };

    (content[..open].trim(), Some(module))
}

/// Drop a trailing `+0x1f` style offset from a symbol
fn strip_offset(symbol: &str) -> &str {
    if symbol == UNKNOWN_SYMBOL {
        return symbol;
    }

    match symbol.rfind('+') {
        Some(plus) if plus > 0 && is_offset(&symbol[plus + 1..]) => &symbol[..plus],
        _ => symbol,
    }
}

fn is_offset(text: &str) -> bool {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
}
