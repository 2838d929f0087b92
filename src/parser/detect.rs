//! Input dialect detection.
//!
//! Looks at a bounded prefix of the text and decides which parser to use.
//! Detection never fails: anything unrecognized is treated as the generic
//! one-frame-per-line dialect.

use super::Dialect;
use crate::utils::config::{COUNTER_EVENT_MARKERS, MAX_PREVIEW_LINES};
use log::debug;

/// Classify `text` by scanning at most [`MAX_PREVIEW_LINES`] lines
///
/// **Public** - used by the auto-detect parser and the `detect` command
pub fn detect_dialect(text: &str) -> Dialect {
    let found = text
        .lines()
        .take(MAX_PREVIEW_LINES)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .any(looks_like_perf_script);

    if found {
        Dialect::PerfScript
    } else {
        debug!("No profiler-script markers found, using generic dialect");
        Dialect::Generic
    }
}

/// True for perf-script header lines and frame lines
fn looks_like_perf_script(line: &str) -> bool {
    if line.split_whitespace().any(is_counter_event) {
        return true;
    }

    // "7f0b8bf5766d malloc+0x5d (/usr/lib/libc.so.6)"
    let Some((address, rest)) = line.split_once(char::is_whitespace) else {
        return false;
    };

    is_hex_address(address)
        && rest
            .find('(')
            .is_some_and(|open| rest[open..].contains(')'))
}

/// `cycles:` or `cycles:u:`, but not a path segment like `cycles::step`
fn is_counter_event(token: &str) -> bool {
    COUNTER_EVENT_MARKERS.iter().any(|marker| {
        token
            .strip_prefix(marker)
            .is_some_and(|rest| !rest.starts_with(':'))
    })
}

fn is_hex_address(token: &str) -> bool {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
}
