//! Stack parsing and input dialects.
//!
//! This module handles:
//! - Detecting which dialect an input is written in
//! - Turning profiler-script or generic text into weighted stack samples
//! - Selecting a parser from a string tag
//!
//! Both dialects are implemented as line-level readers so the sequential
//! parser and the partitioned workers in [`crate::parallel`] share one
//! state machine.

pub mod detect;
pub mod frame;
pub mod generic;
pub mod perf_script;
pub mod sample;

// Re-export main types
pub use detect::detect_dialect;
pub use frame::Frame;
pub use generic::GenericReader;
pub use perf_script::PerfScriptReader;
pub use sample::StackSample;

use crate::utils::error::ParseError;
use log::{debug, info};
use serde::Serialize;

/// Input text formats understood by the parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dialect {
    /// `perf script` output: header line, indented frame lines, blank separator
    PerfScript,

    /// One frame name per line, blank or `#` line separator
    Generic,
}

impl Dialect {
    /// Name of the parser that handles this dialect
    pub fn parser_name(&self) -> &'static str {
        match self {
            Dialect::PerfScript => "PerfScriptParser",
            Dialect::Generic => "GenericTextParser",
        }
    }

    /// Fresh line reader for this dialect
    pub fn reader<'a>(&self) -> SampleReader<'a> {
        match self {
            Dialect::PerfScript => SampleReader::PerfScript(PerfScriptReader::default()),
            Dialect::Generic => SampleReader::Generic(GenericReader::default()),
        }
    }

    /// True for a (trimmed) line that ends any open sample
    pub fn is_terminator(&self, line: &str) -> bool {
        match self {
            Dialect::PerfScript => line.is_empty(),
            Dialect::Generic => generic::is_terminator(line),
        }
    }
}

/// Line-level state machine for one dialect
#[derive(Debug)]
pub enum SampleReader<'a> {
    PerfScript(PerfScriptReader<'a>),
    Generic(GenericReader<'a>),
}

impl<'a> SampleReader<'a> {
    /// Consume one trimmed line, pushing any sample it completes
    pub fn feed(&mut self, line: &'a str, out: &mut Vec<StackSample<'a>>) {
        match self {
            SampleReader::PerfScript(reader) => reader.feed(line, out),
            SampleReader::Generic(reader) => reader.feed(line, out),
        }
    }

    /// Flush the sample left open at end of input
    pub fn finish(&mut self, out: &mut Vec<StackSample<'a>>) {
        match self {
            SampleReader::PerfScript(reader) => reader.finish(out),
            SampleReader::Generic(reader) => reader.finish(out),
        }
    }
}

/// Samples produced by one parse, plus the parser that produced them
#[derive(Debug)]
pub struct ParsedSamples<'a> {
    pub samples: Vec<StackSample<'a>>,

    /// Parser name for diagnostics, e.g. `AutoDetect(PerfScriptParser)`
    pub parser: String,

    pub dialect: Dialect,
}

/// Parser selection
///
/// **Public** - constructed from the `--parser` flag or config tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackParser {
    PerfScript,
    Generic,
    #[default]
    AutoDetect,
}

impl StackParser {
    /// Look up a parser by tag
    ///
    /// Unknown tags fall back to auto-detection.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "perf" | "perf-script" | "perfscript" => StackParser::PerfScript,
            "generic" | "text" => StackParser::Generic,
            "auto" => StackParser::AutoDetect,
            other => {
                debug!("Unknown parser tag '{}', falling back to auto-detect", other);
                StackParser::AutoDetect
            }
        }
    }

    /// Decide the dialect for `text` and the name to report for it
    pub fn resolve(&self, text: &str) -> (Dialect, String) {
        match self {
            StackParser::PerfScript => (Dialect::PerfScript, "PerfScriptParser".to_string()),
            StackParser::Generic => (Dialect::Generic, "GenericTextParser".to_string()),
            StackParser::AutoDetect => {
                let dialect = detect_dialect(text);
                (dialect, format!("AutoDetect({})", dialect.parser_name()))
            }
        }
    }

    /// Parse the whole text on the current thread
    ///
    /// # Errors
    /// * `ParseError::NoSamples` - no valid sample in the input
    pub fn parse<'a>(&self, text: &'a str) -> Result<ParsedSamples<'a>, ParseError> {
        let (dialect, parser) = self.resolve(text);
        info!("Using parser: {}", parser);

        let samples = read_samples(dialect, text.lines());
        debug!("Parsed {} samples", samples.len());

        if samples.is_empty() {
            return Err(ParseError::NoSamples { parser });
        }

        Ok(ParsedSamples {
            samples,
            parser,
            dialect,
        })
    }
}

/// Drive a fresh reader over `lines` and flush it at the end
pub fn read_samples<'a>(
    dialect: Dialect,
    lines: impl IntoIterator<Item = &'a str>,
) -> Vec<StackSample<'a>> {
    let mut reader = dialect.reader();
    let mut samples = Vec::new();

    for line in lines {
        reader.feed(line.trim(), &mut samples);
    }
    reader.finish(&mut samples);

    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_tag() {
        assert_eq!(StackParser::from_tag("perf"), StackParser::PerfScript);
        assert_eq!(StackParser::from_tag("Perf-Script"), StackParser::PerfScript);
        assert_eq!(StackParser::from_tag("generic"), StackParser::Generic);
        assert_eq!(StackParser::from_tag("auto"), StackParser::AutoDetect);
        assert_eq!(StackParser::from_tag("dtrace"), StackParser::AutoDetect);
    }

    #[test]
    fn test_auto_detect_reports_underlying_parser() {
        let perf = "prog 1 1.0: 1 cycles:\n\tffff main (/bin/prog)\n";
        let parsed = StackParser::AutoDetect.parse(perf).unwrap();
        assert_eq!(parsed.parser, "AutoDetect(PerfScriptParser)");
        assert_eq!(parsed.dialect, Dialect::PerfScript);

        let parsed = StackParser::AutoDetect.parse("main\nfoo\n").unwrap();
        assert_eq!(parsed.parser, "AutoDetect(GenericTextParser)");
        assert_eq!(parsed.samples.len(), 1);
    }

    #[test]
    fn test_auto_detect_keeps_paths_naming_counters_generic() {
        let parsed = StackParser::AutoDetect
            .parse("main\nsim::cycles::step\nrun\n")
            .unwrap();

        assert_eq!(parsed.dialect, Dialect::Generic);
        assert_eq!(parsed.samples.len(), 1);
        let names: Vec<&str> = parsed.samples[0].frames.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["main", "sim::cycles::step", "run"]);
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        let err = StackParser::Generic.parse("\n# nothing\n").unwrap_err();
        assert!(matches!(err, ParseError::NoSamples { ref parser } if parser == "GenericTextParser"));

        assert!(StackParser::PerfScript.parse("").is_err());
    }

    #[test]
    fn test_terminators_per_dialect() {
        assert!(Dialect::PerfScript.is_terminator(""));
        assert!(!Dialect::PerfScript.is_terminator("# comment"));
        assert!(Dialect::Generic.is_terminator("# comment"));
        assert!(Dialect::Generic.is_terminator(""));
    }
}
