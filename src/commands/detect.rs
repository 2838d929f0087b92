//! Detect command implementation.

use crate::parser::{detect_dialect, Dialect};
use crate::utils::error::FlameGraphError;
use crate::utils::input::InputBuffer;
use log::info;
use std::path::Path;

/// Report which dialect the input is written in
///
/// Detection itself never fails; only loading the input can.
pub fn execute_detect(input: impl AsRef<Path>) -> Result<Dialect, FlameGraphError> {
    let input = input.as_ref();
    let buffer = InputBuffer::open(input)?;
    let text = String::from_utf8_lossy(buffer.as_bytes());

    let dialect = detect_dialect(&text);
    info!("{} looks like {}", input.display(), dialect.parser_name());

    Ok(dialect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_perf_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("perf.txt");
        std::fs::write(
            &input,
            "prog 1234 100.000001: 1 cycles:\n\tffffffff8100 do_syscall_64 ([kernel.kallsyms])\n",
        )
        .unwrap();

        assert_eq!(execute_detect(&input).unwrap(), Dialect::PerfScript);
    }

    #[test]
    fn test_detect_generic_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("stacks.txt");
        std::fs::write(&input, "main\nfoo\n").unwrap();

        assert_eq!(execute_detect(&input).unwrap(), Dialect::Generic);
    }
}
