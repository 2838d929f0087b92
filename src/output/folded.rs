//! Folded stack output.
//!
//! One line per unique path: frame labels joined by `;`, a space, then the
//! weight. Lines are sorted so the file is stable across runs.

use super::create_writer;
use crate::aggregator::CollapsedStacks;
use crate::utils::config::FOLDED_SUFFIX;
use crate::utils::error::RenderError;
use log::info;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Path of the folded byproduct for `output`: `<output>.collapse`
pub fn folded_path(output: impl AsRef<Path>) -> PathBuf {
    let mut path = OsString::from(output.as_ref().as_os_str());
    path.push(FOLDED_SUFFIX);
    PathBuf::from(path)
}

/// Write folded stacks to `output_path`
///
/// **Public** - main entry point for the folded byproduct
///
/// # Errors
/// * `RenderError::WriteFailed` - I/O error during write
/// * `RenderError::InvalidPath` - Path is invalid
pub fn write_folded(
    stacks: &CollapsedStacks<'_>,
    output_path: impl AsRef<Path>,
) -> Result<(), RenderError> {
    let output_path = output_path.as_ref();
    info!("Writing folded stacks to: {}", output_path.display());

    let mut writer = create_writer(output_path)?;
    write_folded_to(stacks, &mut writer)?;
    writer.flush()?;

    info!("Folded stacks written ({} paths)", stacks.len());
    Ok(())
}

/// Write folded stacks to any writer (stdout for `flamefold collapse`)
pub fn write_folded_to(
    stacks: &CollapsedStacks<'_>,
    mut writer: impl Write,
) -> Result<(), RenderError> {
    for line in stacks.folded_lines() {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Frame;
    use pretty_assertions::assert_eq;

    fn stacks() -> CollapsedStacks<'static> {
        let mut stacks = CollapsedStacks::new();
        stacks.add(&[Frame::function("main"), Frame::function("foo")], 2);
        stacks.add(&[Frame::function("main"), Frame::module("libc.so.6")], 1);
        stacks.add(&[Frame::function("idle")], 5);
        stacks
    }

    #[test]
    fn test_folded_path_appends_suffix() {
        assert_eq!(folded_path("out/graph.svg"), PathBuf::from("out/graph.svg.collapse"));
    }

    #[test]
    fn test_write_folded_to_buffer() {
        let mut buffer = Vec::new();
        write_folded_to(&stacks(), &mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "idle 5\nmain;[libc.so.6] 1\nmain;foo 2\n"
        );
    }

    #[test]
    fn test_write_folded_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("graph.svg.collapse");

        write_folded(&stacks(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}
