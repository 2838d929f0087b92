//! Input loading.
//!
//! The pipeline consumes an in-memory byte view. Regular files are
//! memory-mapped, stdin (`-`) is read into an owned buffer.

use crate::utils::error::InputError;
use log::debug;
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read-only bytes backing one pipeline run
#[derive(Debug)]
pub enum InputBuffer {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl InputBuffer {
    /// Open `path` as a byte view, `-` meaning stdin
    ///
    /// **Public** - main entry point for input loading
    ///
    /// # Errors
    /// * `InputError::Open` - file does not exist or is unreadable
    /// * `InputError::Map` - mmap failed
    /// * `InputError::Read` - stdin could not be read
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();

        if path.as_os_str() == "-" {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .map_err(InputError::Read)?;
            debug!("Read {} bytes from stdin", bytes.len());
            return Ok(InputBuffer::Owned(bytes));
        }

        let file = File::open(path).map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let len = file
            .metadata()
            .map_err(|source| InputError::Open {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        // Zero-length mappings are rejected on some platforms
        if len == 0 {
            return Ok(InputBuffer::Owned(Vec::new()));
        }

        // SAFETY: the mapping is read-only and lives as long as this buffer;
        // the input file is not expected to be truncated during a run.
        let map = unsafe { Mmap::map(&file) }.map_err(|source| InputError::Map {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Mapped {} ({} bytes)", path.display(), map.len());
        Ok(InputBuffer::Mapped(map))
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            InputBuffer::Mapped(map) => &map[..],
            InputBuffer::Owned(bytes) => &bytes[..],
        }
    }
}
