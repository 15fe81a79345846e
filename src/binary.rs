//! Binary file detection.
//!
//! A file is treated as binary when a zero byte appears in its first
//! [`BINARY_SNIFF_LEN`] bytes. This is a heuristic: binary formats without an
//! early zero byte are classified as text.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

pub use crate::constants::BINARY_SNIFF_LEN;

/// Returns true when `buffer` has a zero byte within its leading window.
pub fn is_binary(buffer: &[u8]) -> bool {
    buffer.iter().take(BINARY_SNIFF_LEN).any(|byte| *byte == 0)
}

/// Classifies the file at `path`. Files that cannot be opened or read are
/// reported as text.
pub fn is_binary_file<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    let mut buffer = Vec::with_capacity(BINARY_SNIFF_LEN);
    let read = File::open(path)
        .and_then(|file| file.take(BINARY_SNIFF_LEN as u64).read_to_end(&mut buffer));

    match read {
        Ok(_) => is_binary(&buffer),
        Err(e) => {
            debug!(
                "Could not inspect '{}' ({}), treating it as text",
                path.display(),
                e
            );
            false
        }
    }
}
