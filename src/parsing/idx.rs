//! A single parameterized reader for IDX record files.
//!
//! Both record kinds (labels and images) share the same layout: a run of
//! 4-byte big-endian header fields whose values are known up front, followed
//! by a payload of fixed-width items. The caller describes the header it
//! expects and the reader validates it field by field.

use std::fs::File;
use std::io::{BufReader, Read};

use thiserror::Error;

/// Errors raised while loading a record file.
///
/// All of these are fatal: either the full expected record count is read
/// successfully or loading fails as a whole, with no partial recovery.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to open {path}: {source}")]
    FileOpen {
        path: String,
        source: std::io::Error,
    },
    #[error("{path}: bad {field}: expected {expected}, got {actual}")]
    Format {
        path: String,
        field: &'static str,
        expected: u32,
        actual: u32,
    },
    #[error("{path}: truncated record: header promises {needed} bytes, {available} available")]
    Truncated {
        path: String,
        needed: usize,
        available: usize,
    },
}

/// One expected big-endian header field and the value it must hold.
pub struct Expect {
    pub name: &'static str,
    pub value: u32,
}

/// Read a whole record file into memory. The file is opened and closed
/// exactly once per call.
pub fn read_file(path: &str) -> Result<Vec<u8>, ParseError> {
    let file = File::open(path).map_err(|source| ParseError::FileOpen {
        path: path.to_string(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .map_err(|source| ParseError::FileOpen {
            path: path.to_string(),
            source,
        })?;

    Ok(buffer)
}

/// Decode the 32-bit big-endian field starting at `offset`.
fn read_be_u32(bytes: &[u8], offset: usize) -> u32 {
    (bytes[offset] as u32) << 24
        | (bytes[offset + 1] as u32) << 16
        | (bytes[offset + 2] as u32) << 8
        | bytes[offset + 3] as u32
}

/// Validate the header described by `header` and return the payload that
/// follows it.
///
/// By IDX convention `header[1]` is the item count, so the payload must hold
/// exactly `header[1].value * item_bytes` bytes. Trailing bytes beyond the
/// promised payload are ignored. `path` is carried for diagnostics only.
pub fn parse_records<'a>(
    path: &str,
    bytes: &'a [u8],
    header: &[Expect],
    item_bytes: usize,
) -> Result<&'a [u8], ParseError> {
    let header_len = header.len() * 4;
    if bytes.len() < header_len {
        return Err(ParseError::Truncated {
            path: path.to_string(),
            needed: header_len,
            available: bytes.len(),
        });
    }

    for (i, field) in header.iter().enumerate() {
        let actual = read_be_u32(bytes, i * 4);
        if actual != field.value {
            return Err(ParseError::Format {
                path: path.to_string(),
                field: field.name,
                expected: field.value,
                actual,
            });
        }
    }

    let count = header[1].value as usize;
    let needed = header_len + count * item_bytes;
    if bytes.len() < needed {
        return Err(ParseError::Truncated {
            path: path.to_string(),
            needed,
            available: bytes.len(),
        });
    }

    Ok(&bytes[header_len..needed])
}
