//! Decoding externally supplied documents.
//!
//! Uploads arrive as bytes in whatever encoding the producer used. A fixed,
//! ordered list of encodings is tried; the first one that both decodes and
//! parses as JSON wins. Running out of encodings is the one failure the
//! engine reports.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, WINDOWS_1252};
use serde_json::Value;
use tracing::{debug, info};

use crate::profile::error::ProfileError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEncoding {
    /// Strict UTF-8; a leading BOM makes the JSON parse fail.
    Utf8,
    /// UTF-8 with an optional leading BOM stripped.
    Utf8Bom,
    /// UTF-16 LE or BE, selected by its BOM. Without a BOM this does not apply.
    Utf16,
    /// Single-byte fallback; decodes any byte sequence.
    Windows1252,
}

impl DocumentEncoding {
    pub const ATTEMPT_ORDER: [DocumentEncoding; 4] = [
        DocumentEncoding::Utf8,
        DocumentEncoding::Utf8Bom,
        DocumentEncoding::Utf16,
        DocumentEncoding::Windows1252,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DocumentEncoding::Utf8 => "utf-8",
            DocumentEncoding::Utf8Bom => "utf-8-sig",
            DocumentEncoding::Utf16 => "utf-16",
            DocumentEncoding::Windows1252 => "windows-1252",
        }
    }

    /// Decodes `bytes`, or `None` if they are malformed for this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            DocumentEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
            DocumentEncoding::Utf8Bom => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(body).ok().map(Cow::Borrowed)
            }
            DocumentEncoding::Utf16 => {
                let (encoding, bom_len) = Encoding::for_bom(bytes)?;
                if encoding != UTF_16LE && encoding != UTF_16BE {
                    return None;
                }
                encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
            }
            DocumentEncoding::Windows1252 => {
                WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)
            }
        }
    }
}

/// Decodes and parses a document, trying each encoding in `ATTEMPT_ORDER`.
pub fn read_document(bytes: &[u8]) -> Result<Value, ProfileError> {
    for encoding in DocumentEncoding::ATTEMPT_ORDER {
        let Some(text) = encoding.decode(bytes) else {
            debug!(encoding = encoding.label(), "bytes not valid in encoding");
            continue;
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(document) => {
                info!(
                    encoding = encoding.label(),
                    bytes = bytes.len(),
                    "document decoded"
                );
                return Ok(document);
            }
            Err(e) => {
                debug!(encoding = encoding.label(), error = %e, "decoded text is not JSON");
            }
        }
    }

    Err(ProfileError::UnreadableDocument {
        attempted: DocumentEncoding::ATTEMPT_ORDER
            .iter()
            .map(|e| e.label())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Reads a document from disk and decodes it with `read_document`.
pub fn read_document_file(path: impl AsRef<Path>) -> Result<Value, ProfileError> {
    let bytes = std::fs::read(path)?;
    read_document(&bytes)
}
