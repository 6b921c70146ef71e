//! Shapes of the external document-conversion capability (raw text
//! extraction and HTML conversion of `.docx` files).
//!
//! Nothing here converts documents. Implementations live outside this crate;
//! these types only pin down what callers pass in and get back.

use std::future::Future;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Diagnostic emitted during conversion. Its shape is up to the converter.
pub type Message = JsonValue;

/// Source document: an in-memory buffer, a file path, or both.
///
/// Converters expect at least one of the two; the type does not enforce it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionInput {
    pub buffer: Option<Vec<u8>>,
    pub path: Option<PathBuf>,
}

impl ConversionInput {
    pub fn from_buffer(buffer: impl Into<Vec<u8>>) -> Self {
        Self {
            buffer: Some(buffer.into()),
            path: None,
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            buffer: None,
            path: Some(path.into()),
        }
    }

    pub fn has_source(&self) -> bool {
        self.buffer.is_some() || self.path.is_some()
    }
}

/// Result of raw text extraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTextResult {
    pub value: String,
    pub messages: Vec<Message>,
}

/// Result of HTML conversion; `value` holds the HTML text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HtmlResult {
    pub value: String,
    pub messages: Vec<Message>,
}

pub trait DocumentConverter {
    type Error;

    fn extract_raw_text(
        &self,
        input: ConversionInput,
    ) -> impl Future<Output = Result<RawTextResult, Self::Error>> + Send;

    fn convert_to_html(
        &self,
        input: ConversionInput,
    ) -> impl Future<Output = Result<HtmlResult, Self::Error>> + Send;
}
