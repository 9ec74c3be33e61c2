//! Server-Sent Events line buffer.
//!
//! All three vendors stream over HTTP SSE. Chunks from the response body
//! arrive at arbitrary byte boundaries, so lines are reassembled here before
//! the `data:` payload is extracted. Provider-specific JSON decoding happens
//! in each adapter.

use super::error::ProviderHttpError;

/// Incremental SSE parser
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    buffer: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one body chunk and return the data payloads it completed.
    ///
    /// A completed line that is not valid UTF-8 is a decode error.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, ProviderHttpError> {
        self.buffer.extend_from_slice(chunk);
        let mut payloads = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(data) = decode_line(&line)? {
                payloads.push(data);
            }
        }
        Ok(payloads)
    }

    /// Flush a trailing line that arrived without a newline
    pub fn finish(&mut self) -> Result<Option<String>, ProviderHttpError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }
        let line = std::mem::take(&mut self.buffer);
        decode_line(&line)
    }
}

fn decode_line(line: &[u8]) -> Result<Option<String>, ProviderHttpError> {
    let line = std::str::from_utf8(line)
        .map_err(|e| ProviderHttpError::Decode(format!("invalid UTF-8 in event stream: {}", e)))?;
    Ok(extract_sse_data(line))
}

/// Extract the data payload from one SSE line.
///
/// Comments, `event:` lines, blank lines and the `[DONE]` marker yield `None`.
pub fn extract_sse_data(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(':') {
        return None;
    }

    let data = trimmed
        .strip_prefix("data: ")
        .or_else(|| trimmed.strip_prefix("data:"))?
        .trim();

    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    Some(data.to_string())
}
