//! Input validation before a scan is issued

use crate::error::{Error, Result};
use crate::response::ScanRequest;

/// Trim the raw input and build a scan request
///
/// Only emptiness is checked. URL syntax is left to the scan service.
pub fn validate_input(raw: &str) -> Result<ScanRequest> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(ScanRequest::new(url))
}
