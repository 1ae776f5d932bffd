//! Percent-encoding for identifiers placed in request paths and queries
//!
//! Secret paths routinely contain `/` (`prod/db/password`), which must reach
//! the server as a single segment.

use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except RFC 3986 unreserved characters
const IDENTIFIER_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode an identifier for use as one path segment or query value.
pub fn encode_id(id: &str) -> String {
    percent_encode(id.as_bytes(), IDENTIFIER_ENCODE_SET).to_string()
}
