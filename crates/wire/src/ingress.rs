// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented decoding for the event-ingress socket: newline-delimited
//! JSON records, one event per line.

use corral_core::Event;
use thiserror::Error;

/// Event kinds this build recognises, used to distinguish the two
/// ingress error taxonomy entries:
/// a record that isn't valid JSON / lacks an `event` field at all is a
/// different failure than one that names a kind we don't implement.
const KNOWN_EVENT_KINDS: &[&str] = &[
    "session_start",
    "session_update",
    "tool_use_start",
    "tool_use_awaiting_approval",
    "tool_use_end",
    "assistant_response_complete",
    "session_end",
    "claude_operation",
];

/// Maximum accepted record size before it's rejected outright.
pub const MAX_RECORD_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error, PartialEq)]
pub enum IngressError {
    #[error("record exceeds maximum size of {MAX_RECORD_BYTES} bytes")]
    TooLarge,
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("unrecognized event kind: {0}")]
    UnknownKind(String),
}

/// Parses one line of the ingress stream into an [`Event`]. Distinguishes
/// a structurally-broken record (not JSON, not an object, missing
/// `event`) from a well-formed record naming a kind this build doesn't
/// recognize, so the daemon can log each differently.
pub fn decode_line(line: &str) -> Result<Event, IngressError> {
    if line.len() > MAX_RECORD_BYTES {
        return Err(IngressError::TooLarge);
    }

    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| IngressError::Malformed(e.to_string()))?;

    let kind = value
        .get("event")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| IngressError::Malformed("missing \"event\" field".to_string()))?;

    if !KNOWN_EVENT_KINDS.contains(&kind) {
        return Err(IngressError::UnknownKind(kind.to_string()));
    }

    serde_json::from_value(value).map_err(|e| IngressError::Malformed(e.to_string()))
}

#[cfg(test)]
#[path = "ingress_tests.rs"]
mod tests;
