//! External hex identifiers.
//!
//! A hex id is the only identifier ever exposed outside the store. It is
//! 24 lowercase hex characters: a 4-byte big-endian creation timestamp
//! followed by 8 random bytes, so ids sort roughly by creation time and
//! collide only with negligible probability. Stored artifact file names
//! embed the hex id, which is what makes them collision-resistant.

use rand::Rng;

use crate::error::CoreError;

/// Length of a rendered hex id.
pub const HEX_ID_LEN: usize = 24;

/// Generate a fresh hex id.
pub fn generate() -> String {
    let mut bytes = [0u8; 12];
    let secs = chrono::Utc::now().timestamp() as u32;
    bytes[..4].copy_from_slice(&secs.to_be_bytes());
    rand::rng().fill(&mut bytes[4..]);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Returns `true` if `value` is exactly 24 lowercase hex characters.
pub fn is_valid(value: &str) -> bool {
    value.len() == HEX_ID_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Validate a hex id supplied by a caller.
pub fn validate(value: &str) -> Result<(), CoreError> {
    if is_valid(value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid hex id '{value}': expected {HEX_ID_LEN} lowercase hex characters"
        )))
    }
}
