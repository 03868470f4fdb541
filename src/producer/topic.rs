//! Topic name validation
//!
//! Kafka accepts topic names of at most 249 characters drawn from
//! `[A-Za-z0-9._-]`, excluding `.` and `..`. Checking this before a message
//! is buffered turns a broker-side rejection into an immediate error.

use crate::utils::{Error, Result};

pub const MAX_TOPIC_LEN: usize = 249;

/// Validate a topic name. Empty names are rejected with `Error::EmptyTopic`.
pub fn validate(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::EmptyTopic);
    }

    let invalid = |reason: &str| Error::InvalidTopic {
        topic: name.to_string(),
        reason: reason.to_string(),
    };

    if name == "." || name == ".." {
        return Err(invalid("'.' and '..' are reserved"));
    }
    if name.len() > MAX_TOPIC_LEN {
        return Err(invalid("longer than 249 characters"));
    }
    if let Some(c) = name.chars().find(|c| !is_legal_char(*c)) {
        return Err(invalid(&format!("illegal character '{c}'")));
    }

    Ok(())
}

fn is_legal_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}
