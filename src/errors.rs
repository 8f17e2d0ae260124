use std::string::FromUtf8Error;

/// All error types that can occur while decoding commands or talking to the transport.
///
/// None of these are fatal for the device: the tick loop logs them and keeps running.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// An inbound payload contained invalid UTF-8.
    #[error("utf8 decoding error: {0:?}")]
    Utf8Decode(FromUtf8Error),

    /// Failed to parse a [`crate::Color`] from a string.
    #[error("invalid color string: {0}")]
    InvalidColorString(String),

    /// A numeric field was not a whole number.
    #[error("invalid integer for {field}: {value}")]
    InvalidInteger { field: String, value: String },

    /// A numeric field was outside 0-255.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: String, value: i64 },

    /// A message arrived on a topic with no command handler.
    #[error("no handler for topic {0}")]
    UnknownTopic(String),

    /// The transport failed while performing `action`.
    #[error("transport {action} error: {reason}")]
    Transport { action: String, reason: String },
}

impl Error {
    /// Create a new transport error
    pub fn transport(action: &str, reason: impl ToString) -> Self {
        Error::Transport {
            action: action.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a new invalid integer error
    pub fn invalid_integer(field: &str, value: &str) -> Self {
        Error::InvalidInteger {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a new out of range error
    pub fn out_of_range(field: &str, value: i64) -> Self {
        Error::OutOfRange {
            field: field.to_string(),
            value,
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
