use thiserror::Error;
use tracing::{error, warn};

/// Domain-specific errors for the settings app.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load extensions: {0}")]
    InvalidHostPayload(#[source] serde_json::Error),

    #[error("host bridge unavailable: {0}")]
    BridgeClosed(String),

    #[error("host bridge I/O failed: {0}")]
    BridgeIo(#[from] std::io::Error),

    #[error("hotkey registration failed: {0}")]
    Hotkey(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use on fire-and-forget paths where the operation is best-effort and the
/// user does not need to know.
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_err_converts_to_option() {
        let ok: std::result::Result<u32, String> = Ok(7);
        assert_eq!(ok.log_err(), Some(7));

        let err: std::result::Result<u32, String> = Err("nope".into());
        assert_eq!(err.log_err(), None);
    }

    #[test]
    fn invalid_payload_message_names_the_load_failure() {
        let parse_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err = SettingsError::InvalidHostPayload(parse_err);
        assert!(err.to_string().starts_with("failed to load extensions"));
    }
}
