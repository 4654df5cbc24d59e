use thiserror::Error;

/// Errors raised for host contract violations.
///
/// User input never produces an error: malformed key sequences are
/// swallowed by the engine. These only surface from the host-facing
/// parsing helpers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid register selector {0:?}")]
    InvalidRegister(char),

    #[error("register {0:?} is read-only")]
    ReadOnlyRegister(char),

    #[error("unknown key token {0:?}")]
    UnknownKey(String),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

pub type Result<T> = std::result::Result<T, Error>;
