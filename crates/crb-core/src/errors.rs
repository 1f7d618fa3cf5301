/// Core error type for the relay.
///
/// Adapter crates map their specific errors into this type so the router can
/// report failures consistently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fault raised while executing a chat command.
///
/// `NotFound` is swallowed by the router; everything else is reported back to
/// the user verbatim.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("command \"{0}\" is not found")]
    NotFound(String),

    #[error("{0} is a required argument that is missing.")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Failed(#[from] Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_argument_reads_like_a_sentence() {
        let err = CommandError::MissingArgument("message");
        assert_eq!(
            err.to_string(),
            "message is a required argument that is missing."
        );
    }

    #[test]
    fn failed_is_transparent() {
        let err = CommandError::from(Error::External("telegram error: boom".to_string()));
        assert_eq!(err.to_string(), "external error: telegram error: boom");
    }
}
