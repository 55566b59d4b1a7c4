use thiserror::Error;

/// Top-level error type for wadrive.
#[derive(Debug, Error)]
pub enum WadriveError {
    /// No element matched the locator.
    #[error("no such element: {0}")]
    NoSuchElement(String),

    /// A previously found element is gone from the view hierarchy.
    #[error("stale element: {0}")]
    StaleElement(String),

    /// A wait ran out before anything matched.
    #[error("timed out: {0}")]
    Timeout(String),

    /// The automation session is dead or the server is unreachable.
    #[error("session lost: {0}")]
    SessionLost(String),

    /// The automation server answered with an error we do not classify.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Text-file ledger error.
    #[error("ledger error: {0}")]
    Ledger(String),

    /// The photo to transfer is unusable.
    #[error("photo error: {0}")]
    Photo(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WadriveError {
    /// Whether recreating the automation session could make the call succeed.
    pub fn is_session_lost(&self) -> bool {
        matches!(self, Self::SessionLost(_))
    }

    /// Whether the error only means "nothing matched" (element missing or gone).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoSuchElement(_) | Self::StaleElement(_) | Self::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lost_is_recoverable() {
        assert!(WadriveError::SessionLost("gone".into()).is_session_lost());
        assert!(!WadriveError::NoSuchElement("x".into()).is_session_lost());
        assert!(!WadriveError::Protocol("x".into()).is_session_lost());
    }

    #[test]
    fn test_not_found_family() {
        assert!(WadriveError::NoSuchElement("x".into()).is_not_found());
        assert!(WadriveError::StaleElement("x".into()).is_not_found());
        assert!(WadriveError::Timeout("x".into()).is_not_found());
        assert!(!WadriveError::SessionLost("x".into()).is_not_found());
    }

    #[test]
    fn test_display_prefixes() {
        let e = WadriveError::Config("bad".into());
        assert_eq!(e.to_string(), "config error: bad");
    }
}
