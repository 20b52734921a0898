//! Error types for the walking controller and its configuration.

/// Errors surfaced by the walking controller and its collaborators.
#[derive(Debug)]
pub enum WalkError {
    /// The controller was built without a camera handle.
    MissingCamera,
    /// The controller was built without a pointer-lock host (input element).
    MissingInputElement,
    /// The host environment refused exclusive pointer capture.
    PointerLockDenied(String),
    /// `start()` was called while no walkable mesh is loaded.
    NoGeometry,
    /// Mesh data is inconsistent (index out of range, partial triangle).
    InvalidMesh(String),
    /// Reading or writing a configuration file failed.
    ConfigIo(std::io::Error),
    /// A configuration file is not valid JSON for `WalkingConfig`.
    ConfigParse(serde_json::Error),
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// The viewer could not set up its GPU surface, adapter or device.
    Gpu(String),
}

impl std::fmt::Display for WalkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalkError::MissingCamera => write!(f, "the parameter 'camera' is required"),
            WalkError::MissingInputElement => write!(f, "the parameter 'element' is required"),
            WalkError::PointerLockDenied(reason) => {
                write!(f, "unable to use pointer lock: {}", reason)
            }
            WalkError::NoGeometry => write!(f, "no walkable geometry is loaded"),
            WalkError::InvalidMesh(msg) => write!(f, "invalid mesh: {}", msg),
            WalkError::ConfigIo(e) => write!(f, "config I/O error: {}", e),
            WalkError::ConfigParse(e) => write!(f, "config parse error: {}", e),
            WalkError::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
            WalkError::Gpu(msg) => write!(f, "GPU initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for WalkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WalkError::ConfigIo(e) => Some(e),
            WalkError::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WalkError {
    fn from(e: std::io::Error) -> Self {
        WalkError::ConfigIo(e)
    }
}

impl From<serde_json::Error> for WalkError {
    fn from(e: serde_json::Error) -> Self {
        WalkError::ConfigParse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert!(WalkError::MissingCamera.to_string().contains("camera"));
        assert!(WalkError::MissingInputElement.to_string().contains("element"));
        assert!(
            WalkError::PointerLockDenied("denied by user agent".into())
                .to_string()
                .contains("denied by user agent")
        );
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: WalkError = io.into();
        assert!(matches!(err, WalkError::ConfigIo(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_json_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        let err: WalkError = parse.into();
        assert!(matches!(err, WalkError::ConfigParse(_)));
    }
}
