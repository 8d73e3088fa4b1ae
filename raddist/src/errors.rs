#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Got an invalid parameter value, either when creating a calculator or
    /// when calling one of the lower-level functions
    InvalidParameter(String),
    /// The structure can not be used with this calculator, for example
    /// because it contains partially occupied sites
    UnsupportedStructure(String),
    /// The calculator must be fitted on a set of structures before being used
    NotFitted(String),
    /// Error while serializing/deserializing data
    Json(serde_json::Error),
    /// Error used for failed internal consistency check and panics, i.e. bugs
    /// in raddist.
    Internal(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidParameter(e) => write!(f, "invalid parameter: {}", e),
            Error::UnsupportedStructure(e) => write!(f, "unsupported structure: {}", e),
            Error::NotFitted(e) => write!(f, "calculator is not fitted: {}", e),
            Error::Json(e) => write!(f, "json error: {}", e),
            Error::Internal(e) => {
                write!(f, "internal raddist error")?;
                if e.contains("assertion failed") {
                    write!(f, " (this is likely a bug, please report it)")?;
                }
                write!(f, ": {}", e)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidParameter(_) |
            Error::UnsupportedStructure(_) |
            Error::NotFitted(_) |
            Error::Internal(_) => None,
            Error::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::Json(error)
    }
}

// Box<dyn Any + Send + 'static> is the error type in std::panic::catch_unwind
impl From<Box<dyn std::any::Any + Send + 'static>> for Error {
    fn from(error: Box<dyn std::any::Any + Send + 'static>) -> Error {
        let message = if let Some(message) = error.downcast_ref::<String>() {
            message.clone()
        } else if let Some(message) = error.downcast_ref::<&str>() {
            (*message).to_owned()
        } else {
            "panic message is not a string".to_owned()
        };

        Error::Internal(message)
    }
}
