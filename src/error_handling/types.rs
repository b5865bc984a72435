use std::fmt;
use std::net::SocketAddr;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    BadIPFormatting(String),
    NotInRange(String),
    EmptyValue(String),
    FileDoesNotExist(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::BadIPFormatting(e) => write!(f, "IP formatting error: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
            ConfigError::EmptyValue(e) => write!(f, "Missing value: {}", e),
            ConfigError::FileDoesNotExist(e) => write!(f, "File error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

/// Failures of the document store, during startup or while serving a request.
#[derive(Debug)]
pub enum StorageError {
    ConnectionFailed(String),
    WriteFailed(String),
    ReadFailed(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionFailed(e) => write!(f, "Storage connection failed: {}", e),
            StorageError::WriteFailed(e) => write!(f, "Storage write failed: {}", e),
            StorageError::ReadFailed(e) => write!(f, "Storage read failed: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

/// A todo identifier supplied by a client could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    Malformed(String),
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::Empty => write!(f, "Missing todo id"),
            IdError::Malformed(raw) => write!(f, "Malformed todo id: {:?}", raw),
        }
    }
}

impl std::error::Error for IdError {}

#[derive(Debug)]
pub enum RenderError {
    MissingTemplate(String),
    InvalidTemplate(String),
    Io(std::io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::MissingTemplate(e) => write!(f, "Template not found: {}", e),
            RenderError::InvalidTemplate(e) => write!(f, "Invalid template: {}", e),
            RenderError::Io(e) => write!(f, "Template IO error: {}", e),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err)
    }
}

/// Request-scoped failure, turned into an error page by the web layer.
#[derive(Debug)]
pub enum WebError {
    BadRequest(IdError),
    Storage(StorageError),
    Render(RenderError),
}

impl WebError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, WebError::BadRequest(_))
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::BadRequest(e) => write!(f, "Bad request: {}", e),
            WebError::Storage(e) => write!(f, "{}", e),
            WebError::Render(e) => write!(f, "Render error: {}", e),
        }
    }
}

impl std::error::Error for WebError {}

impl From<IdError> for WebError {
    fn from(err: IdError) -> Self {
        WebError::BadRequest(err)
    }
}

impl From<StorageError> for WebError {
    fn from(err: StorageError) -> Self {
        WebError::Storage(err)
    }
}

impl From<RenderError> for WebError {
    fn from(err: RenderError) -> Self {
        WebError::Render(err)
    }
}

/// Fatal conditions detected before the server starts listening.
#[derive(Debug)]
pub enum StartupError {
    Configuration(ConfigError),
    Storage(StorageError),
    Render(RenderError),
    Bind(SocketAddr, std::io::Error),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Configuration(e) => write!(f, "Configuration error: {}", e),
            StartupError::Storage(e) => write!(f, "Storage error: {}", e),
            StartupError::Render(e) => write!(f, "Template error: {}", e),
            StartupError::Bind(addr, e) => write!(f, "Could not listen on {}: {}", addr, e),
        }
    }
}

impl std::error::Error for StartupError {}

impl From<ConfigError> for StartupError {
    fn from(err: ConfigError) -> Self {
        StartupError::Configuration(err)
    }
}

impl From<StorageError> for StartupError {
    fn from(err: StorageError) -> Self {
        StartupError::Storage(err)
    }
}

impl From<RenderError> for StartupError {
    fn from(err: RenderError) -> Self {
        StartupError::Render(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_error_classification() {
        assert!(WebError::from(IdError::Empty).is_client_error());
        assert!(!WebError::from(StorageError::ReadFailed("gone".into())).is_client_error());
        assert!(!WebError::from(RenderError::InvalidTemplate("bad".into())).is_client_error());
    }

    #[test]
    fn test_display_messages() {
        let err = IdError::Malformed("zz".into());
        assert_eq!(err.to_string(), "Malformed todo id: \"zz\"");
        let err = StartupError::from(StorageError::ConnectionFailed("refused".into()));
        assert_eq!(
            err.to_string(),
            "Storage error: Storage connection failed: refused"
        );
        let addr: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        let err = StartupError::Bind(addr, std::io::Error::from(std::io::ErrorKind::AddrInUse));
        assert!(err.to_string().starts_with("Could not listen on 127.0.0.1:5000: "));
    }
}
