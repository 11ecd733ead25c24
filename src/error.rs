use std::{fmt::Display, fmt::Formatter, io};

/// Errors that abort a compression or decompression session.
#[derive(Debug)]
pub enum HuffError {
    /// A symbol or run length outside what the alphabet can represent.
    Range(String),
    /// Malformed or truncated compressed data, or a code that does not fit the file format.
    Format(String),
    /// The underlying reader or writer failed.
    Io(io::Error),
}

impl Display for HuffError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Range(msg) => write!(f, "range error: {}", msg),
            Self::Format(msg) => write!(f, "format error: {}", msg),
            Self::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for HuffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for HuffError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl HuffError {
    pub(crate) fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, HuffError>;

#[cfg(test)]
mod test {
    use super::HuffError;
    use std::error::Error;

    #[test]
    fn display_test() {
        assert_eq!(
            HuffError::range("symbol 400").to_string(),
            "range error: symbol 400"
        );
        assert_eq!(
            HuffError::format("bad header").to_string(),
            "format error: bad header"
        );
    }

    #[test]
    fn io_source_test() {
        let e: HuffError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(e, HuffError::Io(_)));
        assert!(e.source().is_some());
        assert!(HuffError::range("x").source().is_none());
    }
}
