use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    NoData,
    Overflow,
    Corrupt,
    Remote,
    Identity,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    offset: Option<u64>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            offset: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(offset) = self.offset {
            write!(f, " (offset: {offset})")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

/// Stable numeric code for an error kind, as reported through the C ABI.
pub fn to_status_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::NoData => 3,
        ErrorKind::Overflow => 4,
        ErrorKind::Corrupt => 5,
        ErrorKind::Remote => 6,
        ErrorKind::Identity => 7,
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, to_status_code};

    #[test]
    fn status_code_mapping_is_stable() {
        let cases = [
            (ErrorKind::Internal, 1),
            (ErrorKind::Usage, 2),
            (ErrorKind::NoData, 3),
            (ErrorKind::Overflow, 4),
            (ErrorKind::Corrupt, 5),
            (ErrorKind::Remote, 6),
            (ErrorKind::Identity, 7),
        ];

        for (kind, code) in cases {
            assert_eq!(to_status_code(kind), code);
        }
    }

    #[test]
    fn display_includes_message_offset_and_hint() {
        let err = Error::new(ErrorKind::Corrupt)
            .with_message("bet info too short")
            .with_offset(640)
            .with_hint("check the node version");
        assert_eq!(
            err.to_string(),
            "Corrupt: bet info too short (offset: 640) (hint: check the node version)"
        );
    }

    #[test]
    fn source_is_exposed() {
        let io = std::io::Error::other("socket closed");
        let err = Error::new(ErrorKind::Remote).with_source(io);
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "socket closed");
    }
}
