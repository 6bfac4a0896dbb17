/// Error types shared by the mesh loader, the pipeline and the configuration layer
use std::fmt;

/// A mesh description line that could not be parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// 1-based line number in the mesh description
    pub line: usize,
    pub content: String,
    pub reason: String,
}

impl ParseError {
    pub fn new(line: usize, content: &str, reason: &str) -> Self {
        Self {
            line,
            content: content.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} (\"{}\")",
            self.line, self.reason, self.content
        )
    }
}

impl std::error::Error for ParseError {}

/// Which list a face corner points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Vertex,
    Normal,
}

/// A face corner that references past the end of the vertex or normal list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexError {
    pub kind: IndexKind,
    pub index: usize,
    pub len: usize,
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            IndexKind::Vertex => "vertex",
            IndexKind::Normal => "normal",
        };
        write!(
            f,
            "{} index {} out of range (list holds {})",
            kind,
            self.index + 1,
            self.len
        )
    }
}

impl std::error::Error for IndexError {}

#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    Index(IndexError),
    Config(String),
    DegenerateCamera(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "failed to parse mesh: {}", e),
            Error::Index(e) => write!(f, "invalid face reference: {}", e),
            Error::Config(msg) => write!(f, "invalid config: {}", msg),
            Error::DegenerateCamera(msg) => write!(f, "degenerate camera: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Index(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<IndexError> for Error {
    fn from(e: IndexError) -> Self {
        Error::Index(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
