use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum PardaloteError {
    MissingFile(String),
    InvalidRegion(String),
    BamOperation(String),
    ReferenceOperation(String),
    OutputWrite(String),
}

impl fmt::Display for PardaloteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PardaloteError::MissingFile(msg) => write!(f, "Missing file: {}", msg),
            PardaloteError::InvalidRegion(msg) => write!(f, "Invalid region: {}", msg),
            PardaloteError::BamOperation(msg) => write!(f, "BAM error: {}", msg),
            PardaloteError::ReferenceOperation(msg) => write!(f, "Reference error: {}", msg),
            PardaloteError::OutputWrite(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl Error for PardaloteError {}
