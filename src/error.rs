// src/error.rs
//! Error types for the GNSS status monitor

use std::fmt;

pub type Result<T> = std::result::Result<T, StatusError>;

#[derive(Debug)]
pub enum StatusError {
    Io(std::io::Error),
    Serial(tokio_serial::Error),
    Json(serde_json::Error),
    Connection(String),
    Parse(String),
    Config(String),
    Other(String),
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusError::Io(e) => write!(f, "IO error: {}", e),
            StatusError::Serial(e) => write!(f, "Serial error: {}", e),
            StatusError::Json(e) => write!(f, "JSON error: {}", e),
            StatusError::Connection(msg) => write!(f, "Connection error: {}", msg),
            StatusError::Parse(msg) => write!(f, "Parse error: {}", msg),
            StatusError::Config(msg) => write!(f, "Config error: {}", msg),
            StatusError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for StatusError {}

impl From<std::io::Error> for StatusError {
    fn from(error: std::io::Error) -> Self {
        StatusError::Io(error)
    }
}

impl From<tokio_serial::Error> for StatusError {
    fn from(error: tokio_serial::Error) -> Self {
        StatusError::Serial(error)
    }
}

impl From<serde_json::Error> for StatusError {
    fn from(error: serde_json::Error) -> Self {
        StatusError::Json(error)
    }
}

impl From<anyhow::Error> for StatusError {
    fn from(error: anyhow::Error) -> Self {
        StatusError::Other(error.to_string())
    }
}
