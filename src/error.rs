//! Error handling for voxbridge operations
//!
//! This module defines the error type shared by the connector, the volume
//! marshaller, and the host launcher, together with a Result alias.
//!
//! Connection loss is deliberately NOT represented here: a dead connection
//! makes reads return empty and writes no-op (see [`crate::Connector`]),
//! while the variants below are hard errors that are raised synchronously
//! and never retried.

use thiserror::Error;

/// Main error type for voxbridge operations
#[derive(Error, Debug)]
pub enum VoxBridgeError {
    /// Errors while locating or starting the host executable
    #[error("Launch error: {0}")]
    Launch(String),

    /// Errors from the host instance registry (enumerate/attach)
    #[error("Registry error: {0}")]
    Registry(String),

    /// A remote call failed on the host side
    #[error("Host error: {0}")]
    Host(String),

    /// Problems with the host dataset descriptor
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// The dataset declares a datatype this connector does not support
    #[error("Unsupported datatype: {0}")]
    UnsupportedDataType(String),

    /// A channel or timepoint index outside the dataset's declared range
    #[error("{what} index {index} out of bounds (size {size})")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        size: usize,
    },

    /// Caller volume element type does not match the dataset's declared tag
    #[error("Type mismatch: dataset is {expected}, volume is {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Caller volume dimensions do not match the dataset extents
    #[error("Shape mismatch: dataset is {expected:?}, volume is {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    /// Misuse of a scene-graph object (e.g. reading spots from a surface)
    #[error("Scene error: {0}")]
    Scene(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<VoxBridgeError>,
    },
}

impl VoxBridgeError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        VoxBridgeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for voxbridge operations
pub type Result<T> = std::result::Result<T, VoxBridgeError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
