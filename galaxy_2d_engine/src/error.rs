//! Error types for the Galaxy2D engine
//!
//! This module defines the error type returned by every fallible operation
//! of the engine: device capability checks, GPU resource creation and
//! argument validation.

use std::fmt;

/// Result type for Galaxy2D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy2D engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend-specific error (shader link, incomplete framebuffer, poisoned lock)
    BackendError(String),

    /// The device cannot honour the requested configuration
    /// (anti-aliasing level, stencil, NPOT, blit...)
    Unsupported(String),

    /// A GPU object could not be created (null handle returned)
    ResourceExhausted(String),

    /// Argument rejected at the API boundary (zero size, out of range region...)
    InvalidArgument(String),

    /// Operation on a resource that has no GPU storage
    InvalidResource(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
            Error::ResourceExhausted(msg) => write!(f, "Resource exhausted: {}", msg),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build the matching `Error` variant
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("galaxy2d::Texture", InvalidArgument, "invalid size {}x{}", w, h);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy2d::Error::$variant(message)
    }};
}

/// Log an ERROR message and return early with the matching `Error` variant
///
/// # Example
///
/// ```ignore
/// engine_bail!("galaxy2d::Texture", Unsupported, "size {} exceeds maximum {}", w, max);
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $variant:ident, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $variant, $($arg)*))
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
