//! Result type alias for rewriting operations

use crate::error::RejigError;

/// Standard Result type for rewriting operations
pub type Result<T> = std::result::Result<T, RejigError>;
