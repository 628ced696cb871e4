//! Error types for packing.

use thiserror::Error;

/// Errors that can occur while packing panels onto stock sheets.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PackError {
    /// The solver could not place every request into the offered bins.
    #[error("{placed} rectangles packed, but {required} required")]
    Incomplete {
        /// Number of requests that received a placement.
        placed: usize,
        /// Number of requests submitted.
        required: usize,
        /// Ids of the requests left without a placement.
        unplaced: Vec<String>,
    },

    /// A request has a non-positive or non-finite size, or the kerf is invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No bins were offered.
    #[error("bin catalog is empty")]
    EmptyCatalog,

    /// Two requests (or two placements) share an id.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// The solver returned a placement for an id that was never requested.
    #[error("solver returned unknown id: {0}")]
    UnknownId(String),

    /// The solver returned a placement that cannot be mapped onto the catalog.
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),
}

/// Result type for packing operations.
pub type Result<T> = std::result::Result<T, PackError>;
