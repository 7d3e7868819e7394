use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the popover crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the popover component.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A direction outside the anchor set reached the positioning path.
    #[error(transparent)]
    Geometry(#[from] popover_geom::Error),
}
