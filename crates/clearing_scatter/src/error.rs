//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, degenerate geometry rejected at construction, dangling zone or
//! path references, and generic errors. Running out of iterations before a member reaches
//! its target is not an error; see [`crate::scatter::runner::MemberOutcome`].
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("member {member} references unknown zone '{zone}'")]
    UnknownZone { member: usize, zone: String },

    #[error("member {member} references unknown path '{path}'")]
    UnknownPath { member: usize, path: String },

    #[error("clearing has no members")]
    EmptyClearing,

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
