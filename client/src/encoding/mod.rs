//! Text encoders that turn serde-annotated Rust types into GraphQL fragments.
//!
//! Field names, renames and skips are taken from the `serde` attributes of the type,
//! so a filter struct and a response struct describe their wire shape exactly once.
mod literal;
mod selection;

pub use literal::{Unquoted, encode_literal};
pub use selection::{Shape, encode_selection, selection_shape};

/// Failure to render a value or a shape as GraphQL text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("unsupported kind for graphql encoding: {0}")]
    Unsupported(&'static str),
    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for EncodeError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        EncodeError::Custom(msg.to_string())
    }
}

impl serde::de::Error for EncodeError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        EncodeError::Custom(msg.to_string())
    }
}
