//! Client of the Academic Management Service (AMS) GraphQL API.
//!
//! Connection filters are written as plain Rust structs and rendered into GraphQL input
//! literals, response shapes are plain `Deserialize` types whose fields become the selection
//! set. On top of that the [`AmsClient`] walks paged connections, resolves batches of ids in
//! one round trip and pages connections nested under many parents at once.
pub mod connection;
pub mod encoding;
/// Errors returned by the AMS client.
pub mod errors;
pub mod operator;
pub mod queries;
pub mod stopwatch;

mod client;

pub use client::{AmsClient, AmsClientConfig, GraphQlReply, GraphQlRequest};
pub use connection::{
    ConnectionFilter, ConnectionPage, ConnectionPageInfo, ConnectionResponse, Direction, Edge, MAX_PAGE_SIZE,
    NestedConnection,
};
pub use operator::Operator;
