//! Vigil Query
//!
//! Read-side composition for API layers:
//! - `Viewer`: per-actor collections (entities, checks, check events, user)
//! - `CheckQuery`: authorized source of check configurations
//! - Relay-style cursor pagination over sorted sequences

pub mod controller;
pub mod pagination;
pub mod viewer;

pub use controller::{CheckController, CheckQuery, CheckQueryParams};
pub use pagination::{
    Connection, ConnectionArgs, Edge, PageInfo, connection_from_vec, decode_cursor, encode_cursor,
};
pub use viewer::Viewer;
