//! Cursor pagination over fully materialized sequences
//!
//! Cursors encode an element's index in the sequence evaluated for one call.
//! Callers sort the sequence before paging so the same data yields the same
//! cursors on every call.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use vigil_core::{Error, Result};

const CURSOR_PREFIX: &str = "arrayconnection:";

/// Pagination arguments supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
}

impl ConnectionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_first(mut self, first: usize) -> Self {
        self.first = Some(first);
        self
    }

    pub fn with_after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn with_last(mut self, last: usize) -> Self {
        self.last = Some(last);
        self
    }

    pub fn with_before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// One page of a sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    /// Size of the whole sequence before windowing
    pub total_count: usize,
}

impl<T> Connection<T> {
    pub fn empty() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
            total_count: 0,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

pub fn encode_cursor(index: usize) -> String {
    STANDARD.encode(format!("{}{}", CURSOR_PREFIX, index))
}

/// Decode a cursor and check it addresses an element of a sequence of `len`.
///
/// # Errors
/// - `Error::InvalidCursor` for malformed cursors or out of range positions
pub fn decode_cursor(cursor: &str, len: usize) -> Result<usize> {
    let bytes = STANDARD
        .decode(cursor)
        .map_err(|e| Error::InvalidCursor(format!("{}: {}", cursor, e)))?;
    let text = String::from_utf8(bytes)
        .map_err(|_| Error::InvalidCursor(format!("{}: not valid UTF-8", cursor)))?;
    let index = text
        .strip_prefix(CURSOR_PREFIX)
        .and_then(|raw| raw.parse::<usize>().ok())
        .ok_or_else(|| Error::InvalidCursor(format!("{}: unrecognized format", cursor)))?;

    if index >= len {
        return Err(Error::InvalidCursor(format!(
            "{}: position {} outside sequence of {}",
            cursor, index, len
        )));
    }
    Ok(index)
}

/// Slice `items` into a page according to `args`.
///
/// `after` and `before` are exclusive bounds. `first` then keeps the leading
/// elements of the bounded range and `last` the trailing ones. The page
/// flags report whether elements of the bounded range were trimmed away.
///
/// # Errors
/// - `Error::InvalidCursor` if `after` or `before` does not resolve
pub fn connection_from_vec<T>(items: Vec<T>, args: &ConnectionArgs) -> Result<Connection<T>> {
    let total_count = items.len();
    let mut start = 0;
    let mut end = total_count;

    if let Some(after) = &args.after {
        start = decode_cursor(after, total_count)? + 1;
    }
    if let Some(before) = &args.before {
        end = decode_cursor(before, total_count)?;
    }
    if end < start {
        end = start;
    }

    let mut has_next_page = false;
    let mut has_previous_page = false;

    if let Some(first) = args.first
        && first < end - start
    {
        end = start + first;
        has_next_page = true;
    }
    if let Some(last) = args.last
        && last < end - start
    {
        start = end - last;
        has_previous_page = true;
    }

    let edges: Vec<Edge<T>> = items
        .into_iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .map(|(index, node)| Edge {
            cursor: encode_cursor(index),
            node,
        })
        .collect();

    let page_info = PageInfo {
        has_next_page,
        has_previous_page,
        start_cursor: edges.first().map(|edge| edge.cursor.clone()),
        end_cursor: edges.last().map(|edge| edge.cursor.clone()),
    };

    Ok(Connection {
        edges,
        page_info,
        total_count,
    })
}
