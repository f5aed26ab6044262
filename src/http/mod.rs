//! Internal HTTP layer for LiveHint AI communication.
//!
//! This module is `pub(crate)` - it contains implementation details
//! not exposed to library users, apart from the SSE decoder which is
//! re-exported from the crate root.

pub(crate) mod common;
pub(crate) mod error_helpers;
pub(crate) mod loud_wire;
pub(crate) mod sse_parser;
pub(crate) mod transport;
pub(crate) mod tutoring;
