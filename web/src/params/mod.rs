//! This module holds typed parameters for various endpoint inputs.
//!
//! By using typed parameters, the query string is checked (by type) before it reaches a
//! controller, and controllers only ever see values they can act on.

pub(crate) mod connection;
pub(crate) mod oauth;
