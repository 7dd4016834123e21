//! # people-auth
//!
//! Everything needed to talk to the identity provider and the People API:
//! - OAuth 2.0 authorization-code flow (authorization URL, code exchange, refresh)
//! - CSRF state tokens for pending logins
//! - Session-keyed credential storage with a flat, serializable record form
//! - People API client for the signed-in user's profile and connections
//! - HTTP client building
//!
//! ## Architecture
//!
//! This crate is the leaf of the workspace. It knows nothing about HTTP routing or
//! sessions beyond an opaque session id; `domain` drives the login lifecycle and
//! normalizes the raw `people` records returned here.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use people_auth::{
//!     http::ClientBuilder,
//!     oauth::{providers::google, token::{MemoryStorage, Storage}, Provider},
//! };
//! ```

pub mod error;
pub mod http;
pub mod oauth;
pub mod people;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
