//! Business logic for the contacts directory.
//!
//! `domain` sits between the `web` layer and `people-auth`. Consumers of this crate never
//! need to depend on `people-auth` directly: the provider, credential and storage types
//! they touch are re-exported from [`gateway`].

pub use gateway::{Credential, CredentialRecord, MemoryStorage, Person, Provider, Storage};

pub mod contacts;
pub mod directory;
pub mod error;
pub mod grouping;
pub mod login;

pub mod gateway;
