//! Gateways to external services.
//!
//! Re-exports the `people-auth` types the rest of the workspace needs so that `web`
//! depends on `domain` alone.

pub mod google;

pub use people_auth::error::Error as GatewayError;
pub use people_auth::oauth::token::{Credential, CredentialRecord, MemoryStorage, Storage};
pub use people_auth::oauth::{AuthorizationRequest, Provider, SCOPES};
pub use people_auth::people::{Connections, EmailAddress, FieldMetadata, Name, Person, Photo};
