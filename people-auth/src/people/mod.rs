//! People API resource types.
//!
//! These mirror the provider's wire schema and are deliberately permissive: every list
//! field may be missing. Deciding which absences are errors is the normalizer's job.

mod person;

pub use person::{Connections, ConnectionsPage, EmailAddress, FieldMetadata, Name, Person, Photo};

/// Person fields requested for the signed-in user's own profile.
pub const PROFILE_FIELDS: &str = "names,emailAddresses,photos";

/// Person fields requested for each connection.
pub const CONNECTION_FIELDS: &str = "names,emailAddresses";

/// Largest page size the connections endpoint accepts.
pub const CONNECTIONS_PAGE_SIZE: u32 = 1000;
