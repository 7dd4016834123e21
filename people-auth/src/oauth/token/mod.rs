//! Session-scoped credential storage.

mod credential;
mod memory;
mod storage;

pub use credential::{Credential, CredentialRecord};
pub use memory::MemoryStorage;
pub use storage::Storage;
