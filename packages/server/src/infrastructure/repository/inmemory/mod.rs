//! HashMap-backed repositories; state lives for the lifetime of the process.

pub mod document;
pub mod identity;

pub use document::InMemoryDocumentRepository;
pub use identity::InMemoryIdentityRepository;
