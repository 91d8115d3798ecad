//! Domain layer for the document store.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod path;
pub mod repository;
pub mod value_object;

pub use entity::{Credential, Record};
pub use error::{IdentityError, RepositoryError, ValueObjectError};
pub use factory::{RecordIdFactory, SessionTokenFactory, UserIdFactory};
pub use path::CollectionPath;
pub use repository::{DocumentRepository, IdentityRepository};
#[cfg(test)]
pub use repository::{MockDocumentRepository, MockIdentityRepository};
pub use value_object::{
    AppId, CollectionName, RecordFields, RecordId, SessionToken, Timestamp, UserId,
};
