//! Namespaced collection paths.
//!
//! Every collection lives under `artifacts/{appId}/public/data/{collection}`.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{
    error::ValueObjectError,
    value_object::{AppId, CollectionName},
};

const ROOT_SEGMENT: &str = "artifacts";
const VISIBILITY_SEGMENT: &str = "public";
const DATA_SEGMENT: &str = "data";

/// A collection scoped to an application namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionPath {
    app_id: AppId,
    collection: CollectionName,
}

impl CollectionPath {
    pub fn new(app_id: AppId, collection: CollectionName) -> Self {
        Self { app_id, collection }
    }

    /// Validate raw segments and build a path from them.
    ///
    /// # Errors
    ///
    /// Returns the value object error of the first invalid segment
    pub fn from_segments(app_id: &str, collection: &str) -> Result<Self, ValueObjectError> {
        Ok(Self::new(
            AppId::new(app_id.to_string())?,
            CollectionName::new(collection.to_string())?,
        ))
    }

    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    pub fn collection(&self) -> &CollectionName {
        &self.collection
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{ROOT_SEGMENT}/{}/{VISIBILITY_SEGMENT}/{DATA_SEGMENT}/{}",
            self.app_id, self.collection
        )
    }
}

impl FromStr for CollectionPath {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            [ROOT_SEGMENT, app_id, VISIBILITY_SEGMENT, DATA_SEGMENT, collection] => {
                Self::from_segments(app_id, collection)
            }
            _ => Err(ValueObjectError::CollectionPathInvalid(s.to_string())),
        }
    }
}

impl TryFrom<String> for CollectionPath {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CollectionPath> for String {
    fn from(value: CollectionPath) -> Self {
        value.to_string()
    }
}
