//! Sonarr and radarr share one v3 REST surface: tags, a resource collection
//! keyed by an external catalog id, and the same validation error shape.

mod client;
mod movie;
mod series;

pub use client::ArrClient;
pub use movie::Movie;
pub use series::Series;

use crate::error::ArrError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationFailure {
    pub property_name: Option<String>,
    pub error_message: String,
    pub error_code: Option<String>,
    pub severity: Option<String>,
}

/// Managers answer a rejected request with either one failure or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorBody {
    List(Vec<ValidationFailure>),
    Single(ValidationFailure),
}

impl ErrorBody {
    pub(crate) fn into_failures(self) -> Vec<ValidationFailure> {
        match self {
            ErrorBody::List(failures) => failures,
            ErrorBody::Single(failure) => vec![failure],
        }
    }
}

pub trait LibraryItem: Serialize + DeserializeOwned {
    /// Run-wide settings used to build a creation payload.
    type Defaults;

    const RESOURCE: &'static str;
    /// Query parameter selecting records by catalog id.
    const ID_FIELD: &'static str;
    /// Validation message returned when the record already exists.
    const ALREADY_ADDED: &'static str;

    fn for_add(title: &str, target_id: i64, tags: Vec<i64>, defaults: &Self::Defaults) -> Self;

    fn id(&self) -> Option<i64>;
    fn target_id(&self) -> i64;
    fn tags(&self) -> &[i64];
    fn tags_mut(&mut self) -> &mut Vec<i64>;

    fn has_tag(&self, tag_id: i64) -> bool {
        self.tags().contains(&tag_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddResponse {
    Created,
    AlreadyAdded,
}

pub trait LibraryApi {
    type Item: LibraryItem;

    fn tags(&self) -> Result<Vec<Tag>, ArrError>;
    fn create_tag(&self, label: &str) -> Result<Tag, ArrError>;
    fn add(&self, item: &Self::Item) -> Result<AddResponse, ArrError>;
    fn find(&self, target_id: i64) -> Result<Vec<Self::Item>, ArrError>;
    fn update(&self, id: i64, item: &Self::Item) -> Result<(), ArrError>;
}
