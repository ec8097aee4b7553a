//! Record shapes and request/response types for the record store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Records per page for paginated listings.
pub const PAGE_SIZE: usize = 20;

/// A single pokedex record.
///
/// `name`, `type` and `base` are the required fields; anything else the
/// client sends is carried opaquely in `extra` and round-trips through the
/// backing file untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub name: BTreeMap<String, String>,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    pub base: BTreeMap<String, Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request to create a new record. The required fields are Option-wrapped so
/// a missing one produces a domain-level 400 instead of a deserialization
/// failure.
#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    pub name: Option<BTreeMap<String, String>>,
    #[serde(rename = "type")]
    pub types: Option<Vec<String>>,
    pub base: Option<BTreeMap<String, Number>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreateRecordRequest {
    /// Names of the required fields absent from this request.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.types.is_none() {
            missing.push("type");
        }
        if self.base.is_none() {
            missing.push("base");
        }
        missing
    }
}

/// Partial update. Present fields replace the record's wholesale; unknown
/// fields are merged key-by-key into `extra`. There is deliberately no `id`
/// field: ids are store-assigned and immutable.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecordRequest {
    pub name: Option<BTreeMap<String, String>>,
    #[serde(rename = "type")]
    pub types: Option<Vec<String>>,
    pub base: Option<BTreeMap<String, Number>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub page_size: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// One page of records plus its pagination envelope.
#[derive(Debug, Serialize)]
pub struct RecordPage {
    pub data: Vec<Record>,
    pub pagination: Pagination,
}
