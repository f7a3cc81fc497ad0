//! Property records as the backend sends them.
//!
//! The backend has shipped several incompatible shapes over time. Rather than
//! one struct per revision, every known field name is accepted here and the
//! normalizer decides which one wins. Fields that changed type between
//! revisions (ids, prices) stay as raw JSON values.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProperty {
    pub id: Option<Value>,
    pub id_property: Option<Value>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub price: Option<Value>,
    pub year: Option<Value>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub created_at: Option<String>,
    pub code_internal: Option<String>,
    pub codigo_internal: Option<String>,

    /// Nested owner (current shape)
    pub owner: Option<RawOwner>,
    /// Flat owner fields (legacy shape)
    pub id_owner: Option<Value>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub owner_email: Option<String>,
    pub owner_photo: Option<String>,

    /// Single image URL (legacy shape)
    pub image: Option<String>,
    pub images: Option<Vec<RawImage>>,
    pub traces: Option<Vec<RawTrace>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOwner {
    pub id_owner: Option<Value>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
}

/// An image is either a bare URL or a record
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawImage {
    Url(String),
    Record(RawImageRecord),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImageRecord {
    pub id: Option<Value>,
    pub id_property_image: Option<Value>,
    pub url: Option<String>,
    pub file: Option<String>,
    pub enabled: Option<bool>,
    pub is_main: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrace {
    pub date: Option<String>,
    pub date_sale: Option<String>,
    pub label: Option<String>,
    pub name: Option<String>,
    pub value: Option<Value>,
    pub tax: Option<Value>,
}
