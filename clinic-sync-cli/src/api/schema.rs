//! Data source schema retrieval

use serde::Deserialize;
use std::collections::HashMap;

use super::client::NotionClient;
use super::error::ApiError;

/// Declared type of one data source property.
///
/// Tags not modeled here (people, relation, files, formula, rollup, ...)
/// are carried as `Other`; the encoder omits them and the decoder passes
/// their raw JSON through untouched, so new remote types never break a
/// sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    Title,
    RichText,
    Number,
    Checkbox,
    Select,
    MultiSelect,
    Date,
    Status,
    Other(String),
}

impl PropertyKind {
    /// Map a wire type tag to a kind.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "title" => PropertyKind::Title,
            "rich_text" => PropertyKind::RichText,
            "number" => PropertyKind::Number,
            "checkbox" => PropertyKind::Checkbox,
            "select" => PropertyKind::Select,
            "multi_select" => PropertyKind::MultiSelect,
            "date" => PropertyKind::Date,
            "status" => PropertyKind::Status,
            other => PropertyKind::Other(other.to_string()),
        }
    }
}

/// Property name -> declared kind for one data source. Fetched once per
/// sync operation and read-only from then on.
pub type ColumnSchema = HashMap<String, PropertyKind>;

#[derive(Debug, Deserialize)]
struct DataSourceObject {
    #[serde(default)]
    properties: HashMap<String, PropertyDef>,
}

#[derive(Debug, Deserialize)]
struct PropertyDef {
    #[serde(rename = "type")]
    kind: String,
}

/// Fetch the property schema of a data source.
pub fn fetch_schema(client: &NotionClient, data_source_id: &str) -> Result<ColumnSchema, ApiError> {
    let response = client.get(&format!("data_sources/{data_source_id}"))?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::RemoteSchema {
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        });
    }
    let object: DataSourceObject = response.json()?;
    let schema = object
        .properties
        .into_iter()
        .map(|(name, def)| (name, PropertyKind::from_tag(&def.kind)))
        .collect();
    Ok(schema)
}
