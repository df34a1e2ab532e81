//! Page creation and querying
//!
//! Bulk operations over one data source: uploading tabular rows as new
//! pages, and reading filtered pages back out. Both are fail-fast — the
//! first non-success response aborts the whole operation and nothing is
//! retried. Rows already created before an abort stay on the remote side.

use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::client::NotionClient;
use super::error::ApiError;
use super::properties::{decode, encode};
use super::schema::{ColumnSchema, fetch_schema};
use crate::table::{CellValue, Table};

/// One page worth of query results.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryPage {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Upload table rows as new pages in a data source, returning the created
/// page ids in creation order.
///
/// `mapping` pairs source column names with destination property names;
/// when absent, column names are used as property names unchanged. Mapped
/// columns missing from the fetched schema are silently dropped, and rows
/// whose payload ends up empty are skipped without a remote call.
pub fn upload_rows(
    client: &NotionClient,
    table: &Table,
    data_source_id: &str,
    mapping: Option<&[(String, String)]>,
) -> Result<Vec<String>, ApiError> {
    let schema = fetch_schema(client, data_source_id)?;
    let identity: Vec<(String, String)>;
    let mapping = match mapping {
        Some(pairs) => pairs,
        None => {
            identity = table
                .columns
                .iter()
                .map(|column| (column.clone(), column.clone()))
                .collect();
            &identity
        }
    };
    upload_with(table, &schema, mapping, |row, properties| {
        create_page(client, data_source_id, row, properties)
    })
}

/// Row loop shared by [`upload_rows`] and its tests. `create` performs one
/// page creation and returns the new page id.
fn upload_with<F>(
    table: &Table,
    schema: &ColumnSchema,
    mapping: &[(String, String)],
    mut create: F,
) -> Result<Vec<String>, ApiError>
where
    F: FnMut(usize, Map<String, Value>) -> Result<String, ApiError>,
{
    let mut created = Vec::new();
    for row in 0..table.len() {
        let properties = build_properties(table, row, schema, mapping);
        if properties.is_empty() {
            log::debug!("Skipping row {}: no encodable properties", row);
            continue;
        }
        match create(row, properties) {
            Ok(id) => created.push(id),
            // Hand back the ids committed before the abort; the remote
            // side keeps those pages (at-least-once, no rollback).
            Err(ApiError::RateLimited { .. }) => return Err(ApiError::RateLimited { created }),
            Err(err) => return Err(err),
        }
    }
    Ok(created)
}

/// Property payload for one row, restricted to mapped columns present in
/// the schema. Unencodable values are omitted by the codec.
fn build_properties(
    table: &Table,
    row: usize,
    schema: &ColumnSchema,
    mapping: &[(String, String)],
) -> Map<String, Value> {
    let mut properties = Map::new();
    for (source_column, property_name) in mapping {
        let Some(kind) = schema.get(property_name) else {
            continue;
        };
        let Some(value) = table.get(row, source_column) else {
            continue;
        };
        if let Some(payload) = encode(value, kind) {
            properties.insert(property_name.clone(), payload);
        }
    }
    properties
}

fn create_page(
    client: &NotionClient,
    data_source_id: &str,
    row: usize,
    properties: Map<String, Value>,
) -> Result<String, ApiError> {
    let body = json!({
        "parent": { "type": "data_source_id", "data_source_id": data_source_id },
        "properties": properties,
    });
    let response = client.post("pages", &body)?;
    let status = response.status();
    if status.as_u16() == 429 {
        return Err(ApiError::RateLimited { created: Vec::new() });
    }
    if !status.is_success() {
        return Err(ApiError::RecordCreate {
            row,
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        });
    }
    let created: CreatedPage = response.json()?;
    Ok(created.id)
}

#[derive(Debug, Deserialize)]
struct CreatedPage {
    id: String,
}

/// Query a data source with an opaque filter, following pagination cursors
/// until exhausted. Any non-success page aborts the whole query with no
/// partial results.
pub fn query_pages(
    client: &NotionClient,
    data_source_id: &str,
    filter: &Value,
    sorts: Option<&Value>,
    page_size: u32,
) -> Result<Vec<Value>, ApiError> {
    let path = format!("data_sources/{data_source_id}/query");
    collect_pages(|cursor| {
        let mut body = json!({ "page_size": page_size, "filter": filter });
        if let Some(sorts) = sorts {
            body["sorts"] = sorts.clone();
        }
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }
        let response = client.post(&path, &body)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::RemoteQuery {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(response.json()?)
    })
}

/// Cursor loop shared by [`query_pages`] and its tests.
fn collect_pages<F>(mut fetch: F) -> Result<Vec<Value>, ApiError>
where
    F: FnMut(Option<&str>) -> Result<QueryPage, ApiError>,
{
    let mut results = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = fetch(cursor.as_deref())?;
        results.extend(page.results);
        if !page.has_more {
            break;
        }
        cursor = page.next_cursor;
    }
    Ok(results)
}

/// Flatten raw pages into a table: identity and audit columns first, then
/// one decoded column per property, ordered by first appearance.
pub fn pages_to_table(pages: &[Value]) -> Table {
    let mut columns: Vec<String> = ["page_id", "created_time", "last_edited_time", "url"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for page in pages {
        if let Some(props) = page.get("properties").and_then(Value::as_object) {
            for name in props.keys() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.clone());
                }
            }
        }
    }

    let mut table = Table::new(columns.clone());
    for page in pages {
        let mut row = Vec::with_capacity(columns.len());
        for field in ["id", "created_time", "last_edited_time", "url"] {
            row.push(match page.get(field).and_then(Value::as_str) {
                Some(s) => CellValue::String(s.to_string()),
                None => CellValue::Null,
            });
        }
        let props = page.get("properties").and_then(Value::as_object);
        for name in columns.iter().skip(4) {
            row.push(match props.and_then(|p| p.get(name)) {
                Some(prop) => decode(prop),
                None => CellValue::Null,
            });
        }
        table.push_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::schema::PropertyKind;

    fn schema() -> ColumnSchema {
        let mut schema = ColumnSchema::new();
        schema.insert("고객명".to_string(), PropertyKind::Title);
        schema.insert("차트번호".to_string(), PropertyKind::Number);
        schema
    }

    fn identity(columns: &[&str]) -> Vec<(String, String)> {
        columns
            .iter()
            .map(|c| (c.to_string(), c.to_string()))
            .collect()
    }

    fn row_table(rows: Vec<Vec<CellValue>>) -> Table {
        let mut table = Table::new(vec!["고객명".to_string(), "차트번호".to_string()]);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    #[test]
    fn test_empty_rows_are_skipped_without_a_call() {
        let table = row_table(vec![
            vec![CellValue::Null, CellValue::Null],
            vec![CellValue::String("김철수".to_string()), CellValue::Int(1)],
            vec![CellValue::String("  ".to_string()), CellValue::Float(f64::NAN)],
        ]);
        let mut calls = Vec::new();
        let ids = upload_with(
            &table,
            &schema(),
            &identity(&["고객명", "차트번호"]),
            |row, _props| {
                calls.push(row);
                Ok(format!("page-{row}"))
            },
        )
        .unwrap();
        assert_eq!(calls, vec![1]);
        assert_eq!(ids, vec!["page-1"]);
    }

    #[test]
    fn test_columns_missing_from_schema_never_reach_the_payload() {
        let mut table = row_table(vec![vec![
            CellValue::String("김철수".to_string()),
            CellValue::Int(1),
        ]]);
        table.add_column("메모", vec![CellValue::String("비고".to_string())]);

        let mut payloads = Vec::new();
        upload_with(
            &table,
            &schema(),
            &identity(&["고객명", "차트번호", "메모"]),
            |row, props| {
                payloads.push(props);
                Ok(format!("page-{row}"))
            },
        )
        .unwrap();
        assert_eq!(payloads.len(), 1);
        assert!(payloads[0].contains_key("고객명"));
        assert!(payloads[0].contains_key("차트번호"));
        assert!(!payloads[0].contains_key("메모"));
    }

    #[test]
    fn test_rate_limit_aborts_and_keeps_prior_ids() {
        let table = row_table(
            (0..10)
                .map(|i| {
                    vec![
                        CellValue::String(format!("고객{i}")),
                        CellValue::Int(i as i64),
                    ]
                })
                .collect(),
        );
        let err = upload_with(
            &table,
            &schema(),
            &identity(&["고객명", "차트번호"]),
            |row, _props| {
                if row == 5 {
                    Err(ApiError::RateLimited { created: Vec::new() })
                } else {
                    Ok(format!("page-{row}"))
                }
            },
        )
        .unwrap_err();
        match err {
            ApiError::RateLimited { created } => {
                assert_eq!(
                    created,
                    vec!["page-0", "page-1", "page-2", "page-3", "page-4"]
                );
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_create_failure_carries_the_row_index() {
        let table = row_table(vec![
            vec![CellValue::String("a".to_string()), CellValue::Int(1)],
            vec![CellValue::String("b".to_string()), CellValue::Int(2)],
        ]);
        let err = upload_with(
            &table,
            &schema(),
            &identity(&["고객명", "차트번호"]),
            |row, _props| {
                if row == 1 {
                    Err(ApiError::RecordCreate {
                        row,
                        status: 400,
                        body: "validation_error".to_string(),
                    })
                } else {
                    Ok(format!("page-{row}"))
                }
            },
        )
        .unwrap_err();
        match err {
            ApiError::RecordCreate { row, status, .. } => {
                assert_eq!(row, 1);
                assert_eq!(status, 400);
            }
            other => panic!("expected RecordCreate, got {other:?}"),
        }
    }

    #[test]
    fn test_pagination_follows_cursors_until_exhausted() {
        let mut cursors_seen = Vec::new();
        let mut call = 0;
        let results = collect_pages(|cursor| {
            cursors_seen.push(cursor.map(str::to_string));
            call += 1;
            Ok(match call {
                1 => QueryPage {
                    results: vec![json!({"id": "p1"})],
                    has_more: true,
                    next_cursor: Some("c1".to_string()),
                },
                2 => QueryPage {
                    results: vec![json!({"id": "p2"}), json!({"id": "p3"})],
                    has_more: true,
                    next_cursor: Some("c2".to_string()),
                },
                _ => QueryPage {
                    results: vec![json!({"id": "p4"})],
                    has_more: false,
                    next_cursor: None,
                },
            })
        })
        .unwrap();

        assert_eq!(call, 3);
        assert_eq!(
            cursors_seen,
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
        assert_eq!(
            results,
            vec![
                json!({"id": "p1"}),
                json!({"id": "p2"}),
                json!({"id": "p3"}),
                json!({"id": "p4"}),
            ]
        );
    }

    #[test]
    fn test_pagination_failure_discards_partial_results() {
        let mut call = 0;
        let err = collect_pages(|_cursor| {
            call += 1;
            if call == 1 {
                Ok(QueryPage {
                    results: vec![json!({"id": "p1"})],
                    has_more: true,
                    next_cursor: Some("c1".to_string()),
                })
            } else {
                Err(ApiError::RemoteQuery {
                    status: 500,
                    body: "boom".to_string(),
                })
            }
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::RemoteQuery { status: 500, .. }));
    }

    #[test]
    fn test_pages_flatten_to_a_table() {
        let pages = vec![
            json!({
                "id": "page-1",
                "created_time": "2024-05-01T09:00:00.000Z",
                "last_edited_time": "2024-05-02T09:00:00.000Z",
                "url": "https://notion.so/page-1",
                "properties": {
                    "고객명": { "type": "title", "title": [{ "plain_text": "김철수" }] },
                    "차트번호": { "type": "number", "number": 101 },
                }
            }),
            json!({
                "id": "page-2",
                "created_time": "2024-05-03T09:00:00.000Z",
                "last_edited_time": "2024-05-03T09:00:00.000Z",
                "url": "https://notion.so/page-2",
                "properties": {
                    "고객명": { "type": "title", "title": [] },
                    "차트번호": { "type": "number", "number": null },
                    "최종상태": { "type": "status", "status": { "name": "완료" } },
                }
            }),
        ];
        let table = pages_to_table(&pages);
        assert_eq!(
            &table.columns[..4],
            &["page_id", "created_time", "last_edited_time", "url"]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(0, "page_id"),
            Some(&CellValue::String("page-1".to_string()))
        );
        assert_eq!(
            table.get(0, "차트번호"),
            Some(&CellValue::Int(101))
        );
        // Property absent from the first page, present on the second
        assert_eq!(table.get(0, "최종상태"), Some(&CellValue::Null));
        assert_eq!(
            table.get(1, "최종상태"),
            Some(&CellValue::String("완료".to_string()))
        );
    }
}
