//! Interpretation of backend response bodies.

use crate::error::FetchError;
use crate::models::{Page, Property};
use crate::normalize::normalize_value;
use serde_json::Value;
use tracing::{debug, warn};

/// Turn a decoded listing body into a page.
///
/// A bare array is the whole result set, an object with `properties` is a
/// paginated envelope, anything else is an empty result.
pub fn interpret_listing(body: &Value) -> Page<Property> {
    if let Value::Array(items) = body {
        debug!("Listing response is a bare array of {} items", items.len());
        return Page::from_all(normalize_all(items));
    }

    if let Some(Value::Array(items)) = body.get("properties") {
        let properties = normalize_all(items);
        let defaults = Page::<Property>::empty();

        return Page {
            total_count: meta_count(body, "totalCount").unwrap_or(properties.len() as u64),
            page: meta_u32(body, "page").unwrap_or(defaults.page),
            page_size: meta_u32(body, "pageSize").unwrap_or(defaults.page_size),
            total_pages: meta_u32(body, "totalPages").unwrap_or(defaults.total_pages),
            has_next_page: meta_bool(body, "hasNextPage").unwrap_or(defaults.has_next_page),
            has_previous_page: meta_bool(body, "hasPreviousPage")
                .unwrap_or(defaults.has_previous_page),
            properties,
        };
    }

    warn!("Listing response has no recognizable properties, treating as empty");
    Page::empty()
}

/// Detail body: either the raw record or a `{ success, data, message }` envelope
pub fn interpret_single(body: &Value) -> Result<Property, FetchError> {
    let is_envelope = body.get("success").is_some() || body.get("data").is_some();

    let record = if is_envelope {
        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = envelope_message(body)
                .unwrap_or_else(|| "Request was not successful".to_string());
            return Err(FetchError::Rejected(message));
        }
        match body.get("data") {
            Some(data) if !data.is_null() => data,
            _ => return Err(FetchError::Rejected("Response contained no property".to_string())),
        }
    } else {
        body
    };

    normalize_value(record).map_err(|e| FetchError::Parse {
        message: e.to_string(),
    })
}

/// Message for a non-2xx response: envelope `message`, then `error`, then the status line
pub fn error_message(status: u16, reason: Option<&str>, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| envelope_message(&value))
        .unwrap_or_else(|| format!("Error {}: {}", status, reason.unwrap_or("Unknown Status")))
}

/// Pagination fields are read one by one so a bad field only loses itself.
/// Whole numbers may arrive as integers, integral floats or numeric strings.
fn meta_count(body: &Value, key: &str) -> Option<u64> {
    let value = body.get(key)?;
    let count = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    if count.is_none() {
        warn!("Ignoring malformed pagination field {}: {}", key, value);
    }
    count
}

fn meta_u32(body: &Value, key: &str) -> Option<u32> {
    meta_count(body, key).and_then(|n| u32::try_from(n).ok())
}

fn meta_bool(body: &Value, key: &str) -> Option<bool> {
    let value = body.get(key)?;
    let flag = value.as_bool();
    if flag.is_none() {
        warn!("Ignoring malformed pagination field {}: {}", key, value);
    }
    flag
}

fn envelope_message(body: &Value) -> Option<String> {
    ["message", "error"].iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn normalize_all(items: &[Value]) -> Vec<Property> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match normalize_value(item) {
            Ok(property) => Some(property),
            Err(e) => {
                warn!("Skipping record {}: {}", index, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str) -> Value {
        json!({
            "id": id,
            "name": format!("Test Property {}", id),
            "address": "Test Address",
            "price": 300000000,
            "images": [],
            "owner": { "name": "Test Owner", "photo": "", "phone": "+57 300 123 4567", "email": "test@example.com" },
            "traces": []
        })
    }

    #[test]
    fn test_bare_array_is_single_page() {
        let page = interpret_listing(&json!([record("1"), record("2"), record("3")]));
        assert_eq!(page.properties.len(), 3);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 3);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next_page);
        assert!(!page.has_previous_page);
    }

    #[test]
    fn test_envelope_metadata_used_as_is() {
        let page = interpret_listing(&json!({
            "properties": [record("1"), record("2")],
            "totalCount": 42,
            "page": 2,
            "pageSize": 2,
            "totalPages": 21,
            "hasNextPage": true,
            "hasPreviousPage": true
        }));
        assert_eq!(page.properties[1].id, "2");
        assert_eq!(page.total_count, 42);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 2);
        assert_eq!(page.total_pages, 21);
        assert!(page.has_next_page && page.has_previous_page);
    }

    #[test]
    fn test_envelope_missing_metadata_takes_defaults() {
        let page = interpret_listing(&json!({ "properties": [record("1")] }));
        assert_eq!(page.total_count, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 10);
    }

    #[test]
    fn test_bad_metadata_field_does_not_drop_the_others() {
        let page = interpret_listing(&json!({
            "properties": [record("1")],
            "totalCount": 42,
            "page": "two",
            "pageSize": 5,
            "totalPages": 9,
            "hasNextPage": true,
            "hasPreviousPage": "yes"
        }));
        assert_eq!(page.total_count, 42);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 5);
        assert_eq!(page.total_pages, 9);
        assert!(page.has_next_page);
        assert!(!page.has_previous_page);
    }

    #[test]
    fn test_lenient_metadata_numbers() {
        let page = interpret_listing(&json!({
            "properties": [record("1")],
            "totalCount": 42.0,
            "page": "2",
            "pageSize": -5
        }));
        assert_eq!(page.total_count, 42);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 10);
    }

    #[test]
    fn test_unrecognized_body_is_empty() {
        for body in [json!({ "items": [record("1")] }), json!(null), json!("ok"), json!({ "properties": "x" })] {
            assert_eq!(interpret_listing(&body), Page::empty());
        }
    }

    #[test]
    fn test_invalid_records_are_skipped() {
        let page = interpret_listing(&json!([record("1"), { "city": "Cali" }, 7]));
        assert_eq!(page.properties.len(), 1);
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn test_error_message_preference() {
        assert_eq!(error_message(404, Some("Not Found"), r#"{"message":"Not Found"}"#), "Not Found");
        assert_eq!(
            error_message(400, Some("Bad Request"), r#"{"error":"minPrice is invalid"}"#),
            "minPrice is invalid"
        );
        assert_eq!(
            error_message(400, Some("Bad Request"), r#"{"message":"first","error":"second"}"#),
            "first"
        );
        assert_eq!(error_message(502, Some("Bad Gateway"), "<html>"), "Error 502: Bad Gateway");
    }

    #[test]
    fn test_single_property_envelopes() {
        let wrapped = interpret_single(&json!({ "success": true, "data": record("1") })).unwrap();
        assert_eq!(wrapped.id, "1");

        let bare = interpret_single(&record("2")).unwrap();
        assert_eq!(bare.name, "Test Property 2");

        let rejected = interpret_single(&json!({ "success": false, "message": "Propiedad no encontrada" }));
        assert_eq!(rejected, Err(FetchError::Rejected("Propiedad no encontrada".to_string())));

        assert!(interpret_single(&json!({ "success": true })).is_err());
    }
}
