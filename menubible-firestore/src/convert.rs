use menubible_core::{COLLECTION, ItemFilter, ItemId, ItemRecord};
use serde_json::{Map, Number, Value, json};
use tracing::warn;

use crate::error::FirestoreError;

const TIMESTAMP_FIELDS: &[&str] = &["createdAt", "updatedAt"];
const NUMBER_FIELDS: &[&str] = &["price", "priceGlass", "priceBottle"];

/// Converts a plain JSON value to a Firestore typed value.
fn encode_value(key: &str, value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n }),
        },
        Value::String(s) if TIMESTAMP_FIELDS.contains(&key) => json!({ "timestampValue": s }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(|v| encode_value(key, v)).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), encode_value(k, v)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

/// Converts a Firestore typed value back to plain JSON.
fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };
    match kind.as_str() {
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            other => other.clone(),
        },
        "doubleValue" => match inner {
            Value::String(s) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            other => other.clone(),
        },
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(|v| v.as_array())
                .map(|vs| vs.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(decode_fields(inner.get("fields"))),
        "nullValue" => Value::Null,
        // stringValue, booleanValue, timestampValue, referenceValue, bytesValue
        _ => inner.clone(),
    }
}

fn decode_fields(fields: Option<&Value>) -> Map<String, Value> {
    fields
        .and_then(|f| f.as_object())
        .map(|f| f.iter().map(|(k, v)| (k.clone(), decode_value(v))).collect())
        .unwrap_or_default()
}

/// Legacy records hold prices as numeric strings.
fn coerce_number(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        _ => None,
    }
}

/// Encodes a record as a Firestore `fields` object. Absent fields are left out.
pub fn encode_fields(record: &ItemRecord) -> Result<Value, FirestoreError> {
    let plain = serde_json::to_value(record)?;
    let Value::Object(map) = plain else {
        return Err(FirestoreError::Decode("record did not serialize to an object".to_string()));
    };
    let fields: Map<String, Value> = map
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), encode_value(k, v)))
        .collect();
    Ok(Value::Object(fields))
}

/// Field paths written by an update. `createdAt` is never in the mask.
pub fn update_mask(fields: &Value) -> Vec<String> {
    fields
        .as_object()
        .map(|f| f.keys().filter(|k| *k != "createdAt").cloned().collect())
        .unwrap_or_default()
}

/// Last path segment of a document name.
pub fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Decodes one document resource into its id and stored record.
pub fn decode_document(doc: &Value) -> Result<(ItemId, ItemRecord), FirestoreError> {
    let name = doc
        .get("name")
        .and_then(|n| n.as_str())
        .ok_or_else(|| FirestoreError::Decode("document has no name".to_string()))?;

    let mut fields = decode_fields(doc.get("fields"));
    for key in NUMBER_FIELDS {
        if let Some(value) = fields.get(*key) {
            match coerce_number(value) {
                Some(n) => fields.insert(key.to_string(), n),
                None => fields.remove(*key),
            };
        }
    }

    let record: ItemRecord = serde_json::from_value(Value::Object(fields))?;
    Ok((document_id(name).to_string(), record))
}

/// Decodes a document from a listing. Undecodable documents are logged and skipped.
fn decode_listed(doc: &Value) -> Option<(ItemId, ItemRecord)> {
    match decode_document(doc) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            let name = doc.get("name").and_then(|n| n.as_str()).unwrap_or("<unnamed>");
            warn!(document = name, "Skipping undecodable document: {e}");
            None
        }
    }
}

/// Parses a `documents.list` page into records and the next page token.
pub fn parse_list_page(body: &Value) -> (Vec<(ItemId, ItemRecord)>, Option<String>) {
    let docs = body
        .get("documents")
        .and_then(|d| d.as_array())
        .map(|docs| docs.iter().filter_map(decode_listed).collect())
        .unwrap_or_default();

    let next = body
        .get("nextPageToken")
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .map(String::from);

    (docs, next)
}

/// Parses a `runQuery` response. Entries without a document are progress markers.
pub fn parse_query_response(body: &Value) -> Result<Vec<(ItemId, ItemRecord)>, FirestoreError> {
    let entries = body
        .as_array()
        .ok_or_else(|| FirestoreError::Decode("runQuery response is not an array".to_string()))?;

    Ok(entries
        .iter()
        .filter_map(|entry| entry.get("document"))
        .filter_map(decode_listed)
        .collect())
}

/// Builds a `runQuery` body for a filtered listing.
pub fn build_query(filter: &ItemFilter, limit: Option<usize>) -> Value {
    let mut query = json!({
        "from": [{ "collectionId": COLLECTION }]
    });

    let condition = match filter {
        ItemFilter::All => None,
        ItemFilter::SubCategory(name) => Some(("EQUAL", json!({ "stringValue": name }))),
        ItemFilter::SubCategoryIn(set) => {
            let values: Vec<Value> = set.values().iter().map(|n| json!({ "stringValue": n })).collect();
            Some(("IN", json!({ "arrayValue": { "values": values } })))
        }
    };

    if let Some((op, value)) = condition {
        query["where"] = json!({
            "fieldFilter": {
                "field": { "fieldPath": "subCategory" },
                "op": op,
                "value": value
            }
        });
    }

    if let Some(limit) = limit {
        query["limit"] = json!(limit);
    }

    json!({ "structuredQuery": query })
}

#[cfg(test)]
mod tests {
    use super::*;
    use menubible_core::ItemPayload;

    fn payload() -> ItemPayload {
        ItemPayload {
            name: "House Red".to_string(),
            price: 0.0,
            price_glass: 45.5,
            price_bottle: 180.0,
            description: "Easy drinking".to_string(),
            ingredients: String::new(),
            method: String::new(),
            trivia: String::new(),
            allergens: "Sulphites".to_string(),
            sub_category: "Wines".to_string(),
            types: vec!["Housepouring".to_string(), "Red".to_string()],
            body: None,
            image: String::new(),
        }
    }

    #[test]
    fn test_encode_fields_types() {
        let now = chrono::Utc::now();
        let record = ItemRecord::from_payload(&payload(), None, now);
        let fields = encode_fields(&record).unwrap();

        assert_eq!(fields["name"], json!({ "stringValue": "House Red" }));
        assert_eq!(fields["priceGlass"], json!({ "doubleValue": 45.5 }));
        assert_eq!(fields["type"], json!({ "stringValue": "Housepouring" }));
        assert_eq!(
            fields["types"]["arrayValue"]["values"][1],
            json!({ "stringValue": "Red" })
        );
        assert!(fields["updatedAt"].get("timestampValue").is_some());
        assert!(fields.get("createdAt").is_none());
    }

    #[test]
    fn test_update_mask_skips_created_at() {
        let now = chrono::Utc::now();
        let record = ItemRecord::from_payload(&payload(), Some(now), now);
        let fields = encode_fields(&record).unwrap();
        let mask = update_mask(&fields);
        assert!(mask.contains(&"updatedAt".to_string()));
        assert!(mask.contains(&"type".to_string()));
        assert!(!mask.contains(&"createdAt".to_string()));
    }

    #[test]
    fn test_decode_legacy_document() {
        let doc = json!({
            "name": "projects/p/databases/(default)/documents/menu-items/abc123",
            "fields": {
                "name": { "stringValue": "Old Merlot" },
                "price": { "stringValue": "95" },
                "priceGlass": { "integerValue": "30" },
                "type": { "stringValue": "Red" },
                "subCategory": { "stringValue": "Wines" },
                "body": { "stringValue": "" },
                "createdAt": { "timestampValue": "2024-02-14T18:30:00.123456Z" }
            }
        });

        let (id, record) = decode_document(&doc).unwrap();
        assert_eq!(id, "abc123");
        assert_eq!(record.price, Some(95.0));
        assert_eq!(record.price_glass, Some(30.0));

        let item = record.into_item(id);
        assert_eq!(item.types, vec!["Red".to_string()]);
        assert_eq!(item.body, None);
        assert!(item.created_at.is_some());
    }

    #[test]
    fn test_decode_bad_number_is_dropped() {
        let doc = json!({
            "name": "x/menu-items/a",
            "fields": { "price": { "stringValue": "market price" } }
        });
        let (_, record) = decode_document(&doc).unwrap();
        assert_eq!(record.price, None);
    }

    #[test]
    fn test_decode_without_name_fails() {
        let doc = json!({ "fields": {} });
        assert!(matches!(decode_document(&doc), Err(FirestoreError::Decode(_))));
    }

    #[test]
    fn test_build_query_in_filter() {
        let filter = ItemFilter::sub_category_in(["Sushi", "Starters"]).unwrap();
        let body = build_query(&filter, Some(10));
        let query = &body["structuredQuery"];

        assert_eq!(query["from"][0]["collectionId"], "menu-items");
        assert_eq!(query["where"]["fieldFilter"]["op"], "IN");
        assert_eq!(
            query["where"]["fieldFilter"]["value"]["arrayValue"]["values"][1],
            json!({ "stringValue": "Starters" })
        );
        assert_eq!(query["limit"], 10);
    }

    #[test]
    fn test_build_query_equal_without_limit() {
        let body = build_query(&ItemFilter::sub_category("Mains"), None);
        let query = &body["structuredQuery"];
        assert_eq!(query["where"]["fieldFilter"]["op"], "EQUAL");
        assert!(query.get("limit").is_none());
    }

    #[test]
    fn test_parse_query_response_skips_markers() {
        let body = json!([
            { "readTime": "2024-01-01T00:00:00Z" },
            { "document": { "name": "a/menu-items/one", "fields": { "name": { "stringValue": "One" } } } }
        ]);
        let docs = parse_query_response(&body).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].0, "one");
    }

    #[test]
    fn test_parse_list_page() {
        let body = json!({
            "documents": [
                { "name": "a/menu-items/one", "fields": {} },
                { "name": "a/menu-items/two", "fields": {} }
            ],
            "nextPageToken": "tok"
        });
        let (docs, next) = parse_list_page(&body);
        assert_eq!(docs.len(), 2);
        assert_eq!(next.as_deref(), Some("tok"));

        let (docs, next) = parse_list_page(&json!({}));
        assert!(docs.is_empty());
        assert!(next.is_none());
    }

    #[test]
    fn test_undecodable_documents_are_skipped() {
        let bad_types = json!({
            "name": "a/menu-items/bad",
            "fields": { "types": { "arrayValue": { "values": [{ "integerValue": "5" }] } } }
        });
        let good = json!({ "name": "a/menu-items/good", "fields": { "name": { "stringValue": "Good" } } });

        let (docs, _) = parse_list_page(&json!({ "documents": [bad_types.clone(), { "fields": {} }, good.clone()] }));
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].0, "good");

        let docs = parse_query_response(&json!([{ "document": bad_types }, { "document": good }])).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].0, "good");
    }
}
