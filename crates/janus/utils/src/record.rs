//! Conversion of plain JSON records into ordered maps.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::quantity::kind_of;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// Copies every key/value pair of `record` into a new map, in the record's key order.
///
/// `record` must be a JSON object, anything else (`null` included) is an error.
pub fn to_map(record: &Value) -> Result<IndexMap<String, Value>, RecordError> {
    let Value::Object(object) = record else {
        return Err(RecordError::NotAnObject(kind_of(record)));
    };

    let mut map = IndexMap::with_capacity(object.len());
    for (key, value) in object {
        map.insert(key.clone(), value.clone());
    }

    Ok(map)
}

/// Same as [`to_map`], for any value that serializes to a JSON object.
pub fn record_to_map<T: Serialize + ?Sized>(
    record: &T,
) -> Result<IndexMap<String, Value>, RecordError> {
    to_map(&serde_json::to_value(record)?)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn keeps_entries_and_order() {
        let map = to_map(&json!({ "b": 2, "a": 1, "c": { "nested": true } })).unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "a", "c"]);
        assert_eq!(map["a"], json!(1));
        assert_eq!(map["b"], json!(2));
        assert_eq!(map["c"], json!({ "nested": true }));
    }

    #[test]
    fn empty_object_gives_empty_map() {
        assert!(to_map(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn non_objects_are_rejected() {
        assert_matches!(to_map(&json!(null)), Err(RecordError::NotAnObject("null")));
        assert_matches!(to_map(&json!([1, 2])), Err(RecordError::NotAnObject("array")));
        assert_matches!(to_map(&json!("a")), Err(RecordError::NotAnObject("string")));
    }

    #[test]
    fn serializable_structs_are_converted() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Party {
            party_name: String,
            threshold: u32,
        }

        let map = record_to_map(&Party { party_name: "p1".into(), threshold: 2 }).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["partyName", "threshold"]);
        assert_eq!(map["partyName"], json!("p1"));

        assert_matches!(record_to_map(&[1, 2, 3]), Err(RecordError::NotAnObject("array")));
    }
}
