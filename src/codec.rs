//! Encoding of a whole collection into the bytes stored in one slot.

use crate::error::{Result, StoreError};
use crate::types::Record;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// On-disk encoding of a collection.
///
/// Both encodings hold the same logical layout: an array of records, each a
/// map of named fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    Json,
    MessagePack,
}

impl Encoding {
    /// File extension used by file-backed slots.
    pub fn extension(self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::MessagePack => "msgpack",
        }
    }

    /// Encode a collection.
    pub fn encode<T: Serialize>(self, records: &[Record<T>]) -> Result<Vec<u8>> {
        match self {
            Encoding::Json => {
                serde_json::to_vec(records).map_err(|e| StoreError::Serialization(e.to_string()))
            }
            Encoding::MessagePack => Ok(rmp_serde::to_vec_named(records)?),
        }
    }

    /// Decode a collection. Empty input decodes to an empty collection.
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<Vec<Record<T>>> {
        if bytes.is_empty()
            || (self == Encoding::Json && bytes.iter().all(u8::is_ascii_whitespace))
        {
            return Ok(Vec::new());
        }
        match self {
            Encoding::Json => Ok(serde_json::from_slice(bytes)?),
            Encoding::MessagePack => Ok(rmp_serde::from_slice(bytes)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordId;
    use chrono::Utc;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        name: String,
        tags: Vec<String>,
    }

    fn sample() -> Vec<Record<Item>> {
        vec![
            Record {
                id: RecordId::new(),
                created_at: Utc::now(),
                updated_at: None,
                fields: Item {
                    name: "first".into(),
                    tags: vec![],
                },
            },
            Record {
                id: RecordId::new(),
                created_at: Utc::now(),
                updated_at: Some(Utc::now()),
                fields: Item {
                    name: "second".into(),
                    tags: vec!["a".into(), "b".into()],
                },
            },
        ]
    }

    #[test]
    fn test_json_is_array_of_objects() {
        let bytes = Encoding::Json.encode(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[1]["fields"]["name"], "second");
    }

    #[test]
    fn test_messagepack_roundtrip() {
        let records = sample();
        let bytes = Encoding::MessagePack.encode(&records).unwrap();
        let decoded: Vec<Record<Item>> = Encoding::MessagePack.decode(&bytes).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn test_blank_input_is_empty_collection() {
        let decoded: Vec<Record<Item>> = Encoding::Json.decode(b"  \n").unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_malformed_input_is_deserialization_error() {
        let result: Result<Vec<Record<Item>>> = Encoding::Json.decode(b"[{\"id\": 3}]");
        assert!(matches!(result, Err(StoreError::Deserialization(_))));
    }
}
