use crate::traits::Serializer;
use taskboard_core::{BoardError, BoardResult};

/// JSON serializer for cached blobs and local records
pub struct JsonSerializer;

impl<T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync> Serializer<T>
    for JsonSerializer
{
    fn serialize(&self, data: &T) -> BoardResult<Vec<u8>> {
        serde_json::to_vec_pretty(data).map_err(|e| BoardError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> BoardResult<T> {
        serde_json::from_slice(bytes).map_err(|e| BoardError::Serialization(e.to_string()))
    }
}
