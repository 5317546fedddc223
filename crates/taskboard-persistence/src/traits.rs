use serde_json::Value;
use taskboard_core::BoardResult;

/// String-keyed store of JSON blobs backing the local mirror.
///
/// Writes are synchronous so they can happen alongside an in-memory
/// mutation, before any remote call is awaited. No transactional
/// guarantees are made across keys.
pub trait CacheStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> BoardResult<Option<Value>>;

    /// Overwrite a value.
    fn set(&self, key: &str, value: Value) -> BoardResult<()>;
}

/// Trait for serialization/deserialization strategies
pub trait Serializer<T: Send + Sync>: Send + Sync {
    /// Serialize data to bytes
    fn serialize(&self, data: &T) -> BoardResult<Vec<u8>>;

    /// Deserialize data from bytes
    fn deserialize(&self, bytes: &[u8]) -> BoardResult<T>;
}
