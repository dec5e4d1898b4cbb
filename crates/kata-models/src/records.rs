//! The completed-record set written to the record database.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every completed kata across all languages.
///
/// The persistence layer treats this as an opaque value: it is serialized
/// whole and never inspected. Object key order is kept as supplied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletedRecordSet(Value);

impl CompletedRecordSet {
    /// Wraps an already-built JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Builds a record set from any serializable caller type.
    pub fn from_serializable<T: Serialize>(records: &T) -> serde_json::Result<Self> {
        serde_json::to_value(records).map(Self)
    }

    /// Converts back into a caller type.
    pub fn to_typed<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.0)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for CompletedRecordSet {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
