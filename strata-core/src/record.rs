use crate::{Query, Result, SqlError};
use serde::{Deserialize, Serialize};

/// Format version of [`QueryRecord`], records written by other versions are rejected.
pub const RECORD_VERSION: u32 = 1;

/// Serialized form of a query, used as cache key material and in logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub version: u32,
    pub query: Query,
}

impl Query {
    pub fn to_record(&self) -> QueryRecord {
        QueryRecord {
            version: RECORD_VERSION,
            query: self.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.to_record())
            .map_err(|e| SqlError::InvalidRecord(e.to_string()).into())
    }

    pub fn from_json(json: &str) -> Result<Query> {
        let record: QueryRecord =
            serde_json::from_str(json).map_err(|e| SqlError::InvalidRecord(e.to_string()))?;
        if record.version != RECORD_VERSION {
            return Err(SqlError::InvalidRecord(format!(
                "Version {} is not supported, expected {}",
                record.version, RECORD_VERSION
            ))
            .into());
        }
        Ok(record.query)
    }
}
