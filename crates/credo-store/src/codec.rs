//! Column encodings shared by the ledger tables

use crate::StoreError;
use credo_domain::{ClaimId, Timestamp};
use rusqlite::types::Type;

/// Convert ClaimId to bytes for storage
pub(crate) fn id_to_bytes(id: ClaimId) -> Vec<u8> {
    id.value().to_be_bytes().to_vec()
}

/// Convert bytes to ClaimId
pub(crate) fn bytes_to_id(bytes: &[u8]) -> Result<ClaimId, StoreError> {
    let arr: [u8; 16] = bytes.try_into().map_err(|_| {
        StoreError::InvalidData(format!("Expected 16 bytes for ClaimId, got {}", bytes.len()))
    })?;
    Ok(ClaimId::from_value(u128::from_be_bytes(arr)))
}

pub(crate) fn ts_to_sql(t: Timestamp) -> Result<i64, StoreError> {
    i64::try_from(t).map_err(|_| StoreError::InvalidData(format!("Timestamp {} out of range", t)))
}

pub(crate) fn ts_from_sql(v: i64) -> Result<Timestamp, StoreError> {
    u64::try_from(v).map_err(|_| StoreError::InvalidData(format!("Negative timestamp {}", v)))
}

/// Wrap a decoding failure so it can surface from a row mapper
pub(crate) fn conversion(column: usize, ty: Type, e: StoreError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, ty, Box::new(e))
}

/// Read a claim id column
pub(crate) fn claim_column(row: &rusqlite::Row<'_>, column: usize) -> rusqlite::Result<ClaimId> {
    let bytes: Vec<u8> = row.get(column)?;
    bytes_to_id(&bytes).map_err(|e| conversion(column, Type::Blob, e))
}

/// Read a timestamp column
pub(crate) fn ts_column(row: &rusqlite::Row<'_>, column: usize) -> rusqlite::Result<Timestamp> {
    let v: i64 = row.get(column)?;
    ts_from_sql(v).map_err(|e| conversion(column, Type::Integer, e))
}

/// Read a text column and parse it with `parse`
pub(crate) fn parsed_column<T>(
    row: &rusqlite::Row<'_>,
    column: usize,
    what: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let text: String = row.get(column)?;
    parse(&text).ok_or_else(|| {
        conversion(
            column,
            Type::Text,
            StoreError::InvalidData(format!("Unknown {}: {}", what, text)),
        )
    })
}

/// Read a JSON text column
pub(crate) fn json_column<T: serde::de::DeserializeOwned>(
    row: &rusqlite::Row<'_>,
    column: usize,
) -> rusqlite::Result<T> {
    let text: String = row.get(column)?;
    serde_json::from_str(&text).map_err(|e| conversion(column, Type::Text, e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_bytes() {
        let id = ClaimId::new();
        assert_eq!(bytes_to_id(&id_to_bytes(id)).unwrap(), id);
        assert!(matches!(bytes_to_id(&[1, 2, 3]), Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_timestamp_range() {
        assert_eq!(ts_to_sql(42).unwrap(), 42);
        assert!(ts_to_sql(u64::MAX).is_err());
        assert!(ts_from_sql(-1).is_err());
    }
}
