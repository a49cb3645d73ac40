//! Bound engine value → typed remote predicate value
//!
//! The target column's declared type decides the mapping, not the bound
//! value's own type: the integer 1 is `Bool(true)` for a bool column and
//! `Int(1)` for an int column.
//!
//! | declared type        | rule                                      |
//! |----------------------|-------------------------------------------|
//! | ipaddr, inet         | parse IP literal, error on failure        |
//! | cidr                 | parse `addr/prefix`, error on failure     |
//! | ltree                | text passed through                       |
//! | json                 | text passed through as the JSON payload   |
//! | datetime, timestamp  | canonical timestamp, error on failure     |
//! | bool                 | integer: nonzero is true                  |
//! | anything else        | by the bound value's own representation   |
//!
//! NULL maps to `RemoteValue::Null` for every declared type.

use std::net::IpAddr;

use super::errors::{ValueError, ValueResult};
use super::types::{parse_timestamp, RemoteValue, SqlValue};
use crate::schema::ColumnType;

/// Maps bound values by declared column type
pub struct QualValueMapper;

impl QualValueMapper {
    pub fn map(raw: &SqlValue, column_type: ColumnType) -> ValueResult<RemoteValue> {
        if raw.is_null() {
            return Ok(RemoteValue::Null);
        }

        match column_type {
            ColumnType::IpAddr | ColumnType::Inet => {
                let text = Self::require_text(raw, column_type)?;
                text.trim()
                    .parse::<IpAddr>()
                    .map(RemoteValue::IpAddr)
                    .map_err(|e| ValueError::conversion(column_type, raw.to_string(), e.to_string()))
            }
            ColumnType::Cidr => {
                let text = Self::require_text(raw, column_type)?;
                parse_cidr(text)
                    .map(|()| RemoteValue::Cidr(text.trim().to_string()))
                    .map_err(|reason| ValueError::conversion(column_type, raw.to_string(), reason))
            }
            ColumnType::Ltree => Ok(RemoteValue::Ltree(
                Self::require_text(raw, column_type)?.to_string(),
            )),
            ColumnType::Json => Ok(RemoteValue::Json(
                Self::require_text(raw, column_type)?.to_string(),
            )),
            ColumnType::Datetime | ColumnType::Timestamp => {
                let text = Self::require_text(raw, column_type)?;
                parse_timestamp(text)
                    .map(RemoteValue::Timestamp)
                    .map_err(|e| ValueError::conversion(column_type, raw.to_string(), e.to_string()))
            }
            ColumnType::Bool => match raw {
                SqlValue::Integer(v) => Ok(RemoteValue::Bool(*v != 0)),
                other => Self::passthrough(other, column_type),
            },
            ColumnType::Int | ColumnType::Double | ColumnType::String => {
                Self::passthrough(raw, column_type)
            }
        }
    }

    fn passthrough(raw: &SqlValue, column_type: ColumnType) -> ValueResult<RemoteValue> {
        match raw {
            SqlValue::Null => Ok(RemoteValue::Null),
            SqlValue::Integer(v) => Ok(RemoteValue::Int(*v)),
            SqlValue::Float(v) => Ok(RemoteValue::Double(*v)),
            SqlValue::Text(s) => Ok(RemoteValue::String(s.clone())),
            SqlValue::Blob(_) => raw
                .as_text()
                .map(|s| RemoteValue::String(s.to_string()))
                .ok_or_else(|| {
                    ValueError::conversion(column_type, raw.to_string(), "blob is not valid UTF-8")
                }),
        }
    }

    fn require_text(raw: &SqlValue, column_type: ColumnType) -> ValueResult<&str> {
        raw.as_text().ok_or_else(|| {
            ValueError::conversion(
                column_type,
                raw.to_string(),
                format!("expected TEXT, got {}", raw.type_name()),
            )
        })
    }
}

/// Validates `address/prefix`; the prefix must fit the address family
fn parse_cidr(raw: &str) -> Result<(), String> {
    let (addr, prefix) = raw
        .trim()
        .split_once('/')
        .ok_or_else(|| "missing '/prefix'".to_string())?;
    let addr = addr.parse::<IpAddr>().map_err(|e| e.to_string())?;
    let prefix = prefix
        .parse::<u8>()
        .map_err(|_| format!("invalid prefix length '{}'", prefix))?;
    let max = if addr.is_ipv4() { 32 } else { 128 };
    if prefix > max {
        return Err(format!("prefix length {} exceeds {}", prefix, max));
    }
    Ok(())
}
