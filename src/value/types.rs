//! Value representations on both sides of the bridge
//!
//! - `SqlValue`: what the SQL engine binds (NULL, INTEGER, FLOAT, TEXT, BLOB)
//! - `RemoteValue`: what the plugin speaks, tagged with a semantic type

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Canonical engine timestamp layout (UTC, no zone suffix)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
/// Date-only layout accepted when binding timestamps
pub const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Engine-native value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::Integer(_) => "INTEGER",
            SqlValue::Float(_) => "FLOAT",
            SqlValue::Text(_) => "TEXT",
            SqlValue::Blob(_) => "BLOB",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Text, or a BLOB that is valid UTF-8
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            SqlValue::Blob(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Integer(v) => write!(f, "{}", v),
            SqlValue::Float(v) => write!(f, "{}", v),
            SqlValue::Text(s) => write!(f, "'{}'", s),
            SqlValue::Blob(b) => write!(f, "<blob {} bytes>", b.len()),
        }
    }
}

/// Typed value exchanged with the plugin, both as predicate value and as
/// row cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RemoteValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    /// Raw JSON text
    Json(String),
    Timestamp(DateTime<Utc>),
    IpAddr(IpAddr),
    /// CIDR literal, validated on the way in
    Cidr(String),
    Ltree(String),
}

impl RemoteValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RemoteValue::Null)
    }

    /// Text form used when a value lands in a TEXT column
    pub fn to_text(&self) -> Option<String> {
        match self {
            RemoteValue::Null => None,
            RemoteValue::Bool(b) => Some(b.to_string()),
            RemoteValue::Int(v) => Some(v.to_string()),
            RemoteValue::Double(v) => Some(v.to_string()),
            RemoteValue::String(s)
            | RemoteValue::Json(s)
            | RemoteValue::Cidr(s)
            | RemoteValue::Ltree(s) => Some(s.clone()),
            RemoteValue::Timestamp(ts) => Some(format_timestamp(ts)),
            RemoteValue::IpAddr(ip) => Some(ip.to_string()),
        }
    }
}

/// Parses an engine timestamp: `YYYY-MM-DD HH:MM:SS[.fff]` or `YYYY-MM-DD`,
/// both read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();
    match NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        Ok(naive) => Ok(naive.and_utc()),
        Err(full_err) => match NaiveDate::parse_from_str(raw, DATE_ONLY_FORMAT) {
            Ok(date) => Ok(date.and_time(NaiveTime::default()).and_utc()),
            Err(_) => Err(full_err),
        },
    }
}

/// Formats a timestamp for the engine: milliseconds at most, trailing
/// zeros dropped, no fraction at all on a whole second.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    let base = ts.format("%Y-%m-%d %H:%M:%S").to_string();
    let millis = ts.nanosecond() / 1_000_000 % 1000;
    if millis == 0 {
        return base;
    }
    let fraction = format!("{:03}", millis);
    format!("{}.{}", base, fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_full_timestamp() {
        let ts = parse_timestamp("2023-04-05 06:07:08.123").unwrap();
        assert_eq!(
            ts,
            Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap()
                + chrono::Duration::milliseconds(123)
        );
    }

    #[test]
    fn test_parse_without_fraction() {
        let ts = parse_timestamp("2023-04-05 06:07:08").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap());
    }

    #[test]
    fn test_parse_date_only() {
        let ts = parse_timestamp("2023-04-05").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 4, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2023-04-05T06:07:08+02:00").is_err());
    }

    #[test]
    fn test_format_trims_fraction() {
        let whole = Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap();
        assert_eq!(format_timestamp(&whole), "2023-04-05 06:07:08");
        assert_eq!(
            format_timestamp(&(whole + chrono::Duration::milliseconds(120))),
            "2023-04-05 06:07:08.12"
        );
        assert_eq!(
            format_timestamp(&(whole + chrono::Duration::microseconds(5_999))),
            "2023-04-05 06:07:08.005"
        );
    }

    #[test]
    fn test_remote_value_text() {
        let ip: IpAddr = "10.1.2.3".parse().unwrap();
        assert_eq!(RemoteValue::IpAddr(ip).to_text().unwrap(), "10.1.2.3");
        assert_eq!(RemoteValue::Bool(true).to_text().unwrap(), "true");
        assert_eq!(RemoteValue::Null.to_text(), None);
    }

    #[test]
    fn test_remote_value_serde_tagging() {
        let value = RemoteValue::Cidr("10.0.0.0/8".into());
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["type"], "cidr");
        assert_eq!(json["value"], "10.0.0.0/8");

        let back: RemoteValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_sql_value_text_from_blob() {
        assert_eq!(SqlValue::Blob(b"abc".to_vec()).as_text(), Some("abc"));
        assert_eq!(SqlValue::Blob(vec![0xff, 0xfe]).as_text(), None);
        assert_eq!(SqlValue::Integer(3).as_text(), None);
    }
}
