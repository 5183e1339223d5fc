//! Price history as supplied by callers.
//!
//! Records arrive as loosely-shaped JSON objects: a `timestamp`, a `price` and
//! any of `open`/`high`/`low`/`volume` under whatever casing the upstream feed
//! used. [`PriceFrame`] is the column view the feature resolver works on.

use crate::domain::errors::HistoryError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One observed data point, kept exactly as the caller sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryRecord(Map<String, Value>);

impl HistoryRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Numeric value of `key`, `None` when the key is absent.
    /// A present but non-numeric value is reported as `Some(None)`.
    pub fn numeric(&self, key: &str) -> Option<Option<f64>> {
        self.0.get(key).map(value_as_f64)
    }

    /// Parsed `timestamp` field, if any.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.0.get("timestamp").and_then(parse_timestamp)
    }
}

impl From<Value> for HistoryRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

/// Lenient numeric cast: numbers, numeric strings and booleans.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, plain dates
/// and unix epochs (seconds, or milliseconds when the value is large enough).
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                return Some(dt.with_timezone(&Utc));
            }
            for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                    return Some(naive.and_utc());
                }
            }
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => {
            let epoch = n.as_i64()?;
            if epoch.abs() > 100_000_000_000 {
                DateTime::from_timestamp_millis(epoch)
            } else {
                DateTime::from_timestamp(epoch, 0)
            }
        }
        _ => None,
    }
}

/// Column-oriented view over a history, in chronological (insertion) order.
///
/// Column names are whitespace-trimmed. When the records carry `price`, the
/// OHLCV columns are derived from it: `Close` mirrors `price`, and
/// `Open`/`High`/`Low` (mirroring `Close`) and `Volume` (zero) are filled in
/// when the feed has no column of that name under any casing.
#[derive(Debug, Clone, Default)]
pub struct PriceFrame {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl PriceFrame {
    pub fn from_records(records: &[HistoryRecord]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            let mut row = Map::new();
            for (key, value) in record.fields() {
                let name = key.trim().to_string();
                if !columns.contains(&name) {
                    columns.push(name.clone());
                }
                row.entry(name).or_insert_with(|| value.clone());
            }
            rows.push(row);
        }

        let mut frame = Self { columns, rows };
        frame.derive_ohlcv_from_price();
        frame
    }

    fn derive_ohlcv_from_price(&mut self) {
        if !self.has_column("price") {
            return;
        }

        self.copy_column("price", "Close");
        for (lookup, target) in [("open", "Open"), ("high", "High"), ("low", "Low")] {
            if !self.has_column_ignore_case(lookup) {
                self.copy_column("Close", target);
            }
        }
        if !self.has_column_ignore_case("volume") {
            self.ensure_column("Volume");
            for row in &mut self.rows {
                row.insert("Volume".to_string(), Value::from(0));
            }
        }
    }

    fn copy_column(&mut self, from: &str, to: &str) {
        self.ensure_column(to);
        for row in &mut self.rows {
            match row.get(from).cloned() {
                Some(value) => {
                    row.insert(to.to_string(), value);
                }
                None => {
                    row.remove(to);
                }
            }
        }
    }

    fn ensure_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }

    fn has_column_ignore_case(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw cell at `row` (0 = oldest). `None` when the record lacks the column.
    pub fn cell(&self, column: &str, row: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

/// A single timestamped price, used by the indicator-based analyzers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Extracts `(timestamp, price)` pairs and sorts them chronologically.
pub fn sorted_price_series(records: &[HistoryRecord]) -> Result<Vec<PricePoint>, HistoryError> {
    let mut points = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let raw_ts = record
            .get("timestamp")
            .ok_or(HistoryError::MissingField {
                index,
                field: "timestamp",
            })?;
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| HistoryError::InvalidTimestamp {
            index,
            value: raw_ts.to_string(),
        })?;
        let price = match record.numeric("price") {
            Some(Some(price)) => price,
            Some(None) => return Err(HistoryError::InvalidPrice { index }),
            None => {
                return Err(HistoryError::MissingField {
                    index,
                    field: "price",
                });
            }
        };
        points.push(PricePoint { timestamp, price });
    }

    points.sort_by_key(|p| p.timestamp);
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Value) -> Vec<HistoryRecord> {
        serde_json::from_value(values).unwrap()
    }

    #[test]
    fn test_price_feed_derives_ohlcv() {
        let history = records(json!([
            {"timestamp": "2025-01-01", "price": 10.0},
            {"timestamp": "2025-01-02", "price": 11.0},
        ]));
        let frame = PriceFrame::from_records(&history);

        for column in ["Close", "Open", "High", "Low", "Volume"] {
            assert!(frame.has_column(column), "missing {}", column);
        }
        assert_eq!(frame.cell("Close", 1), Some(&json!(11.0)));
        assert_eq!(frame.cell("Open", 0), Some(&json!(10.0)));
        assert_eq!(frame.cell("Volume", 1), Some(&json!(0)));
    }

    #[test]
    fn test_supplied_ohlc_columns_are_kept() {
        let history = records(json!([
            {"timestamp": "2025-01-01", "price": 10.0, "open": 9.5, "volume": 1200},
        ]));
        let frame = PriceFrame::from_records(&history);

        assert_eq!(frame.cell("open", 0), Some(&json!(9.5)));
        assert!(!frame.has_column("Open"));
        assert!(!frame.has_column("Volume"));
        assert_eq!(frame.cell("High", 0), Some(&json!(10.0)));
    }

    #[test]
    fn test_column_names_are_trimmed() {
        let history = records(json!([{" Close ": 14.0}]));
        let frame = PriceFrame::from_records(&history);

        assert_eq!(frame.columns(), &["Close".to_string()]);
        assert!(!frame.has_column("Volume"));
    }

    #[test]
    fn test_value_cast() {
        assert_eq!(value_as_f64(&json!(3)), Some(3.0));
        assert_eq!(value_as_f64(&json!(" 4.5 ")), Some(4.5));
        assert_eq!(value_as_f64(&json!(true)), Some(1.0));
        assert_eq!(value_as_f64(&json!("n/a")), None);
        assert_eq!(value_as_f64(&Value::Null), None);
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp(&json!("2025-12-06T10:00:00Z")).is_some());
        assert!(parse_timestamp(&json!("2025-12-06 10:00:00")).is_some());
        assert!(parse_timestamp(&json!("2025-12-06")).is_some());
        assert!(parse_timestamp(&json!(1_733_480_000)).is_some());
        assert!(parse_timestamp(&json!("yesterday")).is_none());
    }

    #[test]
    fn test_sorted_price_series_orders_by_time() {
        let history = records(json!([
            {"timestamp": "2025-01-03", "price": 3.0},
            {"timestamp": "2025-01-01", "price": 1.0},
            {"timestamp": "2025-01-02", "price": "2.0"},
        ]));
        let series = sorted_price_series(&history).unwrap();
        let prices: Vec<f64> = series.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_sorted_price_series_rejects_missing_price() {
        let history = records(json!([{"timestamp": "2025-01-03"}]));
        let err = sorted_price_series(&history).unwrap_err();
        assert!(matches!(
            err,
            HistoryError::MissingField { index: 0, field: "price" }
        ));
    }
}
