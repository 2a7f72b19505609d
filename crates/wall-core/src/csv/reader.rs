//! Forgiving CSV reader for order files.
//!
//! The first line is always treated as a header and discarded without looking
//! at it.  Every following line is split into fields with a minimal quoting
//! scheme and mapped positionally onto an [`OrderRecord`]:
//!
//! | Index | Field           | On bad input            |
//! |-------|-----------------|-------------------------|
//! | 0     | `order_id`      | –                       |
//! | 1     | `product_name`  | –                       |
//! | 2     | `code`          | –                       |
//! | 3     | `quantity`      | defaults to `1`         |
//! | 4     | `customer_name` | –                       |
//! | 5     | `order_date`    | defaults to current time|
//!
//! Lines with fewer than six fields are skipped.  Nothing in this module
//! fails on malformed content; only genuine I/O problems are reported.
//!
//! # Quoting (for beginners)
//!
//! A `"` flips an "inside quotes" flag and is itself dropped.  While inside
//! quotes a comma is ordinary text, so `"苹果, 红"` becomes one field
//! `苹果, 红`.  There is no escape for a literal quote: `""` flips the flag
//! twice and contributes nothing.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::debug;

use crate::domain::order::OrderRecord;

/// Minimum number of fields a data line needs to become an order.
pub const MIN_FIELDS: usize = 6;

/// Date-time layouts tried, in order, after RFC 3339.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Date-only layouts; these resolve to midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Error type for order file reading.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The file exists but could not be read, or could not be written.
    #[error("I/O error accessing order file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads all orders from the file at `path`.
///
/// A file that does not exist yields an empty list, as does a file holding
/// only a header line.  Bytes that are not valid UTF-8 are replaced rather
/// than rejected.
///
/// # Errors
///
/// Returns [`CsvError::Io`] for file-system errors other than "not found".
pub fn read_orders_from_path(path: impl AsRef<Path>) -> Result<Vec<OrderRecord>, CsvError> {
    let path = path.as_ref();
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "order file not found, nothing to import");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(CsvError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    Ok(parse_orders(&String::from_utf8_lossy(&bytes)))
}

/// Parses order file text into records, skipping the header line.
pub fn parse_orders(text: &str) -> Vec<OrderRecord> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut orders = Vec::new();
    for (index, line) in split_lines(text).into_iter().enumerate().skip(1) {
        let fields = split_fields(line);
        if fields.len() < MIN_FIELDS {
            debug!(
                line = index + 1,
                fields = fields.len(),
                "skipping order line with too few fields"
            );
            continue;
        }
        orders.push(order_from_fields(fields));
    }
    orders
}

/// Splits one line into trimmed fields.
///
/// A line with N commas outside quotes always yields N + 1 fields, including
/// empty trailing ones.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    fields.push(current.trim().to_string());
    fields
}

/// Splits text on `\r\n`, `\n` or a lone `\r`.
///
/// A terminator at the very end does not produce an extra empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    // Terminators are ASCII, so every cut lands on a char boundary.
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn order_from_fields(mut fields: Vec<String>) -> OrderRecord {
    let quantity = parse_quantity(&fields[3]);
    let order_date =
        parse_order_date(&fields[5]).unwrap_or_else(|| Local::now().naive_local());

    OrderRecord {
        order_id: std::mem::take(&mut fields[0]),
        product_name: std::mem::take(&mut fields[1]),
        code: std::mem::take(&mut fields[2]),
        quantity,
        customer_name: std::mem::take(&mut fields[4]),
        order_date,
    }
}

fn parse_quantity(value: &str) -> i32 {
    value.parse().unwrap_or(1)
}

/// Parses the date column; `None` when no supported layout matches.
fn parse_order_date(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "订单编号,产品名称,二维码,数量,客户姓名,订单日期";

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    // ── split_fields ──────────────────────────────────────────────────────────

    #[test]
    fn test_split_fields_plain_line() {
        assert_eq!(
            split_fields("ORD001,苹果种子,QR001,10,张三,2024-01-15"),
            ["ORD001", "苹果种子", "QR001", "10", "张三", "2024-01-15"]
        );
    }

    #[test]
    fn test_split_fields_keeps_comma_inside_quotes() {
        let fields = split_fields(r#"ORD999,"苹果, 红",QR999,5,Tom,2024-02-01"#);
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[1], "苹果, 红");
    }

    #[test]
    fn test_split_fields_trims_whitespace_around_fields() {
        assert_eq!(split_fields("  a ,\tb\t, c"), ["a", "b", "c"]);
    }

    #[test]
    fn test_split_fields_trims_after_unquoting() {
        assert_eq!(split_fields(r#"" padded ",x"#), ["padded", "x"]);
    }

    #[test]
    fn test_split_fields_trailing_commas_yield_empty_fields() {
        assert_eq!(split_fields("a,b,,"), ["a", "b", "", ""]);
    }

    #[test]
    fn test_split_fields_empty_line_is_single_empty_field() {
        assert_eq!(split_fields(""), [""]);
    }

    #[test]
    fn test_split_fields_doubled_quote_contributes_nothing() {
        assert_eq!(split_fields(r#"say ""hi"",x"#), ["say hi", "x"]);
    }

    #[test]
    fn test_split_fields_unterminated_quote_swallows_rest_of_line() {
        assert_eq!(split_fields(r#"a,"b,c,d"#), ["a", "b,c,d"]);
    }

    // ── split_lines ───────────────────────────────────────────────────────────

    #[test]
    fn test_split_lines_handles_all_terminators() {
        assert_eq!(split_lines("a\r\nb\nc\rd"), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_lines_trailing_terminator_adds_no_line() {
        assert_eq!(split_lines("a\nb\n"), ["a", "b"]);
        assert_eq!(split_lines("a\r\n"), ["a"]);
    }

    #[test]
    fn test_split_lines_keeps_blank_lines_in_the_middle() {
        assert_eq!(split_lines("a\n\nb"), ["a", "", "b"]);
    }

    // ── parse_orders ──────────────────────────────────────────────────────────

    #[test]
    fn test_parse_orders_maps_fields_positionally() {
        let text = format!("{HEADER}\nORD001,苹果种子,QR001,10,张三,2024-01-15");

        let orders = parse_orders(&text);

        assert_eq!(orders.len(), 1);
        let o = &orders[0];
        assert_eq!(o.order_id, "ORD001");
        assert_eq!(o.product_name, "苹果种子");
        assert_eq!(o.code, "QR001");
        assert_eq!(o.quantity, 10);
        assert_eq!(o.customer_name, "张三");
        assert_eq!(o.order_date, midnight(2024, 1, 15));
    }

    #[test]
    fn test_parse_orders_discards_first_line_even_if_it_looks_like_data() {
        let text = "ORD000,x,QR000,1,y,2024-01-01\nORD001,x,QR001,1,y,2024-01-01";
        let orders = parse_orders(text);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_id, "ORD001");
    }

    #[test]
    fn test_parse_orders_header_only_is_empty() {
        assert!(parse_orders(HEADER).is_empty());
        assert!(parse_orders(&format!("{HEADER}\n")).is_empty());
    }

    #[test]
    fn test_parse_orders_empty_text_is_empty() {
        assert!(parse_orders("").is_empty());
    }

    #[test]
    fn test_parse_orders_skips_short_lines() {
        let text = format!("{HEADER}\nORD001,a,QR001,1,b\n\nORD002,a,QR002,1,b,2024-01-02");
        let orders = parse_orders(&text);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_id, "ORD002");
    }

    #[test]
    fn test_parse_orders_ignores_extra_fields() {
        let text = format!("{HEADER}\nORD001,a,QR001,3,b,2024-01-02,extra,more");
        let orders = parse_orders(&text);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].quantity, 3);
    }

    #[test]
    fn test_parse_orders_bad_quantity_defaults_to_one() {
        let text = format!("{HEADER}\nORD001,a,QR001,abc,b,2024-01-02");
        assert_eq!(parse_orders(&text)[0].quantity, 1);
    }

    #[test]
    fn test_parse_orders_negative_quantity_is_kept() {
        let text = format!("{HEADER}\nORD001,a,QR001,-4,b,2024-01-02");
        assert_eq!(parse_orders(&text)[0].quantity, -4);
    }

    #[test]
    fn test_parse_orders_bad_date_defaults_to_now() {
        let before = Local::now().naive_local();
        let text = format!("{HEADER}\nORD001,a,QR001,1,b,not-a-date");

        let orders = parse_orders(&text);

        let after = Local::now().naive_local();
        assert!(orders[0].order_date >= before && orders[0].order_date <= after);
    }

    #[test]
    fn test_parse_orders_strips_byte_order_mark() {
        let text = format!("\u{feff}{HEADER}\r\nORD001,a,QR001,1,b,2024-01-02\r\n");
        let orders = parse_orders(&text);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_id, "ORD001");
    }

    #[test]
    fn test_parse_orders_tolerates_duplicate_ids_and_codes() {
        let text = format!("{HEADER}\nORD001,a,QR001,1,b,2024-01-02\nORD001,a,QR001,2,b,2024-01-02");
        assert_eq!(parse_orders(&text).len(), 2);
    }

    // ── parse_order_date ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_order_date_accepts_supported_layouts() {
        let at = |h, mi, s| {
            NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(h, mi, s)
                .unwrap()
        };
        assert_eq!(parse_order_date("2024-01-15"), Some(at(0, 0, 0)));
        assert_eq!(parse_order_date("2024/01/15"), Some(at(0, 0, 0)));
        assert_eq!(parse_order_date("2024.01.15"), Some(at(0, 0, 0)));
        assert_eq!(parse_order_date("2024-01-15 08:30:05"), Some(at(8, 30, 5)));
        assert_eq!(parse_order_date("2024-01-15 08:30"), Some(at(8, 30, 0)));
        assert_eq!(parse_order_date("2024-01-15T08:30:05"), Some(at(8, 30, 5)));
        assert_eq!(parse_order_date("2024/1/15 8:30:05"), Some(at(8, 30, 5)));
        assert_eq!(
            parse_order_date("2024-01-15T08:30:05+08:00"),
            Some(at(8, 30, 5))
        );
    }

    #[test]
    fn test_parse_order_date_rejects_garbage() {
        assert_eq!(parse_order_date(""), None);
        assert_eq!(parse_order_date("yesterday"), None);
        assert_eq!(parse_order_date("2024-13-45"), None);
    }

    // ── read_orders_from_path ─────────────────────────────────────────────────

    #[test]
    fn test_read_orders_missing_file_is_empty_not_error() {
        let path = std::env::temp_dir().join("planting_wall_missing_dir/none.csv");
        let orders = read_orders_from_path(&path).expect("missing file is not an error");
        assert!(orders.is_empty());
    }

    #[test]
    fn test_read_orders_directory_path_is_io_error() {
        let result = read_orders_from_path(std::env::temp_dir());
        assert!(matches!(result, Err(CsvError::Io { .. })));
    }
}
