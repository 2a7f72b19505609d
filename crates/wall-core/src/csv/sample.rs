//! The reference order file.
//!
//! Twelve orders, one per slot of the default 3×4 wall.  Written by
//! `wall-station sample` so operators can try the station without real data,
//! and used by the test suites as a known-good fixture.

use std::path::Path;

use super::reader::CsvError;

/// Exact contents of the sample order file (no trailing newline).
pub const SAMPLE_CSV: &str = "订单编号,产品名称,二维码,数量,客户姓名,订单日期
ORD001,苹果种子,QR001,10,张三,2024-01-15
ORD002,橘子种子,QR002,15,李四,2024-01-16
ORD003,梨子种子,QR003,8,王五,2024-01-17
ORD004,葡萄种子,QR004,20,赵六,2024-01-18
ORD005,桃子种子,QR005,12,钱七,2024-01-19
ORD006,香蕉种子,QR006,25,孙八,2024-01-20
ORD007,草莓种子,QR007,30,周九,2024-01-21
ORD008,蓝莓种子,QR008,18,吴十,2024-01-22
ORD009,樱桃种子,QR009,22,郑十一,2024-01-23
ORD010,柠檬种子,QR010,14,陈十二,2024-01-24
ORD011,芒果种子,QR011,16,刘十三,2024-01-25
ORD012,西瓜种子,QR012,28,黄十四,2024-01-26";

/// Writes [`SAMPLE_CSV`] to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`CsvError::Io`] if the file cannot be written.
pub fn write_sample_csv(path: impl AsRef<Path>) -> Result<(), CsvError> {
    let path = path.as_ref();
    std::fs::write(path, SAMPLE_CSV).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })
}
