//! ImportOrdersUseCase: loads an order file onto the wall.
//!
//! Import has full-replace semantics: whatever was on the wall before is
//! cleared, even when the new file turns out to be missing or empty.  Only a
//! genuine read failure (permissions, path is a directory) leaves the wall
//! untouched.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use wall_core::{read_orders_from_path, CsvError, OrderRecord, Slot, Wall};

/// Error type for the import use case.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("导入失败: {0}")]
    Read(#[from] CsvError),
}

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// The file that was read.
    pub path: PathBuf,
    /// Number of orders placed on the wall.
    pub imported: usize,
    /// Orders per slot, row-major.
    pub slot_counts: Vec<usize>,
}

impl ImportSummary {
    /// Operator-facing confirmation text.
    pub fn message(&self) -> String {
        format!("成功导入 {} 条订单数据!", self.imported)
    }
}

/// Reads the orders in `path` and distributes them over `wall`.
///
/// # Errors
///
/// Returns [`ImportError::Read`] if the file exists but cannot be read; the
/// wall is left as it was.
pub fn import_orders(wall: &mut Wall, path: &Path) -> Result<ImportSummary, ImportError> {
    let orders = load_orders(path)?;
    Ok(place_orders(wall, path, orders))
}

/// Reads the orders in `path` without touching any wall.
///
/// Callers that share the wall behind a lock read first and lock only for
/// [`place_orders`].
///
/// # Errors
///
/// Returns [`ImportError::Read`] if the file exists but cannot be read.
pub fn load_orders(path: &Path) -> Result<Vec<OrderRecord>, ImportError> {
    Ok(read_orders_from_path(path)?)
}

/// Replaces the wall contents with `orders`, which were read from `path`.
pub fn place_orders(wall: &mut Wall, path: &Path, orders: Vec<OrderRecord>) -> ImportSummary {
    let imported = orders.len();

    wall.distribute_orders(orders);

    let slot_counts: Vec<usize> = wall.slots().map(Slot::len).collect();
    info!(
        path = %path.display(),
        imported,
        rows = wall.rows(),
        columns = wall.columns(),
        "imported orders onto wall"
    );

    ImportSummary {
        path: path.to_path_buf(),
        imported,
        slot_counts,
    }
}
