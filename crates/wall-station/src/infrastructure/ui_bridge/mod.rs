//! Command bridge: exposes application-layer operations to front ends.
//!
//! Every operator action (import, scan, look at the wall, write a sample
//! file) is a plain async function here that takes the shared [`AppState`]
//! and returns a JSON-serialisable [`CommandResult`].  The stdin event loop in
//! `infrastructure::console` is the front end shipped with this crate; a GUI
//! would call the same functions.  This module must NOT be imported by the
//! Application or Domain layers.
//!
//! # Data Transfer Objects (DTOs)
//!
//! Domain types (`Wall`, `Slot`, `OrderRecord`) carry behaviour and private
//! fields.  DTOs are simple structs that:
//!
//! - Contain only JSON-friendly fields (`String`, `usize`, `Vec`, etc.).
//! - Derive `Serialize`/`Deserialize` so they can cross a process boundary.
//! - Give front ends a stable shape even when domain internals change.
//!
//! # `CommandResult<T>` wrapper
//!
//! All commands return `CommandResult<T>` rather than `Result<T, E>`.
//! Every response has the same shape:
//! `{ success: bool, data: T | null, error: string | null, error_kind: string | null }`.
//! `error` is the operator-facing message, `error_kind` a stable machine
//! code (`empty_input`, `not_found`, `import_failed`, ...).

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error};
use wall_core::{write_sample_csv, ScanError, Slot, SlotState, Wall, WallError, SAMPLE_CSV};

use crate::application::{
    confirm_scan::{Announcer, ConfirmScanUseCase},
    import_orders::{load_orders, place_orders},
};
use crate::infrastructure::storage::config::AppConfig;

/// Message shown when a scan arrives with nothing in it.
pub const EMPTY_INPUT_MESSAGE: &str = "请输入或扫描二维码!";
/// Message shown when no slot holds the scanned order.
pub const NOT_FOUND_MESSAGE: &str = "未找到匹配的订单!";

// ── Shared application state ──────────────────────────────────────────────────

/// Application state shared between commands.
///
/// The wall sits behind an async Tokio mutex because scans, imports and the
/// delayed removal tasks all touch it from different tasks.
pub struct AppState {
    /// The configuration the station was started with, after CLI overrides.
    pub config: AppConfig,
    /// The wall itself, shared with the confirm-scan use case.
    pub wall: Arc<Mutex<Wall>>,
    confirm_scan: ConfirmScanUseCase,
    pending_removals: Mutex<Vec<JoinHandle<()>>>,
}

impl AppState {
    /// Builds an empty wall from `config` and wires the scan use case to
    /// `announcer`.
    ///
    /// # Errors
    ///
    /// Returns [`WallError::EmptyGrid`] if the configured grid has no slots.
    pub fn new(config: AppConfig, announcer: Arc<dyn Announcer>) -> Result<Arc<Self>, WallError> {
        let wall = Arc::new(Mutex::new(Wall::new(config.wall.rows, config.wall.columns)?));
        let confirm_scan =
            ConfirmScanUseCase::new(Arc::clone(&wall), announcer, config.removal_delay());

        Ok(Arc::new(Self {
            config,
            wall,
            confirm_scan,
            pending_removals: Mutex::new(Vec::new()),
        }))
    }

    /// Waits for every scheduled removal that has not fired yet and returns
    /// how many were awaited.
    pub async fn wait_for_pending_removals(&self) -> usize {
        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.pending_removals.lock().await);
        let count = handles.len();
        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "delayed removal task failed");
            }
        }
        count
    }

    async fn track_removal(&self, handle: JoinHandle<()>) {
        let mut pending = self.pending_removals.lock().await;
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// DTO returned by [`import_csv`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportSummaryDto {
    pub path: String,
    pub imported: usize,
    /// Orders per slot, row-major.
    pub slot_counts: Vec<usize>,
    pub message: String,
}

/// DTO returned by [`confirm_scan`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanResultDto {
    pub code: String,
    /// Zero-based row of the matched slot.
    pub row: usize,
    /// Zero-based column of the matched slot.
    pub column: usize,
    /// `格口 R-C` label of the matched slot.
    pub label: String,
    /// Spoken location, `R行C列`.
    pub announcement: String,
    pub message: String,
}

/// DTO for one slot in a [`WallSnapshotDto`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotDto {
    pub row: usize,
    pub column: usize,
    pub label: String,
    pub state: SlotState,
    /// Text a slot widget would show: label, order details or a count.
    pub display: String,
    pub order_ids: Vec<String>,
}

impl From<&Slot> for SlotDto {
    fn from(slot: &Slot) -> Self {
        Self {
            row: slot.row(),
            column: slot.column(),
            label: slot.position().label(),
            state: slot.state(),
            display: slot.display_label(),
            order_ids: slot.orders().iter().map(|o| o.order_id.clone()).collect(),
        }
    }
}

/// DTO returned by [`get_wall`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WallSnapshotDto {
    pub rows: usize,
    pub columns: usize,
    pub order_count: usize,
    /// Row-major.
    pub slots: Vec<SlotDto>,
}

impl From<&Wall> for WallSnapshotDto {
    fn from(wall: &Wall) -> Self {
        Self {
            rows: wall.rows(),
            columns: wall.columns(),
            order_count: wall.order_count(),
            slots: wall.slots().map(SlotDto::from).collect(),
        }
    }
}

/// DTO returned by [`generate_sample`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleDto {
    pub path: String,
    pub orders: usize,
    pub message: String,
}

/// Unified response wrapper used by all commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub error_kind: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }
    pub fn err(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
            error_kind: Some(kind.into()),
        }
    }
}

/// Operator-facing text for a failed scan.
pub fn scan_error_message(e: &ScanError) -> &'static str {
    match e {
        ScanError::EmptyInput => EMPTY_INPUT_MESSAGE,
        ScanError::NotFound(_) => NOT_FOUND_MESSAGE,
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Imports the order file at `path`, replacing the wall contents.
///
/// The file is read on the blocking pool before the wall is locked, so scans
/// and removals are not held up by disk I/O.
pub async fn import_csv(state: Arc<AppState>, path: PathBuf) -> CommandResult<ImportSummaryDto> {
    let read_path = path.clone();
    let orders = match tokio::task::spawn_blocking(move || load_orders(&read_path)).await {
        Ok(Ok(orders)) => orders,
        Ok(Err(e)) => {
            error!(error = %e, path = %path.display(), "import failed");
            return CommandResult::err("import_failed", e.to_string());
        }
        Err(e) => {
            error!(error = %e, path = %path.display(), "import task failed");
            return CommandResult::err("import_failed", format!("导入失败: {e}"));
        }
    };

    let summary = {
        let mut wall = state.wall.lock().await;
        place_orders(&mut wall, &path, orders)
    };
    CommandResult::ok(ImportSummaryDto {
        path: summary.path.display().to_string(),
        imported: summary.imported,
        message: summary.message(),
        slot_counts: summary.slot_counts,
    })
}

/// Resolves a scanned code, highlights and announces its slot, and schedules
/// the removal of the picked order.
pub async fn confirm_scan(state: Arc<AppState>, code: String) -> CommandResult<ScanResultDto> {
    match state.confirm_scan.confirm(&code).await {
        Ok(confirmation) => {
            let dto = ScanResultDto {
                code: confirmation.identifier.clone(),
                row: confirmation.position.row,
                column: confirmation.position.column,
                label: confirmation.position.label(),
                message: confirmation.message(),
                announcement: confirmation.announcement,
            };
            state.track_removal(confirmation.removal).await;
            CommandResult::ok(dto)
        }
        Err(e) => CommandResult::err(e.kind(), scan_error_message(&e)),
    }
}

/// Returns the configuration the station is running with.
pub async fn get_config(state: Arc<AppState>) -> CommandResult<AppConfig> {
    CommandResult::ok(state.config.clone())
}

/// Returns a snapshot of every slot on the wall.
pub async fn get_wall(state: Arc<AppState>) -> CommandResult<WallSnapshotDto> {
    let wall = state.wall.lock().await;
    CommandResult::ok(WallSnapshotDto::from(&*wall))
}

/// Writes the reference order file to `path`.
pub async fn generate_sample(path: PathBuf) -> CommandResult<SampleDto> {
    match write_sample_csv(&path) {
        Ok(()) => {
            debug!(path = %path.display(), "sample order file written");
            let shown = path.display().to_string();
            CommandResult::ok(SampleDto {
                message: format!("测试CSV文件已生成: {shown}"),
                path: shown,
                orders: SAMPLE_CSV.lines().count() - 1,
            })
        }
        Err(e) => {
            error!(error = %e, path = %path.display(), "sample generation failed");
            CommandResult::err("sample_failed", format!("生成失败: {e}"))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
