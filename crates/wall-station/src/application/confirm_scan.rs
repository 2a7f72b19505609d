//! ConfirmScanUseCase: turns a scanned code into a pick.
//!
//! A confirmation runs in four steps:
//!
//! 1. resolve the code against the [`Wall`] (first match in row-major order);
//! 2. highlight the matched slot;
//! 3. announce its location (`"2行3列"`) through the injected [`Announcer`];
//! 4. schedule the removal of the scanned identifier from that slot after the
//!    removal delay.
//!
//! # Delayed removal
//!
//! The removal is a fire-and-forget tokio task: sleep, lock the wall, remove
//! by identifier.  It cannot be cancelled.  Because removal is by identifier
//! and a missing identifier is a no-op, overlapping scans of different orders
//! in one slot are independent, and a repeated scan of the same order before
//! its timer fires only schedules a redundant second removal.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use wall_core::{ScanError, SlotPosition, Wall};

/// Delay between a successful scan and the removal of the picked order.
pub const DEFAULT_REMOVAL_DELAY: Duration = Duration::from_millis(2000);

/// Error type for announcement output.
#[derive(Debug, Error)]
pub enum AnnounceError {
    #[error("announcement output failed: {0}")]
    Output(#[from] std::io::Error),
    #[error("announcer unavailable: {0}")]
    Unavailable(String),
}

/// Trait for telling the operator where a scanned order lives.
///
/// The infrastructure implementation writes to the terminal; a speech or GUI
/// front end would implement the same trait.  Failures are logged and never
/// fail the scan.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Announcer: Send + Sync {
    /// Announces `text`, e.g. `"1行2列"`.
    async fn announce(&self, text: &str) -> Result<(), AnnounceError>;
}

/// Result of a successful scan.
#[derive(Debug)]
pub struct ScanConfirmation {
    /// The slot that holds the scanned order.
    pub position: SlotPosition,
    /// The trimmed code that will be removed from the slot.
    pub identifier: String,
    /// Spoken location, e.g. `"2行3列"`.
    pub announcement: String,
    /// The pending removal task.  Dropping the handle does not cancel it.
    pub removal: JoinHandle<()>,
}

impl ScanConfirmation {
    /// Operator-facing confirmation text.
    pub fn message(&self) -> String {
        format!("订单确认成功! 位置: {}", self.announcement)
    }
}

/// Resolves scans against a shared wall and schedules pick-off.
pub struct ConfirmScanUseCase {
    wall: Arc<Mutex<Wall>>,
    announcer: Arc<dyn Announcer>,
    removal_delay: Duration,
}

impl ConfirmScanUseCase {
    pub fn new(
        wall: Arc<Mutex<Wall>>,
        announcer: Arc<dyn Announcer>,
        removal_delay: Duration,
    ) -> Self {
        Self {
            wall,
            announcer,
            removal_delay,
        }
    }

    pub fn removal_delay(&self) -> Duration {
        self.removal_delay
    }

    /// Confirms one scan.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::EmptyInput`] for blank input (no slot is touched)
    /// and [`ScanError::NotFound`] when no slot holds a matching order.
    pub async fn confirm(&self, raw_code: &str) -> Result<ScanConfirmation, ScanError> {
        let identifier = raw_code.trim().to_string();

        let position = {
            let mut wall = self.wall.lock().await;
            match wall.resolve_mut(&identifier) {
                Ok(slot) => {
                    slot.highlight();
                    slot.position()
                }
                Err(e) => {
                    warn!(code = %identifier, kind = e.kind(), "scan not resolved");
                    return Err(e);
                }
            }
        };

        let announcement = position.announcement();
        if let Err(e) = self.announcer.announce(&announcement).await {
            warn!(error = %e, %announcement, "announcement failed");
        }

        let removal = schedule_removal(
            Arc::clone(&self.wall),
            position,
            identifier.clone(),
            self.removal_delay,
        );

        info!(
            code = %identifier,
            row = position.row,
            column = position.column,
            delay_ms = self.removal_delay.as_millis() as u64,
            "scan confirmed"
        );

        Ok(ScanConfirmation {
            position,
            identifier,
            announcement,
            removal,
        })
    }
}

/// Removes `identifier` from the slot at `position` once `delay` has elapsed.
pub fn schedule_removal(
    wall: Arc<Mutex<Wall>>,
    position: SlotPosition,
    identifier: String,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let mut wall = wall.lock().await;
        match wall.remove_order(position, &identifier) {
            Ok(removed) => debug!(code = %identifier, %position, removed, "delayed removal fired"),
            Err(e) => warn!(error = %e, code = %identifier, "delayed removal skipped"),
        }
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wall_core::{parse_orders, SlotState, SAMPLE_CSV};

    /// Sample orders plus a thirteenth, so slot (0, 0) holds ORD001 and ORD013.
    fn make_wall() -> Arc<Mutex<Wall>> {
        let mut text = String::from(SAMPLE_CSV);
        text.push_str("\nORD013,南瓜种子,QR013,9,何十五,2024-01-27");
        let mut wall = Wall::new(3, 4).unwrap();
        wall.distribute_orders(parse_orders(&text));
        Arc::new(Mutex::new(wall))
    }

    fn silent_announcer() -> Arc<dyn Announcer> {
        let mut announcer = MockAnnouncer::new();
        announcer.expect_announce().returning(|_| Ok(()));
        Arc::new(announcer)
    }

    fn make_use_case(wall: &Arc<Mutex<Wall>>, announcer: Arc<dyn Announcer>) -> ConfirmScanUseCase {
        ConfirmScanUseCase::new(Arc::clone(wall), announcer, DEFAULT_REMOVAL_DELAY)
    }

    async fn slot_ids(wall: &Arc<Mutex<Wall>>, row: usize, column: usize) -> Vec<String> {
        let wall = wall.lock().await;
        wall.slot(SlotPosition::new(row, column))
            .unwrap()
            .orders()
            .iter()
            .map(|o| o.order_id.clone())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_highlights_and_defers_removal() {
        // Arrange
        let wall = make_wall();
        let uc = make_use_case(&wall, silent_announcer());

        // Act
        let confirmation = uc.confirm("QR001").await.unwrap();

        // Assert: immediately after resolution both orders are still there
        assert_eq!(confirmation.position, SlotPosition::new(0, 0));
        assert_eq!(slot_ids(&wall, 0, 0).await, ["ORD001", "ORD013"]);
        {
            let w = wall.lock().await;
            let state = w.slot(SlotPosition::new(0, 0)).unwrap().state();
            assert_eq!(state, SlotState::Highlighted);
        }

        // Just before the delay nothing has changed
        tokio::time::advance(Duration::from_millis(1999)).await;
        tokio::task::yield_now().await;
        assert_eq!(slot_ids(&wall, 0, 0).await.len(), 2);

        // After the delay only the non-matching order remains
        confirmation.removal.await.unwrap();
        assert_eq!(slot_ids(&wall, 0, 0).await, ["ORD013"]);
        let w = wall.lock().await;
        assert_eq!(
            w.slot(SlotPosition::new(0, 0)).unwrap().state(),
            SlotState::Occupied
        );
    }

    #[tokio::test]
    async fn test_confirm_announces_one_based_location() {
        // Arrange
        let wall = make_wall();
        let mut announcer = MockAnnouncer::new();
        announcer
            .expect_announce()
            .withf(|text: &str| text == "2行3列")
            .times(1)
            .returning(|_| Ok(()));
        let uc = make_use_case(&wall, Arc::new(announcer));

        // Act
        let confirmation = uc.confirm("qr007").await.unwrap();

        // Assert
        assert_eq!(confirmation.announcement, "2行3列");
        assert_eq!(confirmation.identifier, "qr007");
        assert_eq!(confirmation.message(), "订单确认成功! 位置: 2行3列");
    }

    #[tokio::test]
    async fn test_confirm_trims_scanned_code() {
        let wall = make_wall();
        let uc = make_use_case(&wall, silent_announcer());

        let confirmation = uc.confirm("  QR005 \r").await.unwrap();

        assert_eq!(confirmation.identifier, "QR005");
        assert_eq!(confirmation.position, SlotPosition::new(1, 0));
    }

    #[tokio::test]
    async fn test_confirm_blank_input_is_empty_input_and_silent() {
        // Arrange: the announcer must never be called
        let wall = make_wall();
        let mut announcer = MockAnnouncer::new();
        announcer.expect_announce().times(0);
        let uc = make_use_case(&wall, Arc::new(announcer));

        // Act
        let result = uc.confirm("   ").await;

        // Assert
        assert!(matches!(result, Err(ScanError::EmptyInput)));
        let w = wall.lock().await;
        assert!(w.slots().all(|s| s.state() == SlotState::Occupied));
    }

    #[tokio::test]
    async fn test_confirm_unknown_code_is_not_found() {
        let wall = make_wall();
        let mut announcer = MockAnnouncer::new();
        announcer.expect_announce().times(0);
        let uc = make_use_case(&wall, Arc::new(announcer));

        let result = uc.confirm("QR404").await;

        assert_eq!(result.unwrap_err(), ScanError::NotFound("QR404".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_succeeds_when_announcer_fails() {
        // Arrange
        let wall = make_wall();
        let mut announcer = MockAnnouncer::new();
        announcer
            .expect_announce()
            .returning(|_| Err(AnnounceError::Unavailable("no audio device".into())));
        let uc = make_use_case(&wall, Arc::new(announcer));

        // Act
        let confirmation = uc.confirm("QR002").await.unwrap();
        confirmation.removal.await.unwrap();

        // Assert
        assert!(slot_ids(&wall, 0, 1).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_scans_in_one_slot_remove_independently() {
        // Arrange
        let wall = make_wall();
        let uc = make_use_case(&wall, silent_announcer());

        // Act: both orders of slot (0, 0) scanned before either timer fires
        let first = uc.confirm("QR001").await.unwrap();
        let second = uc.confirm("ORD013").await.unwrap();
        assert_eq!(first.position, second.position);
        first.removal.await.unwrap();
        second.removal.await.unwrap();

        // Assert
        assert!(slot_ids(&wall, 0, 0).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_scan_removal_is_idempotent() {
        let wall = make_wall();
        let uc = make_use_case(&wall, silent_announcer());

        let first = uc.confirm("QR013").await.unwrap();
        let second = uc.confirm("QR013").await.unwrap();
        first.removal.await.unwrap();
        second.removal.await.unwrap();

        assert_eq!(slot_ids(&wall, 0, 0).await, ["ORD001"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_removal_of_absent_identifier_is_noop() {
        let wall = make_wall();

        schedule_removal(
            Arc::clone(&wall),
            SlotPosition::new(0, 0),
            "QR999".to_string(),
            Duration::from_millis(10),
        )
        .await
        .unwrap();

        assert_eq!(slot_ids(&wall, 0, 0).await.len(), 2);
    }
}
