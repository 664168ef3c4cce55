//! Background task that reclaims seats of expired holds nobody touches.

use std::sync::Arc;
use std::time::Duration;

use ledger::InventoryLedger;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawns a task that calls [`InventoryLedger::sweep_expired`] every `period`.
///
/// The task exits once `shutdown` carries `true` or its sender is dropped.
pub fn spawn(
    ledger: Arc<InventoryLedger>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        tracing::info!(period_secs = period.as_secs_f64(), "expiry sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    ledger.sweep_expired();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("expiry sweeper stopped");
    })
}
