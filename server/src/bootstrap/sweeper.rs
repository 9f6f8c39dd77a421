use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use tempmod_application::store::ModerationStore;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub blocks_evicted: usize,
    pub mutes_evicted: usize,
}

/// Sweeps both temp maps. A failure on one map is logged and does not stop
/// the other from being swept.
pub async fn sweep_once(store: &ModerationStore) -> SweepReport {
    let blocks_evicted = store.remove_all_expired_blocks().await.unwrap_or_else(|e| {
        error!("Temp block sweep failed: {}", e);
        0
    });
    let mutes_evicted = store.remove_all_expired_mutes().await.unwrap_or_else(|e| {
        error!("Temp mute sweep failed: {}", e);
        0
    });

    let report = SweepReport {
        blocks_evicted,
        mutes_evicted,
    };
    if report == SweepReport::default() {
        debug!("Expiry sweep found nothing to evict");
    } else {
        info!(
            blocks_evicted = report.blocks_evicted,
            mutes_evicted = report.mutes_evicted,
            "Expiry sweep completed"
        );
    }
    report
}

/// Catch-up loop for wake-ups the external scheduler missed.
pub fn spawn_sweeper(store: ModerationStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; startup sweeps are handled by main.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            sweep_once(&store).await;
        }
    })
}
