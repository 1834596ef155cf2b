use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::app::AppOp;

/// Repeating tick source owned by one running engine instance.
///
/// Each period it posts `AppOp::Pump` tagged with the instance id and the
/// generation it was started under; the controller drops pumps whose
/// generation is stale.
#[derive(Debug)]
pub struct Pump {
    handle: JoinHandle<()>,
}

impl Pump {
    pub fn spawn(id: u64, generation: u64, period: Duration, tx: UnboundedSender<AppOp>) -> Self {
        log::debug!("pump {} gen {} every {:?}", id, generation, period);
        let first = Instant::now() + period;
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if tx.send(AppOp::Pump { id, generation }).is_err() {
                    // controller gone
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for Pump {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
