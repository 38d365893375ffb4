use crate::reconcile::{ReconcileGate, ReconcileSchedulesUseCase, ReconcileTrigger};
use crate::shared::usecase::execute;
use nudge_domain::ID;
use nudge_infra::NudgeContext;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval, sleep_until, Instant};
use tracing::{error, warn};

/// Seconds until the next run, aligned so that runs happen
/// `secs_before_min` seconds before a full minute
pub fn get_start_delay(now_millis: i64, secs_before_min: i64) -> i64 {
    let secs_past_minute = (now_millis / 1000) % 60;
    let secs_to_next_minute = 60 - secs_past_minute;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        60 + secs_to_next_minute - secs_before_min
    }
}

/// Periodic reconciliation, first run aligned to a full minute so that
/// notify targets computed from minute-granular due times are picked up
/// right as they become current.
pub fn start_reconcile_job(ctx: NudgeContext, user_id: ID, gate: ReconcileGate) {
    tokio::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        sleep_until(start).await;
        let mut poll_interval = interval(Duration::from_secs(ctx.config.reconcile_interval_secs));
        loop {
            poll_interval.tick().await;

            let usecase = ReconcileSchedulesUseCase {
                user_id,
                trigger: ReconcileTrigger::Poll,
                gate: gate.clone(),
            };
            if let Err(e) = execute(usecase, &ctx).await {
                error!("Periodic reconcile pass failed: {:?}", e);
            }
        }
    });
}

/// Reconciles on every mutation published by the reminder store. A lagged
/// receiver is fine: the next event (or the next poll tick) reconciles
/// everything anyway, the feed is a wake-up call and not a data source.
pub fn start_store_listener_job(ctx: NudgeContext, user_id: ID, gate: ReconcileGate) {
    tokio::spawn(async move {
        let mut changes = ctx.repos.reminders.subscribe();
        loop {
            match changes.recv().await {
                Ok(_) => {
                    let usecase = ReconcileSchedulesUseCase {
                        user_id,
                        trigger: ReconcileTrigger::StoreChange,
                        gate: gate.clone(),
                    };
                    if let Err(e) = execute(usecase, &ctx).await {
                        error!("Store-change reconcile pass failed: {:?}", e);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Store change feed lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_delay_aligns_to_the_minute() {
        assert_eq!(get_start_delay(0, 0), 60);
        assert_eq!(get_start_delay(20 * 1000, 0), 40);
        assert_eq!(get_start_delay(119 * 1000, 0), 1);
    }

    #[test]
    fn start_delay_honors_a_head_start_before_the_minute() {
        assert_eq!(get_start_delay(40 * 1000, 10), 10);
        // A head start that already passed waits for the minute after
        assert_eq!(get_start_delay(55 * 1000, 5), 60);
        assert_eq!(get_start_delay(55 * 1000, 30), 35);
    }
}
