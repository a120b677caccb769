use std::time::Duration;

use dashboard_core::{JobId, JobStatus};
use dashboard_logging::{dash_debug, dash_warn, job_scope};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{ClientEvent, EventSink, JobsApi, ServiceError};

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    /// Consecutive failed fetches after which the loop gives up.
    pub max_consecutive_failures: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_consecutive_failures: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The job reached `Completed` or `Failed`.
    Finished(JobStatus),
    GaveUp(ServiceError),
    Cancelled,
}

/// Re-fetches `job_id` every `settings.interval` until the service reports a
/// terminal status, the failure budget is spent, or `cancel` fires.
///
/// Every successful fetch is emitted as [`ClientEvent::JobPolled`]; giving up
/// emits [`ClientEvent::PollGaveUp`]. Nothing is emitted after cancellation.
pub async fn poll_until_terminal(
    api: &dyn JobsApi,
    job_id: JobId,
    settings: &PollSettings,
    cancel: &CancellationToken,
    sink: &dyn EventSink,
) -> PollOutcome {
    let period = settings.interval.max(Duration::from_millis(1));
    let max_failures = settings.max_consecutive_failures.max(1);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut failures = 0u32;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            result = api.get_job(job_id) => result,
        };

        match fetched {
            Ok(job) => {
                failures = 0;
                let status = job.status;
                dash_debug!("{} polled status={}", job_scope(job_id), status);
                sink.emit(ClientEvent::JobPolled { job });
                if status.is_terminal() {
                    return PollOutcome::Finished(status);
                }
            }
            Err(err) => {
                failures += 1;
                dash_warn!(
                    "{} poll attempt failed ({}/{}): {}",
                    job_scope(job_id),
                    failures,
                    max_failures,
                    err
                );
                if failures >= max_failures {
                    sink.emit(ClientEvent::PollGaveUp {
                        job_id,
                        error: err.clone(),
                    });
                    return PollOutcome::GaveUp(err);
                }
            }
        }
    }
}
