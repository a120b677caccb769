use std::sync::mpsc;

use dashboard_core::{Job, JobId, RequestId};
use dashboard_logging::dash_debug;

use crate::ServiceError;

/// Results the client reports back to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    JobsListed {
        request: RequestId,
        result: Result<Vec<Job>, ServiceError>,
    },
    JobCreated {
        result: Result<Job, ServiceError>,
    },
    RunAccepted {
        job_id: JobId,
    },
    RunRejected {
        job_id: JobId,
        error: ServiceError,
    },
    JobPolled {
        job: Job,
    },
    /// Polling for `job_id` ended after too many consecutive failures.
    PollGaveUp {
        job_id: JobId,
        error: ServiceError,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<ClientEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ClientEvent) {
        if let Err(mpsc::SendError(event)) = self.tx.send(event) {
            dash_debug!("event receiver closed; dropping {:?}", event);
        }
    }
}
