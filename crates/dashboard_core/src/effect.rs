use crate::{JobFilters, JobId, NewJob, RequestId};

/// Side effects requested by `update`; the app hands them to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchJobs {
        request: RequestId,
        filters: JobFilters,
    },
    CreateJob {
        job: NewJob,
    },
    RunJob {
        job_id: JobId,
    },
    StartPolling {
        job_id: JobId,
    },
    StopPolling {
        job_id: JobId,
    },
    /// Teardown: stop every polling loop.
    CancelAllPolling,
}
