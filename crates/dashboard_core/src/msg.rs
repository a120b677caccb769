use crate::{Job, JobId, JobStatus, Priority, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Dashboard became visible; load the first page of jobs.
    Started,
    /// User asked for a manual refresh.
    RefreshClicked,
    StatusFilterChanged(Option<JobStatus>),
    PriorityFilterChanged(Option<Priority>),
    /// List response for the request numbered `request`.
    JobsLoaded { request: RequestId, jobs: Vec<Job> },
    JobsLoadFailed { request: RequestId, message: String },

    /// User opened the detail dialog for a row.
    DetailOpened { job_id: JobId },
    DetailClosed,

    CreateOpened,
    CreateCancelled,
    TaskNameChanged(String),
    PayloadChanged(String),
    PriorityChanged(Priority),
    FormFocusNext,
    FormFocusPrevious,
    CreateSubmitted,
    /// Service accepted the create request.
    JobCreated { job: Job },
    /// Service rejected the create request; `message` is the service's own
    /// text when it sent one.
    CreateFailed { message: Option<String> },

    /// User clicked Run on a row.
    RunClicked { job_id: JobId },
    RunAccepted { job_id: JobId },
    RunRejected { job_id: JobId, message: String },
    /// Polling fetched a fresh copy of a job.
    JobPolled { job: Job },
    /// Polling stopped after repeated fetch failures.
    PollGaveUp { job_id: JobId, message: String },

    BannerDismissed,
    /// User is leaving; polling must be torn down.
    QuitRequested,
}
