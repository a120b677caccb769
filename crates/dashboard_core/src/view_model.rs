use crate::{FormField, Job, JobId, JobStatus, Priority};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerView {
    pub kind: BannerKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status_filter: Option<JobStatus>,
    pub priority_filter: Option<Priority>,
    pub loading: bool,
    pub job_count: usize,
    /// Empty while `loading`; the table shows a loading indicator instead.
    pub jobs: Vec<JobRowView>,
    pub in_flight: Vec<JobId>,
    pub banner: Option<BannerView>,
    pub create_form: Option<CreateFormView>,
    pub detail: Option<DetailView>,
    pub dirty: bool,
}

/// What the Run button of a row looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAction {
    /// Job is not pending.
    Hidden,
    Available,
    /// A run was requested and its outcome is not known yet.
    InFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub task_name: String,
    pub priority: Priority,
    pub status: JobStatus,
    pub created_at: String,
    pub run_action: RunAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFormView {
    pub task_name: String,
    pub priority: Priority,
    pub payload: String,
    pub focus: FormField,
    pub submitting: bool,
    pub error: Option<String>,
}

/// Explanation shown under the detail fields, keyed by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBanner {
    Completed,
    Running,
    Failed,
}

impl StatusBanner {
    pub fn for_status(status: JobStatus) -> Option<Self> {
        match status {
            JobStatus::Pending => None,
            JobStatus::Running => Some(StatusBanner::Running),
            JobStatus::Completed => Some(StatusBanner::Completed),
            JobStatus::Failed => Some(StatusBanner::Failed),
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            StatusBanner::Completed => {
                "This job has been completed successfully. A webhook notification has been sent."
            }
            StatusBanner::Running => "This job is currently being processed...",
            StatusBanner::Failed => "This job has failed during execution.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub job_id: JobId,
    pub task_name: String,
    pub status: JobStatus,
    pub priority: Priority,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
    /// Two-space indented JSON of the stored payload.
    pub payload_pretty: String,
    pub banner: Option<StatusBanner>,
}

impl DetailView {
    pub fn from_job(job: &Job) -> Self {
        Self {
            job_id: job.id,
            task_name: job.task_name.clone(),
            status: job.status,
            priority: job.priority,
            created_at: job.created_at.clone(),
            updated_at: job.updated_at.clone(),
            completed_at: job.completed_at.clone(),
            payload_pretty: pretty_payload(&job.payload),
            banner: StatusBanner::for_status(job.status),
        }
    }
}

pub fn pretty_payload(payload: &serde_json::Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}
