use std::collections::BTreeSet;

use crate::form::{CreateForm, CREATE_FAILED_FALLBACK};
use crate::view_model::{
    AppViewModel, BannerKind, BannerView, CreateFormView, DetailView, JobRowView, RunAction,
};
use crate::{Effect, Job, JobFilters, JobId, JobStatus, NewJob, Priority};

/// Sequence number of a list request; only the latest one may land.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Banner {
    kind: BannerKind,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    filters: JobFilters,
    jobs: Vec<Job>,
    loading: bool,
    last_request: RequestId,
    in_flight: BTreeSet<JobId>,
    banner: Option<Banner>,
    form: CreateForm,
    create_open: bool,
    detail: Option<Job>,
    quitting: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let jobs = if self.loading {
            Vec::new()
        } else {
            self.jobs.iter().map(|job| self.row_view(job)).collect()
        };
        AppViewModel {
            status_filter: self.filters.status,
            priority_filter: self.filters.priority,
            loading: self.loading,
            job_count: self.jobs.len(),
            jobs,
            in_flight: self.in_flight.iter().copied().collect(),
            banner: self.banner.as_ref().map(|banner| BannerView {
                kind: banner.kind,
                text: banner.text.clone(),
            }),
            create_form: self.create_open.then(|| CreateFormView {
                task_name: self.form.task_name.clone(),
                priority: self.form.priority,
                payload: self.form.payload.clone(),
                focus: self.form.focus,
                submitting: self.form.submitting,
                error: self.form.error.clone(),
            }),
            detail: self.detail.as_ref().map(DetailView::from_job),
            dirty: self.dirty,
        }
    }

    fn row_view(&self, job: &Job) -> JobRowView {
        let run_action = if self.in_flight.contains(&job.id) {
            RunAction::InFlight
        } else if job.status == JobStatus::Pending {
            RunAction::Available
        } else {
            RunAction::Hidden
        };
        JobRowView {
            job_id: job.id,
            task_name: job.task_name.clone(),
            priority: job.priority,
            status: job.status,
            created_at: job.created_at.clone(),
            run_action,
        }
    }

    pub fn filters(&self) -> JobFilters {
        self.filters
    }

    pub fn is_in_flight(&self, job_id: JobId) -> bool {
        self.in_flight.contains(&job_id)
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // List loading.

    pub(crate) fn set_status_filter(&mut self, status: Option<JobStatus>) -> bool {
        if self.filters.status == status {
            return false;
        }
        self.filters.status = status;
        true
    }

    pub(crate) fn set_priority_filter(&mut self, priority: Option<Priority>) -> bool {
        if self.filters.priority == priority {
            return false;
        }
        self.filters.priority = priority;
        true
    }

    /// Starts a list request for the current filters.
    pub(crate) fn begin_fetch(&mut self) -> Effect {
        self.last_request += 1;
        self.loading = true;
        self.mark_dirty();
        Effect::FetchJobs {
            request: self.last_request,
            filters: self.filters,
        }
    }

    pub(crate) fn apply_jobs_loaded(&mut self, request: RequestId, jobs: Vec<Job>) {
        if request != self.last_request {
            return;
        }
        self.jobs = jobs;
        self.loading = false;
        self.mark_dirty();
    }

    pub(crate) fn apply_jobs_failed(&mut self, request: RequestId, message: &str) {
        if request != self.last_request {
            return;
        }
        self.jobs.clear();
        self.loading = false;
        self.set_banner(BannerKind::Error, format!("Failed to load jobs: {message}"));
    }

    // Detail dialog.

    pub(crate) fn open_detail(&mut self, job_id: JobId) {
        if let Some(job) = self.jobs.iter().find(|job| job.id == job_id) {
            self.detail = Some(job.clone());
            self.mark_dirty();
        }
    }

    pub(crate) fn close_detail(&mut self) {
        if self.detail.take().is_some() {
            self.mark_dirty();
        }
    }

    // Create dialog.

    pub(crate) fn open_create(&mut self) {
        if !self.create_open {
            self.create_open = true;
            self.mark_dirty();
        }
    }

    /// Closes the dialog, keeping whatever was typed. Ignored mid-submit.
    pub(crate) fn cancel_create(&mut self) {
        if self.create_open && !self.form.submitting {
            self.create_open = false;
            self.mark_dirty();
        }
    }

    pub(crate) fn edit_form(&mut self, edit: impl FnOnce(&mut CreateForm)) {
        if !self.create_open || self.form.submitting {
            return;
        }
        edit(&mut self.form);
        self.mark_dirty();
    }

    /// Validates the form; on success marks it submitting and returns the
    /// request body.
    pub(crate) fn submit_create(&mut self) -> Option<NewJob> {
        if !self.create_open || self.form.submitting {
            return None;
        }
        self.mark_dirty();
        match self.form.validate() {
            Ok(job) => {
                self.form.error = None;
                self.form.submitting = true;
                Some(job)
            }
            Err(err) => {
                self.form.error = Some(err.to_string());
                None
            }
        }
    }

    pub(crate) fn finish_create(&mut self, job: &Job) {
        self.form.reset();
        self.create_open = false;
        self.set_banner(BannerKind::Info, format!("Created job #{}", job.id));
    }

    pub(crate) fn fail_create(&mut self, message: Option<String>) {
        self.form.submitting = false;
        self.form.error = Some(
            message
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| CREATE_FAILED_FALLBACK.to_string()),
        );
        self.mark_dirty();
    }

    // Runs and polling.

    /// Only listed, pending jobs without an outstanding run may be started.
    pub(crate) fn can_run(&self, job_id: JobId) -> bool {
        !self.quitting
            && !self.in_flight.contains(&job_id)
            && self
                .jobs
                .iter()
                .any(|job| job.id == job_id && job.status == JobStatus::Pending)
    }

    pub(crate) fn mark_in_flight(&mut self, job_id: JobId) {
        if self.in_flight.insert(job_id) {
            self.mark_dirty();
        }
    }

    pub(crate) fn clear_in_flight(&mut self, job_id: JobId) -> bool {
        let removed = self.in_flight.remove(&job_id);
        if removed {
            self.mark_dirty();
        }
        removed
    }

    /// Replaces the listed copy (and the open detail) of `job`. Jobs that are
    /// not in the current list are not inserted.
    pub(crate) fn merge_job(&mut self, job: Job) {
        if let Some(detail) = self.detail.as_mut().filter(|detail| detail.id == job.id) {
            *detail = job.clone();
            self.dirty = true;
        }
        if let Some(slot) = self.jobs.iter_mut().find(|listed| listed.id == job.id) {
            *slot = job;
            self.dirty = true;
        }
    }

    pub(crate) fn report_run_error(&mut self, job_id: JobId, message: &str) {
        self.set_banner(
            BannerKind::Error,
            format!("Failed to run job #{job_id}: {message}"),
        );
    }

    pub(crate) fn report_poll_gave_up(&mut self, job_id: JobId, message: &str) {
        self.set_banner(
            BannerKind::Error,
            format!("Stopped tracking job #{job_id}: {message}"),
        );
    }

    // Misc.

    fn set_banner(&mut self, kind: BannerKind, text: String) {
        self.banner = Some(Banner { kind, text });
        self.mark_dirty();
    }

    pub(crate) fn dismiss_banner(&mut self) {
        if self.banner.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn request_quit(&mut self) {
        self.quitting = true;
        self.mark_dirty();
    }
}
