//! Dashboard core: pure state machine and view-model helpers for the job
//! scheduler dashboard. No IO happens here; network work is requested through
//! [`Effect`]s and its results come back as [`Msg`]s.
mod effect;
mod form;
mod job;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use form::{FormError, FormField, DEFAULT_PAYLOAD};
pub use job::{cycle_filter, Job, JobFilters, JobId, JobStatus, NewJob, Priority};
pub use msg::Msg;
pub use state::{AppState, RequestId};
pub use update::update;
pub use view_model::{
    pretty_payload, AppViewModel, BannerKind, BannerView, CreateFormView, DetailView,
    JobRowView, RunAction, StatusBanner,
};
