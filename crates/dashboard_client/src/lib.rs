//! Dashboard client: HTTP access to the scheduler service and execution of
//! the core's network effects.
mod api;
mod error;
mod events;
mod handle;
mod poll;

pub use api::{ApiSettings, JobsApi, ReqwestJobsApi};
pub use error::{ClientError, ErrorResponse, ServiceError};
pub use events::{ChannelEventSink, ClientEvent, EventSink};
pub use handle::{ClientCommand, ClientHandle};
pub use poll::{poll_until_terminal, PollOutcome, PollSettings};
