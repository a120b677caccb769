use dashboard_client::{ClientCommand, ClientEvent, ClientHandle};
use dashboard_core::{Effect, Msg};
use dashboard_logging::{dash_debug, dash_info, dash_warn, job_scope};

/// Hands core effects to the client and turns client events back into
/// messages.
pub struct EffectRunner {
    client: ClientHandle,
}

impl EffectRunner {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            dash_debug!("effect {:?}", effect);
            self.client.send(to_command(effect));
        }
    }

    /// Everything the client reported since the last call.
    pub fn drain(&self) -> Vec<Msg> {
        let mut inbox = Vec::new();
        while let Some(event) = self.client.try_recv() {
            inbox.push(to_msg(event));
        }
        inbox
    }
}

fn to_command(effect: Effect) -> ClientCommand {
    match effect {
        Effect::FetchJobs { request, filters } => {
            dash_info!(
                "FetchJobs request={} status={:?} priority={:?}",
                request,
                filters.status,
                filters.priority
            );
            ClientCommand::ListJobs { request, filters }
        }
        Effect::CreateJob { job } => ClientCommand::CreateJob { job },
        Effect::RunJob { job_id } => {
            dash_info!("RunJob {}", job_scope(job_id));
            ClientCommand::RunJob { job_id }
        }
        Effect::StartPolling { job_id } => ClientCommand::StartPolling { job_id },
        Effect::StopPolling { job_id } => ClientCommand::StopPolling { job_id },
        Effect::CancelAllPolling => ClientCommand::StopAllPolling,
    }
}

fn to_msg(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::JobsListed { request, result } => match result {
            Ok(jobs) => Msg::JobsLoaded { request, jobs },
            Err(err) => Msg::JobsLoadFailed {
                request,
                message: err.user_message(),
            },
        },
        ClientEvent::JobCreated { result } => match result {
            Ok(job) => Msg::JobCreated { job },
            Err(err) => {
                dash_warn!("Create failed: {}", err);
                Msg::CreateFailed {
                    message: err.service_message().map(ToOwned::to_owned),
                }
            }
        },
        ClientEvent::RunAccepted { job_id } => Msg::RunAccepted { job_id },
        ClientEvent::RunRejected { job_id, error } => Msg::RunRejected {
            job_id,
            message: error.user_message(),
        },
        ClientEvent::JobPolled { job } => Msg::JobPolled { job },
        ClientEvent::PollGaveUp { job_id, error } => Msg::PollGaveUp {
            job_id,
            message: error.user_message(),
        },
    }
}
