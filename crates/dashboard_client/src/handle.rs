use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;

use dashboard_core::{JobFilters, JobId, NewJob, RequestId};
use dashboard_logging::{dash_debug, dash_info, dash_warn, job_scope};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::poll::{poll_until_terminal, PollOutcome, PollSettings};
use crate::{
    ApiSettings, ChannelEventSink, ClientError, ClientEvent, EventSink, JobsApi, ReqwestJobsApi,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    ListJobs {
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
    StopAllPolling,
}

/// Owns a background thread with a tokio runtime. Commands go in through
/// `send`, results come back through `try_recv`.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl ClientHandle {
    pub fn new(api: ApiSettings, poll: PollSettings) -> Result<Self, ClientError> {
        let api = ReqwestJobsApi::new(api)?;
        Self::with_api(Arc::new(api), poll)
    }

    pub fn with_api(api: Arc<dyn JobsApi>, poll: PollSettings) -> Result<Self, ClientError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("dashboard-client-worker")
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("dashboard-client".to_string())
            .spawn(move || {
                let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
                let mut dispatcher = Dispatcher::new(api, poll, sink);
                while let Ok(command) = cmd_rx.recv() {
                    dispatcher.handle(&runtime, command);
                }
                dispatcher.stop_all();
                dash_info!("client command channel closed; shutting down");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn send(&self, command: ClientCommand) {
        if let Err(mpsc::SendError(command)) = self.cmd_tx.send(command) {
            dash_debug!("client thread has exited; dropping {:?}", command);
        }
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }
}

struct Dispatcher {
    api: Arc<dyn JobsApi>,
    poll: PollSettings,
    sink: Arc<dyn EventSink>,
    /// One token per live polling loop.
    loops: HashMap<JobId, CancellationToken>,
}

impl Dispatcher {
    fn new(api: Arc<dyn JobsApi>, poll: PollSettings, sink: Arc<dyn EventSink>) -> Self {
        Self {
            api,
            poll,
            sink,
            loops: HashMap::new(),
        }
    }

    fn handle(&mut self, runtime: &Runtime, command: ClientCommand) {
        match command {
            ClientCommand::ListJobs { request, filters } => {
                let api = self.api.clone();
                let sink = self.sink.clone();
                runtime.spawn(async move {
                    let result = api.list_jobs(filters).await;
                    if let Err(err) = &result {
                        dash_warn!("list request {} failed: {}", request, err);
                    }
                    sink.emit(ClientEvent::JobsListed { request, result });
                });
            }
            ClientCommand::CreateJob { job } => {
                let api = self.api.clone();
                let sink = self.sink.clone();
                runtime.spawn(async move {
                    let result = api.create_job(&job).await;
                    match &result {
                        Ok(created) => dash_info!("{} created", job_scope(created.id)),
                        Err(err) => dash_warn!("create {:?} failed: {}", job.task_name, err),
                    }
                    sink.emit(ClientEvent::JobCreated { result });
                });
            }
            ClientCommand::RunJob { job_id } => {
                let api = self.api.clone();
                let sink = self.sink.clone();
                runtime.spawn(async move {
                    match api.run_job(job_id).await {
                        Ok(ack) => {
                            dash_info!("{} run accepted: {}", job_scope(job_id), ack);
                            sink.emit(ClientEvent::RunAccepted { job_id });
                        }
                        Err(error) => {
                            dash_warn!("{} run rejected: {}", job_scope(job_id), error);
                            sink.emit(ClientEvent::RunRejected { job_id, error });
                        }
                    }
                });
            }
            ClientCommand::StartPolling { job_id } => self.start_polling(runtime, job_id),
            ClientCommand::StopPolling { job_id } => {
                if let Some(token) = self.loops.remove(&job_id) {
                    token.cancel();
                }
            }
            ClientCommand::StopAllPolling => self.stop_all(),
        }
    }

    fn start_polling(&mut self, runtime: &Runtime, job_id: JobId) {
        // Finished loops cancel their own token on exit.
        self.loops.retain(|_, token| !token.is_cancelled());
        if self.loops.contains_key(&job_id) {
            dash_debug!("{} already polling", job_scope(job_id));
            return;
        }

        let token = CancellationToken::new();
        self.loops.insert(job_id, token.clone());
        let api = self.api.clone();
        let sink = self.sink.clone();
        let settings = self.poll.clone();
        runtime.spawn(async move {
            let outcome =
                poll_until_terminal(api.as_ref(), job_id, &settings, &token, sink.as_ref()).await;
            token.cancel();
            match outcome {
                PollOutcome::Finished(status) => {
                    dash_info!("{} finished with status {}", job_scope(job_id), status)
                }
                PollOutcome::GaveUp(err) => {
                    dash_warn!("{} polling gave up: {}", job_scope(job_id), err)
                }
                PollOutcome::Cancelled => dash_debug!("{} polling cancelled", job_scope(job_id)),
            }
        });
    }

    fn stop_all(&mut self) {
        for (_, token) in self.loops.drain() {
            token.cancel();
        }
    }
}
