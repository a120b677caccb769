use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started | Msg::RefreshClicked => vec![state.begin_fetch()],
        Msg::StatusFilterChanged(status) => {
            if state.set_status_filter(status) {
                vec![state.begin_fetch()]
            } else {
                Vec::new()
            }
        }
        Msg::PriorityFilterChanged(priority) => {
            if state.set_priority_filter(priority) {
                vec![state.begin_fetch()]
            } else {
                Vec::new()
            }
        }
        Msg::JobsLoaded { request, jobs } => {
            state.apply_jobs_loaded(request, jobs);
            Vec::new()
        }
        Msg::JobsLoadFailed { request, message } => {
            state.apply_jobs_failed(request, &message);
            Vec::new()
        }
        Msg::DetailOpened { job_id } => {
            state.open_detail(job_id);
            Vec::new()
        }
        Msg::DetailClosed => {
            state.close_detail();
            Vec::new()
        }
        Msg::CreateOpened => {
            state.open_create();
            Vec::new()
        }
        Msg::CreateCancelled => {
            state.cancel_create();
            Vec::new()
        }
        Msg::TaskNameChanged(text) => {
            state.edit_form(|form| form.task_name = text);
            Vec::new()
        }
        Msg::PayloadChanged(text) => {
            state.edit_form(|form| form.payload = text);
            Vec::new()
        }
        Msg::PriorityChanged(priority) => {
            state.edit_form(|form| form.priority = priority);
            Vec::new()
        }
        Msg::FormFocusNext => {
            state.edit_form(|form| form.focus = form.focus.next());
            Vec::new()
        }
        Msg::FormFocusPrevious => {
            state.edit_form(|form| form.focus = form.focus.previous());
            Vec::new()
        }
        Msg::CreateSubmitted => match state.submit_create() {
            Some(job) => vec![Effect::CreateJob { job }],
            None => Vec::new(),
        },
        Msg::JobCreated { job } => {
            state.finish_create(&job);
            vec![state.begin_fetch()]
        }
        Msg::CreateFailed { message } => {
            state.fail_create(message);
            Vec::new()
        }
        Msg::RunClicked { job_id } => {
            // The marker goes in before the request leaves so a second click
            // cannot issue a duplicate run.
            if state.can_run(job_id) {
                state.mark_in_flight(job_id);
                vec![Effect::RunJob { job_id }]
            } else {
                Vec::new()
            }
        }
        Msg::RunAccepted { job_id } => {
            if state.is_in_flight(job_id) && !state.is_quitting() {
                vec![Effect::StartPolling { job_id }]
            } else {
                Vec::new()
            }
        }
        Msg::RunRejected { job_id, message } => {
            state.clear_in_flight(job_id);
            state.report_run_error(job_id, &message);
            Vec::new()
        }
        Msg::JobPolled { job } => {
            let job_id = job.id;
            let terminal = job.status.is_terminal();
            state.merge_job(job);
            if terminal {
                state.clear_in_flight(job_id);
                vec![Effect::StopPolling { job_id }]
            } else {
                Vec::new()
            }
        }
        Msg::PollGaveUp { job_id, message } => {
            if state.clear_in_flight(job_id) {
                state.report_poll_gave_up(job_id, &message);
            }
            Vec::new()
        }
        Msg::BannerDismissed => {
            state.dismiss_banner();
            Vec::new()
        }
        Msg::QuitRequested => {
            state.request_quit();
            vec![Effect::CancelAllPolling]
        }
    };

    (state, effects)
}
