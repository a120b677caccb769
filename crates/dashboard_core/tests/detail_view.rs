use dashboard_core::{update, AppState, DetailView, Job, JobStatus, Msg, Priority, StatusBanner};
use serde_json::json;

fn job(status: JobStatus, payload: serde_json::Value) -> Job {
    Job {
        id: 5,
        task_name: "Send Welcome Email".to_string(),
        payload,
        priority: Priority::Low,
        status,
        created_at: "2024-05-01T10:00:00Z".to_string(),
        updated_at: "2024-05-01T10:00:03Z".to_string(),
        completed_at: None,
    }
}

#[test]
fn payload_round_trips_through_pretty_text() {
    let payloads = [
        json!({"to": "a@example.com", "tags": ["x", "y"], "nested": {"n": 1.5, "ok": true}}),
        json!([1, 2, {"k": null}]),
        json!("plain string"),
        json!(null),
    ];

    for payload in payloads {
        let view = DetailView::from_job(&job(JobStatus::Pending, payload.clone()));
        let reparsed: serde_json::Value = serde_json::from_str(&view.payload_pretty).unwrap();
        assert_eq!(reparsed, payload);
    }
}

#[test]
fn payload_is_two_space_indented() {
    let view = DetailView::from_job(&job(JobStatus::Pending, json!({"key": "value"})));

    assert_eq!(view.payload_pretty, "{\n  \"key\": \"value\"\n}");
}

#[test]
fn banner_depends_on_status() {
    let cases = [
        (JobStatus::Pending, None),
        (JobStatus::Running, Some(StatusBanner::Running)),
        (JobStatus::Completed, Some(StatusBanner::Completed)),
        (JobStatus::Failed, Some(StatusBanner::Failed)),
    ];
    for (status, expected) in cases {
        assert_eq!(DetailView::from_job(&job(status, json!({}))).banner, expected);
    }
    assert!(StatusBanner::Completed.text().contains("webhook"));
}

#[test]
fn completed_at_is_shown_only_when_service_sent_it() {
    let failed = DetailView::from_job(&job(JobStatus::Failed, json!({})));
    assert_eq!(failed.completed_at, None);

    let mut done = job(JobStatus::Completed, json!({}));
    done.completed_at = Some("2024-05-01T10:00:09Z".to_string());
    assert_eq!(
        DetailView::from_job(&done).completed_at.as_deref(),
        Some("2024-05-01T10:00:09Z")
    );
}

#[test]
fn detail_opens_and_closes_through_update() {
    let (state, _) = update(AppState::new(), Msg::Started);
    let (state, _) = update(
        state,
        Msg::JobsLoaded {
            request: 1,
            jobs: vec![job(JobStatus::Completed, json!({"a": 1}))],
        },
    );

    let (state, effects) = update(state, Msg::DetailOpened { job_id: 5 });
    assert!(effects.is_empty());
    let detail = state.view().detail.expect("detail");
    assert_eq!(detail.job_id, 5);
    assert_eq!(detail.task_name, "Send Welcome Email");

    let (state, _) = update(state, Msg::DetailClosed);
    assert!(state.view().detail.is_none());

    let (state, _) = update(state, Msg::DetailOpened { job_id: 404 });
    assert!(state.view().detail.is_none());
}
