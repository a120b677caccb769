use std::time::Duration;

use dashboard_client::{ApiSettings, ClientCommand, ClientEvent, ClientHandle, PollSettings};
use dashboard_core::{JobFilters, JobStatus, NewJob, Priority};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn job_json(id: u64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "taskName": "Nightly report",
        "payload": {"day": "mon"},
        "priority": "Low",
        "status": status,
        "createdAt": "2024-05-01T10:00:00.000Z",
        "updatedAt": "2024-05-01T10:00:00.000Z",
        "completedAt": null
    })
}

fn handle_for(server: &MockServer) -> ClientHandle {
    let poll = PollSettings {
        interval: Duration::from_millis(20),
        max_consecutive_failures: 3,
    };
    ClientHandle::new(ApiSettings::parse(&server.uri()).unwrap(), poll).expect("client handle")
}

async fn next_event(handle: &ClientHandle) -> ClientEvent {
    for _ in 0..200 {
        if let Some(event) = handle.try_recv() {
            return event;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("no client event within 2s");
}

#[tokio::test(flavor = "multi_thread")]
async fn list_command_reports_request_number() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([job_json(1, "pending")])))
        .mount(&server)
        .await;

    let handle = handle_for(&server);
    handle.send(ClientCommand::ListJobs {
        request: 4,
        filters: JobFilters::default(),
    });

    match next_event(&handle).await {
        ClientEvent::JobsListed { request, result } => {
            assert_eq!(request, 4);
            assert_eq!(result.expect("list ok").len(), 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn create_command_reports_created_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(job_json(12, "pending")))
        .mount(&server)
        .await;

    let handle = handle_for(&server);
    handle.send(ClientCommand::CreateJob {
        job: NewJob {
            task_name: "Nightly report".to_string(),
            payload: json!({"day": "mon"}),
            priority: Priority::Low,
        },
    });

    match next_event(&handle).await {
        ClientEvent::JobCreated { result } => assert_eq!(result.expect("created").id, 12),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_run_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/run-job/9"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"error": "already running"})))
        .mount(&server)
        .await;

    let handle = handle_for(&server);
    handle.send(ClientCommand::RunJob { job_id: 9 });

    match next_event(&handle).await {
        ClientEvent::RunRejected { job_id, error } => {
            assert_eq!(job_id, 9);
            assert_eq!(error.service_message(), Some("already running"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn run_then_poll_until_completed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/run-job/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "started"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json(7, "running")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json(7, "completed")))
        .mount(&server)
        .await;

    let handle = handle_for(&server);
    handle.send(ClientCommand::RunJob { job_id: 7 });
    assert_eq!(
        next_event(&handle).await,
        ClientEvent::RunAccepted { job_id: 7 }
    );

    handle.send(ClientCommand::StartPolling { job_id: 7 });
    // A duplicate start for a live loop is ignored.
    handle.send(ClientCommand::StartPolling { job_id: 7 });

    let mut statuses = Vec::new();
    while statuses.last() != Some(&JobStatus::Completed) {
        match next_event(&handle).await {
            ClientEvent::JobPolled { job } => statuses.push(job.status),
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(statuses, vec![JobStatus::Running, JobStatus::Completed]);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(handle.try_recv().is_none());
    let polls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/jobs/7")
        .count();
    assert_eq!(polls, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_all_cancels_live_loops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json(3, "running")))
        .mount(&server)
        .await;

    let handle = handle_for(&server);
    handle.send(ClientCommand::StartPolling { job_id: 3 });
    assert!(matches!(
        next_event(&handle).await,
        ClientEvent::JobPolled { .. }
    ));

    handle.send(ClientCommand::StopAllPolling);
    tokio::time::sleep(Duration::from_millis(60)).await;
    while handle.try_recv().is_some() {}
    let at_stop = server.received_requests().await.unwrap().len();

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), at_stop);
    assert!(handle.try_recv().is_none());
}

async fn requests_to(server: &MockServer, job_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == job_path)
        .count()
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_polling_cancels_only_that_job() {
    let server = MockServer::start().await;
    for id in [3, 4] {
        Mock::given(method("GET"))
            .and(path(format!("/jobs/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(job_json(id, "running")))
            .mount(&server)
            .await;
    }

    let handle = handle_for(&server);
    handle.send(ClientCommand::StartPolling { job_id: 3 });
    handle.send(ClientCommand::StartPolling { job_id: 4 });

    let mut seen = Vec::new();
    while !(seen.contains(&3) && seen.contains(&4)) {
        match next_event(&handle).await {
            ClientEvent::JobPolled { job } => seen.push(job.id),
            other => panic!("unexpected event {other:?}"),
        }
    }

    handle.send(ClientCommand::StopPolling { job_id: 3 });
    tokio::time::sleep(Duration::from_millis(60)).await;
    let stopped_at = requests_to(&server, "/jobs/3").await;
    let other_at = requests_to(&server, "/jobs/4").await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(requests_to(&server, "/jobs/3").await, stopped_at);
    assert!(requests_to(&server, "/jobs/4").await > other_at);

    handle.send(ClientCommand::StopAllPolling);
}
