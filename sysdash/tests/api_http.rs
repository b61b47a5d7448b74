//! HTTP-level behaviour of the API client and the dashboard flows built on it,
//! exercised against a mock server.

use std::time::Instant;

use mockito::{Matcher, Server};
use serde_json::json;
use sysdash::api::{ApiClient, Fetched};
use sysdash::app::fetch;
use sysdash::dashboard::{ApiEvent, Command, Dashboard, Mutation, View};
use sysdash::error::{handle_fetch_error, DashError, ErrorDisposition, ErrorKind};
use sysdash::poll::{Endpoint, PollIntervals};
use sysdash::types::{NewTaskRequest, ServiceAction};

const METRICS: &str = r#"{
  "cpu": {"usage": 12.5},
  "memory": {"used_percent": 40.25, "total": 8589934592, "used": 3457448345},
  "disk": {"used_percent": 71.0},
  "network": {"bytes_sent": 2048, "bytes_recv": 1536},
  "load": {"load1": 0.5, "load5": 0.25, "load15": 0.1},
  "host": {"uptime": 90061},
  "processes": [
    {"Pid": 1, "Username": "root", "Name": "init", "CPUUsage": 0.1, "MemUsage": 0.2}
  ],
  "network_interfaces": {"interfaces": [
    {"Name": "eth0", "MacAddress": "aa:bb:cc:dd:ee:ff", "IPs": ["10.0.0.2/24"]}
  ]}
}"#;

const SERVICES: &str = r#"{
  "1": {"Name": "nginx", "Status": "STARTED"},
  "2": {"Name": "redis", "Status": "STOPPED"}
}"#;

const TASKS: &str = r#"{
  "7": {"ID": 7, "Description": "backup", "IsFinished": false, "RunTime": "2030-01-01T10:00:00Z"}
}"#;

fn client(server: &Server) -> ApiClient {
    ApiClient::new(&server.url(), None).expect("client")
}

#[tokio::test]
async fn metrics_payload_decodes() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/api/metrics")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(METRICS)
        .create_async()
        .await;

    let Fetched::Data(snap) = client(&server).metrics().await.unwrap() else {
        panic!("expected data");
    };
    assert_eq!(snap.cpu.usage, 12.5);
    assert_eq!(snap.host.uptime, 90061);
    assert_eq!(snap.processes[0].username, "root");
    assert_eq!(snap.network_interfaces.interfaces[0].ips, ["10.0.0.2/24"]);
    m.assert_async().await;
}

#[tokio::test]
async fn redirect_is_reported_without_parsing() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/services")
        .with_status(302)
        .with_header("location", "/login")
        .create_async()
        .await;
    server
        .mock("GET", "/login")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>login</html>")
        .create_async()
        .await;

    let res = client(&server).services().await.unwrap();
    assert_eq!(res, Fetched::Redirected);
}

#[tokio::test]
async fn redirected_service_action_is_reported() {
    let mut server = Server::new_async().await;
    let post = server
        .mock("POST", "/api/services")
        .match_body(Matcher::Json(json!({"name": "nginx", "action": "stop"})))
        .with_status(303)
        .with_header("location", "/")
        .create_async()
        .await;
    server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>home</html>")
        .create_async()
        .await;

    let res = client(&server)
        .perform_service_action("nginx", ServiceAction::Stop)
        .await
        .unwrap();
    assert_eq!(res, Fetched::Redirected);
    post.assert_async().await;
}

#[tokio::test]
async fn server_error_becomes_error_notification() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/tasks")
        .with_status(500)
        .create_async()
        .await;

    let err = client(&server).tasks().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.kind(), ErrorKind::ApplicationError);
    match handle_fetch_error(&err, "fetching tasks") {
        ErrorDisposition::Notify(note) => {
            assert!(note.message.contains("500"), "{}", note.message);
            assert!(note.message.contains("fetching tasks"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_transport_failure() {
    // nothing listens on port 1
    let api = ApiClient::new("http://127.0.0.1:1", None).unwrap();
    let err = api.metrics().await.unwrap_err();
    assert!(matches!(err, DashError::Transport(_)), "{err:?}");
    assert_eq!(handle_fetch_error(&err, "fetching metrics"), ErrorDisposition::RedirectRoot);
}

#[tokio::test]
async fn service_action_posts_name_and_action() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/services")
        .match_body(Matcher::Json(json!({"name": "nginx", "action": "reload"})))
        .with_status(202)
        .create_async()
        .await;

    let res = client(&server)
        .perform_service_action("nginx", ServiceAction::Reload)
        .await
        .unwrap();
    assert_eq!(res, Fetched::Data(()));
    m.assert_async().await;
}

#[tokio::test]
async fn schedule_task_posts_utc_run_time() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/tasks")
        .match_body(Matcher::Json(
            json!({"description": "backup", "run_time": "2030-01-01T10:00:00Z"}),
        ))
        .with_status(201)
        .create_async()
        .await;

    let req = NewTaskRequest {
        description: "backup".into(),
        run_time: "2030-01-01T10:00:00Z".parse().unwrap(),
    };
    client(&server).schedule_task(&req).await.unwrap();
    m.assert_async().await;
}

/// Run every fetch in `cmds` against the server and feed the results back.
async fn drive(api: &ApiClient, dash: &mut Dashboard, cmds: Vec<Command>) -> Vec<Command> {
    let mut rest = Vec::new();
    for cmd in cmds {
        match cmd {
            Command::Fetch(ticket) => {
                let result = fetch(api, ticket.endpoint).await;
                let follow = dash.apply(ApiEvent::Polled { ticket, result }, Instant::now());
                rest.extend(follow);
            }
            other => rest.push(other),
        }
    }
    rest
}

#[tokio::test]
async fn delete_task_refetches_tasks_once() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/metrics")
        .with_status(200)
        .with_body(METRICS)
        .create_async()
        .await;
    server
        .mock("GET", "/api/services")
        .with_status(200)
        .with_body(SERVICES)
        .create_async()
        .await;
    let tasks = server
        .mock("GET", "/api/tasks")
        .with_status(200)
        .with_body(TASKS)
        .expect(2)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/tasks")
        .match_query(Matcher::UrlEncoded("id".into(), "7".into()))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let api = client(&server);
    let mut dash = Dashboard::new(PollIntervals::default());
    let cmds = dash.navigate(Some("dashboard"), Instant::now());
    assert!(drive(&api, &mut dash, cmds).await.is_empty());
    assert_eq!(dash.services.rows.as_ref().map(Vec::len), Some(2));

    let cmds = dash.handle_click(
        sysdash::dashboard::ClickTarget::TaskDelete { row: 0 },
        Instant::now(),
    );
    assert_eq!(cmds, [Command::DeleteTask(7)]);
    let result = api.remove_task(7).await;
    let follow = dash.apply(
        ApiEvent::Mutated {
            mutation: Mutation::DeleteTask(7),
            generation: dash.scheduler.generation(),
            result,
        },
        Instant::now(),
    );
    assert_eq!(follow.len(), 1);
    assert!(matches!(&follow[0], Command::Fetch(t) if t.endpoint == Endpoint::Tasks));
    drive(&api, &mut dash, follow).await;

    delete.assert_async().await;
    tasks.assert_async().await;
}

#[tokio::test]
async fn redirect_during_polling_returns_to_root() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/metrics")
        .with_status(303)
        .with_header("location", "/")
        .create_async()
        .await;
    server.mock("GET", "/").with_status(200).with_body("home").create_async().await;
    server
        .mock("GET", "/api/services")
        .with_status(200)
        .with_body(SERVICES)
        .create_async()
        .await;
    server
        .mock("GET", "/api/tasks")
        .with_status(200)
        .with_body(TASKS)
        .create_async()
        .await;

    let api = client(&server);
    let mut dash = Dashboard::new(PollIntervals::default());
    let cmds = dash.navigate(Some("dashboard"), Instant::now());
    drive(&api, &mut dash, cmds).await;
    assert_eq!(dash.view, View::Home);
    // services/tasks answered after the redirect and were discarded
    assert!(dash.services.rows.is_none());
    assert!(dash.tasks.rows.is_none());
    assert!(!dash.scheduler.is_active());
}
