// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::args::{Command, HistoryArgs, PeriodArgs, PlanArgs};
use crate::commands::{App, apply_plan_args};
use crate::error::{CliError, GENERIC_FAILURE};
use qwikride::SessionStore;
use qwikride_api::{ApiConfig, CredentialSource, DirectorySink, HttpApiClient};
use qwikride_domain::{DomainError, MembershipTier, PlanForm, Role, SessionUser};
use qwikride_persistence::MemoryStorage;
use qwikride_workflow::WorkflowContext;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type TestApp = App<qwikride_api::BearerAuth<qwikride_api::ReqwestTransport>, Vec<u8>>;

fn create_rider() -> SessionUser {
    SessionUser::new(7, String::from("rider7"), String::from("Rider Seven"), Role::Rider)
}

fn create_operator() -> SessionUser {
    SessionUser::new(1, String::from("op1"), String::from("Op One"), Role::Operator)
}

fn create_session(user: Option<SessionUser>) -> Arc<SessionStore> {
    let session: Arc<SessionStore> = Arc::new(SessionStore::new(MemoryStorage::new()));
    session.hydrate();
    if let Some(user) = user {
        session.login(String::from("tok"), user).unwrap();
    }
    session
}

fn create_app(server: &MockServer, session: &Arc<SessionStore>, downloads: &Path) -> TestApp {
    let config: ApiConfig = ApiConfig::new(&server.uri());
    let credentials: Arc<dyn CredentialSource> = session.clone();
    let api: HttpApiClient = qwikride_api::connect(&config, credentials).unwrap();
    let ctx = WorkflowContext::new(Arc::clone(session), Arc::new(api));
    App::new(ctx, DirectorySink::new(downloads), Vec::new())
}

fn output(app: TestApp) -> String {
    String::from_utf8(app.into_output()).unwrap()
}

fn action_message(err: &CliError) -> &str {
    match err {
        CliError::Action(message) => message,
        other => panic!("expected an action error, got {other:?}"),
    }
}

async fn mount_json(server: &MockServer, verb: &str, route: &str, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_fleet(server: &MockServer) {
    mount_json(
        server,
        "GET",
        "/stations",
        json!([
            { "id": 1, "name": "Central", "capacity": 10, "currentBikeCount": 4, "status": "ACTIVE" },
            { "id": 2, "name": "Harbour", "capacity": 6, "currentBikeCount": 6, "status": "ACTIVE" }
        ]),
    )
    .await;
    mount_json(
        server,
        "GET",
        "/bikes",
        json!([
            { "id": "b-1", "type": "STANDARD", "status": "AVAILABLE", "stationId": 1 },
            { "id": "b-2", "type": "E_BIKE", "status": "IN_USE" }
        ]),
    )
    .await;
}

fn ledger_entry(id: i64, status: &str, total: f64) -> Value {
    json!({
        "ledgerEntryId": id,
        "durationMinutes": 20,
        "distanceKm": 3.5,
        "total": total,
        "paymentStatus": status,
        "charges": []
    })
}

#[tokio::test]
async fn test_login_stores_session_and_greets_user() {
    let server: MockServer = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "username": "ada", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-1", "username": "ada", "fullName": "Ada Rider", "role": "RIDER", "id": 42
        })))
        .expect(1)
        .mount(&server)
        .await;
    let dir: TempDir = TempDir::new().unwrap();
    let session: Arc<SessionStore> = create_session(None);
    let mut app: TestApp = create_app(&server, &session, dir.path());

    app.run(Command::Login {
        username: String::from(" ada "),
        password: String::from("secret"),
    })
    .await
    .unwrap();

    assert_eq!(session.bearer_token().as_deref(), Some("jwt-1"));
    assert_eq!(output(app), "Signed in as ada (Ada Rider) [RIDER]\n");
}

#[tokio::test]
async fn test_login_failure_is_reported_generically() {
    let server: MockServer = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "no such user" })))
        .mount(&server)
        .await;
    let dir: TempDir = TempDir::new().unwrap();
    let session: Arc<SessionStore> = create_session(None);
    let mut app: TestApp = create_app(&server, &session, dir.path());

    let err: CliError = app
        .run(Command::Login {
            username: String::from("ada"),
            password: String::from("wrong"),
        })
        .await
        .unwrap_err();

    assert_eq!(action_message(&err), "Invalid username or password");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_whoami_requires_a_session() {
    let server: MockServer = MockServer::start().await;
    let dir: TempDir = TempDir::new().unwrap();
    let mut app: TestApp = create_app(&server, &create_session(None), dir.path());

    let err: CliError = app.run(Command::Whoami).await.unwrap_err();

    assert_eq!(action_message(&err), DomainError::NotSignedIn.to_string());
}

#[tokio::test]
async fn test_logout_clears_the_session() {
    let server: MockServer = MockServer::start().await;
    let dir: TempDir = TempDir::new().unwrap();
    let session: Arc<SessionStore> = create_session(Some(create_rider()));
    let mut app: TestApp = create_app(&server, &session, dir.path());

    app.run(Command::Logout).await.unwrap();

    assert!(!session.is_authenticated());
    assert_eq!(output(app), "Signed out\n");
}

#[tokio::test]
async fn test_billing_shows_balance_entries_and_summary() {
    let server: MockServer = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/prc/billing/history/7",
        json!([ledger_entry(1, "PENDING", 15.5), ledger_entry(2, "PAID", 4.0)]),
    )
    .await;
    mount_json(
        &server,
        "GET",
        "/prc/billing/summary/1",
        json!({ "bikeId": "bike-1", "durationMinutes": 20, "distanceKm": 3.5, "total": 15.5, "charges": [] }),
    )
    .await;
    let dir: TempDir = TempDir::new().unwrap();
    let session: Arc<SessionStore> = create_session(Some(create_rider()));
    let mut app: TestApp = create_app(&server, &session, dir.path());

    app.run(Command::Billing {
        period: PeriodArgs::default(),
        entry: None,
    })
    .await
    .unwrap();

    let text: String = output(app);
    assert!(text.starts_with("Pending balance: $15.50\n"));
    assert!(text.contains("> #1 "));
    assert!(text.contains("  #2 "));
    assert!(text.contains("Trip on bike bike-1"));
    assert_eq!(
        session.current_user().and_then(|user| user.pending_balance),
        Some(15.5)
    );
}

#[tokio::test]
async fn test_billing_rejects_unknown_entry() {
    let server: MockServer = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/prc/billing/history/7",
        json!([ledger_entry(1, "PENDING", 15.5)]),
    )
    .await;
    let dir: TempDir = TempDir::new().unwrap();
    let mut app: TestApp = create_app(&server, &create_session(Some(create_rider())), dir.path());

    let err: CliError = app
        .run(Command::Billing {
            period: PeriodArgs::default(),
            entry: Some(99),
        })
        .await
        .unwrap_err();

    assert_eq!(
        action_message(&err),
        "Ledger entry #99 is not in your billing history"
    );
}

#[tokio::test]
async fn test_billing_rejects_inverted_period_before_fetching() {
    let server: MockServer = MockServer::start().await;
    let dir: TempDir = TempDir::new().unwrap();
    let mut app: TestApp = create_app(&server, &create_session(Some(create_rider())), dir.path());

    let err: CliError = app
        .run(Command::Billing {
            period: PeriodArgs {
                start: Some(String::from("2026-03-01")),
                end: Some(String::from("2026-02-01")),
            },
            entry: None,
        })
        .await
        .unwrap_err();

    assert_eq!(
        action_message(&err),
        DomainError::HistoryRangeInverted.to_string()
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_settle_refuses_paid_entry() {
    let server: MockServer = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/prc/billing/history/7",
        json!([ledger_entry(2, "PAID", 4.0)]),
    )
    .await;
    let dir: TempDir = TempDir::new().unwrap();
    let mut app: TestApp = create_app(&server, &create_session(Some(create_rider())), dir.path());

    let err: CliError = app.run(Command::Settle { entry: 2 }).await.unwrap_err();

    assert_eq!(action_message(&err), "Ledger entry #2 has nothing to pay");
}

#[tokio::test]
async fn test_receipt_is_saved_to_download_dir() {
    let server: MockServer = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/prc/billing/history/7",
        json!([ledger_entry(2, "PAID", 4.0)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/prc/billing/receipt/2"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&server)
        .await;
    let dir: TempDir = TempDir::new().unwrap();
    let mut app: TestApp = create_app(&server, &create_session(Some(create_rider())), dir.path());

    app.run(Command::Receipt { entry: 2 }).await.unwrap();

    let saved: Vec<u8> = std::fs::read(dir.path().join("receipt-2.pdf")).unwrap();
    assert_eq!(saved, b"%PDF-1.4");
    assert!(output(app).starts_with("Receipt downloaded.\n"));
}

#[tokio::test]
async fn test_reserve_prints_console_message() {
    let server: MockServer = MockServer::start().await;
    mount_fleet(&server).await;
    Mock::given(method("POST"))
        .and(path("/bikes/reserve"))
        .and(body_json(json!({ "stationId": 1, "userId": 7, "expiresAfterMinutes": 15 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            { "id": "b-1", "type": "STANDARD", "status": "RESERVED", "stationId": 1, "reservedByUserId": 7 }
        )))
        .expect(1)
        .mount(&server)
        .await;
    let dir: TempDir = TempDir::new().unwrap();
    let mut app: TestApp = create_app(&server, &create_session(Some(create_rider())), dir.path());

    app.run(Command::Reserve { station: 1 }).await.unwrap();

    assert_eq!(
        output(app),
        "Bike reserved successfully (expires in 15 minutes)\n"
    );
}

#[tokio::test]
async fn test_return_to_full_station_is_refused_locally() {
    let server: MockServer = MockServer::start().await;
    mount_fleet(&server).await;
    let dir: TempDir = TempDir::new().unwrap();
    let mut app: TestApp = create_app(&server, &create_session(Some(create_rider())), dir.path());

    let err: CliError = app
        .run(Command::Return {
            bike: String::from("b-2"),
            station: 2,
            duration: 12.0,
            distance: 2.5,
        })
        .await
        .unwrap_err();

    assert!(!action_message(&err).is_empty());
    let posted: usize = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.method.as_str() == "POST")
        .count();
    assert_eq!(posted, 0);
}

#[tokio::test]
async fn test_move_is_refused_for_riders() {
    let server: MockServer = MockServer::start().await;
    mount_fleet(&server).await;
    let dir: TempDir = TempDir::new().unwrap();
    let mut app: TestApp = create_app(&server, &create_session(Some(create_rider())), dir.path());

    let err: CliError = app
        .run(Command::Move {
            bike: String::from("b-1"),
            from: 1,
            to: 2,
        })
        .await
        .unwrap_err();

    assert_eq!(
        action_message(&err),
        DomainError::OperatorOnly {
            action: "move bikes"
        }
        .to_string()
    );
}

#[tokio::test]
async fn test_stations_fail_when_fleet_cannot_load() {
    let server: MockServer = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stations"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir: TempDir = TempDir::new().unwrap();
    let mut app: TestApp = create_app(&server, &create_session(Some(create_rider())), dir.path());

    let err: CliError = app.run(Command::Stations).await.unwrap_err();

    assert_eq!(action_message(&err), "Failed to load system data");
}

#[tokio::test]
async fn test_maintenance_prints_pending_warning() {
    let server: MockServer = MockServer::start().await;
    let dir: TempDir = TempDir::new().unwrap();
    let mut app: TestApp = create_app(&server, &create_session(Some(create_operator())), dir.path());

    app.run(Command::Maintenance {
        bike: String::from("b-1"),
    })
    .await
    .unwrap();

    assert_eq!(
        output(app),
        "Bike marked for maintenance (feature pending backend support)\n"
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_plan_update_requires_known_plan() {
    let server: MockServer = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/prc/pricing/admin",
        json!([{ "planVersionId": "p-1", "planName": "Standard", "baseFee": 1.0, "perMinuteRate": 0.25 }]),
    )
    .await;
    let dir: TempDir = TempDir::new().unwrap();
    let mut app: TestApp = create_app(&server, &create_session(Some(create_operator())), dir.path());

    let err: CliError = app
        .run(Command::PlanUpdate {
            plan_version_id: String::from("p-9"),
            plan: PlanArgs::default(),
        })
        .await
        .unwrap_err();

    assert_eq!(action_message(&err), "Plan p-9 not found");
}

#[tokio::test]
async fn test_history_rejects_inverted_range() {
    let server: MockServer = MockServer::start().await;
    let dir: TempDir = TempDir::new().unwrap();
    let mut app: TestApp = create_app(&server, &create_session(Some(create_rider())), dir.path());

    let err: CliError = app
        .run(Command::History(HistoryArgs {
            start_date: Some(String::from("2026-05-02")),
            end_date: Some(String::from("2026-05-01")),
            ..HistoryArgs::default()
        }))
        .await
        .unwrap_err();

    assert_eq!(
        action_message(&err),
        DomainError::HistoryRangeInverted.to_string()
    );
}

#[test]
fn test_apply_plan_args_keeps_omitted_fields() {
    let mut form: PlanForm = PlanForm {
        plan_name: String::from("Standard"),
        base_fee: String::from("1.00"),
        ..PlanForm::default()
    };
    let args: PlanArgs = PlanArgs {
        name: Some(String::from("Weekend")),
        tier: Some(MembershipTier::Premium),
        draft: true,
        ..PlanArgs::default()
    };

    apply_plan_args(&args, &mut form);

    assert_eq!(form.plan_name, "Weekend");
    assert_eq!(form.base_fee, "1.00");
    assert_eq!(form.membership_tier, MembershipTier::Premium);
    assert!(!form.publish);
}

#[test]
fn test_internal_errors_show_generic_message() {
    let io: CliError = CliError::from(std::io::Error::other("broken pipe"));
    let action: CliError = CliError::action("Only operators can move bikes.");

    assert_eq!(io.user_message(), GENERIC_FAILURE);
    assert_eq!(action.user_message(), "Only operators can move bikes.");
}
