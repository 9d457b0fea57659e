// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{ScriptedTransport, json_response, request_body, text_response};
use crate::{ApiClient, ApiError, ApiResponse, Download, HttpRequest, Method, TransportError};
use qwikride_domain::{
    BillingLedgerEntry, BillingPeriod, DisputeResolution, LoginRequest, LoginResponse, MoveRequest,
    PaymentResult, PaymentStatus, RideHistoryFilter, RideStatus, Role, SettleRequest, Station,
    StationStatus, StationStatusUpdate,
};
use serde_json::json;

fn create_client() -> (ScriptedTransport, ApiClient<ScriptedTransport>) {
    let transport: ScriptedTransport = ScriptedTransport::default();
    (transport.clone(), ApiClient::new(transport))
}

#[tokio::test]
async fn test_login_posts_credentials_and_decodes_response() {
    let (transport, client) = create_client();
    transport.push_json(
        200,
        &json!({"token": "abc", "username": "op1", "fullName": "Op One", "role": "OPERATOR", "id": 7}),
    );

    let request: LoginRequest = LoginRequest::new("op1", "secret").unwrap();
    let response: ApiResponse<LoginResponse> = client.login(&request).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.data.token, "abc");
    assert_eq!(response.data.role, Role::Operator);

    let sent: HttpRequest = transport.last_request();
    assert_eq!(sent.method, Method::Post);
    assert_eq!(sent.path, "/auth/login");
    assert_eq!(
        request_body(&sent),
        json!({"username": "op1", "password": "secret"})
    );
}

#[tokio::test]
async fn test_list_stations_decodes_payload() {
    let (transport, client) = create_client();
    transport.push_json(
        200,
        &json!([
            {"id": 1, "name": "Central", "capacity": 10, "currentBikeCount": 4, "status": "ACTIVE"},
            {"id": 2, "name": "Harbour", "address": "1 Pier", "capacity": 8, "currentBikeCount": 0, "status": "OUT_OF_SERVICE"}
        ]),
    );

    let stations: Vec<Station> = client.list_stations().await.unwrap().into_data();
    assert_eq!(stations.len(), 2);
    assert_eq!(stations[1].status, StationStatus::OutOfService);
    assert_eq!(transport.last_request().path, "/stations");
}

#[tokio::test]
async fn test_history_filters_become_query_parameters() {
    let (transport, client) = create_client();
    transport.push_json(200, &json!([]));

    let filter: RideHistoryFilter = RideHistoryFilter {
        start_date: Some(String::from("2025-01-01")),
        status: Some(RideStatus::Completed),
        page: Some(0),
        ..RideHistoryFilter::default()
    };
    client.get_all_ride_histories(&filter).await.unwrap();

    let sent: HttpRequest = transport.last_request();
    assert_eq!(sent.path, "/history/all");
    assert_eq!(
        sent.query,
        vec![
            (String::from("startDate"), String::from("2025-01-01")),
            (String::from("status"), String::from("COMPLETED")),
            (String::from("page"), String::from("0")),
        ]
    );
}

#[tokio::test]
async fn test_billing_history_sends_period() {
    let (transport, client) = create_client();
    transport.push_json(
        200,
        &json!([{"ledgerEntryId": 1, "total": 12.5, "paymentStatus": "PENDING"}]),
    );

    let period: BillingPeriod = BillingPeriod::new(Some("2025-03-01"), None).unwrap();
    let entries: Vec<BillingLedgerEntry> = client
        .get_billing_history(42, &period)
        .await
        .unwrap()
        .into_data();

    assert_eq!(entries[0].payment_status, PaymentStatus::Pending);
    let sent: HttpRequest = transport.last_request();
    assert_eq!(sent.path, "/prc/billing/history/42");
    assert_eq!(
        sent.query,
        vec![(String::from("start"), String::from("2025-03-01T00:00:00"))]
    );
}

#[tokio::test]
async fn test_settle_returns_business_failure_as_data() {
    let (transport, client) = create_client();
    transport.push_json(200, &json!({"success": false, "failureReason": "Card declined"}));

    let result: PaymentResult = client
        .settle_payment(9, &SettleRequest::default())
        .await
        .unwrap()
        .into_data();

    assert!(!result.success);
    assert_eq!(result.user_message(), "Payment failed: Card declined");
    let sent: HttpRequest = transport.last_request();
    assert_eq!(sent.path, "/prc/billing/settle/9");
    assert_eq!(
        request_body(&sent),
        json!({"paymentMethodToken": "saved-default"})
    );
}

#[tokio::test]
async fn test_resolve_rejection_sends_null_amount() {
    let (transport, client) = create_client();
    transport.push_json(
        200,
        &json!({"id": 42, "riderId": 3, "ledgerEntryId": 5, "status": "REJECTED"}),
    );

    let resolution: DisputeResolution = DisputeResolution {
        approved: false,
        adjustment_amount: None,
        resolution_note: None,
    };
    client.resolve_dispute(42, &resolution).await.unwrap();

    let sent: HttpRequest = transport.last_request();
    assert_eq!(sent.path, "/prc/disputes/42/resolve");
    assert_eq!(
        request_body(&sent),
        json!({"approved": false, "adjustmentAmount": null, "resolutionNote": null})
    );
}

#[tokio::test]
async fn test_station_status_is_patched() {
    let (transport, client) = create_client();
    transport.push_json(
        200,
        &json!({"id": 3, "name": "Depot", "capacity": 5, "currentBikeCount": 1, "status": "OUT_OF_SERVICE"}),
    );

    client
        .update_station_status(
            3,
            StationStatusUpdate {
                status: StationStatus::OutOfService,
            },
        )
        .await
        .unwrap();

    let sent: HttpRequest = transport.last_request();
    assert_eq!(sent.method, Method::Patch);
    assert_eq!(sent.path, "/operator/stations/3/status");
    assert_eq!(request_body(&sent), json!({"status": "OUT_OF_SERVICE"}));
}

#[tokio::test]
async fn test_plan_update_uses_version_in_path() {
    let (transport, client) = create_client();
    transport.push_json(
        200,
        &json!({"planVersionId": "v2", "planName": "Basic", "baseFee": 1.0, "perMinuteRate": 0.25}),
    );

    let form: qwikride_domain::PlanForm = qwikride_domain::PlanForm {
        plan_name: String::from("Basic"),
        base_fee: String::from("1"),
        per_minute_rate: String::from("0.25"),
        ..qwikride_domain::PlanForm::default()
    };
    client
        .update_plan("v2", &form.to_request().unwrap())
        .await
        .unwrap();

    let sent: HttpRequest = transport.last_request();
    assert_eq!(sent.method, Method::Put);
    assert_eq!(sent.path, "/prc/pricing/admin/v2");
    assert_eq!(request_body(&sent)["publish"], json!(true));
}

#[tokio::test]
async fn test_receipt_download_has_deterministic_name() {
    let (transport, client) = create_client();
    transport.push(Ok(crate::HttpResponse {
        status: 200,
        content_type: None,
        body: b"%PDF-1.4".to_vec(),
    }));

    let download: Download = client.download_receipt(17).await.unwrap().into_data();
    assert_eq!(download.filename, "receipt-17.pdf");
    assert_eq!(download.content_type, "application/pdf");
    assert_eq!(download.bytes, b"%PDF-1.4".to_vec());
    assert_eq!(transport.last_request().path, "/prc/billing/receipt/17");
}

#[tokio::test]
async fn test_ledger_export_keeps_server_content_type() {
    let (transport, client) = create_client();
    transport.push(Ok(text_response(200, "ledgerEntryId,total\n1,12.50\n")));

    let download: Download = client
        .export_ledger(&BillingPeriod::default())
        .await
        .unwrap()
        .into_data();
    assert_eq!(download.filename, "ledger-export.csv");
    assert_eq!(download.content_type, "text/plain");
    assert!(transport.last_request().query.is_empty());
}

#[tokio::test]
async fn test_rejection_is_classified() {
    let (transport, client) = create_client();
    transport.push_json(400, &json!({"message": "Destination station has no free docks"}));

    let request: MoveRequest = MoveRequest {
        bike_id: String::from("b-1"),
        new_station_id: 2,
        operator_id: 1,
    };
    let err: ApiError = client.move_bike(&request).await.unwrap_err();
    assert_eq!(
        err.message_or("Failed to move bike"),
        "Destination station has no free docks"
    );
}

#[tokio::test]
async fn test_undecodable_success_is_unknown() {
    let (transport, client) = create_client();
    transport.push(Ok(json_response(200, &json!({"unexpected": true}))));

    let err: ApiError = client.list_bikes().await.unwrap_err();
    assert!(matches!(err, ApiError::Unknown { status: Some(200), .. }));
}

#[tokio::test]
async fn test_connection_failure_is_unreachable() {
    let (transport, client) = create_client();
    transport.push(Err(TransportError::Connect(String::from("refused"))));

    let err: ApiError = client.get_pricing_plans().await.unwrap_err();
    assert!(matches!(err, ApiError::Unreachable { .. }));
}
