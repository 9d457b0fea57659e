// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed backend operations.

use crate::download::{Download, LEDGER_EXPORT_FILENAME, receipt_filename};
use crate::error::ApiError;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};
use qwikride_domain::{
    Bike, BillingLedgerEntry, BillingPeriod, CheckoutRequest, CreateBikeRequest,
    DisputeResolution, DisputeSubmission, DisputeTicket, LoginRequest, LoginResponse,
    MoveRequest, PaymentResult, PlanUpsertRequest, PricingPlan, RegisterRequest, RegisteredUser,
    ReservationRequest, ReturnRequest, RideHistoryFilter, RideHistoryRecord, RideStatistics,
    SettleRequest, Station, StationStatusUpdate, TripSummary,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// A decoded successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
}

impl<T> ApiResponse<T> {
    /// Discards the status and returns the payload.
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Gateway to the backend REST API.
///
/// Authentication is the transport's concern; wrap the transport in
/// [`crate::BearerAuth`] to attach the session token.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    transport: T,
}

fn json_request<B: Serialize>(
    method: Method,
    path: impl Into<String>,
    body: &B,
) -> Result<HttpRequest, ApiError> {
    let encoded: String = serde_json::to_string(body).map_err(|e| ApiError::Unknown {
        status: None,
        detail: format!("failed to encode request body: {e}"),
    })?;
    Ok(HttpRequest::new(method, path).with_json_body(encoded))
}

fn content_type_or(response: &HttpResponse, fallback: &str) -> String {
    response
        .content_type
        .clone()
        .unwrap_or_else(|| fallback.to_string())
}

impl<T: Transport> ApiClient<T> {
    /// Creates a client over `transport`.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method: Method = request.method;
        let path: String = request.path.clone();
        let response: HttpResponse = self.transport.send(request).await.map_err(|e| {
            warn!(%method, %path, error = %e, "Request failed before a response arrived");
            ApiError::from(e)
        })?;
        if response.is_success() {
            debug!(%method, %path, status = response.status, "Request succeeded");
            return Ok(response);
        }
        let err: ApiError = ApiError::from_response(&response);
        debug!(%method, %path, status = response.status, error = %err, "Request rejected");
        Err(err)
    }

    async fn call<R: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> Result<ApiResponse<R>, ApiError> {
        let response: HttpResponse = self.execute(request).await?;
        let data: R = serde_json::from_slice(&response.body)
            .map_err(|e| ApiError::undecodable(response.status, &e))?;
        Ok(ApiResponse {
            data,
            status: response.status,
        })
    }

    async fn download(
        &self,
        request: HttpRequest,
        filename: String,
        fallback_content_type: &str,
    ) -> Result<ApiResponse<Download>, ApiError> {
        let response: HttpResponse = self.execute(request).await?;
        let content_type: String = content_type_or(&response, fallback_content_type);
        Ok(ApiResponse {
            status: response.status,
            data: Download {
                filename,
                content_type,
                bytes: response.body,
            },
        })
    }

    // Authentication

    /// `POST /auth/register`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<ApiResponse<RegisteredUser>, ApiError> {
        self.call(json_request(Method::Post, "/auth/register", request)?)
            .await
    }

    /// `POST /auth/login`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<ApiResponse<LoginResponse>, ApiError> {
        self.call(json_request(Method::Post, "/auth/login", request)?)
            .await
    }

    // Ride history

    /// `GET /history/user/{userId}` with the set filters.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn get_user_ride_history(
        &self,
        user_id: i64,
        filter: &RideHistoryFilter,
    ) -> Result<ApiResponse<Vec<RideHistoryRecord>>, ApiError> {
        self.call(HttpRequest::get(format!("/history/user/{user_id}")).with_query(filter.query()))
            .await
    }

    /// `GET /history/all` with the set filters. Operators only.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn get_all_ride_histories(
        &self,
        filter: &RideHistoryFilter,
    ) -> Result<ApiResponse<Vec<RideHistoryRecord>>, ApiError> {
        self.call(HttpRequest::get("/history/all").with_query(filter.query()))
            .await
    }

    /// `GET /history/{id}`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn get_ride_history(
        &self,
        ride_id: i64,
    ) -> Result<ApiResponse<RideHistoryRecord>, ApiError> {
        self.call(HttpRequest::get(format!("/history/{ride_id}")))
            .await
    }

    /// `GET /history/user/{userId}/statistics`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn get_statistics(
        &self,
        user_id: i64,
    ) -> Result<ApiResponse<RideStatistics>, ApiError> {
        self.call(HttpRequest::get(format!("/history/user/{user_id}/statistics")))
            .await
    }

    // Fleet

    /// `GET /stations`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn list_stations(&self) -> Result<ApiResponse<Vec<Station>>, ApiError> {
        self.call(HttpRequest::get("/stations")).await
    }

    /// `GET /bikes`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn list_bikes(&self) -> Result<ApiResponse<Vec<Bike>>, ApiError> {
        self.call(HttpRequest::get("/bikes")).await
    }

    /// `POST /bikes/reserve`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn reserve_bike(
        &self,
        request: &ReservationRequest,
    ) -> Result<ApiResponse<Bike>, ApiError> {
        self.call(json_request(Method::Post, "/bikes/reserve", request)?)
            .await
    }

    /// `POST /bikes/checkout`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn checkout_bike(
        &self,
        request: &CheckoutRequest,
    ) -> Result<ApiResponse<Bike>, ApiError> {
        self.call(json_request(Method::Post, "/bikes/checkout", request)?)
            .await
    }

    /// `POST /bikes/return`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn return_bike(&self, request: &ReturnRequest) -> Result<ApiResponse<Bike>, ApiError> {
        self.call(json_request(Method::Post, "/bikes/return", request)?)
            .await
    }

    /// `POST /bikes/move`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn move_bike(&self, request: &MoveRequest) -> Result<ApiResponse<Bike>, ApiError> {
        self.call(json_request(Method::Post, "/bikes/move", request)?)
            .await
    }

    /// `POST /bikes/create`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn create_bike(
        &self,
        request: &CreateBikeRequest,
    ) -> Result<ApiResponse<Bike>, ApiError> {
        self.call(json_request(Method::Post, "/bikes/create", request)?)
            .await
    }

    /// `PATCH /operator/stations/{id}/status`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn update_station_status(
        &self,
        station_id: i64,
        update: StationStatusUpdate,
    ) -> Result<ApiResponse<Station>, ApiError> {
        self.call(json_request(
            Method::Patch,
            format!("/operator/stations/{station_id}/status"),
            &update,
        )?)
        .await
    }

    // Pricing

    /// `GET /prc/pricing/plans`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn get_pricing_plans(&self) -> Result<ApiResponse<Vec<PricingPlan>>, ApiError> {
        self.call(HttpRequest::get("/prc/pricing/plans")).await
    }

    /// `GET /prc/pricing/admin`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn list_plans(&self) -> Result<ApiResponse<Vec<PricingPlan>>, ApiError> {
        self.call(HttpRequest::get("/prc/pricing/admin")).await
    }

    /// `POST /prc/pricing/admin`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn create_plan(
        &self,
        request: &PlanUpsertRequest,
    ) -> Result<ApiResponse<PricingPlan>, ApiError> {
        self.call(json_request(Method::Post, "/prc/pricing/admin", request)?)
            .await
    }

    /// `PUT /prc/pricing/admin/{planVersionId}`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn update_plan(
        &self,
        plan_version_id: &str,
        request: &PlanUpsertRequest,
    ) -> Result<ApiResponse<PricingPlan>, ApiError> {
        self.call(json_request(
            Method::Put,
            format!("/prc/pricing/admin/{plan_version_id}"),
            request,
        )?)
        .await
    }

    // Billing

    /// `GET /prc/billing/history/{riderId}` within `period`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn get_billing_history(
        &self,
        rider_id: i64,
        period: &BillingPeriod,
    ) -> Result<ApiResponse<Vec<BillingLedgerEntry>>, ApiError> {
        self.call(
            HttpRequest::get(format!("/prc/billing/history/{rider_id}"))
                .with_query(period.query()),
        )
        .await
    }

    /// `GET /prc/billing/summary/{ledgerEntryId}`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn get_trip_summary(
        &self,
        ledger_entry_id: i64,
    ) -> Result<ApiResponse<TripSummary>, ApiError> {
        self.call(HttpRequest::get(format!(
            "/prc/billing/summary/{ledger_entry_id}"
        )))
        .await
    }

    /// `POST /prc/billing/settle/{ledgerEntryId}`
    ///
    /// A declined payment is a successful call with `success == false`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn settle_payment(
        &self,
        ledger_entry_id: i64,
        request: &SettleRequest,
    ) -> Result<ApiResponse<PaymentResult>, ApiError> {
        self.call(json_request(
            Method::Post,
            format!("/prc/billing/settle/{ledger_entry_id}"),
            request,
        )?)
        .await
    }

    /// `GET /prc/billing/receipt/{ledgerEntryId}` as `receipt-{id}.pdf`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn download_receipt(
        &self,
        ledger_entry_id: i64,
    ) -> Result<ApiResponse<Download>, ApiError> {
        self.download(
            HttpRequest::get(format!("/prc/billing/receipt/{ledger_entry_id}")),
            receipt_filename(ledger_entry_id),
            "application/pdf",
        )
        .await
    }

    /// `GET /prc/billing/export` within `period`, as `ledger-export.csv`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn export_ledger(
        &self,
        period: &BillingPeriod,
    ) -> Result<ApiResponse<Download>, ApiError> {
        self.download(
            HttpRequest::get("/prc/billing/export").with_query(period.query()),
            String::from(LEDGER_EXPORT_FILENAME),
            "text/csv",
        )
        .await
    }

    // Disputes

    /// `POST /prc/disputes`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn submit_dispute(
        &self,
        submission: &DisputeSubmission,
    ) -> Result<ApiResponse<DisputeTicket>, ApiError> {
        self.call(json_request(Method::Post, "/prc/disputes", submission)?)
            .await
    }

    /// `GET /prc/disputes`: the caller's own tickets.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn list_disputes(&self) -> Result<ApiResponse<Vec<DisputeTicket>>, ApiError> {
        self.call(HttpRequest::get("/prc/disputes")).await
    }

    /// `GET /prc/disputes/open`: every unresolved ticket. Operators only.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn list_open_disputes(&self) -> Result<ApiResponse<Vec<DisputeTicket>>, ApiError> {
        self.call(HttpRequest::get("/prc/disputes/open")).await
    }

    /// `POST /prc/disputes/{id}/resolve`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn resolve_dispute(
        &self,
        ticket_id: i64,
        resolution: &DisputeResolution,
    ) -> Result<ApiResponse<DisputeTicket>, ApiError> {
        self.call(json_request(
            Method::Post,
            format!("/prc/disputes/{ticket_id}/resolve"),
            resolution,
        )?)
        .await
    }
}
