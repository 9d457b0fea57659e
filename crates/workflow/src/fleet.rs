// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The station and fleet dashboard.
//!
//! Every mutation is checked against the loaded stations and bikes first.
//! A refused check is logged to the operator console and no call is made.
//! A successful mutation is followed by a full reload; station counts are
//! never adjusted locally.

use crate::context::WorkflowContext;
use crate::section::Outcome;
use qwikride_api::{ApiError, ApiResponse, Transport};
use qwikride_audit::OperationConsole;
use qwikride_domain::{
    Bike, BikeType, CheckoutRequest, CreateBikeRequest, DomainError, MoveRequest,
    RESERVATION_MINUTES, ReservationRequest, ReturnRequest, SessionUser, Station,
    StationInventory, StationStatus, StationStatusUpdate, find_bike, find_station,
    station_inventory, validate_checkout, validate_move, validate_reservation, validate_return,
    validate_ride_metrics,
};
use tracing::{debug, warn};

const LOADED: &str = "System loaded successfully";
const LOAD_FAILED: &str = "Failed to load system data";
const RESET_DONE: &str = "System reset to initial state";
const RESET_FAILED: &str = "Failed to reset system";
const RESERVE_FAILED: &str = "Failed to reserve bike";
const CHECKOUT_FAILED: &str = "Failed to checkout bike";
const RETURN_FAILED: &str = "Failed to return bike";
const MOVE_FAILED: &str = "Failed to move bike";
const CREATE_FAILED: &str = "Failed to create bike";
const STATUS_FAILED: &str = "Failed to update station status";
const MAINTENANCE_PENDING: &str = "Bike marked for maintenance (feature pending backend support)";

/// State and actions of the fleet dashboard.
#[derive(Debug)]
pub struct FleetView<T> {
    ctx: WorkflowContext<T>,
    stations: Vec<Station>,
    bikes: Vec<Bike>,
    loading: bool,
    error: Option<String>,
    selected_station_id: Option<i64>,
    console: OperationConsole,
}

impl<T: Transport> FleetView<T> {
    #[must_use]
    pub fn new(ctx: WorkflowContext<T>) -> Self {
        Self::with_console(ctx, OperationConsole::default())
    }

    /// Creates a view logging into `console`.
    #[must_use]
    pub const fn with_console(ctx: WorkflowContext<T>, console: OperationConsole) -> Self {
        Self {
            ctx,
            stations: Vec::new(),
            bikes: Vec::new(),
            loading: false,
            error: None,
            selected_station_id: None,
            console,
        }
    }

    #[must_use]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    #[must_use]
    pub fn bikes(&self) -> &[Bike] {
        &self.bikes
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn console(&self) -> &OperationConsole {
        &self.console
    }

    pub const fn console_mut(&mut self) -> &mut OperationConsole {
        &mut self.console
    }

    /// Returns the station picked with [`Self::select_station`].
    #[must_use]
    pub fn selected_station(&self) -> Option<&Station> {
        let id: i64 = self.selected_station_id?;
        self.stations.iter().find(|station| station.id == id)
    }

    /// Counts the bikes docked at `station_id` by status.
    #[must_use]
    pub fn inventory(&self, station_id: i64) -> StationInventory {
        station_inventory(&self.bikes, station_id)
    }

    /// Fetches stations and bikes concurrently.
    ///
    /// On failure the previously loaded lists are kept and the view error
    /// is set.
    pub async fn load(&mut self) -> Outcome {
        self.loading = true;
        let ctx: WorkflowContext<T> = self.ctx.clone();
        let result = futures::try_join!(ctx.api().list_stations(), ctx.api().list_bikes());
        self.loading = false;

        match result {
            Ok((stations, bikes)) => {
                debug!(
                    stations = stations.data.len(),
                    bikes = bikes.data.len(),
                    "Fleet loaded"
                );
                self.stations = stations.data;
                self.bikes = bikes.data;
                self.error = None;
                self.console.success(LOADED);
                Outcome::Completed
            }
            Err(e) => {
                warn!(error = %e, "Failed to load fleet");
                let message: String = self.ctx.describe_failure(&e, LOAD_FAILED);
                self.error = Some(message.clone());
                self.console.error(LOAD_FAILED);
                Outcome::Failed(message)
            }
        }
    }

    /// Reloads everything from the backend.
    pub async fn reset_system(&mut self) -> Outcome {
        match self.load().await {
            Outcome::Completed => {
                self.console.success(RESET_DONE);
                Outcome::Completed
            }
            _ => {
                self.console.error(RESET_FAILED);
                Outcome::Failed(String::from(RESET_FAILED))
            }
        }
    }

    /// Makes `station_id` the selected station.
    pub fn select_station(&mut self, station_id: i64) -> Outcome {
        match find_station(&self.stations, station_id) {
            Ok(station) => {
                let message: String = format!("Selected station: {}", station.name);
                self.selected_station_id = Some(station_id);
                self.console.info(message);
                Outcome::Completed
            }
            Err(e) => self.refuse(&e),
        }
    }

    fn viewer(&mut self) -> Result<SessionUser, Outcome> {
        self.ctx
            .current_user()
            .ok_or_else(|| self.refuse(&DomainError::NotSignedIn))
    }

    fn operator(&mut self, action: &'static str) -> Result<SessionUser, Outcome> {
        let viewer: SessionUser = self.viewer()?;
        if viewer.is_operator() {
            Ok(viewer)
        } else {
            Err(self.refuse(&DomainError::OperatorOnly { action }))
        }
    }

    fn refuse(&mut self, err: &DomainError) -> Outcome {
        let message: String = err.to_string();
        debug!(reason = %message, "Fleet action refused");
        self.console.error(message.clone());
        Outcome::Rejected(message)
    }

    /// Logs the result of a mutation and reloads after success.
    async fn finish<D: Send>(
        &mut self,
        result: Result<ApiResponse<D>, ApiError>,
        success: String,
        fallback: &str,
    ) -> Outcome {
        match result {
            Ok(_) => {
                self.load().await;
                self.console.success(success);
                Outcome::Completed
            }
            Err(e) => {
                warn!(error = %e, "{fallback}");
                let message: String = self.ctx.describe_failure(&e, fallback);
                self.console.error(message.clone());
                Outcome::Failed(message)
            }
        }
    }

    /// Reserves a bike at `station_id` for the signed-in user.
    pub async fn reserve(&mut self, station_id: i64) -> Outcome {
        let viewer: SessionUser = match self.viewer() {
            Ok(viewer) => viewer,
            Err(outcome) => return outcome,
        };
        if let Err(e) = validate_reservation(&self.stations, &self.bikes, station_id) {
            return self.refuse(&e);
        }
        let request: ReservationRequest = ReservationRequest {
            station_id,
            user_id: viewer.id,
            expires_after_minutes: RESERVATION_MINUTES,
        };
        let result = self.ctx.api().reserve_bike(&request).await;
        self.finish(
            result,
            format!("Bike reserved successfully (expires in {RESERVATION_MINUTES} minutes)"),
            RESERVE_FAILED,
        )
        .await
    }

    /// Unlocks an available or reserved bike for the signed-in user.
    pub async fn checkout(&mut self, bike_id: &str) -> Outcome {
        let viewer: SessionUser = match self.viewer() {
            Ok(viewer) => viewer,
            Err(outcome) => return outcome,
        };
        if let Err(e) = validate_checkout(&self.bikes, bike_id) {
            return self.refuse(&e);
        }
        let request: CheckoutRequest = CheckoutRequest {
            bike_id: bike_id.to_string(),
            user_id: viewer.id,
        };
        let result = self.ctx.api().checkout_bike(&request).await;
        self.finish(
            result,
            String::from("Bike checked out successfully"),
            CHECKOUT_FAILED,
        )
        .await
    }

    /// Docks `bike_id` at `station_id`, reporting the ride's metrics.
    pub async fn return_bike(
        &mut self,
        bike_id: &str,
        station_id: i64,
        duration_minutes: f64,
        distance_km: f64,
    ) -> Outcome {
        let viewer: SessionUser = match self.viewer() {
            Ok(viewer) => viewer,
            Err(outcome) => return outcome,
        };
        let checked: Result<(), DomainError> = validate_return(&self.stations, station_id)
            .and_then(|_| validate_ride_metrics(duration_minutes, distance_km));
        if let Err(e) = checked {
            return self.refuse(&e);
        }
        let request: ReturnRequest = ReturnRequest {
            bike_id: bike_id.to_string(),
            return_station_id: station_id,
            user_id: viewer.id,
            duration_minutes,
            distance_km,
        };
        let result = self.ctx.api().return_bike(&request).await;
        self.finish(
            result,
            String::from("Bike returned successfully"),
            RETURN_FAILED,
        )
        .await
    }

    /// Rebalances `bike_id` from one station to another. Operators only.
    pub async fn move_bike(
        &mut self,
        bike_id: &str,
        source_station_id: i64,
        destination_station_id: i64,
    ) -> Outcome {
        let viewer: SessionUser = match self.operator("move bikes") {
            Ok(viewer) => viewer,
            Err(outcome) => return outcome,
        };
        let (source, destination): (String, String) = match validate_move(
            &self.stations,
            &self.bikes,
            source_station_id,
            destination_station_id,
        ) {
            Ok((source, destination)) => (source.name.clone(), destination.name.clone()),
            Err(e) => return self.refuse(&e),
        };
        if let Err(e) = find_bike(&self.bikes, bike_id) {
            return self.refuse(&e);
        }
        let request: MoveRequest = MoveRequest {
            bike_id: bike_id.to_string(),
            new_station_id: destination_station_id,
            operator_id: viewer.id,
        };
        let result = self.ctx.api().move_bike(&request).await;
        self.finish(
            result,
            format!("Bike moved from {source} to {destination}"),
            MOVE_FAILED,
        )
        .await
    }

    /// Adds a new bike docked at `station_id`. Operators only.
    pub async fn create_bike(&mut self, bike_type: BikeType, station_id: i64) -> Outcome {
        if let Err(outcome) = self.operator("create bikes") {
            return outcome;
        }
        if let Err(e) = find_station(&self.stations, station_id) {
            return self.refuse(&e);
        }
        let request: CreateBikeRequest = CreateBikeRequest {
            bike_type,
            station_id,
        };
        let result = self.ctx.api().create_bike(&request).await;
        self.finish(
            result,
            String::from("Bike created successfully"),
            CREATE_FAILED,
        )
        .await
    }

    /// Flips a station between active and out of service. Operators only.
    pub async fn toggle_station_status(&mut self, station_id: i64) -> Outcome {
        if let Err(outcome) = self.operator("change station status") {
            return outcome;
        }
        let target: StationStatus = match find_station(&self.stations, station_id) {
            Ok(station) => station.status.toggled(),
            Err(e) => return self.refuse(&e),
        };
        let result = self
            .ctx
            .api()
            .update_station_status(station_id, StationStatusUpdate { status: target })
            .await;
        self.finish(
            result,
            format!("Station marked as {}", target.as_str()),
            STATUS_FAILED,
        )
        .await
    }

    /// Logs a maintenance request. The backend has no endpoint for it yet.
    pub fn mark_for_maintenance(&mut self, bike_id: &str) -> Outcome {
        debug!(bike_id, "Maintenance requested");
        self.console.warning(MAINTENANCE_PENDING);
        Outcome::Skipped
    }
}
