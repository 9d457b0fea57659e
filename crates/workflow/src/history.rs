// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::context::WorkflowContext;
use crate::section::{Outcome, Section};
use qwikride_api::{ApiError, Transport};
use qwikride_domain::{
    DomainError, RideHistoryFilter, RideHistoryRecord, RideStatistics, SessionUser,
};
use tracing::{debug, warn};

const ACCESS_DENIED: &str = "Access denied. Please log in again.";
const UNREACHABLE: &str = "Failed to connect to server. Please ensure the backend is running.";
const LOAD_FAILED: &str = "Failed to load ride history. Please try again.";

/// Past rides of the signed-in user, or of everyone for operators.
#[derive(Debug)]
pub struct RideHistoryView<T> {
    ctx: WorkflowContext<T>,
    filter: RideHistoryFilter,
    records: Section<Vec<RideHistoryRecord>>,
    statistics: Option<RideStatistics>,
}

impl<T: Transport> RideHistoryView<T> {
    #[must_use]
    pub fn new(ctx: WorkflowContext<T>) -> Self {
        Self {
            ctx,
            filter: RideHistoryFilter::default(),
            records: Section::default(),
            statistics: None,
        }
    }

    #[must_use]
    pub const fn records(&self) -> &Section<Vec<RideHistoryRecord>> {
        &self.records
    }

    #[must_use]
    pub const fn statistics(&self) -> Option<&RideStatistics> {
        self.statistics.as_ref()
    }

    #[must_use]
    pub const fn filter(&self) -> &RideHistoryFilter {
        &self.filter
    }

    /// Loads the records and the rider's statistics.
    pub async fn mount(&mut self) -> Outcome {
        let outcome: Outcome = self.fetch().await;
        self.fetch_statistics().await;
        outcome
    }

    /// Fetches records matching the current filter.
    ///
    /// Operators see every rider's rides. Records are emptied on any
    /// failure; a 404 is an empty history.
    pub async fn fetch(&mut self) -> Outcome {
        let Some(user) = self.ctx.current_user() else {
            let message: String = DomainError::NotSignedIn.to_string();
            self.records.fail(message.clone());
            return Outcome::Rejected(message);
        };
        self.records.begin();

        let result = if user.is_operator() {
            self.ctx.api().get_all_ride_histories(&self.filter).await
        } else {
            self.ctx
                .api()
                .get_user_ride_history(user.id, &self.filter)
                .await
        };

        match result {
            Ok(response) => {
                debug!(user_id = user.id, rides = response.data.len(), "Ride history loaded");
                self.records.succeed(response.data);
                Outcome::Completed
            }
            Err(ApiError::NotFound) => {
                self.records.succeed(Vec::new());
                Outcome::Completed
            }
            Err(e) => {
                warn!(user_id = user.id, error = %e, "Failed to load ride history");
                let message: String = self.describe(&e);
                self.records.fail(message.clone());
                Outcome::Failed(message)
            }
        }
    }

    fn describe(&self, err: &ApiError) -> String {
        match err {
            ApiError::Unauthorized { status: 403 } => String::from(ACCESS_DENIED),
            ApiError::Unauthorized { .. } => self.ctx.describe_failure(err, LOAD_FAILED),
            ApiError::Unreachable { .. } => String::from(UNREACHABLE),
            _ => String::from(LOAD_FAILED),
        }
    }

    /// Fetches the signed-in user's ride statistics.
    ///
    /// Failures are logged and leave the previous statistics in place.
    pub async fn fetch_statistics(&mut self) {
        let Some(user) = self.ctx.current_user() else {
            return;
        };
        match self.ctx.api().get_statistics(user.id).await {
            Ok(response) => self.statistics = Some(response.data),
            Err(e) => warn!(user_id = user.id, error = %e, "Failed to load ride statistics"),
        }
    }

    /// Fetches a single ride.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if the ride cannot be loaded.
    pub async fn ride(&self, ride_id: i64) -> Result<RideHistoryRecord, ApiError> {
        Ok(self.ctx.api().get_ride_history(ride_id).await?.data)
    }

    /// Validates and applies `filter`, then refetches.
    pub async fn apply_filters(&mut self, filter: RideHistoryFilter) -> Outcome {
        if let Err(e) = filter.validate() {
            return Outcome::Rejected(e.to_string());
        }
        self.filter = filter;
        self.fetch().await
    }

    /// Clears every filter and refetches.
    pub async fn clear_filters(&mut self) -> Outcome {
        self.filter = RideHistoryFilter::default();
        self.fetch().await
    }

    /// Returns whether the signed-in user sees every rider's rides.
    #[must_use]
    pub fn shows_all_riders(&self) -> bool {
        self.ctx
            .current_user()
            .as_ref()
            .is_some_and(SessionUser::is_operator)
    }
}
