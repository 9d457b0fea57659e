// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain-text rendering of fetched records.

use qwikride_domain::{
    Bike, BillingLedgerEntry, DisputeTicket, PricingPlan, RideHistoryRecord, RideStatistics,
    SessionUser, Station, StationInventory, TripSummary,
};
use qwikride_workflow::LedgerPreview;
use std::fmt::Write;

const MISSING: &str = "-";

pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING)
}

fn id_or_missing(value: Option<i64>) -> String {
    value.map_or_else(|| String::from(MISSING), |id| id.to_string())
}

pub fn user(user: &SessionUser) -> String {
    let mut line: String = format!("{} ({}) [{}]", user.username, user.full_name, user.role);
    if let Some(balance) = user.pending_balance {
        let _ = write!(line, " pending balance {}", money(balance));
    }
    line
}

pub fn plan(plan: &PricingPlan) -> String {
    let mut line: String = format!(
        "{:<12} {:<24} base {} + {}/min",
        plan.plan_version_id,
        plan.plan_name,
        money(plan.base_fee),
        money(plan.per_minute_rate)
    );
    if let Some(surcharge) = plan.ebike_surcharge {
        let _ = write!(line, ", e-bike +{}", money(surcharge));
    }
    if let Some(from) = &plan.effective_from {
        let _ = write!(line, " from {from}");
    }
    if let Some(to) = &plan.effective_to {
        let _ = write!(line, " until {to}");
    }
    line
}

pub fn ledger_entry(entry: &BillingLedgerEntry, selected: bool) -> String {
    let marker: char = if selected { '>' } else { ' ' };
    let mut line: String = format!(
        "{marker} #{:<6} {:<9} {:>9}  {} {} min, {:.1} km",
        entry.ledger_entry_id,
        entry.payment_status.as_str(),
        money(entry.total),
        or_missing(entry.start_time.as_deref()),
        entry.duration_minutes,
        entry.distance_km
    );
    if let Some(original) = entry.adjustment_of_entry_id {
        let _ = write!(line, " (adjusts #{original})");
    }
    line
}

pub fn summary(summary: &TripSummary) -> Vec<String> {
    let mut lines: Vec<String> = vec![
        format!(
            "Trip on bike {} from station {} to {}",
            or_missing(summary.bike_id.as_deref()),
            id_or_missing(summary.start_station_id),
            id_or_missing(summary.end_station_id)
        ),
        format!(
            "{} to {}, {} min, {:.1} km",
            or_missing(summary.start_time.as_deref()),
            or_missing(summary.end_time.as_deref()),
            summary.duration_minutes,
            summary.distance_km
        ),
    ];
    if let Some(plan) = &summary.plan_name {
        lines.push(format!("Plan: {plan}"));
    }
    lines.extend(
        summary
            .charges
            .iter()
            .map(|charge| format!("  {:<20} {:>9}", charge.code, money(charge.amount))),
    );
    lines.push(format!("  {:<20} {:>9}", "TOTAL", money(summary.total)));
    lines
}

pub fn dispute(ticket: &DisputeTicket) -> String {
    let mut line: String = format!(
        "#{:<5} entry #{:<6} {:<9} {}",
        ticket.id,
        ticket.ledger_entry_id,
        ticket.status.as_str(),
        ticket.reason
    );
    if let Some(note) = &ticket.resolution_note {
        let _ = write!(line, " | {note}");
    }
    line
}

pub fn station(station: &Station, inventory: &StationInventory) -> String {
    format!(
        "{:>4} {:<24} {:>3}/{:<3} {:<8} {:<14} available {} reserved {} maintenance {}",
        station.id,
        station.name,
        station.current_bike_count,
        station.capacity,
        station.load().as_str(),
        station.status.as_str(),
        inventory.available,
        inventory.reserved,
        inventory.maintenance
    )
}

pub fn bike(bike: &Bike) -> String {
    format!(
        "{} {:<8} {:<11} station {}",
        bike.id,
        bike.bike_type.as_str(),
        bike.status.as_str(),
        id_or_missing(bike.station_id)
    )
}

pub fn ride(ride: &RideHistoryRecord) -> String {
    let mut line: String = format!(
        "#{:<6} {:<11} {} bike {}",
        ride.id,
        ride.status.as_str(),
        or_missing(ride.start_time.as_deref()),
        or_missing(ride.bike_id.as_deref())
    );
    if let Some(minutes) = ride.duration_minutes {
        let _ = write!(line, ", {minutes:.0} min");
    }
    if let Some(km) = ride.distance_km {
        let _ = write!(line, ", {km:.1} km");
    }
    if let Some(cost) = ride.cost {
        let _ = write!(line, ", {}", money(cost));
    }
    line
}

pub fn statistics(stats: &RideStatistics) -> String {
    format!(
        "{} rides, {:.1} km, {} spent",
        stats.total_rides.unwrap_or_default(),
        stats.total_distance.unwrap_or_default(),
        money(stats.total_cost.unwrap_or_default())
    )
}

pub fn ledger_preview(preview: &LedgerPreview) -> String {
    format!(
        "{} rows; columns: {}",
        preview.row_count,
        preview.headers.join(", ")
    )
}
