use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::taxi::Taxi;

/// Forward-only ride lifecycle. `Completed` and `Cancelled` are terminal display
/// states reached only through an explicit user action, never by the progression
/// task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Searching,
    Confirmed,
    Arriving,
    Arrived,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Searching => "searching",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Arriving => "arriving",
            BookingStatus::Arrived => "arrived",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Next step in the simulated flow, `None` once the flow is done.
    pub fn next(self) -> Option<BookingStatus> {
        match self {
            BookingStatus::Searching => Some(BookingStatus::Confirmed),
            BookingStatus::Confirmed => Some(BookingStatus::Arriving),
            BookingStatus::Arriving => Some(BookingStatus::Arrived),
            _ => None,
        }
    }
}

/// Snapshot of the assigned driver, copied from the fleet entry at each
/// transition. Retained unchanged when the taxi id is missing at that moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverInfo {
    pub name: String,
    pub phone: String,
    pub vehicle: String,
    pub plate_number: String,
    pub rating: f64,
}

impl DriverInfo {
    pub fn from_taxi(taxi: &Taxi) -> Self {
        Self {
            name: taxi.driver_name.clone(),
            phone: "+1 234 567 8900".to_string(),
            vehicle: format!("{} - {}", taxi.vehicle_type.as_str(), taxi.plate_number),
            plate_number: taxi.plate_number.clone(),
            rating: taxi.rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub taxi_id: String,
    pub status: BookingStatus,
    pub estimated_arrival_min: u32,
    pub driver: Option<DriverInfo>,
    /// Monotonic tag identifying which progression task owns this booking.
    /// A task whose generation no longer matches must not touch it.
    pub generation: u64,
    pub created_at: DateTime<Utc>,
}
