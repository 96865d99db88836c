use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleType {
    Economy,
    Premium,
    #[serde(rename = "SUV")]
    Suv,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Economy => "Economy",
            VehicleType::Premium => "Premium",
            VehicleType::Suv => "SUV",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxi {
    pub id: String,
    pub driver_name: String,
    pub vehicle_type: VehicleType,
    pub plate_number: String,
    pub rating: f64,
    pub location: Location,
    pub distance_km: f64,
    pub estimated_arrival_min: u32,
    pub is_available: bool,
    pub updated_at: DateTime<Utc>,
}
