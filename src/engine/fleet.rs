use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::info;

use crate::models::taxi::{Location, Taxi, VehicleType};
use crate::state::AppState;

pub const FLEET_SIZE: usize = 8;

const DRIVER_POOL: [&str; 5] = [
    "John Smith",
    "Sarah Johnson",
    "Mike Davis",
    "Emily Brown",
    "David Wilson",
];

const VEHICLE_TYPES: [VehicleType; 3] =
    [VehicleType::Economy, VehicleType::Premium, VehicleType::Suv];

/// Rough estimate: 2 minutes per km.
pub fn eta_minutes(distance_km: f64) -> u32 {
    (distance_km * 2.0).ceil() as u32
}

fn round_km(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Generates a fresh batch of taxis scattered around the pickup point, sorted
/// ascending by distance. Pure function of the PRNG; cannot fail.
pub fn generate_fleet<R: Rng>(rng: &mut R, pickup: &Location) -> Vec<Taxi> {
    let mut taxis: Vec<Taxi> = (0..FLEET_SIZE)
        .map(|i| {
            let lat = pickup.lat + (rng.r#gen::<f64>() - 0.5) * 0.02;
            let lng = pickup.lng + (rng.r#gen::<f64>() - 0.5) * 0.02;
            let distance_km = round_km(rng.gen_range(0.5..5.5));

            Taxi {
                id: format!("taxi-{i}"),
                driver_name: DRIVER_POOL[rng.gen_range(0..DRIVER_POOL.len())].to_string(),
                vehicle_type: VEHICLE_TYPES[rng.gen_range(0..VEHICLE_TYPES.len())],
                plate_number: format!("ABC-{}", 1000 + i),
                rating: 4.0 + rng.r#gen::<f64>(),
                location: Location {
                    lat,
                    lng,
                    address: None,
                },
                distance_km,
                estimated_arrival_min: eta_minutes(distance_km),
                is_available: rng.gen_bool(0.7),
                updated_at: Utc::now(),
            }
        })
        .collect();

    taxis.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    taxis
}

/// Perturbs one taxi in place: position by up to ±0.0005°, distance by up to
/// ±0.05 km (re-rounded). Identity, ETA and availability are untouched.
pub fn jitter_taxi<R: Rng>(rng: &mut R, taxi: &mut Taxi) {
    taxi.location.lat += (rng.r#gen::<f64>() - 0.5) * 0.001;
    taxi.location.lng += (rng.r#gen::<f64>() - 0.5) * 0.001;
    taxi.distance_km = round_km(taxi.distance_km + (rng.r#gen::<f64>() - 0.5) * 0.1);
    taxi.updated_at = Utc::now();
}

/// Replaces the fleet with a new batch around `pickup`.
pub async fn refresh_fleet(state: &AppState, pickup: &Location) -> Vec<Taxi> {
    let taxis = {
        let mut rng = state.rng.lock().await;
        generate_fleet(&mut *rng, pickup)
    };

    state.fleet.clear();
    for taxi in &taxis {
        state.fleet.insert(taxi.id.clone(), taxi.clone());
    }

    state.metrics.fleet_taxis.set(taxis.len() as i64);
    state.metrics.fleet_refreshes_total.inc();
    info!(taxis = taxis.len(), "fleet regenerated");

    taxis
}

/// Background task mutating taxi positions on a fixed interval, standing in
/// for real-time location updates.
pub async fn run_fleet_jitter(state: Arc<AppState>) {
    info!(
        interval_ms = state.sim.fleet_jitter_interval.as_millis() as u64,
        "fleet jitter task started"
    );

    let mut ticker = tokio::time::interval(state.sim.fleet_jitter_interval);
    // The first tick fires immediately; skip it so new fleets are not
    // perturbed the instant they are generated.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let mut rng = state.rng.lock().await;
        for mut entry in state.fleet.iter_mut() {
            jitter_taxi(&mut *rng, entry.value_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{FLEET_SIZE, eta_minutes, generate_fleet, jitter_taxi};
    use crate::models::taxi::Location;

    fn pickup() -> Location {
        Location {
            lat: 40.7128,
            lng: -74.0060,
            address: None,
        }
    }

    #[test]
    fn batch_has_eight_taxis_sorted_by_distance() {
        let mut rng = StdRng::seed_from_u64(7);
        let fleet = generate_fleet(&mut rng, &pickup());

        assert_eq!(fleet.len(), FLEET_SIZE);
        for pair in fleet.windows(2) {
            assert!(pair[0].distance_km <= pair[1].distance_km);
        }
    }

    #[test]
    fn distances_and_etas_are_consistent() {
        let mut rng = StdRng::seed_from_u64(7);
        let fleet = generate_fleet(&mut rng, &pickup());

        for taxi in &fleet {
            assert!(taxi.distance_km >= 0.5 && taxi.distance_km < 6.0);
            assert_eq!(taxi.estimated_arrival_min, eta_minutes(taxi.distance_km));
            assert!(taxi.rating >= 4.0 && taxi.rating < 5.0);
        }
    }

    #[test]
    fn taxis_are_scattered_within_the_offset_window() {
        let mut rng = StdRng::seed_from_u64(7);
        let origin = pickup();
        let fleet = generate_fleet(&mut rng, &origin);

        for taxi in &fleet {
            assert!((taxi.location.lat - origin.lat).abs() <= 0.01);
            assert!((taxi.location.lng - origin.lng).abs() <= 0.01);
        }
    }

    #[test]
    fn same_seed_yields_identical_fleet() {
        let mut first_rng = StdRng::seed_from_u64(99);
        let mut second_rng = StdRng::seed_from_u64(99);

        let first = generate_fleet(&mut first_rng, &pickup());
        let second = generate_fleet(&mut second_rng, &pickup());

        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.driver_name, b.driver_name);
            assert_eq!(a.distance_km, b.distance_km);
            assert_eq!(a.is_available, b.is_available);
        }
    }

    #[test]
    fn jitter_is_bounded_and_preserves_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        let fleet = generate_fleet(&mut rng, &pickup());

        for original in &fleet {
            let mut moved = original.clone();
            jitter_taxi(&mut rng, &mut moved);

            assert_eq!(moved.id, original.id);
            assert_eq!(moved.driver_name, original.driver_name);
            assert_eq!(moved.estimated_arrival_min, original.estimated_arrival_min);
            assert_eq!(moved.is_available, original.is_available);

            assert!((moved.location.lat - original.location.lat).abs() <= 0.0005);
            assert!((moved.location.lng - original.location.lng).abs() <= 0.0005);
            // Half-width 0.05 plus up to 0.05 of rounding slack.
            assert!((moved.distance_km - original.distance_km).abs() <= 0.1);
        }
    }

    #[test]
    fn eta_is_two_minutes_per_km_rounded_up() {
        assert_eq!(eta_minutes(0.5), 1);
        assert_eq!(eta_minutes(1.0), 2);
        assert_eq!(eta_minutes(2.3), 5);
        assert_eq!(eta_minutes(5.4), 11);
    }
}
