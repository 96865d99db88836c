use std::sync::Arc;
use std::sync::atomic::Ordering;

use chrono::Utc;
use tokio::time::sleep;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::booking::{Booking, BookingStatus, DriverInfo};
use crate::state::AppState;

/// ETA shown when the booked taxi has vanished from the fleet by the time the
/// ride is arriving.
const FALLBACK_ETA_MIN: u32 = 5;

/// Creates the active booking (replacing any previous one) and spawns its
/// progression task. The generation bump makes any task still running for an
/// earlier booking a no-op.
pub async fn start_booking(state: Arc<AppState>, taxi_id: String) -> Result<Booking, AppError> {
    let taxi = state
        .fleet
        .get(&taxi_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("taxi {taxi_id} not found")))?;

    if !taxi.is_available {
        return Err(AppError::Conflict(format!("taxi {taxi_id} is not available")));
    }

    let generation = state.booking_generation.fetch_add(1, Ordering::SeqCst) + 1;
    let booking = Booking {
        id: Uuid::new_v4(),
        taxi_id,
        status: BookingStatus::Searching,
        estimated_arrival_min: 0,
        driver: None,
        generation,
        created_at: Utc::now(),
    };

    {
        let mut active = state.booking.lock().await;
        if let Some(previous) = active.replace(booking.clone()) {
            info!(previous_id = %previous.id, "replacing active booking");
        }
    }

    state.metrics.bookings_active.set(1);
    state
        .metrics
        .booking_transitions_total
        .with_label_values(&[booking.status.as_str()])
        .inc();
    let _ = state.booking_events_tx.send(booking.clone());
    info!(booking_id = %booking.id, taxi_id = %booking.taxi_id, "booking created");

    tokio::spawn(run_progression(state.clone(), generation));

    Ok(booking)
}

/// Clears the active booking and broadcasts a final `cancelled` snapshot.
/// No-op when nothing is active.
pub async fn cancel_booking(state: &AppState) -> Option<Booking> {
    let cancelled = {
        let mut active = state.booking.lock().await;
        active.take()?
    };

    let mut snapshot = cancelled;
    snapshot.status = BookingStatus::Cancelled;

    state.metrics.bookings_active.set(0);
    state
        .metrics
        .booking_transitions_total
        .with_label_values(&[snapshot.status.as_str()])
        .inc();
    let _ = state.booking_events_tx.send(snapshot.clone());
    info!(booking_id = %snapshot.id, "booking cancelled");

    Some(snapshot)
}

/// Walks one booking through confirmed → arriving → arrived with the demo's
/// fixed delays, re-checking ownership before every transition.
async fn run_progression(state: Arc<AppState>, generation: u64) {
    let mut status = BookingStatus::Searching;

    while let Some(next) = status.next() {
        let delay = match next {
            BookingStatus::Confirmed => state.sim.confirm_after,
            BookingStatus::Arriving => state.sim.arriving_after,
            _ => state.sim.arrived_after,
        };

        sleep(delay).await;
        if !advance(&state, generation, next).await {
            return;
        }
        status = next;
    }
}

/// Applies one forward transition. Returns false when the task has lost
/// ownership (booking cancelled or replaced) and must stop.
async fn advance(state: &AppState, generation: u64, status: BookingStatus) -> bool {
    let mut active = state.booking.lock().await;

    let booking = match active.as_mut() {
        Some(booking) if booking.generation == generation => booking,
        _ => {
            debug!(generation, "dropping stale booking timer");
            state.metrics.stale_timers_total.inc();
            return false;
        }
    };

    booking.status = status;

    // Snapshot the driver from the fleet as it looks right now; keep the
    // previous snapshot if the taxi is gone.
    match state.fleet.get(&booking.taxi_id) {
        Some(taxi) => {
            booking.driver = Some(DriverInfo::from_taxi(taxi.value()));
            if status == BookingStatus::Arriving {
                booking.estimated_arrival_min = taxi.estimated_arrival_min;
            }
        }
        None => {
            if status == BookingStatus::Arriving {
                booking.estimated_arrival_min = FALLBACK_ETA_MIN;
            }
        }
    }

    let snapshot = booking.clone();
    if status == BookingStatus::Arrived {
        // The ride is done; the slot keeps the arrived booking for display
        // until the user cancels or books again.
        state.metrics.bookings_active.set(0);
    }
    drop(active);

    state
        .metrics
        .booking_transitions_total
        .with_label_values(&[status.as_str()])
        .inc();
    let _ = state.booking_events_tx.send(snapshot.clone());
    info!(
        booking_id = %snapshot.id,
        status = status.as_str(),
        "booking status advanced"
    );

    true
}
