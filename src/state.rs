use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use dashmap::DashMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex, broadcast};

use crate::auth::jwt::JwtKeys;
use crate::config::SimConfig;
use crate::models::booking::Booking;
use crate::models::taxi::{Location, Taxi};
use crate::observability::metrics::Metrics;
use crate::store::UserStore;

pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub jwt: JwtKeys,
    /// Simulated fleet keyed by taxi id, regenerated on each location change
    /// and jittered in place by the background task.
    pub fleet: DashMap<String, Taxi>,
    pub pickup: Mutex<Option<Location>>,
    /// At most one booking is active at a time.
    pub booking: Mutex<Option<Booking>>,
    /// Bumped on every booking creation; progression tasks carrying an older
    /// generation must stop without touching the current booking.
    pub booking_generation: AtomicU64,
    pub rng: Mutex<StdRng>,
    pub booking_events_tx: broadcast::Sender<Booking>,
    pub metrics: Metrics,
    pub sim: SimConfig,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        jwt_secret: &str,
        sim: SimConfig,
        event_buffer_size: usize,
    ) -> Self {
        let rng = match sim.fleet_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (booking_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            users,
            jwt: JwtKeys::new(jwt_secret),
            fleet: DashMap::new(),
            pickup: Mutex::new(None),
            booking: Mutex::new(None),
            booking_generation: AtomicU64::new(0),
            rng: Mutex::new(rng),
            booking_events_tx,
            metrics: Metrics::new(),
            sim,
        }
    }
}
