use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub fleet_taxis: IntGauge,
    pub fleet_refreshes_total: IntCounter,
    pub booking_transitions_total: IntCounterVec,
    pub bookings_active: IntGauge,
    pub stale_timers_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let fleet_taxis = IntGauge::new("fleet_taxis", "Current number of simulated taxis")
            .expect("valid fleet_taxis metric");

        let fleet_refreshes_total = IntCounter::new(
            "fleet_refreshes_total",
            "Total fleet regenerations triggered by location changes",
        )
        .expect("valid fleet_refreshes_total metric");

        let booking_transitions_total = IntCounterVec::new(
            Opts::new(
                "booking_transitions_total",
                "Booking status transitions by resulting status",
            ),
            &["status"],
        )
        .expect("valid booking_transitions_total metric");

        let bookings_active = IntGauge::new("bookings_active", "Whether a booking is active (0/1)")
            .expect("valid bookings_active metric");

        let stale_timers_total = IntCounter::new(
            "stale_booking_timers_total",
            "Progression timers dropped because their booking was cancelled or replaced",
        )
        .expect("valid stale_booking_timers_total metric");

        registry
            .register(Box::new(fleet_taxis.clone()))
            .expect("register fleet_taxis");
        registry
            .register(Box::new(fleet_refreshes_total.clone()))
            .expect("register fleet_refreshes_total");
        registry
            .register(Box::new(booking_transitions_total.clone()))
            .expect("register booking_transitions_total");
        registry
            .register(Box::new(bookings_active.clone()))
            .expect("register bookings_active");
        registry
            .register(Box::new(stale_timers_total.clone()))
            .expect("register stale_booking_timers_total");

        Self {
            registry,
            fleet_taxis,
            fleet_refreshes_total,
            booking_transitions_total,
            bookings_active,
            stale_timers_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
