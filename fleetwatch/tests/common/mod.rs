//! Shared fixtures for fleetwatch integration tests: in-memory service
//! doubles and an in-process HTTP server speaking the backend's wire format.
#![allow(dead_code)]

pub mod mocks;
pub mod server;

use std::future::Future;
use std::time::Duration;

use fleetwatch::prelude::*;

/// Upper bound for anything a test awaits.
pub const WAIT: Duration = Duration::from_secs(5);

pub fn driver(id: &str, name: &str, status: DriverStatus) -> Driver {
    Driver::new(id, name, status)
}

/// Await `fut`, failing the test instead of hanging.
pub async fn within<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(WAIT, fut)
        .await
        .expect("timed out waiting for the tracker")
}

/// Wait until the view has processed at least `events` push events.
pub async fn wait_for_events(view: &mut LiveView, events: u64) {
    within(async {
        while view.stats().events_seen() < events {
            assert!(view.changed().await, "subscription ended early");
        }
    })
    .await;
}
