//! Push channel carrying driver position updates.

pub mod sse;

use std::fmt::Debug;

use async_trait::async_trait;
use fleetwatch_model::{LOCATION_UPDATED, PositionUpdate};
use futures::stream::BoxStream;
use log::debug;
use thiserror::Error;

pub use sse::SseLocationFeed;

/// Decoded position updates in delivery order. Dropping the stream releases
/// the underlying connection.
pub type PositionStream = BoxStream<'static, PositionUpdate>;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to open push channel to {url}: {reason}")]
    Open { url: String, reason: String },
}

/// A source of `locationUpdated` events.
///
/// Delivery is best effort: no acknowledgement, no replay, and reconnection
/// is whatever the transport does by default.
#[async_trait]
pub trait LocationFeed: Send + Sync + Debug {
    async fn open(&self) -> Result<PositionStream, FeedError>;
}

/// Turn one named push message into a position update.
///
/// Keepalives, other event names, undecodable payloads and out-of-range
/// coordinates all yield `None`.
pub fn decode_position(event: &str, data: &str) -> Option<PositionUpdate> {
    if data.is_empty() || data == "keepalive" {
        debug!("Received push keepalive");
        return None;
    }
    if event != LOCATION_UPDATED {
        debug!("Ignoring push event '{}'", event);
        return None;
    }

    match serde_json::from_str::<PositionUpdate>(data) {
        Ok(update) if update.is_well_formed() => Some(update),
        Ok(update) => {
            debug!(
                "Dropping out-of-range position for {}: ({}, {})",
                update.driver_id, update.lat, update.lng
            );
            None
        }
        Err(e) => {
            debug!("Dropping malformed position event: {} - Data: {}", e, data);
            None
        }
    }
}
