pub use crate::domains::tracking::{
    ApplyOutcome, LiveTracker, LiveView, MapView, Marker, Roster,
    RosterSnapshot, StatusBadge, TrackerError, TrackerState, TrackerStats,
    markers, render_table,
};
pub use crate::infra::services::{
    AuthApi, AuthApiAdapter, DeliveryApi, DeliveryApiAdapter,
};
pub use crate::infra::{
    ApiClient, ApiError, AppConfig, Credential, FeedError, LocationFeed,
    PositionStream, SessionStore, SseLocationFeed,
};
pub use fleetwatch_model::prelude::*;
