//! Driver location synchronizer.
//!
//! A [`LiveTracker`] seeds its roster from one full fetch, then
//! [`LiveTracker::subscribe`] hands the roster to a single task that applies
//! push-channel position reports in delivery order. Readers get immutable
//! snapshots through the returned [`LiveView`], which is also the only way to
//! stop the subscription.
//!
//! Two gaps are deliberate and documented rather than papered over:
//! - a driver created after the initial fetch is never added; its position
//!   reports are dropped for the lifetime of the view;
//! - the push connection is retried by the transport alone; a lost channel
//!   just means the view stops changing.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fleetwatch_model::PositionUpdate;
use futures::StreamExt;
use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::roster::{ApplyOutcome, Roster, RosterSnapshot};
use crate::infra::api_client::ApiError;
use crate::infra::feed::{FeedError, LocationFeed, PositionStream};
use crate::infra::services::DeliveryApi;

/// Lifecycle of one tracking view.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerState {
    Unmounted,
    Loading,
    Live,
    /// Initial fetch failed; terminal for this instance.
    Error(String),
}

impl fmt::Display for TrackerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerState::Unmounted => f.write_str("unmounted"),
            TrackerState::Loading => f.write_str("loading"),
            TrackerState::Live => f.write_str("live"),
            TrackerState::Error(_) => f.write_str("failed"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Please sign in first: no session token is available")]
    MissingCredential,

    #[error("Failed to fetch drivers: {0}")]
    Fetch(#[source] ApiError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("Cannot {operation} while the tracker is {state}")]
    InvalidState {
        operation: &'static str,
        state: TrackerState,
    },
}

impl From<ApiError> for TrackerError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::MissingCredential => TrackerError::MissingCredential,
            other => TrackerError::Fetch(other),
        }
    }
}

/// Counters for events seen by a live subscription.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerStats {
    pub applied: u64,
    pub dropped_unknown: u64,
    pub last_applied_at: Option<DateTime<Utc>>,
}

impl TrackerStats {
    pub fn events_seen(&self) -> u64 {
        self.applied + self.dropped_unknown
    }
}

/// Passed to the subscription handler after each event is applied.
#[derive(Debug, Clone, Copy)]
pub struct UpdateNotice<'a> {
    pub update: &'a PositionUpdate,
    pub outcome: ApplyOutcome,
    pub roster: &'a RosterSnapshot,
}

#[derive(Debug, Clone, Default)]
struct LiveFrame {
    roster: RosterSnapshot,
    stats: TrackerStats,
}

/// Owns the roster until it is handed to a live subscription.
#[derive(Debug)]
pub struct LiveTracker {
    deliveries: Arc<dyn DeliveryApi>,
    feed: Arc<dyn LocationFeed>,
    roster: Roster,
    state: TrackerState,
}

impl LiveTracker {
    pub fn new(
        deliveries: Arc<dyn DeliveryApi>,
        feed: Arc<dyn LocationFeed>,
    ) -> Self {
        Self {
            deliveries,
            feed,
            roster: Roster::new(),
            state: TrackerState::Unmounted,
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Fetch the full driver collection and seed the roster.
    ///
    /// On failure the roster stays empty, the state becomes
    /// [`TrackerState::Error`] with a user-facing message, and the error is
    /// returned. Nothing is retried.
    pub async fn initialize(&mut self) -> Result<(), TrackerError> {
        if self.state != TrackerState::Unmounted {
            return Err(TrackerError::InvalidState {
                operation: "initialize",
                state: self.state.clone(),
            });
        }

        self.state = TrackerState::Loading;
        info!("Loading driver roster");

        match self.deliveries.list_drivers().await {
            Ok(drivers) => {
                self.roster = Roster::from_drivers(drivers);
                self.state = TrackerState::Live;
                info!("Driver roster live with {} drivers", self.roster.len());
                Ok(())
            }
            Err(err) => {
                let err = TrackerError::from(err);
                warn!("Driver roster failed to load: {}", err);
                self.state = TrackerState::Error(err.to_string());
                Err(err)
            }
        }
    }

    /// Apply one position report directly. Only valid while `Live`.
    pub fn apply_position_update(
        &mut self,
        update: &PositionUpdate,
    ) -> Result<ApplyOutcome, TrackerError> {
        if self.state != TrackerState::Live {
            return Err(TrackerError::InvalidState {
                operation: "apply a position update",
                state: self.state.clone(),
            });
        }
        Ok(self.roster.apply(update))
    }

    /// Open the push channel and start applying position reports.
    pub async fn subscribe(self) -> Result<LiveView, TrackerError> {
        self.subscribe_with(|_| {}).await
    }

    /// Like [`subscribe`](Self::subscribe), calling `on_update` on the
    /// subscription task after every event, applied or dropped.
    pub async fn subscribe_with<F>(
        self,
        on_update: F,
    ) -> Result<LiveView, TrackerError>
    where
        F: FnMut(UpdateNotice<'_>) + Send + 'static,
    {
        if self.state != TrackerState::Live {
            return Err(TrackerError::InvalidState {
                operation: "subscribe",
                state: self.state,
            });
        }

        let stream = self.feed.open().await?;
        let initial = LiveFrame {
            roster: self.roster.snapshot(),
            stats: TrackerStats::default(),
        };
        let (frames, receiver) = watch::channel(initial);
        let task = tokio::spawn(run_subscription(
            self.roster,
            stream,
            frames,
            on_update,
        ));

        info!("Subscribed to driver position updates");
        Ok(LiveView {
            frames: receiver,
            task: Some(task),
            frozen: None,
        })
    }
}

async fn run_subscription<F>(
    mut roster: Roster,
    mut stream: PositionStream,
    frames: watch::Sender<LiveFrame>,
    mut on_update: F,
) where
    F: FnMut(UpdateNotice<'_>) + Send + 'static,
{
    let mut current = roster.snapshot();
    let mut stats = TrackerStats::default();

    while let Some(update) = stream.next().await {
        let outcome = roster.apply(&update);
        match outcome {
            ApplyOutcome::Applied => {
                stats.applied += 1;
                stats.last_applied_at = Some(Utc::now());
                current = roster.snapshot();
            }
            ApplyOutcome::UnknownDriver => {
                stats.dropped_unknown += 1;
                debug!(
                    "Dropping position for unknown driver {}",
                    update.driver_id
                );
            }
        }

        on_update(UpdateNotice {
            update: &update,
            outcome,
            roster: &current,
        });

        let frame = LiveFrame {
            roster: current.clone(),
            stats: stats.clone(),
        };
        if frames.send(frame).is_err() {
            debug!("Live view dropped, stopping subscription");
            return;
        }
    }

    warn!("Position stream ended; the live view will no longer update");
}

/// Handle to a running subscription.
///
/// Dropping the view tears it down. After teardown the snapshot is frozen at
/// whatever the caller could last observe, even if an event was mid-flight.
#[derive(Debug)]
pub struct LiveView {
    frames: watch::Receiver<LiveFrame>,
    task: Option<JoinHandle<()>>,
    frozen: Option<LiveFrame>,
}

impl LiveView {
    pub fn state(&self) -> TrackerState {
        if self.frozen.is_some() {
            TrackerState::Unmounted
        } else {
            TrackerState::Live
        }
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        match &self.frozen {
            Some(frame) => frame.roster.clone(),
            None => self.frames.borrow().roster.clone(),
        }
    }

    pub fn stats(&self) -> TrackerStats {
        match &self.frozen {
            Some(frame) => frame.stats.clone(),
            None => self.frames.borrow().stats.clone(),
        }
    }

    /// Wait until the next event has been processed.
    ///
    /// Returns `false` once torn down or when the push stream has ended.
    pub async fn changed(&mut self) -> bool {
        if self.frozen.is_some() {
            return false;
        }
        self.frames.changed().await.is_ok()
    }

    /// Like [`changed`](Self::changed), but only wakes once another position
    /// has been applied. Frames for dropped reports are skipped.
    pub async fn applied_changed(&mut self) -> bool {
        let seen = self.stats().applied;
        loop {
            if !self.changed().await {
                return false;
            }
            if self.stats().applied > seen {
                return true;
            }
        }
    }

    /// Release the push-channel subscription. Calling it again is a no-op.
    pub fn teardown(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        self.frozen = Some(self.frames.borrow().clone());
        task.abort();
        info!("Live driver tracking torn down");
    }
}

impl Drop for LiveView {
    fn drop(&mut self) {
        self.teardown();
    }
}
