use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use fleetwatch_model::PositionUpdate;
use futures::{Stream, StreamExt};
use log::{debug, info, warn};
use reqwest::StatusCode;
use reqwest_eventsource::{Event, EventSource};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{FeedError, LocationFeed, PositionStream, decode_position};
use crate::infra::api_client::normalize_base_url;
use crate::infra::credential::Credential;

/// [`LocationFeed`] over a server-sent events stream.
///
/// Reconnection after a dropped connection is left to `reqwest-eventsource`'s
/// default retry policy. Only a rejected credential closes the source for
/// good, since retrying cannot fix it.
#[derive(Debug, Clone)]
pub struct SseLocationFeed {
    client: reqwest::Client,
    url: String,
    credential: Option<Credential>,
}

impl SseLocationFeed {
    pub fn new(
        push_url: &str,
        credential: Option<Credential>,
    ) -> Result<Self, FeedError> {
        let url = normalize_base_url(push_url).map_err(|e| FeedError::Open {
            url: push_url.to_string(),
            reason: e.to_string(),
        })?;

        // No client-wide timeout: the stream is meant to stay open.
        Ok(Self {
            client: reqwest::Client::new(),
            url,
            credential,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LocationFeed for SseLocationFeed {
    async fn open(&self) -> Result<PositionStream, FeedError> {
        let mut request = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "text/event-stream");
        if let Some(credential) = &self.credential {
            request = request.bearer_auth(credential.token());
        }

        let event_source =
            EventSource::new(request).map_err(|e| FeedError::Open {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        info!("Opening position SSE connection to: {}", self.url);

        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(forward_positions(event_source, tx));

        Ok(Box::pin(ForwardedPositions { receiver: rx, task }))
    }
}

async fn forward_positions(
    mut event_source: EventSource,
    tx: mpsc::UnboundedSender<PositionUpdate>,
) {
    while let Some(event) = event_source.next().await {
        match event {
            Ok(Event::Open) => {
                info!("Position SSE connection opened");
            }
            Ok(Event::Message(msg)) => {
                let Some(update) = decode_position(&msg.event, &msg.data)
                else {
                    continue;
                };
                if tx.send(update).is_err() {
                    debug!("Position stream receiver dropped, closing SSE");
                    break;
                }
            }
            Err(reqwest_eventsource::Error::InvalidStatusCode(status, _))
                if status == StatusCode::UNAUTHORIZED
                    || status == StatusCode::FORBIDDEN =>
            {
                warn!("Position SSE rejected with {}, not retrying", status);
                break;
            }
            Err(e) => {
                // The event source schedules its own reconnect.
                warn!("Position SSE error: {}", e);
            }
        }
    }

    event_source.close();
    debug!("Position SSE forwarder finished");
}

/// Receiving half of the forwarder; aborts the SSE task when dropped.
struct ForwardedPositions {
    receiver: mpsc::UnboundedReceiver<PositionUpdate>,
    task: JoinHandle<()>,
}

impl Stream for ForwardedPositions {
    type Item = PositionUpdate;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for ForwardedPositions {
    fn drop(&mut self) {
        self.task.abort();
    }
}
