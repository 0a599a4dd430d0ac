use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fleetwatch::infra::api_client::ApiResult;
use fleetwatch::prelude::*;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// [`DeliveryApi`] returning a fixed roster or a fixed failure.
#[derive(Debug, Default)]
pub struct MockDeliveryApi {
    drivers: Vec<Driver>,
    failure: Option<fn() -> ApiError>,
    list_calls: AtomicUsize,
}

impl MockDeliveryApi {
    pub fn with_drivers(drivers: Vec<Driver>) -> Self {
        Self {
            drivers,
            ..Self::default()
        }
    }

    pub fn failing(failure: fn() -> ApiError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeliveryApi for MockDeliveryApi {
    async fn list_drivers(&self) -> ApiResult<Vec<Driver>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match self.failure {
            Some(failure) => Err(failure()),
            None => Ok(self.drivers.clone()),
        }
    }

    async fn create_driver(&self, _form: &DriverForm) -> ApiResult<Driver> {
        unimplemented!("not used by tracker tests")
    }

    async fn update_driver(
        &self,
        _id: &DriverId,
        _form: &DriverForm,
    ) -> ApiResult<Driver> {
        unimplemented!("not used by tracker tests")
    }

    async fn delete_driver(&self, _id: &DriverId) -> ApiResult<()> {
        unimplemented!("not used by tracker tests")
    }
}

/// [`LocationFeed`] fed by the test through an unbounded channel.
///
/// Can be opened once; the sender reports `is_closed()` once the tracker has
/// released the subscription.
#[derive(Debug)]
pub struct ChannelFeed {
    receiver: Mutex<Option<mpsc::UnboundedReceiver<PositionUpdate>>>,
    opens: AtomicUsize,
}

impl ChannelFeed {
    pub fn new() -> (Self, mpsc::UnboundedSender<PositionUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let feed = Self {
            receiver: Mutex::new(Some(rx)),
            opens: AtomicUsize::new(0),
        };
        (feed, tx)
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationFeed for ChannelFeed {
    async fn open(&self) -> Result<PositionStream, FeedError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let receiver = self.receiver.lock().unwrap().take().ok_or_else(|| {
            FeedError::Open {
                url: "channel://test".into(),
                reason: "already opened".into(),
            }
        })?;
        Ok(Box::pin(UnboundedReceiverStream::new(receiver)))
    }
}
