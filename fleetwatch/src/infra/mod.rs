//! Everything that talks to the outside world: REST, push channel, local
//! files.

pub mod api_client;
pub mod config;
pub mod credential;
pub mod feed;
pub mod services;
pub mod session;

pub use api_client::{ApiClient, ApiError, ApiResult};
pub use config::{AppConfig, ConfigError};
pub use credential::Credential;
pub use feed::{FeedError, LocationFeed, PositionStream, SseLocationFeed};
pub use session::{SessionError, SessionStore};
