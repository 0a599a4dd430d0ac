use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use fleetwatch_model::{DriverForm, DriverId, PhoneNumber};
use log::{info, warn};

use super::{Cli, Command, DriverArgs, DriversAction, LoginAction};
use crate::domains::tracking::{
    LiveTracker, LiveView, MapView, markers, render_table,
};
use crate::infra::services::{
    AuthApi, AuthApiAdapter, DeliveryApi, DeliveryApiAdapter,
};
use crate::infra::{ApiClient, AppConfig, SessionStore, SseLocationFeed};

/// Resolved settings shared by every subcommand. The stored credential is
/// only read by commands that call the authorized endpoints, so `login` and
/// `logout` still work when the session file is unreadable.
struct AppContext {
    config: AppConfig,
    session: SessionStore,
    client: ApiClient,
}

impl AppContext {
    fn build(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                let mut config = AppConfig::from_file(path)?;
                config.apply_env(|key| std::env::var(key).ok())?;
                config
            }
            None => AppConfig::load()?,
        };
        if let Some(url) = &cli.api_url {
            config.api_url = url.clone();
        }
        if let Some(url) = &cli.push_url {
            config.push_url = url.clone();
        }

        let session = match &cli.session {
            Some(path) => SessionStore::new(path),
            None => SessionStore::default_location()
                .ok_or_else(|| anyhow!("No config directory; pass --session"))?,
        };

        let client =
            ApiClient::new(&config.api_url, config.request_timeout())?;

        Ok(Self {
            config,
            session,
            client,
        })
    }

    fn authorized_client(&self) -> Result<ApiClient> {
        let credential = self.session.resolve()?;
        Ok(self.client.with_credential(credential))
    }

    fn auth(&self) -> AuthApiAdapter {
        AuthApiAdapter::new(Arc::new(self.client.clone()))
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::build(&cli)?;

    match cli.command {
        Command::Login { action } => login(&ctx, action).await,
        Command::Logout => {
            ctx.session.clear()?;
            println!("Signed out.");
            Ok(())
        }
        Command::Drivers { action } => drivers(&ctx, action).await,
        Command::Track { markers } => track(&ctx, markers).await,
    }
}

async fn login(ctx: &AppContext, action: LoginAction) -> Result<()> {
    let auth = ctx.auth();
    match action {
        LoginAction::Send { phone } => {
            let phone = PhoneNumber::parse(&phone)?;
            auth.send_otp(&phone)
                .await
                .context("Failed to send the verification code")?;
            println!("Verification code sent to {phone}.");
        }
        LoginAction::Verify { phone, code } => {
            let phone = PhoneNumber::parse(&phone)?;
            let credential = auth
                .verify_otp(&phone, &code)
                .await
                .context("Verification failed")?;
            ctx.session.save(&credential)?;
            println!("Signed in as {phone}.");
        }
    }
    Ok(())
}

fn form_from_args(args: &DriverArgs) -> Result<DriverForm> {
    Ok(DriverForm::from_inputs(
        &args.name,
        &args.phone,
        &args.vehicle,
        &args.status,
        &args.lat,
        &args.lng,
    )?)
}

async fn drivers(ctx: &AppContext, action: DriversAction) -> Result<()> {
    let api: Arc<dyn DeliveryApi> =
        Arc::new(DeliveryApiAdapter::new(Arc::new(ctx.authorized_client()?)));
    match action {
        DriversAction::List { follow: false } => {
            let drivers = api.list_drivers().await?;
            print!("{}", render_table(&drivers));
        }
        DriversAction::List { follow: true } => {
            follow_drivers(api.as_ref(), ctx.config.follow_interval()).await?;
        }
        DriversAction::Add(args) => {
            let driver = api.create_driver(&form_from_args(&args)?).await?;
            println!("Created driver {} ({}).", driver.name, driver.id);
        }
        DriversAction::Update { id, details } => {
            let id = DriverId::new(id);
            api.update_driver(&id, &form_from_args(&details)?).await?;
            println!("Updated driver {id}.");
        }
        DriversAction::Delete { id } => {
            let id = DriverId::new(id);
            api.delete_driver(&id).await?;
            println!("Deleted driver {id}.");
        }
    }
    Ok(())
}

/// Periodic full re-fetch, the management screen's refresh loop. A failed
/// poll is reported and the next tick tries again.
async fn follow_drivers(
    api: &dyn DeliveryApi,
    period: std::time::Duration,
) -> Result<()> {
    let mut ticker = tokio::time::interval(period);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => match api.list_drivers().await {
                Ok(drivers) => println!("{}", render_table(&drivers)),
                Err(e) if e.is_auth() => return Err(e.into()),
                Err(e) => warn!("Driver refresh failed: {}", e),
            },
            _ = &mut ctrl_c => {
                info!("Stopping driver refresh");
                return Ok(());
            }
        }
    }
}

async fn track(ctx: &AppContext, show_markers: bool) -> Result<()> {
    let client = ctx.authorized_client()?;
    let feed = SseLocationFeed::new(
        &ctx.config.push_url,
        client.credential().cloned(),
    )?;
    let deliveries = Arc::new(DeliveryApiAdapter::new(Arc::new(client)));
    let mut tracker = LiveTracker::new(deliveries, Arc::new(feed));
    tracker.initialize().await?;

    let mut view = tracker.subscribe().await?;
    if show_markers {
        println!("Map view: {}", MapView::default());
    }
    print_view(&view, show_markers);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = view.applied_changed() => {
                if !changed {
                    warn!("Position updates stopped");
                    break;
                }
                print_view(&view, show_markers);
            }
            _ = &mut ctrl_c => break,
        }
    }

    view.teardown();
    Ok(())
}

fn print_view(view: &LiveView, show_markers: bool) {
    let snapshot = view.snapshot();
    if show_markers {
        let markers = markers(&snapshot);
        println!("{} of {} drivers on the map", markers.len(), snapshot.len());
        for marker in markers {
            println!(
                "  [{:.5}, {:.5}] {}",
                marker.position.lat, marker.position.lng, marker.popup
            );
        }
    } else {
        println!("{}", render_table(&snapshot));
    }
}
