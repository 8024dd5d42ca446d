//! Elidune Portal - headless driver
//!
//! Runs one portal action against the configured API, the same way a view
//! would, and reports the resulting shared state.
//!
//! Usage:
//!   elidune-portal wishlist <item-id>
//!   elidune-portal request <yyyy-mm-dd> <item-id>...

use anyhow::{bail, Context};
use chrono::NaiveDate;
use std::{env, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elidune_portal::{
    config::{AppConfig, LoggingConfig},
    feedback::{
        clock::{spawn_clock, wait_idle},
        Anchor, Rect,
    },
    gateway::HttpGateway,
    models::ItemId,
    services::{reading_request::CART_ANCHOR, wishlist::WISHLIST_ANCHOR},
    session::{Credentials, Session},
    PortalState,
};

enum Command {
    Wishlist(ItemId),
    Request { visit_date: NaiveDate, items: Vec<ItemId> },
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        match args.next().as_deref() {
            Some("wishlist") => {
                let id = args.next().context("missing item id")?;
                Ok(Command::Wishlist(id.parse().context("invalid item id")?))
            }
            Some("request") => {
                let date = args.next().context("missing visit date")?;
                let visit_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .context("visit date must be yyyy-mm-dd")?;
                let items = args
                    .map(|id| id.parse::<ItemId>().context("invalid item id"))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                Ok(Command::Request { visit_date, items })
            }
            _ => bail!("usage: elidune-portal wishlist <item-id> | request <yyyy-mm-dd> <item-id>..."),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::info!("Starting Elidune Portal v{}", env!("CARGO_PKG_VERSION"));

    let command = Command::parse(env::args().skip(1))?;

    let credentials = Credentials::new(env::var("PORTAL_TOKEN").ok());
    let gateway = Arc::new(HttpGateway::new(&config.api, credentials.clone())?);
    let session = Session::new(credentials);
    let frame = Duration::from_millis(config.feedback.frame_interval_ms.max(1));
    let state = PortalState::new(config, gateway.clone(), session);

    // Fixed layout standing in for the navigation bar badges and a card
    let anchors = state.feedback.anchors();
    anchors.register(WISHLIST_ANCHOR, Arc::new(Rect::new(1180.0, 16.0, 32.0, 32.0)));
    anchors.register(CART_ANCHOR, Arc::new(Rect::new(1228.0, 16.0, 32.0, 32.0)));
    let card: Arc<dyn Anchor> = Arc::new(Rect::new(240.0, 420.0, 180.0, 260.0));

    let count = state.session.bootstrap(gateway.as_ref()).await?;
    tracing::info!(count, "Session ready");

    let clock = spawn_clock(state.feedback.clone(), frame);

    match command {
        Command::Wishlist(item) => {
            let outcome = state
                .services
                .wishlist
                .toggle_item(item, Some(card))
                .await?;
            tracing::info!(?outcome, "Wishlist toggle settled");
        }
        Command::Request { visit_date, items } => {
            for item in items {
                state
                    .services
                    .reading_requests
                    .select(item, Some(card.as_ref()));
            }
            let outcome = state
                .services
                .reading_requests
                .submit(visit_date, None)
                .await?;
            tracing::info!(?outcome, "Reading request settled");
        }
    }

    if let Some(notification) = state.feedback.toast().notification {
        println!("[{}] {}", notification.kind, notification.headline);
        if let Some(detail) = notification.detail {
            println!("    {}", detail);
        }
        // Nobody is there to press the dismiss button
        if notification.auto_dismiss_ms == 0 {
            state.feedback.dismiss();
        }
    }

    wait_idle(&state.feedback, frame).await;
    clock.abort();

    println!(
        "wishlist: {}  pending selection: {}",
        state.session.wishlist_count().read(),
        state.session.selection().len()
    );

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("elidune_portal={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
