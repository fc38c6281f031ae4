use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calsync::{delivery_channel, CalendarSyncFacade, Config, Dispatcher, InMemoryProvider};
use calsync_core::auth::AuthorizationState;
use calsync_core::calendar::{EventRecord, SourceKind};
use calsync_core::{ClearPolicy, FacadeError, UserFacing};

/// calsync demo - run the facade against an in-memory calendar store
#[derive(Parser, Debug)]
#[command(name = "calsync-demo")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Calendar to manage (overrides CALSYNC_CALENDAR_NAME)
    #[arg(long, short)]
    calendar: Option<String>,

    /// Source kind for a new calendar (overrides CALSYNC_SOURCE)
    #[arg(long, short)]
    source: Option<SourceKind>,

    /// How to clear the calendar (overrides CALSYNC_CLEAR_POLICY)
    #[arg(long)]
    clear_policy: Option<ClearPolicy>,

    /// Number of events to insert
    #[arg(long, short = 'n', default_value_t = 3)]
    events: u32,

    /// Refuse the calendar access prompt
    #[arg(long)]
    deny: bool,

    /// Keep the calendar instead of removing it at the end
    #[arg(long)]
    keep: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calsync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env()?;
    if let Some(name) = cli.calendar {
        config.facade.calendar_name = name;
    }
    if let Some(source) = cli.source {
        config.facade.preferred_source = source;
    }
    if let Some(policy) = cli.clear_policy {
        config.facade.clear_policy = policy;
    }

    let provider = InMemoryProvider::new()
        .with_authorization(AuthorizationState::NotDetermined)
        .with_prompt_answer(!cli.deny);
    let facade = CalendarSyncFacade::new(Arc::new(provider), config.facade.clone())?;

    let (dispatcher, context) = delivery_channel();
    let delivery = context.spawn_thread(&config.delivery_thread)?;
    let printer = tokio::spawn(print_changes(facade.subscribe()));

    let outcome = run(&facade, &dispatcher, cli.events, cli.keep).await;

    drop(dispatcher);
    drop(facade);
    printer.await?;
    let delivered = delivery.join().await?;
    tracing::debug!(delivered, "Delivery finished");

    if let Err(err) = &outcome {
        if let Some(err) = err.downcast_ref::<FacadeError>() {
            eprintln!("{}", err.user_message());
        }
    }
    outcome
}

async fn run(
    facade: &CalendarSyncFacade<InMemoryProvider>,
    dispatcher: &Dispatcher,
    count: u32,
    keep: bool,
) -> Result<()> {
    facade.authorize().await.map_err(FacadeError::from)?;
    tracing::info!("Calendar access granted");

    let name = facade.config().calendar_name.clone();
    let calendar = facade.create_or_get(&name, None).await?;
    tracing::info!(calendar_id = %calendar.id, source = %calendar.source.title, "Using calendar");

    let start = Utc::now();
    for i in 0..count {
        let begins = start + Duration::hours(i64::from(i) + 1);
        let event = EventRecord::new(
            calendar.id.clone(),
            format!("Meeting #{}", i + 1),
            begins,
            begins + Duration::minutes(30),
        )
        .with_notes("Created by calsync-demo");
        facade.insert(&event).await?;
    }

    dispatcher
        .complete(facade.query_default(Some(&calendar)), |result| match result {
            Ok(events) => {
                for event in events {
                    println!("{}  {}", event.start.format("%Y-%m-%d %H:%M"), event.title);
                }
            }
            Err(err) => eprintln!("{}", err.user_message()),
        })
        .await?;

    let report = facade.clear_all(&calendar).await?;
    facade.commit().await?;
    tracing::info!(
        removed = report.removed.len(),
        failed = report.failed.len(),
        "Cleared calendar"
    );

    if !keep {
        let current = report.recreated.unwrap_or(calendar);
        facade.remove_calendar(&current).await?;
    }
    Ok(())
}

async fn print_changes(mut changes: broadcast::Receiver<calsync_core::calendar::StoreChange>) {
    loop {
        match changes.recv().await {
            Ok(change) => match change.to_json() {
                Ok(json) => println!("{json}"),
                Err(err) => tracing::warn!(error = %err, "Failed to serialize store change"),
            },
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(lagged = n, "Change listener lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
