use std::{future::Future, pin::Pin, sync::Arc};

use dotenvy::dotenv;
use log::*;
use pricebot_engine::{
    events::{EventHandlers, EventHooks, PriceChangedEvent, TrackingEndedEvent},
    AllPublished,
    CachedPublicationFilter,
    CatalogStore,
    Resolver,
    ShortcutTable,
    TrackingScheduler,
};
use pricebot_server::{
    catalog_source::JsonCatalogSource,
    catalog_worker::{refresh_catalog, start_catalog_worker},
    cli::handle_command_line_args,
    config::BotConfig,
    console::{run_console, Console, ConsoleSink},
    errors::ServerError,
    price_sheet::PriceSheet,
    tracking_worker::start_tracking_worker,
};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    if handle_command_line_args() {
        return;
    }
    let config = BotConfig::from_env_or_default();
    info!("🚀️ Starting pricebot with the catalog in {}", config.catalog_dir.display());
    match run_bot(config).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}

async fn run_bot(config: BotConfig) -> Result<(), ServerError> {
    let tracking_period = config
        .tracking_interval
        .to_std()
        .map_err(|e| ServerError::ConfigurationError(format!("Invalid tracking interval. {e}")))?;
    let refresh_period = config
        .catalog_refresh_interval
        .to_std()
        .map_err(|e| ServerError::ConfigurationError(format!("Invalid catalog refresh interval. {e}")))?;

    let store = CatalogStore::new();
    let source = JsonCatalogSource::new(&config.catalog_dir);
    match refresh_catalog(&source, &store).await {
        Ok(_) => source.commit(),
        Err(e) => warn!("🚀️ The catalog could not be loaded. Names will not resolve until the next refresh. {e}"),
    }
    let publication = Arc::new(CachedPublicationFilter::new(source.clone()));
    let cache = Arc::clone(&publication);
    let committer = source.clone();
    let catalog_worker = start_catalog_worker(source, store.clone(), refresh_period, move |_| {
        committer.commit();
        cache.clear();
    });

    let handlers = EventHandlers::new(64, event_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;

    let market = Arc::new(PriceSheet::new(&config.price_sheet));
    let (scheduler, tracker) = TrackingScheduler::new(Arc::clone(&market), ConsoleSink, config.tracking, producers);
    let tracking_worker = start_tracking_worker(scheduler, tracking_period);

    let items = Resolver::new(ShortcutTable::standard(), publication).with_fuzzy_matching(config.fuzzy_matching);
    let places = Resolver::new(ShortcutTable::new(), AllPublished).with_fuzzy_matching(config.fuzzy_matching);
    let console =
        Console::new(store, items, places, market, tracker)?.with_default_region(config.default_region.clone());
    let result = run_console(console).await;

    tracking_worker.abort();
    catalog_worker.abort();
    result
}

fn event_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks
        .on_price_changed(|ev: PriceChangedEvent| {
            Box::pin(async move {
                debug!(
                    "🚀️ [#{}] Item #{} in region #{} moved {} -> {} ({})",
                    ev.entry_id, ev.item_id, ev.region_id, ev.previous, ev.current, ev.delta
                );
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        })
        .on_tracking_ended(|ev: TrackingEndedEvent| {
            Box::pin(async move {
                info!("🚀️ [#{}] Tracking of {} ended: {:?}", ev.entry.id, ev.entry.item_name, ev.reason);
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        });
    hooks
}
