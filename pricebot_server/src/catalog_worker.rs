use std::time::Duration;

use futures::future::join_all;
use log::*;
use pricebot_engine::{
    catalog::Category,
    traits::{CatalogError, CatalogSource},
    CatalogStore,
};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

/// Load every category from `source` and publish them as a new snapshot. If any category fails to load, nothing is
/// published and the current snapshot stays in place.
pub async fn refresh_catalog<S: CatalogSource>(source: &S, store: &CatalogStore) -> Result<u64, CatalogError> {
    let loads = join_all(Category::ALL.into_iter().map(|category| async move {
        (category, source.load_catalog(category).await)
    }))
    .await;
    let mut categories = Vec::with_capacity(loads.len());
    for (category, result) in loads {
        categories.push((category, result?));
    }
    Ok(store.publish(categories))
}

/// Reload the catalog every `period`. The first reload happens one period after start, so the caller is expected to
/// have loaded the catalog once already. `on_refresh` is called with the new version after every successful reload.
pub fn start_catalog_worker<S, F>(source: S, store: CatalogStore, period: Duration, on_refresh: F) -> JoinHandle<()>
where
    S: CatalogSource + 'static,
    F: Fn(u64) + Send + 'static,
{
    tokio::spawn(async move {
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("📚️ Catalog refresh worker started");
        loop {
            timer.tick().await;
            debug!("📚️ Refreshing the catalog");
            match refresh_catalog(&source, &store).await {
                Ok(version) => {
                    info!("📚️ Catalog refreshed to v{version}");
                    on_refresh(version);
                },
                Err(e) => error!("📚️ Could not refresh the catalog. Keeping v{}. {e}", store.version()),
            }
        }
    })
}
