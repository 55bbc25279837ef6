use std::time::Duration;

use log::*;
use pricebot_engine::{
    tracker::TickReport,
    traits::{MarketData, NotificationSink},
    TrackingScheduler,
};
use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};

/// Drive `scheduler` every `period`. A tick that overruns delays the next one rather than causing a burst.
pub fn start_tracking_worker<M, N>(mut scheduler: TrackingScheduler<M, N>, period: Duration) -> JoinHandle<()>
where
    M: MarketData + 'static,
    N: NotificationSink + 'static,
{
    tokio::spawn(async move {
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("📈️ Tracking worker started. Checking prices every {}s", period.as_secs());
        loop {
            timer.tick().await;
            let report = scheduler.tick().await;
            if report == TickReport::default() {
                trace!("📈️ Nothing is being tracked");
            } else {
                info!("📈️ Tracking tick: {report}");
            }
        }
    })
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use pricebot_common::Isk;
    use pricebot_engine::{
        catalog::CatalogEntry,
        events::EventProducers,
        test_utils::{prepare_test_env, FakeMarket, RecordingSink},
        tracker::TrackRequest,
        TrackerConfig,
    };

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn worker_ticks_on_schedule() {
        prepare_test_env();
        let market = Arc::new(FakeMarket::new());
        market.set_price(34, 10000002, Isk::from(5));
        let sink = Arc::new(RecordingSink::new());
        let (scheduler, handle) = TrackingScheduler::new(
            Arc::clone(&market),
            Arc::clone(&sink),
            TrackerConfig::default(),
            EventProducers::default(),
        );
        let request = TrackRequest::new(
            CatalogEntry::item(34, "Tritanium"),
            CatalogEntry::region(10000002, "The Forge"),
            "alice".into(),
            Isk::from(1),
        );
        handle.start_tracking(request).await.unwrap();
        market.reset_counts();
        let worker = start_tracking_worker(scheduler, Duration::from_secs(60));

        // The first tick is immediate
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(market.fetch_count(34, 10000002), 1);
        assert!(sink.deliveries().is_empty());

        market.set_price(34, 10000002, Isk::from(7));
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(sink.deliveries().is_empty());
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(market.fetch_count(34, 10000002), 2);
        assert_eq!(sink.deliveries().len(), 1);

        handle.cancel_all_for(&"alice".into()).unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(market.fetch_count(34, 10000002), 2);
        worker.abort();
    }
}
