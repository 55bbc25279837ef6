use std::{
    collections::HashMap,
    fmt::Display,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use chrono::{DateTime, Duration, Utc};
use futures_util::future::join_all;
use log::*;
use pricebot_common::Isk;
use tokio::sync::mpsc;

use crate::{
    events::{EventProducers, PriceChangedEvent, TrackingEndReason, TrackingEndedEvent},
    tracker::{
        clamp_threshold,
        DedupKey,
        SubscriberRef,
        TrackRequest,
        TrackerError,
        TrackingAdjustment,
        TrackingEntry,
        TrackingId,
        TrackingNotice,
        TrackingReceipt,
    },
    traits::{MarketData, NotificationSink},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Lifetime of entries whose request did not ask for one.
    pub default_duration: Duration,
    /// Upper bound on requested lifetimes.
    pub max_duration: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self { default_duration: Duration::minutes(30), max_duration: Duration::hours(24) }
    }
}

impl TrackerConfig {
    pub fn resolve_duration(&self, requested: Option<Duration>) -> (Duration, Option<TrackingAdjustment>) {
        match requested {
            None => (self.default_duration, None),
            Some(d) if d <= Duration::zero() => {
                (self.default_duration, Some(TrackingAdjustment::DurationDefaulted { applied: self.default_duration }))
            },
            Some(d) if d > self.max_duration => {
                (self.max_duration, Some(TrackingAdjustment::DurationCapped { requested: d, applied: self.max_duration }))
            },
            Some(d) => (d, None),
        }
    }
}

#[derive(Debug)]
enum TrackerCommand {
    Add(TrackingEntry),
    Cancel(TrackingId),
    CancelSubscriber(SubscriberRef),
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub added: usize,
    pub cancelled: usize,
    /// Price lookups issued, one per distinct `(item, region)` pair.
    pub lookups: usize,
    pub failed_lookups: usize,
    pub notified: usize,
    pub expired: usize,
    /// Entries dropped because delivery failed.
    pub removed: usize,
    /// Entries still active after the tick.
    pub tracked: usize,
}

impl Display for TickReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} tracked ({} added, {} cancelled), {} lookups ({} failed), {} notified, {} expired, {} removed",
            self.tracked,
            self.added,
            self.cancelled,
            self.lookups,
            self.failed_lookups,
            self.notified,
            self.expired,
            self.removed
        )
    }
}

//--------------------------------------   TrackerHandle     ---------------------------------------------------------
/// The public face of a [`TrackingScheduler`]. Handles are cheap to clone and can be used from any task. Requests are
/// queued and take effect at the start of the scheduler's next tick.
pub struct TrackerHandle<M> {
    market: Arc<M>,
    commands: mpsc::UnboundedSender<TrackerCommand>,
    next_id: Arc<AtomicU64>,
    config: TrackerConfig,
}

impl<M> Clone for TrackerHandle<M> {
    fn clone(&self) -> Self {
        Self {
            market: Arc::clone(&self.market),
            commands: self.commands.clone(),
            next_id: Arc::clone(&self.next_id),
            config: self.config,
        }
    }
}

impl<M> TrackerHandle<M> {
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Stop tracking the given entry. Unknown ids are ignored.
    pub fn cancel(&self, id: TrackingId) -> Result<(), TrackerError> {
        self.send(TrackerCommand::Cancel(id))
    }

    /// Stop every entry belonging to `subscriber`.
    pub fn cancel_all_for(&self, subscriber: &SubscriberRef) -> Result<(), TrackerError> {
        self.send(TrackerCommand::CancelSubscriber(subscriber.clone()))
    }

    fn send(&self, command: TrackerCommand) -> Result<(), TrackerError> {
        self.commands.send(command).map_err(|_| TrackerError::SchedulerStopped)
    }
}

impl<M> TrackerHandle<M>
where M: MarketData
{
    pub async fn start_tracking(&self, request: TrackRequest) -> Result<TrackingReceipt, TrackerError> {
        self.start_tracking_at(request, Utc::now()).await
    }

    /// Create a tracking entry that starts at `now`. The current market price becomes the baseline, so this fails if
    /// no price is available.
    pub async fn start_tracking_at(
        &self,
        request: TrackRequest,
        now: DateTime<Utc>,
    ) -> Result<TrackingReceipt, TrackerError> {
        if self.commands.is_closed() {
            return Err(TrackerError::SchedulerStopped);
        }
        let TrackRequest { item, region, subscriber, threshold, duration } = request;
        let baseline_price = self.market.fetch_current_price(item.id, region.id).await?;
        let (change_threshold, threshold_adjustment) = clamp_threshold(threshold);
        let (duration, duration_adjustment) = self.config.resolve_duration(duration);
        let entry = TrackingEntry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            item_id: item.id,
            item_name: item.name,
            region_id: region.id,
            region_name: region.name,
            subscriber,
            change_threshold,
            baseline_price,
            current_price: None,
            started_at: now,
            duration,
        };
        self.send(TrackerCommand::Add(entry.clone()))?;
        info!(
            "📈️ [#{}] {} is tracking {} in {} from {baseline_price} (threshold {change_threshold}, {} min)",
            entry.id,
            entry.subscriber,
            entry.item_name,
            entry.region_name,
            entry.duration.num_minutes()
        );
        let adjustments = [threshold_adjustment, duration_adjustment].into_iter().flatten().collect();
        Ok(TrackingReceipt { entry, adjustments })
    }
}

//--------------------------------------  TrackingScheduler  ---------------------------------------------------------
/// Owns the active tracking entries and runs the polling ticks. Only [`TrackingScheduler::tick`] changes the entry
/// set, and it takes `&mut self`, so two ticks can never overlap.
pub struct TrackingScheduler<M, N> {
    market: Arc<M>,
    sink: N,
    producers: EventProducers,
    entries: Vec<TrackingEntry>,
    commands: mpsc::UnboundedReceiver<TrackerCommand>,
}

impl<M, N> std::fmt::Debug for TrackingScheduler<M, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TrackingScheduler({} entries)", self.entries.len())
    }
}

impl<M, N> TrackingScheduler<M, N> {
    pub fn new(market: M, sink: N, config: TrackerConfig, producers: EventProducers) -> (Self, TrackerHandle<M>) {
        let market = Arc::new(market);
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle =
            TrackerHandle { market: Arc::clone(&market), commands: sender, next_id: Arc::new(AtomicU64::new(0)), config };
        let scheduler = Self { market, sink, producers, entries: Vec::new(), commands: receiver };
        (scheduler, handle)
    }

    /// The entries that were active at the end of the last tick.
    pub fn entries(&self) -> &[TrackingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<M, N> TrackingScheduler<M, N>
where
    M: MarketData,
    N: NotificationSink,
{
    pub async fn tick(&mut self) -> TickReport {
        self.tick_at(Utc::now()).await
    }

    /// Run one polling round as if the time were `now`.
    pub async fn tick_at(&mut self, now: DateTime<Utc>) -> TickReport {
        let mut report = TickReport::default();
        self.apply_commands(&mut report).await;
        let snapshot = std::mem::take(&mut self.entries);
        let (expired, live): (Vec<_>, Vec<_>) = snapshot.into_iter().partition(|e| e.is_expired(now));
        let prices = self.fetch_prices(&live, &mut report).await;
        let mut retained = Vec::with_capacity(live.len());
        for mut entry in live {
            let keep = match prices.get(&entry.dedup_key()) {
                Some(price) => self.apply_price(&mut entry, *price, now, &mut report).await,
                None => true,
            };
            if keep {
                retained.push(entry);
            }
        }
        for entry in expired {
            self.expire(entry, &mut report).await;
        }
        report.tracked = retained.len();
        self.entries = retained;
        report
    }

    async fn apply_commands(&mut self, report: &mut TickReport) {
        let mut ended = Vec::new();
        while let Ok(command) = self.commands.try_recv() {
            match command {
                TrackerCommand::Add(entry) => {
                    trace!("📈️ [#{}] Entry added", entry.id);
                    self.entries.push(entry);
                    report.added += 1;
                },
                TrackerCommand::Cancel(id) => {
                    let (gone, kept) = std::mem::take(&mut self.entries).into_iter().partition(|e| e.id == id);
                    self.entries = kept;
                    ended.extend(gone);
                },
                TrackerCommand::CancelSubscriber(subscriber) => {
                    let (gone, kept) =
                        std::mem::take(&mut self.entries).into_iter().partition(|e| e.subscriber == subscriber);
                    self.entries = kept;
                    ended.extend(gone);
                },
            }
        }
        report.cancelled = ended.len();
        for entry in ended {
            debug!("📈️ [#{}] Tracking of {} cancelled", entry.id, entry.item_name);
            self.producers.publish_tracking_ended(TrackingEndedEvent::new(entry, TrackingEndReason::Cancelled)).await;
        }
    }

    /// Look up each distinct `(item, region)` pair once, concurrently. Failed lookups are left out of the result.
    async fn fetch_prices(&self, live: &[TrackingEntry], report: &mut TickReport) -> HashMap<DedupKey, Isk> {
        let mut keys = live.iter().map(TrackingEntry::dedup_key).collect::<Vec<_>>();
        keys.sort();
        keys.dedup();
        report.lookups = keys.len();
        let market = &self.market;
        let lookups = join_all(keys.into_iter().map(|key| async move {
            (key, market.fetch_current_price(key.item_id, key.region_id).await)
        }))
        .await;
        lookups
            .into_iter()
            .filter_map(|(key, result)| match result {
                Ok(price) => Some((key, price)),
                Err(e) => {
                    warn!("📈️ Price lookup for item #{} in region #{} failed. {e}", key.item_id, key.region_id);
                    report.failed_lookups += 1;
                    None
                },
            })
            .collect()
    }

    /// Returns false if the entry must be dropped.
    async fn apply_price(
        &self,
        entry: &mut TrackingEntry,
        price: Isk,
        now: DateTime<Utc>,
        report: &mut TickReport,
    ) -> bool {
        let Some(delta) = entry.significant_change(price) else {
            trace!("📈️ [#{}] {} is at {price}, no significant change", entry.id, entry.item_name);
            return true;
        };
        let notice = TrackingNotice::PriceChanged {
            entry_id: entry.id,
            item_name: entry.item_name.clone(),
            region_name: entry.region_name.clone(),
            previous: entry.baseline_price,
            current: price,
            delta,
        };
        match self.sink.deliver(&entry.subscriber, &notice).await {
            Ok(()) => {
                info!("📈️ [#{}] {} moved by {delta} to {price}. {} notified", entry.id, entry.item_name, entry.subscriber);
                let event = PriceChangedEvent {
                    entry_id: entry.id,
                    item_id: entry.item_id,
                    region_id: entry.region_id,
                    subscriber: entry.subscriber.clone(),
                    previous: entry.baseline_price,
                    current: price,
                    delta,
                    timestamp: now,
                };
                entry.baseline_price = price;
                entry.current_price = Some(price);
                report.notified += 1;
                self.producers.publish_price_changed(event).await;
                true
            },
            Err(e) => {
                warn!("📈️ [#{}] Could not notify {}, tracking stopped. {e}", entry.id, entry.subscriber);
                report.removed += 1;
                let event = TrackingEndedEvent::new(entry.clone(), TrackingEndReason::DeliveryFailed);
                self.producers.publish_tracking_ended(event).await;
                false
            },
        }
    }

    async fn expire(&self, entry: TrackingEntry, report: &mut TickReport) {
        let notice = TrackingNotice::Expired {
            entry_id: entry.id,
            item_name: entry.item_name.clone(),
            region_name: entry.region_name.clone(),
            last_price: entry.last_price(),
        };
        if let Err(e) = self.sink.deliver(&entry.subscriber, &notice).await {
            debug!("📈️ [#{}] Expiry notice was not delivered. {e}", entry.id);
        }
        debug!("📈️ [#{}] Tracking of {} expired", entry.id, entry.item_name);
        report.expired += 1;
        self.producers.publish_tracking_ended(TrackingEndedEvent::new(entry, TrackingEndReason::Expired)).await;
    }
}
