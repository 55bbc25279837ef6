//! # Console front end
//!
//! A line-oriented stand-in for a chat adapter. Every line typed on stdin is one command from a single subscriber,
//! and tracking notices are written back to stdout.
use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use chrono::Duration;
use log::*;
use pricebot_common::Isk;
use pricebot_engine::{
    catalog::{CatalogEntry, CatalogSnapshot, Category},
    hint::hint,
    tracker::{minimum_threshold, SubscriberRef, TrackRequest, TrackerHandle, TrackingNotice},
    traits::{DeliveryError, MarketData, NotificationSink, PublicationFilter},
    AllPublished,
    CatalogStore,
    Resolver,
};
use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::errors::ServerError;

pub const COMMAND_HELP: &str = "\
Commands:
  price <item> [@ <region>]
  track <item> [@ <region>] [threshold] [minutes]
  untrack <id|all>
  id <text>
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntrackTarget {
    One(u64),
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Price { item: String, region: Option<String> },
    Track { item: String, region: Option<String>, threshold: Option<Isk>, minutes: Option<i64> },
    Untrack(UntrackTarget),
    Id(String),
    Help,
    Quit,
}

//--------------------------------------   CommandParser     ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct CommandParser {
    price: Regex,
    track: Regex,
    untrack: Regex,
    id: Regex,
}

impl CommandParser {
    pub fn new() -> Result<Self, ServerError> {
        let compile = |re: &str| Regex::new(re).map_err(|e| ServerError::InitializeError(e.to_string()));
        Ok(Self {
            price: compile(r"(?i)^price\s+(?P<item>.+?)(?:\s*@\s*(?P<region>.+?))?\s*$")?,
            track: compile(
                r"(?i)^track\s+(?P<item>.+?)(?:\s*@\s*(?P<region>.+?))?(?:\s+(?P<threshold>\d+(?:\.\d+)?))?(?:\s+(?P<minutes>\d+))?\s*$",
            )?,
            untrack: compile(r"(?i)^untrack\s+(?P<target>\d+|all)\s*$")?,
            id: compile(r"(?i)^id\s+(?P<text>.+?)\s*$")?,
        })
    }

    pub fn parse(&self, line: &str) -> Result<Command, ServerError> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "help" | "?" => return Ok(Command::Help),
            "quit" | "exit" => return Ok(Command::Quit),
            _ => {},
        }
        let text = |caps: &regex::Captures, name: &str| caps.name(name).map(|m| m.as_str().to_string());
        if let Some(caps) = self.price.captures(line) {
            let item = text(&caps, "item").unwrap_or_default();
            return Ok(Command::Price { item, region: text(&caps, "region") });
        }
        if let Some(caps) = self.track.captures(line) {
            let item = text(&caps, "item").unwrap_or_default();
            let threshold = text(&caps, "threshold")
                .map(|s| Isk::from_str(&s))
                .transpose()
                .map_err(|e| ServerError::InvalidCommand(e.to_string()))?;
            let minutes = text(&caps, "minutes")
                .map(|s| s.parse::<i64>())
                .transpose()
                .map_err(|e| ServerError::InvalidCommand(format!("That is not a number of minutes. {e}")))?;
            if let Some(m) = minutes.filter(|m| Duration::try_minutes(*m).is_none()) {
                return Err(ServerError::InvalidCommand(format!("{m} minutes is not a usable tracking time.")));
            }
            return Ok(Command::Track { item, region: text(&caps, "region"), threshold, minutes });
        }
        if let Some(caps) = self.untrack.captures(line) {
            let target = text(&caps, "target").unwrap_or_default();
            if target.eq_ignore_ascii_case("all") {
                return Ok(Command::Untrack(UntrackTarget::All));
            }
            let id = target.parse::<u64>().map_err(|e| ServerError::InvalidCommand(format!("{target}: {e}")))?;
            return Ok(Command::Untrack(UntrackTarget::One(id)));
        }
        if let Some(caps) = self.id.captures(line) {
            return Ok(Command::Id(text(&caps, "text").unwrap_or_default()));
        }
        Err(ServerError::InvalidCommand(format!("\"{line}\" is not a command. Type `help` for the command list.")))
    }
}

//--------------------------------------    ConsoleSink      ---------------------------------------------------------
/// Writes tracking notices to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

#[async_trait]
impl NotificationSink for ConsoleSink {
    async fn deliver(&self, subscriber: &SubscriberRef, notice: &TrackingNotice) -> Result<(), DeliveryError> {
        let line = format!("@{subscriber} {notice}\n");
        let mut stdout = tokio::io::stdout();
        stdout.write_all(line.as_bytes()).await.map_err(|e| DeliveryError::Failed(e.to_string()))?;
        stdout.flush().await.map_err(|e| DeliveryError::Failed(e.to_string()))
    }
}

//--------------------------------------      Console        ---------------------------------------------------------
pub struct Console<P, M> {
    store: CatalogStore,
    items: Resolver<P>,
    places: Resolver<AllPublished>,
    market: Arc<M>,
    tracker: TrackerHandle<Arc<M>>,
    subscriber: SubscriberRef,
    default_region: String,
    parser: CommandParser,
}

impl<P, M> Console<P, M>
where
    P: PublicationFilter,
    M: MarketData,
{
    pub fn new(
        store: CatalogStore,
        items: Resolver<P>,
        places: Resolver<AllPublished>,
        market: Arc<M>,
        tracker: TrackerHandle<Arc<M>>,
    ) -> Result<Self, ServerError> {
        Ok(Self {
            store,
            items,
            places,
            market,
            tracker,
            subscriber: SubscriberRef::new("console"),
            default_region: "The Forge".to_string(),
            parser: CommandParser::new()?,
        })
    }

    pub fn with_default_region<S: Into<String>>(mut self, region: S) -> Self {
        self.default_region = region.into();
        self
    }

    pub fn with_subscriber(mut self, subscriber: SubscriberRef) -> Self {
        self.subscriber = subscriber;
        self
    }

    pub fn parse(&self, line: &str) -> Result<Command, ServerError> {
        self.parser.parse(line)
    }

    /// Run `command` and return the reply for the user.
    pub async fn execute(&self, command: Command) -> String {
        let snapshot = self.store.snapshot();
        let mut notes = Vec::new();
        let reply = match command {
            Command::Price { item, region } => self.price(&snapshot, &item, region.as_deref(), &mut notes).await,
            Command::Track { item, region, threshold, minutes } => {
                self.track(&snapshot, &item, region.as_deref(), threshold, minutes, &mut notes).await
            },
            Command::Untrack(target) => self.untrack(target),
            Command::Id(text) => self.identify(&snapshot, &text).await,
            Command::Help => COMMAND_HELP.to_string(),
            Command::Quit => "Bye!".to_string(),
        };
        notes.push(reply);
        notes.retain(|s| !s.is_empty());
        notes.join("\n")
    }

    async fn lookup(
        &self,
        snapshot: &CatalogSnapshot,
        text: &str,
        category: Category,
        notes: &mut Vec<String>,
    ) -> Option<CatalogEntry> {
        let result = match category {
            Category::Item => self.items.resolve_in(text, snapshot, category).await,
            _ => self.places.resolve_in(text, snapshot, category).await,
        };
        let note = hint(&result, text);
        if !note.is_empty() {
            notes.push(note);
        }
        result.entity
    }

    async fn item_and_region(
        &self,
        snapshot: &CatalogSnapshot,
        item: &str,
        region: Option<&str>,
        notes: &mut Vec<String>,
    ) -> Option<(CatalogEntry, CatalogEntry)> {
        let item = self.lookup(snapshot, item, Category::Item, notes).await;
        let region = self.lookup(snapshot, region.unwrap_or(&self.default_region), Category::Region, notes).await;
        item.zip(region)
    }

    async fn price(
        &self,
        snapshot: &CatalogSnapshot,
        item: &str,
        region: Option<&str>,
        notes: &mut Vec<String>,
    ) -> String {
        let Some((item, region)) = self.item_and_region(snapshot, item, region, notes).await else {
            return String::new();
        };
        match self.market.fetch_current_price(item.id, region.id).await {
            Ok(price) => format!("{} in {}: {price}", item.name, region.name),
            Err(e) => {
                debug!("📈️ Price check for {item} in {region} failed. {e}");
                format!("I have no price for {} in {}.", item.name, region.name)
            },
        }
    }

    async fn track(
        &self,
        snapshot: &CatalogSnapshot,
        item: &str,
        region: Option<&str>,
        threshold: Option<Isk>,
        minutes: Option<i64>,
        notes: &mut Vec<String>,
    ) -> String {
        let duration = match minutes.map(|m| Duration::try_minutes(m).ok_or(m)).transpose() {
            Ok(duration) => duration,
            Err(m) => return format!("{m} minutes is not a usable tracking time."),
        };
        let Some((item, region)) = self.item_and_region(snapshot, item, region, notes).await else {
            return String::new();
        };
        let (item_name, region_name) = (item.name.clone(), region.name.clone());
        let threshold = threshold.unwrap_or_else(minimum_threshold);
        let mut request = TrackRequest::new(item, region, self.subscriber.clone(), threshold);
        if let Some(duration) = duration {
            request = request.with_duration(duration);
        }
        match self.tracker.start_tracking(request).await {
            Ok(receipt) => {
                notes.extend(receipt.notices());
                let entry = &receipt.entry;
                format!(
                    "[#{}] Tracking {} in {} from {} for {} minutes. You will hear from me when it moves by {} or \
                     more.",
                    entry.id,
                    entry.item_name,
                    entry.region_name,
                    entry.baseline_price,
                    entry.duration.num_minutes(),
                    entry.change_threshold
                )
            },
            Err(e) => {
                warn!("📈️ Could not track {item_name} in {region_name}. {e}");
                format!("I can't track {item_name} in {region_name}. {e}")
            },
        }
    }

    fn untrack(&self, target: UntrackTarget) -> String {
        let result = match &target {
            UntrackTarget::One(id) => self.tracker.cancel(*id),
            UntrackTarget::All => self.tracker.cancel_all_for(&self.subscriber),
        };
        match (result, target) {
            (Ok(()), UntrackTarget::One(id)) => format!("Tracking request #{id} will stop."),
            (Ok(()), UntrackTarget::All) => "All of your tracking requests will stop.".to_string(),
            (Err(e), _) => e.to_string(),
        }
    }

    async fn identify(&self, snapshot: &CatalogSnapshot, text: &str) -> String {
        let mut found = Vec::new();
        for category in Category::ALL {
            let result = match category {
                Category::Item => self.items.resolve_in(text, snapshot, category).await,
                _ => self.places.resolve_in(text, snapshot, category).await,
            };
            if let Some(entry) = result.entity {
                let mark = if result.is_guess { " (guess)" } else { "" };
                found.push(format!("{entry}{mark}"));
            }
        }
        if found.is_empty() {
            format!("I don't know what \"{}\" is.", text.trim())
        } else {
            found.join("\n")
        }
    }
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run_console<P, M>(console: Console<P, M>) -> Result<(), ServerError>
where
    P: PublicationFilter,
    M: MarketData,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{COMMAND_HELP}");
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match console.parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                trace!("🪛️ Running {command:?}");
                println!("{}", console.execute(command).await);
            },
            Err(e) => println!("{e}"),
        }
    }
    info!("🪛️ Console closed");
    Ok(())
}

#[cfg(test)]
mod test {
    use pricebot_engine::{
        events::EventProducers,
        test_utils::{FakeMarket, RecordingSink},
        ShortcutTable,
        TrackerConfig,
        TrackingScheduler,
    };

    use super::*;

    const FORGE: i64 = 10000002;

    type TestScheduler = TrackingScheduler<Arc<FakeMarket>, Arc<RecordingSink>>;

    fn setup() -> (Console<AllPublished, FakeMarket>, TestScheduler) {
        let store = CatalogStore::new();
        store.publish([
            (Category::Item, vec![
                CatalogEntry::item(34, "Tritanium"),
                CatalogEntry::item(35, "Pyerite"),
                CatalogEntry::item(44992, "PLEX"),
            ]),
            (Category::Region, vec![CatalogEntry::region(FORGE, "The Forge"), CatalogEntry::region(10000043, "Domain")]),
        ]);
        let market = Arc::new(FakeMarket::new());
        market.set_price(34, FORGE, "5.02".parse().unwrap());
        let sink = Arc::new(RecordingSink::new());
        let (scheduler, handle) =
            TrackingScheduler::new(Arc::clone(&market), sink, TrackerConfig::default(), EventProducers::default());
        let items = Resolver::new(ShortcutTable::standard(), AllPublished);
        let places = Resolver::new(ShortcutTable::new(), AllPublished);
        let console = Console::new(store, items, places, market, handle).unwrap();
        (console, scheduler)
    }

    #[test]
    fn parse_commands() {
        let parser = CommandParser::new().unwrap();
        assert_eq!(parser.parse("price trit").unwrap(), Command::Price { item: "trit".into(), region: None });
        assert_eq!(parser.parse("PRICE  mining laser upgrade @ the forge ").unwrap(), Command::Price {
            item: "mining laser upgrade".into(),
            region: Some("the forge".into())
        });
        assert_eq!(parser.parse("track plex").unwrap(), Command::Track {
            item: "plex".into(),
            region: None,
            threshold: None,
            minutes: None
        });
        assert_eq!(parser.parse("track trit @ domain 0.5 90").unwrap(), Command::Track {
            item: "trit".into(),
            region: Some("domain".into()),
            threshold: Some("0.5".parse().unwrap()),
            minutes: Some(90)
        });
        assert_eq!(parser.parse("track 1000 needlejack 25").unwrap(), Command::Track {
            item: "1000 needlejack".into(),
            region: None,
            threshold: Some(Isk::from(25)),
            minutes: None
        });
        assert_eq!(parser.parse("untrack 3").unwrap(), Command::Untrack(UntrackTarget::One(3)));
        assert_eq!(parser.parse("untrack ALL").unwrap(), Command::Untrack(UntrackTarget::All));
        assert_eq!(parser.parse("id  mlu ii ").unwrap(), Command::Id("mlu ii".into()));
        assert_eq!(parser.parse(" help").unwrap(), Command::Help);
        assert_eq!(parser.parse("exit").unwrap(), Command::Quit);
        assert!(matches!(parser.parse("sell everything"), Err(ServerError::InvalidCommand(_))));
        assert!(matches!(parser.parse("untrack soon"), Err(ServerError::InvalidCommand(_))));
        assert!(matches!(parser.parse("price"), Err(ServerError::InvalidCommand(_))));
    }

    #[tokio::test]
    async fn huge_tracking_times_are_refused() {
        let (console, mut scheduler) = setup();
        let err = console.parse("track trit 1 9999999999999999").unwrap_err();
        assert!(matches!(err, ServerError::InvalidCommand(_)));
        assert!(err.to_string().contains("9999999999999999 minutes is not a usable tracking time."), "{err}");
        // Too large for an i64 at all
        assert!(matches!(console.parse("track trit 1 99999999999999999999"), Err(ServerError::InvalidCommand(_))));

        let command =
            Command::Track { item: "trit".into(), region: None, threshold: None, minutes: Some(9_999_999_999_999_999) };
        assert_eq!(console.execute(command).await, "9999999999999999 minutes is not a usable tracking time.");
        scheduler.tick().await;
        assert!(scheduler.is_empty());

        // Large but representable times are capped by the tracker
        let reply = console.execute(console.parse("track trit 1 100000").unwrap()).await;
        assert!(reply.starts_with("Tracking for 100000 minutes is longer than allowed"), "{reply}");
        scheduler.tick().await;
        assert_eq!(scheduler.entries()[0].duration, Duration::hours(24));
    }

    #[tokio::test]
    async fn price_checks() {
        let (console, _scheduler) = setup();
        let reply = console.execute(console.parse("price trit").unwrap()).await;
        assert_eq!(reply, "Tritanium in The Forge: 5.02 ISK");
        let reply = console.execute(console.parse("price trit @ domain").unwrap()).await;
        assert_eq!(reply, "I have no price for Tritanium in Domain.");
        let reply = console.execute(console.parse("price tritnm").unwrap()).await;
        assert_eq!(reply, "\"tritnm\" didn't match exactly. Did you mean Tritanium?\nTritanium in The Forge: 5.02 ISK");
        let reply = console.execute(console.parse("price zzz").unwrap()).await;
        assert_eq!(reply, "I don't know what \"zzz\" is.");
    }

    #[tokio::test]
    async fn tracking_commands() {
        let (console, mut scheduler) = setup();
        let reply = console.execute(console.parse("track trit 0.001 10").unwrap()).await;
        assert_eq!(
            reply,
            "A change threshold of 0.001 is below the minimum, using 0.01 ISK instead.\n[#1] Tracking Tritanium in The \
             Forge from 5.02 ISK for 10 minutes. You will hear from me when it moves by 0.01 ISK or more."
        );
        let reply = console.execute(console.parse("track plex").unwrap()).await;
        assert!(reply.starts_with("I can't track PLEX in The Forge."), "{reply}");
        scheduler.tick().await;
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.entries()[0].subscriber, SubscriberRef::new("console"));

        let reply = console.execute(console.parse("untrack 1").unwrap()).await;
        assert_eq!(reply, "Tracking request #1 will stop.");
        scheduler.tick().await;
        assert!(scheduler.is_empty());
    }

    #[tokio::test]
    async fn identify_names() {
        let (console, _scheduler) = setup();
        assert_eq!(console.execute(Command::Id("34".into())).await, "Tritanium [item #34]");
        assert_eq!(console.execute(Command::Id("forge".into())).await, "The Forge [region #10000002]");
        assert_eq!(console.execute(Command::Id("pyrte".into())).await, "Pyerite [item #35] (guess)");
        assert_eq!(console.execute(Command::Id("qqq".into())).await, "I don't know what \"qqq\" is.");
    }
}
