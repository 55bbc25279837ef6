use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, PriceChangedEvent, TrackingEndedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub price_changed_producer: Vec<EventProducer<PriceChangedEvent>>,
    pub tracking_ended_producer: Vec<EventProducer<TrackingEndedEvent>>,
}

impl EventProducers {
    pub async fn publish_price_changed(&self, event: PriceChangedEvent) {
        for producer in &self.price_changed_producer {
            producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_tracking_ended(&self, event: TrackingEndedEvent) {
        for producer in &self.tracking_ended_producer {
            producer.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_price_changed: Option<EventHandler<PriceChangedEvent>>,
    pub on_tracking_ended: Option<EventHandler<TrackingEndedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_price_changed = hooks.on_price_changed.map(|f| EventHandler::new(buffer_size, f));
        let on_tracking_ended = hooks.on_tracking_ended.map(|f| EventHandler::new(buffer_size, f));
        Self { on_price_changed, on_tracking_ended }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_price_changed {
            result.price_changed_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_tracking_ended {
            result.tracking_ended_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_price_changed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_tracking_ended {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_price_changed: Option<Handler<PriceChangedEvent>>,
    pub on_tracking_ended: Option<Handler<TrackingEndedEvent>>,
}

impl EventHooks {
    pub fn on_price_changed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(PriceChangedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_price_changed = Some(Arc::new(f));
        self
    }

    pub fn on_tracking_ended<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(TrackingEndedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_tracking_ended = Some(Arc::new(f));
        self
    }
}
