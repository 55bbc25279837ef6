//! Stateless pub-sub for tracking events
//!
//! Hosts use these hooks to observe the tracking scheduler (to log notifications, keep statistics and so on) without
//! being involved in delivery. Handlers only see the event itself, never the scheduler's state, and they may be async.
//! Each event is handled on its own task; a slow handler does not hold up the scheduler.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::{sync::mpsc, task::JoinSet};

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    listener: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, receiver) = mpsc::channel(buffer_size);
        Self { listener: receiver, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    /// Handle events until every producer has been dropped, then wait for the outstanding handlers to finish.
    pub async fn start_handler(self) {
        debug!("📬️ Starting event handler");
        let Self { mut listener, sender, handler } = self;
        // Only producers may keep the channel open
        drop(sender);
        let mut jobs = JoinSet::new();
        loop {
            tokio::select! {
                ev = listener.recv() => match ev {
                    Some(ev) => {
                        trace!("📬️ Handling event");
                        jobs.spawn((handler)(ev));
                    },
                    None => break,
                },
                Some(done) = jobs.join_next(), if !jobs.is_empty() => log_job_result(done),
            }
        }
        debug!("📬️ All producers are gone. Waiting for {} jobs to complete", jobs.len());
        while let Some(done) = jobs.join_next().await {
            log_job_result(done);
        }
        debug!("📬️ Event handler has shut down");
    }
}

fn log_job_result(result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => trace!("📬️ Event handled"),
        Err(e) => warn!("📬️ An event handler failed: {e}"),
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("📬️ Failed to send event: {e}");
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    #[tokio::test]
    async fn every_event_is_handled_before_shutdown() {
        let _ = env_logger::try_init();
        let total = Arc::new(AtomicU64::new(0));
        let t2 = total.clone();
        let handler = Arc::new(move |v: u64| {
            let total = total.clone();
            Box::pin(async move {
                tokio::time::sleep(tokio::time::Duration::from_millis(20 * (v % 3))).await;
                total.fetch_add(v, Ordering::SeqCst);
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        });
        let event_handler = EventHandler::new(1, handler);
        let evens = event_handler.subscribe();
        let odds = event_handler.subscribe();
        tokio::spawn(async move {
            for i in 0..5 {
                evens.publish_event(i * 2).await;
            }
        });
        tokio::spawn(async move {
            for i in 0..5 {
                odds.publish_event(i * 2 + 1).await;
            }
        });
        event_handler.start_handler().await;
        assert_eq!(t2.load(Ordering::SeqCst), 45);
    }
}
