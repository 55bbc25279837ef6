use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::tracker::{SubscriberRef, TrackingNotice};

#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    #[error("Subscriber {0} can no longer be reached")]
    Unreachable(SubscriberRef),
    #[error("Delivery failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver `notice` to `subscriber`. The scheduler treats any error as permanent for that subscriber.
    async fn deliver(&self, subscriber: &SubscriberRef, notice: &TrackingNotice) -> Result<(), DeliveryError>;
}

#[async_trait]
impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    async fn deliver(&self, subscriber: &SubscriberRef, notice: &TrackingNotice) -> Result<(), DeliveryError> {
        (**self).deliver(subscriber, notice).await
    }
}
