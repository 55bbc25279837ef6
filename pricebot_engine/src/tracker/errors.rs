use thiserror::Error;

use crate::traits::MarketDataError;

#[derive(Debug, Clone, Error)]
pub enum TrackerError {
    #[error("Could not establish a baseline price. {0}")]
    NoBaseline(#[from] MarketDataError),
    #[error("The tracking scheduler has stopped")]
    SchedulerStopped,
}
