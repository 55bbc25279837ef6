mod fakes;
mod prepare_env;

pub use fakes::{FakeMarket, RecordingSink};
pub use prepare_env::prepare_test_env;
