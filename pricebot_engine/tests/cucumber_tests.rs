mod cucumber;

use ::cucumber::{writer, World};
use log::*;
use tokio::runtime::Runtime;

use crate::cucumber::ResolverWorld;

fn main() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let sys = Runtime::new().unwrap();
    sys.block_on(ResolverWorld::cucumber().with_writer(writer::Libtest::or_basic()).run("tests/features"));
    info!("🚀️ Tests complete");
}
