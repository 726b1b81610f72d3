#[macro_use]
extern crate rocket;

use cargolink::build;
use cargolink_core::{
    args::Args,
    *,
};
use clap::Parser;

// The only changes in here should be in cargolink::build
#[launch]
async fn rocket() -> _ {
    env_logger::init();
    let args = Args::parse();
    let store = utils::start_up(&args);
    log::info!("{} {} is online", APP_NAME, APP_VERSION);
    build(args, store)
}
