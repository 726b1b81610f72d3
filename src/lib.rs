#[macro_use]
extern crate rocket;

pub mod controller;

use cargolink_core::{
    args::Args,
    db::Store,
    utils::{
        self,
        ReleaseEnvironment,
    },
};
use rocket::{
    Build,
    Rocket,
};
use std::net::{
    IpAddr,
    Ipv4Addr,
};

/// Assemble the server. The only changes in here should be mounting new
/// controller methods.
pub fn build(args: Args, store: Store) -> Rocket<Build> {
    let base = match utils::get_release_env(&args) {
        ReleaseEnvironment::Production => rocket::Config::release_default(),
        ReleaseEnvironment::Development => rocket::Config::debug_default(),
    };
    let address = args.address.parse::<IpAddr>().unwrap_or_else(|_| {
        log::warn!("invalid bind address {}, using localhost", args.address);
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    });
    let config = rocket::Config {
        ident: rocket::config::Ident::none(),
        address,
        port: args.port,
        ..base
    };
    rocket::custom(&config)
        .manage(args)
        .manage(store)
        .register(
            "/",
            catchers![
                controller::bad_request,
                controller::unauthorized,
                controller::not_found,
                controller::unprocessable_entity,
                controller::internal_error,
            ],
        )
        .mount("/", routes![controller::get_version])
        .mount(
            "/auth",
            routes![controller::register, controller::login, controller::me],
        )
        .mount(
            "/carriers",
            routes![controller::get_carriers, controller::get_carrier],
        )
        .mount(
            "/rates",
            routes![controller::get_cities, controller::calculate_rate],
        )
        .mount("/selection", routes![controller::select_carriers])
        .mount(
            "/shipments",
            routes![
                controller::create_shipment,
                controller::get_shipments,
                controller::get_shipment,
                controller::cancel_shipment,
            ],
        )
        .mount("/tracking", routes![controller::track_shipment])
        .mount(
            "/api-keys",
            routes![
                controller::create_api_key,
                controller::get_api_keys,
                controller::revoke_api_key,
            ],
        )
        .mount(
            "/assignments",
            routes![
                controller::create_assignment,
                controller::get_assignments,
                controller::get_assignment,
                controller::accept_assignment,
                controller::decline_assignment,
                controller::update_assignment_status,
                controller::get_qr_code,
                controller::get_qr_payload,
            ],
        )
        .mount("/qr", routes![controller::scan_qr_code])
}
