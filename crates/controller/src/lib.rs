// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

//! Core library of the *Matchday Controller*
//!
//! Manages recurring match events for tenant organizations: occurrence
//! computation, per-occurrence cancellation and the per-occurrence
//! subscription ledger, exposed over a REST API with an administrative and a
//! public surface.
//!
//! # Example
//!
//! ```no_run
//! use matchday_controller_core::Controller;
//! use anyhow::Result;
//!
//! #[actix_web::main]
//! async fn main() {
//!     matchday_controller_core::try_or_exit(run()).await;
//! }
//!
//! async fn run() -> Result<()> {
//!     let controller = Controller::create("Matchday Controller").await?;
//!
//!     controller.run().await
//! }
//! ```

use crate::api::v1::response::error::json_error_handler;
use crate::services::IterationService;
use crate::settings::{Settings, SharedSettings};
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::web::{self, Data};
use actix_web::{App, HttpServer, Scope};
use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use std::net::Ipv6Addr;
use std::sync::Arc;
use storage::memory::MemoryEventStore;
use storage::EventStore;
use tokio::signal::ctrl_c;
use tokio::signal::unix::{signal, SignalKind};
use tracing_actix_web::TracingLogger;

pub mod api;
mod cli;
pub mod services;
pub mod settings;
mod trace;

/// Wrapper of the main function. Correctly outputs the error to the logging utility or stderr.
pub async fn try_or_exit<T, F>(f: F) -> T
where
    F: std::future::Future<Output = Result<T>>,
{
    match f.await {
        Ok(ok) => ok,
        Err(err) => {
            if log::log_enabled!(log::Level::Error) {
                log::error!("Crashed with error: {:?}", err);
            } else {
                eprintln!("Crashed with error: {err:?}");
            }

            std::process::exit(-1);
        }
    }
}

/// Controller struct representation containing all fields required to drive the controller
pub struct Controller {
    /// Settings loaded on [Controller::create]
    pub startup_settings: Arc<Settings>,

    /// Cloneable shared settings, used to reload settings from when receiving the `reload` signal.
    pub shared_settings: SharedSettings,

    /// CLI arguments
    args: cli::Args,

    store: Arc<dyn EventStore>,
}

impl Controller {
    /// Tries to create a controller from CLI arguments and then the settings.
    ///
    /// The returned controller can be modified and then run using [`Controller::run`]
    pub async fn create(program_name: &str) -> Result<Self> {
        let args = cli::parse_args();

        let settings = settings::load_settings(&args)?;

        trace::init(&settings.logging)?;

        log::info!("Starting {}", program_name);

        let settings = Arc::new(settings);
        let shared_settings: SharedSettings = Arc::new(ArcSwap::from(settings.clone()));

        let store: Arc<dyn EventStore> = Arc::new(MemoryEventStore::new());

        Ok(Self {
            startup_settings: settings,
            shared_settings,
            args,
            store,
        })
    }

    /// Runs the controller until a fatal error occurred or a shutdown is requested (e.g. SIGTERM).
    pub async fn run(self) -> Result<()> {
        let http_server = {
            let cors = self.startup_settings.http.cors.clone();
            let store = self.store.clone();

            HttpServer::new(move || {
                let cors = setup_cors(&cors);

                let iteration_service = Data::new(IterationService::new(store.clone()));
                let store = Data::from(store.clone());

                App::new()
                    .wrap(TracingLogger::default())
                    .wrap(cors)
                    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                    .app_data(store)
                    .app_data(iteration_service)
                    .service(v1_scope())
                    .service(public_v1_scope())
            })
        };

        let address = (Ipv6Addr::UNSPECIFIED, self.startup_settings.http.port);

        let http_server = http_server.bind(address).with_context(|| {
            format!("Failed to bind http server to {}:{}", address.0, address.1)
        })?;

        log::info!("Startup finished");

        let http_server = http_server.disable_signals().run();
        let http_server_handle = http_server.handle();

        let mut reload_signal =
            signal(SignalKind::hangup()).context("Failed to register SIGHUP signal handler")?;

        actix_rt::spawn(http_server);

        // Wait for either SIGTERM or SIGHUP and handle them accordingly
        loop {
            tokio::select! {
                _ = ctrl_c() => {
                    log::info!("Got termination signal, exiting");
                    break;
                }
                _ = reload_signal.recv() => {
                    log::info!("Got reload signal, reloading");

                    if let Err(e) = settings::reload_settings(self.shared_settings.clone(), &self.args.config) {
                        log::error!("Failed to reload settings, {}", e);
                    }
                }
            }
        }

        http_server_handle.stop(true).await;

        log::info!("HTTP server stopped, goodbye!");

        Ok(())
    }
}

/// The administrative API surface
fn v1_scope() -> Scope {
    web::scope("/v1")
        .service(api::v1::events::new_event)
        .service(api::v1::events::get_events)
        .service(api::v1::events::get_event)
        .service(api::v1::events::patch_event)
        .service(api::v1::events::delete_event)
        .service(api::v1::events::iterations::get_event_iterations)
        .service(api::v1::events::iterations::cancel_event_iteration)
        .service(api::v1::events::iterations::uncancel_event_iteration)
        .service(api::v1::events::subscriptions::join_event)
        .service(api::v1::events::subscriptions::unjoin_event)
}

/// The public self-service surface
///
/// Mounts the read and join/unjoin handlers unchanged; both surfaces go
/// through the same iteration service.
fn public_v1_scope() -> Scope {
    web::scope("/public/v1")
        .service(api::v1::events::get_events)
        .service(api::v1::events::get_event)
        .service(api::v1::events::iterations::get_event_iterations)
        .service(api::v1::events::subscriptions::join_event)
        .service(api::v1::events::subscriptions::unjoin_event)
}

fn setup_cors(settings: &settings::HttpCors) -> Cors {
    let mut cors = Cors::default();

    for origin in &settings.allowed_origin {
        cors = cors.allowed_origin(origin)
    }

    cors.allowed_header(header::CONTENT_TYPE)
        .allowed_header(header::AUTHORIZATION)
        .allow_any_method()
}
