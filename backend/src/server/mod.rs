//! Server construction and route wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig, SettingsError};
pub use state_builders::{AppStates, build_states};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::comments::{get_comment, list_post_comments, query_config};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::ws;

/// Everything an application instance needs.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub states: AppStates,
}

/// Build the application with the comment endpoints, WebSocket entry, health
/// probes, and (in debug builds) Swagger UI.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        states,
    } = deps;

    let api = web::scope("/api/v1")
        .service(list_post_comments)
        .service(get_comment);

    let app = App::new()
        .app_data(health_state)
        .app_data(states.http)
        .app_data(states.ws)
        .app_data(query_config())
        .service(api)
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server for `config`.
///
/// The returned [`Server`] must be awaited to drive the listener; readiness is
/// marked once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let states = build_states(config);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            states: states.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
