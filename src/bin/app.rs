use adapter::{database::connect_database_with, redis::RedisClient};
use anyhow::{Context, Result};
use api::route::v1;
use axum::Router;
use kernel::model::{
    permission::Caller,
    role::Role,
    user::{
        event::{CreateUser, UpdateUserRole},
        UserProfile,
    },
};
use registry::AppRegistry;
use shared::config::{AppConfig, InitialAdminConfig};
use shared::env::{which, Environment};
use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger()?;
    bootstrap().await
}

fn init_logger() -> Result<()> {
    let log_level = match which() {
        Environment::Development => "debug",
        Environment::Production => "info",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into());

    let subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

async fn bootstrap() -> Result<()> {
    let app_config = AppConfig::new()?;
    let pool = connect_database_with(&app_config.database);
    pool.migrate()
        .await
        .context("failed to apply database migrations")?;
    let kv = Arc::new(RedisClient::new(&app_config.redis)?);

    let registry = AppRegistry::new(pool, kv, &app_config);

    if let Some(admin) = &app_config.initial_admin {
        seed_initial_admin(&registry, admin).await?;
    }

    let app = Router::new()
        .merge(v1::routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(registry);

    let addr = SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), app_config.server.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Unexpected error happened in server")
        .inspect_err(|e| {
            tracing::error!(
                error.cause_chain = ?e,error.message = %e, "Unexpected error"
            )
        })
}

/// Creates the configured admin account unless a user with that name exists.
async fn seed_initial_admin(registry: &AppRegistry, admin: &InitialAdminConfig) -> Result<()> {
    let users = registry.user_repository();
    if users.find_by_user_name(&admin.user_name).await?.is_some() {
        return Ok(());
    }

    let user = users
        .create(CreateUser::new(
            admin.user_name.clone(),
            admin.email.clone(),
            admin.password.clone(),
            UserProfile::default(),
        ))
        .await?;
    users
        .update_role(UpdateUserRole::new(
            user.user_id,
            Role::Admin,
            Caller::new(user.user_id, Role::Admin),
        ))
        .await?;

    tracing::info!(user_name = %admin.user_name, "seeded initial admin");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
