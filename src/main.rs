use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use uniform_orders_api::{
    build_app,
    config::AppConfig,
    db::{create_orm_conn, pool_from_orm, run_migrations},
    mail::mailer_from_config,
    payments::paypal::PaypalGateway,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,uniform_orders_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let pool = pool_from_orm(&orm);

    let mailer = mailer_from_config(&config)?;
    let gateway = PaypalGateway::new(&config.paypal)?;
    tracing::info!(
        mail_backend = ?config.mail_backend,
        paypal = %config.paypal.base_url,
        "services configured"
    );

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    let state = AppState {
        pool,
        orm,
        config: Arc::new(config),
        mailer,
        gateway: Arc::new(gateway),
    };
    let app = build_app(state);

    tracing::info!("listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
