use std::sync::Arc;

use tokio::sync::broadcast;

use bch_betting::api::router::create_router;
use bch_betting::api::ws_types::WsMessage;
use bch_betting::config::AppConfig;
use bch_betting::db::{self, rate_repo};
use bch_betting::oracle::CoinGeckoClient;
use bch_betting::services::{fixture_loader, rate_refresher, BetSimulator, RateCache};
use bch_betting::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // reqwest and sqlx both link rustls; pick the provider once for the process.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);
    let metrics_handle = bch_betting::metrics::init_metrics()?;

    tracing::info!("Connecting to database...");
    let db = db::init_pool(&config.database_url).await?;
    db::run_migrations(&db).await?;
    tracing::info!("Database connected, migrations applied");

    if config.seed_fixtures {
        let created = fixture_loader::seed_if_empty(&db).await?;
        if created > 0 {
            tracing::info!(matches = created, "Demo fixtures seeded");
        }
    }

    // --- Rate cache: hydrate from history, then keep fresh in the background ---
    let price_source = CoinGeckoClient::new(config.price_api_url.clone())?;
    let rates = Arc::new(RateCache::new(Arc::new(price_source)));

    match rate_repo::latest_rate(&db).await {
        Ok(Some(snapshot)) => {
            tracing::info!(
                rate = %snapshot.rate,
                fetched_at = %snapshot.fetched_at,
                "Rate cache hydrated from history"
            );
            rates.seed(snapshot).await;
        }
        Ok(None) => tracing::info!("No stored BCH rate yet, waiting for first refresh"),
        Err(e) => tracing::warn!(error = %e, "Could not load last BCH rate"),
    }

    let (ws_tx, _) = broadcast::channel::<WsMessage>(256);

    {
        let rates = Arc::clone(&rates);
        let pool = db.clone();
        let ws_tx = ws_tx.clone();
        let interval_secs = config.rate_refresh_interval_secs;
        tokio::spawn(async move {
            rate_refresher::run_rate_refresher(rates, pool, ws_tx, interval_secs).await;
        });
    }

    let simulator = BetSimulator::new(db.clone(), Arc::clone(&rates), config.ticket_value_usd);

    let state = AppState {
        db,
        config,
        ws_tx,
        metrics_handle,
        rates,
        simulator,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
