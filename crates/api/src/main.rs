use std::sync::Arc;

use anyhow::Context;

use hrgate_api::accounts::{self, AccountStore};
use hrgate_api::app::cors::CorsConfig;
use hrgate_auth::AuthConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hrgate_observability::init();

    // A missing or weak signing key aborts startup here.
    let config = AuthConfig::from_env().context("invalid auth configuration")?;
    let cors = CorsConfig::from_env()?;

    let accounts = Arc::new(AccountStore::new());
    if let Ok(password) = std::env::var("DEMO_ACCOUNT_PASSWORD") {
        accounts::seed_demo_accounts(&accounts, &argon2::Argon2::default(), &password)?;
        tracing::warn!(count = accounts.len(), "seeded demo accounts");
    }

    let app = hrgate_api::app::build_app(config, &cors, accounts)?;

    let bind = std::env::var("HTTP_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
