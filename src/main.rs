use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables win.
    dotenvy::dotenv().ok();

    ai_llm_service::telemetry::init("info").context("installing tracing subscriber")?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting oneflow-feasibility");

    api::start().await.context("feasibility API")?;

    Ok(())
}
