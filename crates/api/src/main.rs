use anyhow::Context;

use retailpulse_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    retailpulse_observability::init(config.log_format);

    tracing::info!(
        data_dir = %config.data_dir.display(),
        surplus_policy = config.surplus_policy.as_str(),
        demand_sample_rows = config.demand_sample_rows,
        "starting retailpulse api"
    );

    let bind_addr = config.bind_addr;
    let app = retailpulse_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
