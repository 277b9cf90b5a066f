mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use anyhow::Context;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (config, source) = Config::load().context("loading configuration")?;
    match &source {
        Some(path) => log::info!("configuration read from {}", path.display()),
        None => log::info!("no configuration file, using defaults"),
    }

    // A dashboard without data is not a valid running state: fail here.
    let dataset = data::loader::load_file(&config.data_path)
        .with_context(|| format!("loading dataset {}", config.data_path.display()))?;
    log::info!(
        "loaded {} launch records from {} (payload {} – {} kg, {} sites, {} booster categories)",
        dataset.len(),
        config.data_path.display(),
        dataset.min_payload(),
        dataset.max_payload(),
        dataset.launch_sites().len(),
        dataset.categories().len(),
    );

    let state = AppState::new(dataset)
        .context("rendering dashboard page")?
        .shared();
    let router = app::build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("dashboard listening on http://{addr}");

    axum::serve(listener, router).await.context("serving dashboard")?;
    Ok(())
}
