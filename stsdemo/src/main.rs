use sts_axum::start_server;
use sts_engine::dispatch::Dispatcher;
use sts_sqlite::Db;
use stsdemo::{AppConfig, Cli, refresh, refresh_on_schedule, source::JsonFileSource};
use tokio::select;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::import()?;
    let AppConfig {
        server,
        database,
        schedule,
        products,
    } = AppConfig::load(&cli)?;

    let db = Db::open(&database).await?;
    let source = JsonFileSource::from(products);

    // The initial read must succeed; later refreshes only log failures.
    let dispatcher = Dispatcher::new(db, Vec::new());
    refresh(&dispatcher, &source).await?;

    let server_task = tokio::spawn(start_server(server, dispatcher.clone()));

    if schedule.every.is_some() {
        let refresh_task = tokio::spawn(refresh_on_schedule(schedule, dispatcher, source));

        select! {
            r = server_task => r??,
            r = refresh_task => r??,
        }
    } else {
        server_task.await??;
    }

    Ok(())
}
