use commands::App;

mod commands;
mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (settings, command) = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "spendsync={level},remote={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(data_dir = %settings.data_dir.display(), "opening store");
    let app = App::open(settings)?;
    if let Err(err) = app.run(command).await {
        tracing::error!("{err}");
        return Err(err.into());
    }

    Ok(())
}
