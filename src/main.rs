use event_landing::{config::get_or_init_config, App, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets may come from a local `.env` file, it has to be loaded before the config.
    let dotenv_loaded = dotenv::dotenv().is_ok();

    // We have a different logging mechanism for production
    #[cfg(not(debug_assertions))]
    {
        event_landing::init_production_tracing()
    }
    #[cfg(debug_assertions)]
    {
        event_landing::init_dbg_tracing();
    }
    tracing::debug!("{:<20} - {dotenv_loaded}", ".env loaded");

    let config = get_or_init_config().clone();
    let app = App::build_from_config(config).await?;

    event_landing::serve(app).await?;

    Ok(())
}
