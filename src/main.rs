use clap::Parser;
use landing_forecaster::utils::{logger, validation::Validate};
use landing_forecaster::{app, AppContext, CliConfig, LocalStorage};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let (config, source) = match cli.resolve() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    logger::init_logger(config.logging.json, cli.verbose);
    tracing::info!("Starting landing-forecaster");
    source.log(&cli.config);
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let storage = LocalStorage::new(".");
    let ctx = match AppContext::load(&config, &storage, &config.server.frontend_dir).await {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => {
            tracing::error!(
                "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };
    tracing::info!(
        "📊 {} history rows, classifier {}",
        ctx.history.len(),
        if ctx.classifier.is_some() { "loaded" } else { "missing" }
    );

    let listener = tokio::net::TcpListener::bind(config.server.bind.as_str()).await?;
    app::serve(listener, ctx, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutting down...");
    })
    .await?;

    Ok(())
}
