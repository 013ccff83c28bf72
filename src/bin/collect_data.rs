use clap::Parser;
use landing_forecaster::core::dataset::Table;
use landing_forecaster::core::{ConfigProvider, Storage};
use landing_forecaster::utils::{logger, validation::Validate};
use landing_forecaster::{ForecastError, LocalStorage, Result, TomlConfig};

#[derive(Parser)]
#[command(name = "collect-data")]
#[command(about = "Download the historical Falcon 9 landing dataset")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "forecaster.toml")]
    config: String,

    /// Override `data.source_url`
    #[arg(long)]
    url: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let (config, source) = match TomlConfig::load_or_default(&args.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };
    logger::init_logger(config.logging.json, args.verbose);
    source.log(&args.config);

    if let Err(e) = run(&args, config).await {
        tracing::error!(
            "❌ Dataset download failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(args: &Args, mut config: TomlConfig) -> Result<()> {
    if let Some(url) = &args.url {
        config.data.source_url = url.clone();
    }
    config.validate()?;

    tracing::info!("⬇️  Downloading dataset from {}", config.data.source_url);
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?;
    let response = client.get(&config.data.source_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ForecastError::upstream("dataset source", format!("HTTP {}", status)));
    }
    let bytes = response.bytes().await?;

    let table = Table::from_csv_bytes(&bytes)?;
    if table.is_empty() {
        return Err(ForecastError::dataset("Downloaded dataset has no rows"));
    }
    tracing::info!("Dataset shape: {} rows x {} columns", table.len(), table.headers.len());
    tracing::debug!("Columns: {:?}", table.headers);

    let output = config.raw_dataset_path();
    LocalStorage::new(".").write_file(&output, &bytes).await?;
    tracing::info!("✅ Fresh dataset saved to {}", output);
    println!("✅ Fresh dataset saved to {}", output);
    println!("Now run: train-model");
    Ok(())
}
