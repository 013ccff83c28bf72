use clap::Parser;
use landing_forecaster::core::classifier::{self, TrainOptions};
use landing_forecaster::core::dataset::Table;
use landing_forecaster::core::{ConfigProvider, Storage};
use landing_forecaster::utils::{logger, validation::Validate};
use landing_forecaster::{LocalStorage, Result, TomlConfig};

#[derive(Parser)]
#[command(name = "train-model")]
#[command(about = "Train the landing-success classifier from the historical dataset")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "forecaster.toml")]
    config: String,

    /// Override `model.epochs`
    #[arg(long)]
    epochs: Option<usize>,

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
            "❌ Training failed: {} (Category: {:?}, Severity: {:?})",
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
    if let Some(epochs) = args.epochs {
        config.model.epochs = epochs;
    }
    config.validate()?;

    let storage = LocalStorage::new(".");
    let raw_path = config.raw_dataset_path();
    tracing::info!("Training landing success model from {}", raw_path);
    let table = Table::from_csv_bytes(&storage.read_file(&raw_path).await?)?;
    tracing::info!("Dataset shape: {} rows x {} columns", table.len(), table.headers.len());

    let options = TrainOptions {
        epochs: config.model.epochs,
        learning_rate: config.model.learning_rate,
        l2: config.model.l2,
        test_fraction: config.model.test_fraction,
    };
    let (bundle, evaluation) = classifier::train(&table, &options)?;

    println!("✓ Model Accuracy: {:.2}%", evaluation.accuracy * 100.0);
    println!("\nClassification Report:\n{}", evaluation);

    bundle.save(&storage, config.model_path()).await?;
    tracing::info!("✓ Model saved to {}", config.model_path());
    println!("\n✓ Model saved to {}", config.model_path());
    Ok(())
}
