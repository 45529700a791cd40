use clap::Parser;
use cyclist_scatter::core::ConfigProvider;
use cyclist_scatter::utils::error::ErrorSeverity;
use cyclist_scatter::utils::{logger, validation::Validate};
use cyclist_scatter::{ChartEngine, LocalStorage, ScatterPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-chart")]
#[command(about = "Render the cyclist scatter plot from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "chart-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Force the bundled dataset regardless of config
    #[arg(long)]
    offline: bool,

    /// Dry run - show the resolved configuration without rendering
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based chart renderer");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 命令列覆蓋設定
    if args.offline {
        config.source.offline = Some(true);
        tracing::info!("🔧 Offline mode forced from command line");
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be fetched or written");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = ScatterPipeline::new(storage, config);
    let engine = ChartEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Chart rendered successfully!");
            println!("✅ Chart rendered successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Chart render failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let options = config.chart_options();

    println!("📋 Configuration Summary:");
    if config.offline() {
        println!("  Source: bundled dataset (offline)");
    } else {
        println!("  Source: {}", config.data_url());
    }
    println!("  Title: {}", options.title);
    println!("  Size: {}x{}", options.width, options.height);
    println!(
        "  Colors: {} (no doping) / {} (doping)",
        options.clean_color, options.doping_color
    );
    println!("  Output: {}/{}", config.output_path(), config.output_filename());
    println!("  Format: {}", config.output_format());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
