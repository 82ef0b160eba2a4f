use anyhow::{Context, Result};
use clap::Parser;
use dermascan_api::bootstrap;
use dermascan_api::responses::PredictionResponse;
use dermascan_cascade::PredictionReport;
use dermascan_cli::cli::{ClassifyArgs, CliArgs, Commands, ServeArgs};
use dermascan_cli::{NAME, VERSION};
use dermascan_core::config::DermascanConfig;
use dermascan_core::metadata::class_info;
use dermascan_model::{ImageInput, ModelDownloader};
use std::env;
use std::fs;
use std::process;
use tracing::{debug, error, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let outcome = match &args.command {
        Commands::Classify(classify_args) => handle_classify(classify_args).await,
        Commands::Serve(serve_args) => handle_serve(serve_args).await,
        Commands::Health => handle_health().await,
    };

    let exit_code = match outcome {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            1
        }
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = if let Some(level_str) = &args.log_level {
            parse_level(level_str)
        } else if args.verbose {
            Level::DEBUG
        } else if args.quiet {
            Level::ERROR
        } else {
            let level_str = env::var("DERMASCAN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
            parse_level(&level_str)
        };

        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            filter = filter
                .add_directive(format!("dermascan={}", level).parse().unwrap())
                .add_directive("hyper=warn".parse().unwrap())
                .add_directive("hf_hub=warn".parse().unwrap());
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    });
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

async fn handle_classify(args: &ClassifyArgs) -> Result<i32> {
    let config = DermascanConfig::default();
    config.validate()?;

    let bytes = fs::read(&args.image)
        .with_context(|| format!("failed to read image {}", args.image.display()))?;

    let load_config = config.clone();
    let (engine, device) = tokio::task::spawn_blocking(move || bootstrap::load_engine(&load_config))
        .await
        .context("model loading task panicked")?
        .context("failed to load models")?;

    let input = ImageInput::from_bytes(&bytes, &device).context("failed to preprocess image")?;
    let result = engine.classify(&input).await.context("classification failed")?;
    let response = PredictionResponse::from_report(PredictionReport::from_result(&result));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_human(&response);
    }

    Ok(0)
}

fn print_human(response: &PredictionResponse) {
    let display_name = class_info(&response.prediction)
        .map(|info| info.name)
        .unwrap_or(response.prediction.as_str());

    println!("Prediction:  {display_name} ({})", response.prediction);
    println!("Confidence:  {}", response.confidence_percentage);
    if response.detailed_class != response.prediction {
        println!("Subtype:     {}", response.detailed_class);
    }
    if let Some(severity) = &response.severity {
        println!("Severity:    {severity:?}");
    }
    println!("Advice:      {}", response.recommendation);
    if response.degraded {
        println!("Warning:     result is degraded (unexpected model output)");
    }
}

async fn handle_serve(args: &ServeArgs) -> Result<i32> {
    let mut config = DermascanConfig::default();
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    dermascan_api::serve(config).await?;
    Ok(0)
}

async fn handle_health() -> Result<i32> {
    let config = DermascanConfig::default();
    let downloader = match &config.cache_dir {
        Some(dir) => ModelDownloader::with_cache_dir(dir.clone())?,
        None => ModelDownloader::new()?,
    };

    let mut all_cached = true;
    for (name, source) in [
        ("general", &config.general_model),
        ("subtype", &config.subtype_model),
    ] {
        let cached = downloader.is_cached(source);
        all_cached &= cached;
        println!(
            "{name}: {}/{} [{}]",
            source.repo_id,
            source.weights_file,
            if cached { "cached" } else { "not downloaded" }
        );
    }

    Ok(if all_cached { 0 } else { 1 })
}
