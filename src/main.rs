use clap::{Arg, ArgAction, ArgMatches, Command};
use rimagegen::{
    logger::{self, LogLevel, LoggerConfig},
    models::{DEFAULT_DIMENSIONS, DEFAULT_STYLE, DIMENSION_OPTIONS, STYLES},
    Config, GenerationState, Generator, HistoryStore, StudioClient,
};
use std::path::PathBuf;
use std::sync::Arc;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let matches = cmd().get_matches();

    let mut logger_config = LoggerConfig::from_env();
    if matches.get_flag("verbose") {
        logger_config = logger_config.with_level(LogLevel::Debug);
    }
    logger::init_with_config(logger_config)?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }

    let config = Config::from_env();

    match matches.subcommand() {
        Some(("serve", _)) => rimagegen::server::run(config).await?,
        Some(("generate", m)) => generate(m, &config).await?,
        Some(("history", m)) => history(m, &config)?,
        Some(("download", m)) => download(m, &config).await?,
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}

fn cmd() -> Command {
    Command::new("rimagegen")
        .version(VERSION)
        .about("Text-to-image generation proxy with a local generation history")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .arg(
            Arg::new("server")
                .long("server")
                .global(true)
                .value_name("URL")
                .help("Base URL of a running rimagegen server (defaults to HOST/PORT)"),
        )
        .subcommand(Command::new("serve").about("Run the /api/generate and /api/download endpoints"))
        .subcommand(
            Command::new("generate")
                .about("Generate an image and record it in the history")
                .arg(Arg::new("prompt").required(true).value_name("PROMPT"))
                .arg(
                    Arg::new("style")
                        .long("style")
                        .default_value(DEFAULT_STYLE)
                        .help(format!("Image style, e.g. {}", STYLES.join(", "))),
                )
                .arg(
                    Arg::new("dimensions")
                        .long("dimensions")
                        .default_value(DEFAULT_DIMENSIONS)
                        .help(format!("WxH, e.g. {}", DIMENSION_OPTIONS.join(", "))),
                ),
        )
        .subcommand(
            Command::new("history")
                .about("Inspect or edit the generation history")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List past generations, newest first"))
                .subcommand(
                    Command::new("remove")
                        .about("Remove one entry")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(Command::new("clear").about("Remove every entry")),
        )
        .subcommand(
            Command::new("download")
                .about("Download a history entry through the server")
                .arg(Arg::new("id").required(true))
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_name("DIR")
                        .default_value(".")
                        .help("Directory to save the image into"),
                ),
        )
}

fn generator(matches: &ArgMatches, config: &Config) -> Generator {
    let base_url = matches
        .get_one::<String>("server")
        .cloned()
        .unwrap_or_else(|| config.server.base_url());

    Generator::new(
        Arc::new(StudioClient::new(base_url)),
        HistoryStore::from_config(&config.history),
    )
}

async fn generate(matches: &ArgMatches, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = matches.get_one::<String>("prompt").map(String::as_str).unwrap_or_default();
    let style = matches.get_one::<String>("style").map(String::as_str).unwrap_or(DEFAULT_STYLE);
    let dimensions = matches
        .get_one::<String>("dimensions")
        .map(String::as_str)
        .unwrap_or(DEFAULT_DIMENSIONS);

    let mut generator = generator(matches, config);
    match generator.submit(prompt, style, dimensions).await {
        GenerationState::Done { image, elapsed } => {
            println!(
                "✅ Image generated successfully in {:.1} seconds!",
                elapsed.as_secs_f64()
            );
            println!("{}  {}", image.id, image.url);
            Ok(())
        }
        GenerationState::Failed(error) => Err(error.clone().into()),
        _ => Err("Please enter a prompt".into()),
    }
}

fn history(matches: &ArgMatches, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = HistoryStore::from_config(&config.history);

    match matches.subcommand() {
        Some(("list", _)) => {
            if store.is_empty() {
                println!("No images generated yet.");
            }
            for image in store.images() {
                let generated = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(image.timestamp)
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                let size = image
                    .dimensions
                    .map(|d| format!("{}x{}", d.width, d.height))
                    .unwrap_or_default();
                println!(
                    "{}  {}  {}  {}  {}\n    {}",
                    image.id,
                    generated,
                    image.style.as_deref().unwrap_or("-"),
                    size,
                    image.prompt,
                    image.url
                );
            }
            println!(
                "{}/{} entries. Older images are removed automatically.",
                store.len(),
                store.capacity()
            );
        }
        Some(("remove", m)) => {
            let id = m.get_one::<String>("id").map(String::as_str).unwrap_or_default();
            if store.get(id).is_none() {
                log::warn!("No image with id {}", id);
            }
            store.remove(id);
        }
        Some(("clear", _)) => {
            store.clear();
            println!("History cleared.");
        }
        _ => unreachable!("subcommand is required"),
    }
    Ok(())
}

async fn download(matches: &ArgMatches, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let id = matches.get_one::<String>("id").map(String::as_str).unwrap_or_default();
    let out_dir = matches
        .get_one::<String>("out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let (filename, bytes) = generator(matches, config).download(id).await?;
    let path = out_dir.join(&filename);
    std::fs::write(&path, &bytes)?;

    println!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
