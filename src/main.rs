//! PixelProof command-line client.
//!
//! ```text
//!   settings show|set ──▶ FileSettingsStore (plaintext TOML)
//!
//!   embed <FILE>  ──┐
//!   decode <FILE> ──┴─▶ UploadController ──▶ HttpWatermarkService ──▶ service
//!                              │
//!                              ▼
//!                       ResultRenderer ──▶ stdout (text or JSON), --out-dir
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use pixelproof::blockchain::{wallet, Chain, ChainLinkResolver};
use pixelproof::config::{load_config_or_default, ClientConfig};
use pixelproof::observability::logging;
use pixelproof::render::{write_artifacts, RenderedResult, ResultRenderer};
use pixelproof::settings::{ChainSettings, FileSettingsStore, SettingsStore, WalletKey};
use pixelproof::{HttpWatermarkService, ImageFile, SubmitMode, UploadController};

#[derive(Parser)]
#[command(name = "pixelproof")]
#[command(about = "Embed and decode image watermarks with on-chain registration", long_about = None)]
struct Cli {
    /// Client configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the service base URL.
    #[arg(short, long)]
    url: Option<String>,

    /// Override the settings file location.
    #[arg(long)]
    settings_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or change the saved chain and wallet key
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Embed a watermark and register the image on-chain
    Embed(SubmitArgs),
    /// Recover a watermark or link from an image
    Decode(SubmitArgs),
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show the saved settings (the key is masked)
    Show,
    /// Save a chain and/or wallet key; omitted values are kept
    Set {
        /// ETH, SUI or SOL
        #[arg(long)]
        chain: Option<Chain>,
        /// Wallet credential
        #[arg(long)]
        key: Option<String>,
    },
}

#[derive(clap::Args)]
struct SubmitArgs {
    /// Image to submit
    file: PathBuf,

    /// Write returned images into this directory
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Print the rendered result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config_or_default(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.service.base_url = url;
    }
    logging::init_logging(&config.observability.log_level);

    let settings_path = cli
        .settings_file
        .or_else(|| config.settings.path.clone())
        .unwrap_or_else(FileSettingsStore::default_path);
    let store = FileSettingsStore::new(settings_path);

    match cli.command {
        Commands::Settings { action } => run_settings(&store, action),
        Commands::Embed(args) => run_submit(&config, store, SubmitMode::Embed, args).await,
        Commands::Decode(args) => run_submit(&config, store, SubmitMode::Decode, args).await,
    }
}

fn run_settings(store: &FileSettingsStore, action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SettingsAction::Show => {
            let settings = store.load();
            print_settings(store.path(), &settings);
        }
        SettingsAction::Set { chain, key } => {
            let mut settings = store.load();
            if let Some(chain) = chain {
                settings.chain = Some(chain);
            }
            if let Some(key) = key {
                settings.wallet_key = WalletKey::new(key);
            }
            store.save(&settings)?;
            eprintln!(
                "Warning: the wallet key is stored unencrypted in {}",
                store.path().display()
            );
            print_settings(store.path(), &settings);
        }
    }
    Ok(())
}

fn print_settings(path: &Path, settings: &ChainSettings) {
    println!("Settings file: {}", path.display());
    match settings.chain {
        Some(chain) => println!("Chain:         {}", chain),
        None => println!("Chain:         (not set)"),
    }
    if settings.wallet_key.is_empty() {
        println!("Wallet key:    (not set)");
    } else {
        println!("Wallet key:    {}", wallet::mask_secret(settings.wallet_key.expose()));
    }

    if let Some(chain) = settings.chain.filter(|_| !settings.wallet_key.is_empty()) {
        match wallet::describe_credential(chain, settings.wallet_key.expose()) {
            Ok(Some(address)) => println!("Address:       {}", address),
            Ok(None) => {}
            Err(e) => println!("Address:       (unavailable: {})", e),
        }
    }

    if !settings.is_complete() {
        println!("Settings are incomplete; embed requires a chain and a wallet key.");
    }
}

async fn run_submit(
    config: &ClientConfig,
    store: FileSettingsStore,
    mode: SubmitMode,
    args: SubmitArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = HttpWatermarkService::new(config)?;
    let controller = UploadController::new(mode, store, service);

    let file = ImageFile::from_path(&args.file).await?;
    let preview = controller.select_file(file);
    tracing::debug!(preview = %preview, "Preview registered");

    let result = controller.submit().await?;

    let renderer = ResultRenderer::new(ChainLinkResolver::new(config.explorer.eth_profile));
    if let Err(e) = renderer.transaction_link(&result) {
        eprintln!("Note: {}", e);
    }
    let rendered = renderer.render(&result);

    if let Some(dir) = &args.out_dir {
        let stem = args
            .file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        for path in write_artifacts(&result, dir, &stem).await? {
            eprintln!("Wrote {}", path.display());
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        print_rendered(&rendered);
    }
    Ok(())
}

fn print_rendered(rendered: &RenderedResult) {
    if let Some(link) = &rendered.decoded_link {
        println!("Decoded link:     {}", link);
    }
    if let Some(hash) = &rendered.transaction_hash {
        println!("Transaction hash: {}", hash);
    }
    if let Some(link) = &rendered.transaction_link {
        println!("Explorer:         {}", link);
    }
    if let Some(hash) = &rendered.image_hash {
        println!("Image hash:       {}", hash);
    }
    for (label, uri) in [("Embedded", &rendered.embedded_uri), ("Extracted", &rendered.extracted_uri)] {
        if let Some(uri) = uri {
            println!("{} image:   {} bytes as data URI", label, uri.len());
        }
    }
}
