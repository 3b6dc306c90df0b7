mod api;
mod chat;
mod i18n;
mod report;

use anyhow::bail;
use clap::{Parser, Subcommand};
use finguard_core::{
    analysis::{mime_from_extension, ImageUpload, MAX_IMAGE_BYTES},
    config::{self, Config},
};
use finguard_providers::{backend::HttpBackend, ocr::OcrAdapter, proxy_client::ProxyClient};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use chat::{ChatSession, Input};
use i18n::{Locale, Localizer, LANGUAGES};

#[derive(Parser)]
#[command(
    name = "finguard",
    version,
    about = "FinGuard — scam-message checker for Southeast Asia"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analysis proxy.
    Serve,
    /// Check one suspicious message, pasted or photographed.
    Check {
        /// Screenshot or photo of the message.
        #[arg(short, long)]
        image: Option<PathBuf>,
        /// UI language (en, id, ms, th, vi, tl, my, km, lo).
        #[arg(short, long)]
        lang: Option<String>,
        /// The message text.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Chat with the assistant.
    Chat {
        /// UI language (en, id, ms, th, vi, tl, my, km, lo).
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// Show configuration and collaborator availability.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _guard = init_tracing(&cfg)?;

    match cli.command {
        Commands::Serve => {
            let backend = HttpBackend::from_config(&cfg.backend)?;
            let ocr = OcrAdapter::from_config(&cfg.ocr);
            if !ocr.is_available().await {
                warn!(
                    "OCR engine '{}' is not available; image submissions will be rejected",
                    ocr.engine_name()
                );
            }
            info!("forwarding to {}", backend.url());
            let state = api::ApiState::new(Arc::new(backend), ocr);
            api::serve(&cfg.server, state).await?;
        }
        Commands::Check {
            image,
            lang,
            message,
        } => {
            let l10n = localizer(lang.as_deref());
            let client = ProxyClient::new(&cfg.client.proxy_url);
            run_check(&client, &l10n, image.as_deref(), &message.join(" ")).await?;
        }
        Commands::Chat { lang } => {
            let l10n = localizer(lang.as_deref())
                .with_lang_hook(Arc::new(|locale: Locale| debug!("chat: language is now {locale}")));
            let client = ProxyClient::new(&cfg.client.proxy_url);
            run_chat(&client, l10n).await?;
        }
        Commands::Status => print_status(&cli.config, &cfg).await,
    }

    Ok(())
}

/// Stderr logging filtered by `RUST_LOG` or `[finguard] log_level`, plus a
/// daily-rolling file when `log_dir` is set. Keep the guard alive for the
/// whole run or buffered file lines are lost.
fn init_tracing(
    cfg: &Config,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.finguard.log_level));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer);

    let log_dir = cfg.finguard.log_dir.trim();
    if log_dir.is_empty() {
        registry.init();
        return Ok(None);
    }

    std::fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::daily(log_dir, "finguard.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false);
    registry.with(file_layer).init();
    Ok(Some(guard))
}

/// Explicit `--lang` wins; otherwise detect from the environment.
fn localizer(lang: Option<&str>) -> Localizer {
    match lang {
        Some(tag) => match Locale::parse(tag) {
            Some(locale) => Localizer::new(locale),
            None => {
                warn!("unsupported language '{tag}', detecting from environment");
                Localizer::detect()
            }
        },
        None => Localizer::detect(),
    }
}

async fn read_image(path: &Path, l10n: &Localizer) -> anyhow::Result<ImageUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?;
    if bytes.len() > MAX_IMAGE_BYTES {
        bail!("{}", l10n.t("image_too_large"));
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let mut upload = ImageUpload::new(bytes, mime_from_extension(ext));
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        upload = upload.with_file_name(name);
    }
    Ok(upload)
}

async fn run_check(
    client: &ProxyClient,
    l10n: &Localizer,
    image: Option<&Path>,
    message: &str,
) -> anyhow::Result<()> {
    let language = l10n.lang().as_str();
    let result = match image {
        Some(path) => {
            let upload = read_image(path, l10n).await?;
            client.analyze_image(upload, language).await
        }
        None if message.trim().is_empty() => bail!("{}", l10n.t("error_empty")),
        None => client.analyze_text(message, language).await,
    };

    match result {
        Ok(resp) => {
            println!("{}", report::render(&resp, l10n));
            Ok(())
        }
        Err(e) => {
            debug!("check: proxy call failed: {e}");
            bail!("{}", l10n.t("error_request"))
        }
    }
}

async fn run_chat(client: &ProxyClient, l10n: Localizer) -> anyhow::Result<()> {
    let mut session = ChatSession::new(l10n);
    cliclack::intro(session.l10n().t("assistant_title"))?;
    cliclack::log::info(&session.messages()[0].content)?;

    loop {
        let line: String = match cliclack::input(session.l10n().t("type_your_message"))
            .placeholder(session.l10n().t("paste_suspicious"))
            .required(false)
            .interact()
        {
            Ok(line) => line,
            // Ctrl-C / Esc ends the session.
            Err(_) => break,
        };

        match Input::parse(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::SetLang(Some(locale)) => {
                session.set_lang(locale);
                cliclack::log::success(format!(
                    "{}: {}",
                    session.l10n().t("language"),
                    locale.label()
                ))?;
            }
            Input::SetLang(None) => {
                let codes: Vec<&str> = LANGUAGES.iter().map(|(l, _)| l.as_str()).collect();
                cliclack::log::warning(format!("/lang <{}>", codes.join("|")))?;
            }
            Input::Message(text) => {
                let spinner = cliclack::spinner();
                spinner.start(session.l10n().t("thinking"));
                let reply = session
                    .send(text, client)
                    .await
                    .map(|m| m.content.clone());
                spinner.stop(session.l10n().t("assistant_title"));
                if let Some(reply) = reply {
                    cliclack::note(session.l10n().t("finguard_chat"), reply)?;
                }
            }
        }
    }

    cliclack::outro(session.l10n().t("close_chat"))?;
    Ok(())
}

async fn print_status(config_path: &str, cfg: &Config) {
    println!("FinGuard — Status Check\n");
    println!("Config: {config_path}");
    println!("Listen: {}", cfg.server.addr());
    println!("Backend: {} (timeout {}s)", cfg.backend.url, cfg.backend.timeout_secs);
    println!("Proxy (client): {}", cfg.client.proxy_url);
    println!();

    let ocr = OcrAdapter::from_config(&cfg.ocr);
    println!(
        "  ocr ({}, {}): {}",
        cfg.ocr.engine.display_name(),
        ocr.language(),
        if ocr.is_available().await {
            "available"
        } else {
            "not available"
        }
    );
    println!("  locale: {}", Localizer::detect().lang().label());
}
