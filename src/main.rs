mod app;
mod archive;
mod components;
mod config;
mod error;
mod event;
mod explore;
mod handler;
mod logging;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing::{debug, error, info};

use crate::app::{App, Settings};
use crate::archive::content::{is_embed_request, render_document};
use crate::archive::loader::bounded;
use crate::archive::source::ArchiveSource;
use crate::archive::summary::load_summary;
use crate::config::{AppConfig, ArchiveConfig, GeneralConfig, ThemeConfig};
use crate::event::{Event, EventHandler};
use crate::logging::LogTarget;
use crate::tui::{install_panic_hook, Tui};

/// Interval between tick events; bounds debounce latency.
const TICK_RATE: Duration = Duration::from_millis(50);

/// A terminal explorer for a static haiku archive.
#[derive(Parser, Debug)]
#[command(name = "hx", version, about)]
struct Cli {
    /// Archive root: a site directory or an http(s):// base URL
    #[arg(long, global = true)]
    root: Option<String>,

    /// Path to a config file (overrides the default locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable mouse support
    #[arg(long)]
    no_mouse: bool,

    /// Color theme: dark, light
    #[arg(long)]
    theme: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse the archive interactively (default)
    Explore,
    /// Print one haiku page as text
    Show {
        /// Site-relative page path, e.g. 2021/04/12.html
        path: String,
        /// Print only the poem, without masthead and footer
        #[arg(long)]
        embed: bool,
    },
    /// Print the current haiku and the archive count
    Summary,
}

impl Cli {
    /// Partial config built from flags; merged over file config.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                mouse: if self.no_mouse { Some(false) } else { None },
                ..Default::default()
            },
            archive: ArchiveConfig {
                root: self.root.clone(),
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    match cli.command.unwrap_or(Command::Explore) {
        Command::Explore => explore(&config).await,
        Command::Show { path, embed } => show(&config, &path, embed).await,
        Command::Summary => summary(&config).await,
    }
}

async fn explore(config: &AppConfig) -> error::Result<()> {
    let _guard = logging::init(LogTarget::File(logging::log_path(config.log_file())))?;
    info!(
        root = config.root(),
        theme = config.theme_scheme(),
        mouse = config.mouse_enabled(),
        "Starting explorer"
    );
    let source = ArchiveSource::from_root(config.root())?;

    install_panic_hook();

    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(TICK_RATE);
    let mut app = App::new(
        source,
        config.source_paths(),
        Settings::from_config(config),
        events.sender(),
    );
    app.start_loading();

    loop {
        tui.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.tick(Instant::now()),
            Event::Resize(width, height) => debug!(width, height, "Terminal resized"),
            Event::Loaded(loaded) => app.handle_loaded(loaded),
            Event::Content(response) => app.handle_content(response),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    info!("Explorer closed");
    Ok(())
}

async fn show(config: &AppConfig, path: &str, embed: bool) -> error::Result<()> {
    let _guard = logging::init(LogTarget::Stderr)?;
    let source = ArchiveSource::from_root(config.root())?;
    let html = bounded(path, config.timeout(), source.fetch_text(path))
        .await
        .inspect_err(|e| error!(path, "Failed to load page: {}", e))?;
    for line in render_document(&html, embed || is_embed_request(path)) {
        println!("{}", line);
    }
    Ok(())
}

async fn summary(config: &AppConfig) -> error::Result<()> {
    let _guard = logging::init(LogTarget::Stderr)?;
    let source = ArchiveSource::from_root(config.root())?;
    let summary = load_summary(&source, &config.source_paths().status, config.timeout()).await;
    for line in &summary.lines {
        println!("{}", line);
    }
    if let Some(count) = summary.count_line {
        if !summary.lines.is_empty() {
            println!();
        }
        println!("{}", count);
    }
    Ok(())
}
