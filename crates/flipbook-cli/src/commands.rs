//! Subcommand implementations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use flipbook_content::{ContentStore, PageView};
use flipbook_core::{HashRouter, MemorySurface, Navigator};
use flipbook_model::{Direction, SectionRegistry};
use flipbook_persistence::JsonFileStore;
use tokio::io::{AsyncBufReadExt, BufReader};

use flipbook_cli::config::AppConfig;
use flipbook_cli::presenter::TerminalPresenter;
use flipbook_cli::repl::{HELP, ReplCommand};
use flipbook_cli::report::{sections_table, status_table};
use flipbook_cli::source::ReaderSource;

type ReaderNavigator = Navigator<ReaderSource, TerminalPresenter<std::io::Stdout>>;

pub fn run_sections(config: &AppConfig) -> Result<()> {
    let registry = config.book.registry().context("build section list")?;
    println!("{}", sections_table(&registry));
    Ok(())
}

pub async fn run_fetch(config: &AppConfig, section: &str) -> Result<()> {
    let registry = config.book.registry().context("build section list")?;
    let Some((_, section)) = registry.resolve_fragment(section) else {
        bail!("'{section}' is not a section of this book");
    };

    let source = ReaderSource::open(&config.content_location()).context("open content source")?;
    tracing::info!("Fetching {} from {}", section, source.describe());
    let store = ContentStore::new(source);
    let resolved = store.resolve(section).await;
    if let Err(e) = &resolved {
        if !e.is_retryable() {
            bail!("cannot fetch {section}: {e}");
        }
        tracing::warn!("{}: {}", section, e.user_message());
    }
    println!("{}", PageView::from_resolved(section, &resolved).to_markup());
    Ok(())
}

pub async fn run_read(config: &AppConfig) -> Result<()> {
    let source = ReaderSource::open(&config.content_location()).context("open content source")?;
    let presenter =
        TerminalPresenter::stdout(Duration::from_millis(config.presentation.animation_ms));
    let (surface, notifications) = MemorySurface::new();
    let surface = Arc::new(surface);
    let storage = JsonFileStore::new(config.storage.state_file());

    println!("Reading from {}", source.describe());
    let navigator: Arc<ReaderNavigator> = Arc::new(
        Navigator::from_config(&config.book, source, presenter, Arc::clone(&surface), storage)
            .context("configure navigator")?,
    );

    let router = HashRouter::new(Arc::clone(&navigator));
    let routing = tokio::spawn(async move { router.run(notifications).await });

    navigator.start().await.context("start reader")?;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<ReplCommand>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match command {
            ReplCommand::Next => spawn_flip(&navigator, Direction::Forward),
            ReplCommand::Prev => spawn_flip(&navigator, Direction::Backward),
            ReplCommand::Goto(section) => {
                let navigator = Arc::clone(&navigator);
                tokio::spawn(async move {
                    let _ = navigator.navigate_to(&section).await;
                });
            }
            ReplCommand::Hash(fragment) => surface.simulate_external(&fragment),
            ReplCommand::Retry => {
                let navigator = Arc::clone(&navigator);
                tokio::spawn(async move {
                    let _ = navigator.retry().await;
                });
            }
            ReplCommand::Status => print_status(&navigator),
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
        }
    }

    navigator.teardown();
    routing.abort();
    Ok(())
}

/// Input is never awaited: a turn requested mid-animation is dropped by the
/// navigator, not queued behind the prompt.
fn spawn_flip(navigator: &Arc<ReaderNavigator>, direction: Direction) {
    let navigator = Arc::clone(navigator);
    tokio::spawn(async move {
        let _ = navigator.flip(direction).await;
    });
}

fn print_status(navigator: &ReaderNavigator) {
    let registry: &SectionRegistry = navigator.registry();
    println!(
        "{}",
        status_table(registry, &navigator.snapshot(), navigator.store())
    );
    if navigator.positions().is_disabled() {
        println!("(reading position is not being saved this session)");
    }
}
