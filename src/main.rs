use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use futures::StreamExt;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use rss_home::config::Config;
use rss_home::dispatchers::DispatchersProvider;
use rss_home::lifecycle::LifecycleRegistry;
use rss_home::logging::init_tracing;
use rss_home::repository::{Fixture, InMemoryRepository};
use rss_home::ui::home::{HomeEvent, HomeViewModel};

/// Headless driver for the home screen view model.
///
/// Reads one command per line from stdin and prints every state and effect
/// as a JSON line on stdout.
#[derive(Debug, Parser)]
#[command(name = "rss-home", version)]
struct Cli {
    /// Config file (default: platform config dir / rss-home / config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file with `feeds` and `posts` to seed the repository.
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Simulated duration of a feed refresh.
    #[arg(long, default_value_t = 500)]
    refresh_latency_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Load,
    Refresh,
    Select(String),
    Home,
    Add,
    Open(usize),
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid post index '{0}'")]
    InvalidIndex(String),
}

fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut parts = line.split_whitespace();
    let Some(name) = parts.next() else {
        return Err(CommandError::Empty);
    };
    let arg = parts.next();

    match name {
        "load" => Ok(Command::Load),
        "refresh" => Ok(Command::Refresh),
        "home" => Ok(Command::Home),
        "add" => Ok(Command::Add),
        "quit" | "exit" => Ok(Command::Quit),
        "select" => arg
            .map(|link| Command::Select(link.to_string()))
            .ok_or(CommandError::MissingArgument("select")),
        "open" => {
            let raw = arg.ok_or(CommandError::MissingArgument("open"))?;
            raw.parse()
                .map(Command::Open)
                .map_err(|_| CommandError::InvalidIndex(raw.to_string()))
        }
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Turn a command into an event, resolving feed links and post indices
/// against the latest state.
fn to_event(view_model: &HomeViewModel, command: Command) -> Option<HomeEvent> {
    let state = view_model.current_state();
    match command {
        Command::Load => Some(HomeEvent::LoadContent),
        Command::Refresh => Some(HomeEvent::SwipeToRefresh),
        Command::Home => Some(HomeEvent::HomeSelected),
        Command::Add => Some(HomeEvent::AddClicked),
        Command::Select(link) => match state.feeds.into_iter().find(|f| f.link == link) {
            Some(feed) => Some(HomeEvent::FeedSelected(feed)),
            None => {
                eprintln!("No feed with link '{}'", link);
                None
            }
        },
        Command::Open(index) => match state.posts.into_iter().nth(index) {
            Some(post) => Some(HomeEvent::PostClicked(post)),
            None => {
                eprintln!("No post at index {}", index);
                None
            }
        },
        Command::Quit => None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading config")?;
    init_tracing(&config.logging);

    let repository = match &cli.fixture {
        Some(path) => InMemoryRepository::from_fixture(
            Fixture::load_from(path).context("loading fixture")?,
        ),
        None => InMemoryRepository::new(),
    };
    repository.set_refresh_latency(Duration::from_millis(cli.refresh_latency_ms));

    let registry = LifecycleRegistry::new();
    let view_model = HomeViewModel::new(
        &registry.lifecycle(),
        DispatchersProvider::current(),
        Arc::new(repository),
        config.home.clone(),
    );

    let mut states = view_model.state().into_stream();
    let mut effects = view_model.effects().into_stream();
    let printer = tokio::spawn(async move {
        loop {
            let line = tokio::select! {
                Some(state) = states.next() => serde_json::json!({ "state": state }),
                Some(effect) = effects.next() => serde_json::json!({ "effect": effect }),
                else => break,
            };
            println!("{}", line);
        }
    });

    registry.create();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                if let Some(event) = to_event(&view_model, command) {
                    view_model.dispatch(event);
                }
            }
            Err(err) => eprintln!("{}", err),
        }
    }

    registry.destroy();
    printer.await.context("printer task")?;
    Ok(())
}
