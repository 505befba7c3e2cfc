pub mod api;
pub mod charts;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod query;
pub mod render;
pub mod router;
pub mod services;
pub mod shell;
pub mod state;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use config::Config;
use error::ContextError;
use pages::PageAction;
use query::RefetchTrigger;
use shell::{Dashboard, Screen};
use state::Fetch;

const HELP: &str = "Commands: <path> | :focus | :reconnect | :run | :threshold <miles> | :help | :quit";

/// Install the global subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Shell command typed at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Navigate(String),
    Notify(RefetchTrigger),
    Action(PageAction),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let mut parts = line.split_whitespace();
        match parts.next() {
            None => Err("empty command".to_string()),
            Some(":quit") | Some(":q") => Ok(Command::Quit),
            Some(":help") => Ok(Command::Help),
            Some(":focus") => Ok(Command::Notify(RefetchTrigger::WindowFocus)),
            Some(":reconnect") => Ok(Command::Notify(RefetchTrigger::Reconnect)),
            Some(":run") => Ok(Command::Action(PageAction::Run)),
            Some(":threshold") => {
                let raw = parts.next().ok_or("usage: :threshold <miles>")?;
                raw.parse::<f64>()
                    .map(|miles| Command::Action(PageAction::SetThreshold(miles)))
                    .map_err(|_| format!("not a number: {}", raw))
            }
            Some(other) if other.starts_with(':') => Err(format!("unknown command {}", other)),
            Some(_) => Ok(Command::Navigate(line.to_string())),
        }
    }
}

/// Show `first` if its page is still loading, then wait for the page's queries
/// to settle and return the finished screen.
async fn settle(dashboard: &mut Dashboard, first: Screen) -> Result<Screen, ContextError> {
    if !first.is_loading() {
        return Ok(first);
    }
    show(&first);
    Ok(dashboard.refresh(Fetch::Wait).await?.unwrap_or(first))
}

fn show(screen: &Screen) {
    println!("{}", render::render(screen));
}

async fn interactive(dashboard: &mut Dashboard) -> anyhow::Result<()> {
    println!("{}", HELP);
    let first = dashboard.open("/", Fetch::Background).await?;
    show(&settle(dashboard, first).await?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        let screen = match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", HELP);
                None
            }
            Command::Navigate(path) => {
                let first = dashboard.open(&path, Fetch::Background).await?;
                Some(settle(dashboard, first).await?)
            }
            Command::Notify(trigger) => dashboard.notify(trigger).await?,
            Command::Action(action) => {
                dashboard.dispatch(&action);
                match dashboard.refresh(Fetch::Background).await? {
                    Some(first) => Some(settle(dashboard, first).await?),
                    None => None,
                }
            }
        };
        if let Some(screen) = screen {
            show(&screen);
        }
    }
    Ok(())
}

/// Entry point of the `tlc-dashboard` binary.
///
/// With path arguments each path is rendered once; without, paths and commands
/// are read from stdin until `:quit` or end of input.
pub fn run() -> anyhow::Result<()> {
    // .env first so RUST_LOG from the file reaches the subscriber
    let dotenv = config::load_dotenv();
    init_tracing();
    if let Err(e) = dotenv {
        tracing::debug!("No .env file loaded: {}", e);
    }
    let config = Config::from_env();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut dashboard = Dashboard::new(&config);
        tracing::info!("Dashboard backend: {}", dashboard.backend_location());
        if paths.is_empty() {
            return interactive(&mut dashboard).await;
        }
        for path in paths {
            let first = dashboard.open(&path, Fetch::Background).await?;
            show(&settle(&mut dashboard, first).await?);
        }
        Ok(())
    })
}
