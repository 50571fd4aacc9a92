use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use repolens_core::{Config, FetchState, GitHubProvider, RepoFetchController};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "repolens")]
#[command(version, about = "Browse a GitHub user's repositories from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List a user's repositories
    Repos {
        /// GitHub username
        username: String,

        /// How many pages to fetch (10 repositories per page)
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Retry once if a request fails
        #[arg(long)]
        retry: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repolens=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Repos {
            username,
            pages,
            retry,
        } => list_repos(&username, pages, retry).await,
    }
}

async fn list_repos(username: &str, pages: u32, retry: bool) -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let provider = GitHubProvider::with_base_url(
        config.github.token.clone(),
        config.github.api_url.clone(),
    );

    let controller = RepoFetchController::new(Arc::new(provider));
    let mut state_rx = controller.subscribe();

    controller.search(username);
    let mut state = wait_until_settled(&mut state_rx).await;

    if state.error.is_some() && retry {
        controller.retry_last_request();
        state = wait_until_settled(&mut state_rx).await;
    }

    while state.error.is_none() && state.has_next_page && state.current_page < pages {
        controller.load_next_page();
        state = wait_until_settled(&mut state_rx).await;

        if state.error.is_some() && retry {
            controller.retry_last_request();
            state = wait_until_settled(&mut state_rx).await;
        }
    }

    print_state(&state);

    if state.error.is_some() {
        std::process::exit(1);
    }
    Ok(())
}

/// Wait for any in-flight fetch to resolve and hand back the settled state.
async fn wait_until_settled(rx: &mut watch::Receiver<FetchState>) -> FetchState {
    loop {
        let state = rx.borrow_and_update().clone();
        if !state.is_busy() {
            return state;
        }
        if rx.changed().await.is_err() {
            return state;
        }
    }
}

fn print_state(state: &FetchState) {
    if let Some(error) = &state.error {
        eprintln!("error: {}", error);
    }

    if !state.has_repositories() {
        if state.error.is_none() {
            println!("No repositories found.");
        }
        return;
    }

    for repo in &state.repositories {
        println!("  {}", repo.full_name);
        if let Some(description) = &repo.description {
            println!("    {}", description);
        }
        println!(
            "    ★ {}  forks {}  {}",
            repo.stars,
            repo.forks,
            repo.language.as_deref().unwrap_or("-")
        );
        println!("    {}", repo.url);
        println!();
    }

    println!("{}", state.page_info());
    if state.has_next_page {
        println!(
            "More pages available; rerun with --pages {}",
            state.current_page + 1
        );
    }
}
