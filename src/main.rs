mod app;
mod commands;
mod identity;
mod logging;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use onehack_core::filter::{DateRange, FilterState, LocationFilter};
use onehack_core::hackathon::Platform;

use crate::app::App;

#[derive(Parser)]
#[command(name = "onehack")]
#[command(about = "Discover hackathons and keep your bookmarks in sync")]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all hackathons
    List {
        /// Only show hackathons from this platform (devfolio, devpost, unstop, dorahacks)
        #[arg(short, long)]
        platform: Option<Platform>,
    },
    /// Search hackathons by text
    Search { query: String },
    /// Filter hackathons by platform, location and dates
    Filter {
        /// Platform to include (repeatable)
        #[arg(short, long = "platform")]
        platforms: Vec<Platform>,

        /// all, online or offline
        #[arg(short, long, default_value = "all")]
        location: LocationFilter,

        /// Only hackathons running on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only hackathons running on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Show your bookmarked hackathons
    Bookmarks,
    /// Bookmark a hackathon, or remove it if already bookmarked
    Bookmark { id: String },
    /// Refresh bookmarks from your account
    Sync,
    /// Keep bookmarks refreshed until interrupted
    Watch,
    /// Open the "add to calendar" page for a hackathon
    Calendar { id: String },
    /// Save your account credentials
    Login {
        #[arg(long)]
        user_id: Option<String>,

        /// Access token (prompted for if omitted)
        #[arg(long)]
        token: Option<String>,
    },
    /// Forget saved credentials
    Logout,
    /// Show configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let app = App::load()?;

    match cli.command {
        Commands::List { platform } => commands::list::run(&app, platform).await,
        Commands::Search { query } => commands::search::run(&app, &query).await,
        Commands::Filter {
            platforms,
            location,
            from,
            to,
        } => {
            let date_range = DateRange::from_args(from.as_deref(), to.as_deref())
                .map_err(|e| anyhow::anyhow!(e))?;
            let filters = platforms
                .into_iter()
                .fold(FilterState::default(), FilterState::with_platform)
                .with_location(location);
            let filters = FilterState {
                date_range,
                ..filters
            };
            commands::filter::run(&app, &filters).await
        }
        Commands::Bookmarks => commands::bookmarks::run(&app).await,
        Commands::Bookmark { id } => commands::bookmark::run(&app, &id).await,
        Commands::Sync => commands::sync::run(&app).await,
        Commands::Watch => commands::watch::run(&app).await,
        Commands::Calendar { id } => commands::calendar::run(&app, &id).await,
        Commands::Login { user_id, token } => commands::login::run(&app, user_id, token).await,
        Commands::Logout => commands::logout::run(),
        Commands::Config => commands::config::run(&app),
    }
}
