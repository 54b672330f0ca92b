#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod boards;
mod client;
mod config;
mod details;
mod editor;
mod error;
mod issues;
mod myself;
mod prelude;
mod users;
mod utils;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Tools for interacting and authenticating with a Jira server"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Location of the jira yaml config. Defaults to '~/.jira.yml'
    #[clap(long, env = "JTOOLS_YAML", global = true)]
    config: Option<String>,

    /// Whether to display debug level log information.
    #[clap(long, global = true, default_value = "false")]
    debug: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Tests that the login routine is working
    Login,

    /// Displays the account name of the logged-in user
    Myself,

    /// Issue operations
    Issues(crate::issues::App),

    /// Agile board and sprint operations
    Boards(crate::boards::App),

    /// User directory operations
    Users(crate::users::App),

    /// Reads and writes the yaml configuration
    Config(crate::config::App),

    /// Server introspection dumps
    Details(crate::details::App),

    /// Generic utilities
    Utils(crate::utils::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();

    if app.global.debug {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::init();
    }
    color_eyre::install()?;

    match app.command {
        SubCommands::Login => crate::myself::login(app.global).await,
        SubCommands::Myself => crate::myself::myself(app.global).await,
        SubCommands::Issues(sub_app) => crate::issues::run(sub_app, app.global).await,
        SubCommands::Boards(sub_app) => crate::boards::run(sub_app, app.global).await,
        SubCommands::Users(sub_app) => crate::users::run(sub_app, app.global).await,
        SubCommands::Config(sub_app) => crate::config::run(sub_app, app.global).await,
        SubCommands::Details(sub_app) => crate::details::run(sub_app, app.global).await,
        SubCommands::Utils(sub_app) => crate::utils::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
