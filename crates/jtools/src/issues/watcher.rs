use crate::client::JiraClient;
use crate::config::Config;
use crate::prelude::{println, *};

/// Options for watcher changes
#[derive(Debug, clap::Args)]
pub struct WatcherOptions {
    /// The issue key
    pub issue_key: String,

    /// The account name of the watcher
    pub watcher: String,
}

pub async fn add(options: WatcherOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    client
        .add_watcher(&options.issue_key, &options.watcher)
        .await?;
    println!("done.");

    Ok(())
}

pub async fn delete(options: WatcherOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    client
        .remove_watcher(&options.issue_key, &options.watcher)
        .await?;
    println!("done.");

    Ok(())
}
