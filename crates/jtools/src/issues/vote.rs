use crate::client::JiraClient;
use crate::config::Config;
use crate::prelude::{println, *};

/// Options for casting a planning-poker vote
#[derive(Debug, clap::Args)]
pub struct VoteOptions {
    /// The issue key
    pub issue_key: String,

    /// The vote to cast
    pub vote: i64,
}

pub async fn run(options: VoteOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    if !config.eausm_enabled() {
        return Err(eyre!(
            "Voting by this client is disabled - check your jira yml."
        ));
    }

    let client = JiraClient::login(&config)?;
    let issue = client.get_issue(&options.issue_key).await?;
    client.planning_poker_vote(&issue.id, options.vote).await?;

    println!("Voted.");

    Ok(())
}
