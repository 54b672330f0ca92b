use crate::client::JiraClient;
use crate::config::Config;
use crate::prelude::{println, *};
use jtools_core::tracker::{find_transition, transition_target_names};

/// Options for listing issue states
#[derive(Debug, clap::Args)]
pub struct StatesOptions {
    /// The issue key
    pub issue_key: String,
}

/// Options for setting the issue status
#[derive(Debug, clap::Args)]
pub struct SetStatusOptions {
    /// The issue key
    pub issue_key: String,

    /// The transition to run (a name or id)
    pub status: String,
}

pub async fn states(options: StatesOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    let transitions = client.transitions(&options.issue_key).await?;
    for name in transition_target_names(&transitions) {
        println!("{}", name);
    }

    Ok(())
}

pub async fn set_status(options: SetStatusOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    let transitions = client.transitions(&options.issue_key).await?;
    let Some(transition) = find_transition(&transitions, &options.status) else {
        let names: Vec<String> = transitions.iter().map(|t| t.name.clone()).collect();
        return Err(eyre!(
            "Invalid transition '{}'. Choose from: {}",
            options.status,
            names.join(", ")
        ));
    };

    client
        .transition_issue(&options.issue_key, &transition.id)
        .await?;
    println!("done.");

    Ok(())
}
