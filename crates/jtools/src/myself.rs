//! Login probe and account display for the configured credentials.

use crate::client::JiraClient;
use crate::config::Config;
use crate::prelude::{println, *};

/// Round-trips the credentials against the server, reporting any failure as
/// a plain line rather than an error exit.
pub async fn login(global: crate::Global) -> Result<()> {
    if let Err(err) = probe(&global).await {
        println!("Error: {} when logging in", err);
    }
    Ok(())
}

async fn probe(global: &crate::Global) -> Result<()> {
    let config = Config::load(global)?;
    let client = JiraClient::login(&config)?;
    client.myself().await?;
    Ok(())
}

/// Displays the account name of the logged-in user.
pub async fn myself(global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    let user = client.myself().await?;
    println!("{}", user.name.unwrap_or_default());

    Ok(())
}
