//! The `users` command group: account lookups against the user directory.

use crate::client::JiraClient;
use crate::config::Config;
use crate::prelude::{println, *};
use jtools_core::tracker::User;

#[derive(Debug, clap::Parser)]
#[command(name = "users")]
#[command(about = "User directory operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Searches the directory for matching accounts
    Find(FindOptions),
}

#[derive(Debug, clap::Args)]
pub struct FindOptions {
    /// Which field to search (default is 'name')
    #[arg(
        long,
        value_parser = clap::builder::PossibleValuesParser::new(["name", "username", "email"]),
        ignore_case = true,
        default_value = "name"
    )]
    by: String,

    /// Emit the matches as a json array
    #[arg(long, default_value = "false")]
    json: bool,

    /// The term to search for
    user: String,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Find(options) => find(options, global).await,
    }
}

/// The search endpoint matches name, username, and email in a single pass,
/// so every `--by` variant funnels through the same query. A term the search
/// does not index may still be an exact account key.
async fn find_users(client: &JiraClient, term: &str) -> Result<Vec<User>> {
    let users = client.user_search(term).await?;
    if !users.is_empty() {
        return Ok(users);
    }
    match client.user_by_key(term).await {
        Ok(user) => Ok(vec![user]),
        Err(_) => Ok(Vec::new()),
    }
}

fn users_json(users: &[User]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = users
        .iter()
        .map(|user| {
            serde_json::json!({
                "name": user.display_name,
                "username": user.name,
                "id": user.key,
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}

pub async fn find(options: FindOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    let users = find_users(&client, &options.user).await?;

    if options.json {
        println!("{}", serde_json::to_string(&users_json(&users))?);
    } else {
        println!("Found {} users.", users.len());
        for user in &users {
            println!("{}", user);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_json_shape() {
        let users = vec![User {
            name: Some("dev".to_string()),
            key: Some("JIRAUSER10100".to_string()),
            display_name: Some("Dev Eloper".to_string()),
            email_address: Some("dev@example.com".to_string()),
        }];

        assert_eq!(
            users_json(&users),
            serde_json::json!([
                {"name": "Dev Eloper", "username": "dev", "id": "JIRAUSER10100"}
            ])
        );
    }

    #[test]
    fn test_user_display_line() {
        let user = User {
            name: Some("dev".to_string()),
            key: None,
            display_name: Some("Dev Eloper".to_string()),
            email_address: None,
        };

        assert_eq!(user.to_string(), "<User: displayName='Dev Eloper', name='dev'>");
    }
}
