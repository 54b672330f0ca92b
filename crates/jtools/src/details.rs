//! The `details` command group: server introspection dumps for statuses,
//! groups, components, link types and versions.

use crate::client::JiraClient;
use crate::config::Config;
use crate::prelude::{println, *};
use jtools_core::tracker::{terminal_state_names, LinkType};
use serde_json::Value;

#[derive(Debug, clap::Parser)]
#[command(name = "details")]
#[command(about = "Server introspection dumps")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Prints all the 'final' states for issues on the server
    #[clap(name = "last-states")]
    LastStates,

    /// Prints the statuses known to the server (not all are valid for every project)
    Statuses,

    /// Dumps basic server details
    #[clap(name = "server-info")]
    ServerInfo,

    /// Displays the groups that are set on the server
    Groups,

    /// Displays a list of components for the given PROJECT
    Components { project: String },

    /// Displays the types of links that the server supports
    #[clap(name = "link-types")]
    LinkTypes,

    /// Displays the versions recorded for the given PROJECT
    #[clap(name = "project-versions")]
    ProjectVersions { project: String },
}

/// `name (id)` lines out of a raw array of server objects.
fn named_id_lines(entries: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    if let Value::Array(members) = entries {
        for member in members {
            let name = member.get("name").and_then(Value::as_str).unwrap_or("");
            let id = member.get("id").and_then(Value::as_str).unwrap_or("");
            lines.push(f!("{} ({})", name, id));
        }
    }
    lines
}

fn link_type_line(link_type: &LinkType) -> String {
    f!(
        "{}: inward '{}', outward '{}'",
        link_type.name, link_type.inward, link_type.outward
    )
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    match app.command {
        Commands::LastStates => {
            let statuses = client.statuses().await?;
            for name in terminal_state_names(&statuses) {
                println!("{}", name);
            }
        }
        Commands::Statuses => {
            for status in client.statuses().await? {
                println!("{} ({})", status.name, status.id);
            }
        }
        Commands::ServerInfo => {
            let info = client.server_info().await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::Groups => {
            let groups = client.groups().await?;
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        Commands::Components { project } => {
            let components = client.components(&project).await?;
            for line in named_id_lines(&components) {
                println!("{}", line);
            }
        }
        Commands::LinkTypes => {
            for link_type in client.link_types().await? {
                println!("{}", link_type_line(&link_type));
            }
        }
        Commands::ProjectVersions { project } => {
            let versions = client.project_versions(&project).await?;
            for line in named_id_lines(&versions) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_named_id_lines() {
        let entries = json!([
            {"name": "networking", "id": "10000", "description": "ignored"},
            {"name": "storage", "id": "10001"},
        ]);

        assert_eq!(
            named_id_lines(&entries),
            vec!["networking (10000)", "storage (10001)"]
        );
        assert!(named_id_lines(&json!({})).is_empty());
    }

    #[test]
    fn test_link_type_line() {
        let link_type = LinkType {
            name: "Blocks".to_string(),
            inward: "is blocked by".to_string(),
            outward: "blocks".to_string(),
        };

        assert_eq!(
            link_type_line(&link_type),
            "Blocks: inward 'is blocked by', outward 'blocks'"
        );
    }
}
