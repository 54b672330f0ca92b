use crate::boards::{board_filter_jql, column_layout, column_table};
use crate::client::JiraClient;
use crate::config::Config;
use crate::prelude::{println, *};
use jtools_core::fields::field_display_value;
use jtools_core::jql::sprint_issues_query;
use jtools_core::tracker::{BoardCard, Issue};
use serde_json::{json, Value};

const SPRINT_ISSUE_LIMIT: u64 = 250;

/// Options for listing the sprints of a board
#[derive(Debug, clap::Args)]
pub struct SprintsOptions {
    /// The board name
    pub board_name: String,

    /// Display details for a specific sprint
    #[arg(long)]
    pub name: Option<String>,

    /// Display all sprints, including closed sprints
    #[arg(long = "show-all")]
    pub show_all: bool,

    /// Display only those issues in the sprint assigned to you
    #[arg(long = "my-issues")]
    pub my_issues: bool,

    /// Do not query or display issues
    #[arg(long = "no-issues")]
    pub no_issues: bool,

    /// Print the details in JSON format
    #[arg(long)]
    pub json: bool,
}

fn display_field(issue: &Issue, name: &str) -> Value {
    match issue.fields.get(name) {
        Some(value) => Value::String(field_display_value(value, None)),
        None => Value::String(String::new()),
    }
}

fn issue_json(issue: &Issue) -> Value {
    json!({
        "key": issue.key,
        "summary": display_field(issue, "summary"),
        "assignee": display_field(issue, "assignee"),
        "status": display_field(issue, "status"),
    })
}

pub async fn run(options: SprintsOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    let board = client.board_by_name(&options.board_name).await?;
    let sprints = client.sprints(board.id).await?;
    let (board_config, columns) = column_layout(&client, board.id).await?;
    let base_filter = board_filter_jql(&client, &board_config).await?;

    let match_assignee = if options.my_issues {
        Some(client.myself().await?.name.unwrap_or_default())
    } else {
        None
    };

    let mut final_output = String::new();
    let mut json_sprints: Vec<Value> = Vec::new();

    for sprint in &sprints {
        if !options.show_all && sprint.state == "closed" {
            continue;
        }
        if let Some(name) = &options.name {
            if !name.eq_ignore_ascii_case(&sprint.name) {
                continue;
            }
        }

        let (start, end) = sprint.window();

        let issues = if options.no_issues {
            Vec::new()
        } else {
            let query = sprint_issues_query(&sprint.name, &base_filter);
            client.search_issues(&query, 0, SPRINT_ISSUE_LIMIT).await?
        };

        let mut card_columns: Vec<(String, Vec<String>)> = columns
            .iter()
            .map(|(name, _)| (name.clone(), Vec::new()))
            .collect();
        let mut json_columns: Vec<(String, Vec<Value>)> = columns
            .iter()
            .map(|(name, _)| (name.clone(), Vec::new()))
            .collect();

        for issue in &issues {
            let card = BoardCard::from_issue(issue);
            if let Some(me) = &match_assignee {
                if !card.assigned_to(me) {
                    continue;
                }
            }
            for (index, (_, statuses)) in columns.iter().enumerate() {
                if !card.in_column(statuses) {
                    continue;
                }
                if options.json {
                    json_columns[index].1.push(issue_json(issue));
                } else {
                    card_columns[index].1.push(card.key.clone());
                }
            }
        }

        if options.json {
            let mut column_map = serde_json::Map::new();
            for (name, entries) in json_columns {
                column_map.insert(name, Value::Array(entries));
            }
            json_sprints.push(json!({
                "name": sprint.name,
                "id": sprint.id,
                "start_date_str": start,
                "end_date_str": end,
                "columns": column_map,
            }));
        } else {
            final_output.push_str(&f!(
                "Sprint: {}, id: {}\n   start: {} -> end: {}\n",
                sprint.name,
                sprint.id,
                start,
                end
            ));
            if !issues.is_empty() {
                final_output.push_str(&column_table(&card_columns).to_string());
                final_output.push_str("\n\n");
            }
        }
    }

    if options.json {
        println!("{}", serde_json::to_string(&json_sprints)?);
    } else {
        println!("{}", final_output);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[test]
    fn test_issue_json_shape() {
        let mut fields = Map::new();
        fields.insert("summary".to_string(), json!("Fix it"));
        fields.insert("assignee".to_string(), json!({ "name": "dev" }));
        fields.insert("status".to_string(), json!({ "name": "In Progress" }));
        let issue = Issue {
            id: "1".to_string(),
            key: "NET-1".to_string(),
            fields,
            rendered_fields: None,
        };

        assert_eq!(
            issue_json(&issue),
            json!({
                "key": "NET-1",
                "summary": "Fix it",
                "assignee": "dev",
                "status": "In Progress",
            })
        );
    }
}
