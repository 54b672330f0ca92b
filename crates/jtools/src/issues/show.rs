use crate::client::JiraClient;
use crate::config::Config;
use crate::editor::page_output;
use crate::issues::{rendered_field, tracker_to_display};
use crate::prelude::{println, *};
use jtools_core::fields::{self, FieldInfo};
use jtools_core::text::fitted_blocks;
use jtools_core::tracker::{Attachment, CommentsResponse, Issue, IssueLink};
use log::warn;
use serde_json::Value;

/// Options for showing one issue
#[derive(Debug, clap::Args)]
pub struct ShowOptions {
    /// The issue key or numeric id
    pub issue_key: String,

    /// Dump the issue details in raw form
    #[arg(long)]
    pub raw: bool,

    /// Use a set width for display; 0 autodetects from the terminal
    #[arg(long, default_value = "0")]
    pub width: usize,

    /// With --raw, dump a json list of the issue and the custom field map
    #[arg(long)]
    pub json: bool,
}

fn hline(max_width: usize) -> String {
    f!("+{}+\n", "-".repeat(max_width - 2))
}

fn mid_line(max_width: usize) -> String {
    f!("|{}|\n", "-".repeat(max_width - 2))
}

/// Right-pads a partially built row out to the box edge.
fn pad_row(text: &str, max_width: usize) -> String {
    let used = text.chars().count();
    f!("{}{}|\n", text, " ".repeat(max_width.saturating_sub(used + 1)))
}

fn json_value<T: serde::de::DeserializeOwned>(fields: &serde_json::Map<String, Value>, key: &str) -> Option<T> {
    fields
        .get(key)
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

async fn vote_lines(client: &JiraClient, eausm: &Value, max_width: usize) -> String {
    let mut output = String::new();

    let Some(votes) = eausm.get("votes").and_then(|value| value.as_array()) else {
        output.push_str(&f!("| No votes. {} |\n", " ".repeat(max_width - 14)));
        return output;
    };

    if votes.is_empty() {
        output.push_str(&f!("| No Votes{} |\n", " ".repeat(max_width - 12)));
    }

    let mut total: i64 = 0;
    for vote in votes {
        let vote_text = match vote.get("vote") {
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::String(text)) => text.clone(),
            _ => "0".to_string(),
        };
        total += vote_text.parse::<i64>().unwrap_or(0);

        let user_id = match vote.get("userId") {
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::String(text)) => text.clone(),
            _ => String::new(),
        };
        let user = match client.user_search(&user_id).await {
            Ok(users) if !users.is_empty() => {
                users[0].display_name.clone().unwrap_or_default()
            }
            _ => f!("[{}]?", user_id),
        };

        let pad = max_width
            .saturating_sub(15 + user.chars().count() + vote_text.chars().count());
        output.push_str(&f!("| Vote: {} by {} {} |\n", vote_text, user, " ".repeat(pad)));
    }

    output.push_str(&mid_line(max_width));
    let pad = max_width.saturating_sub(total.to_string().len() + 12);
    output.push_str(&f!("| Total: {} {} |\n", total, " ".repeat(pad)));
    output
}

/// Builds the boxed issue view. The header rows keep their historical fixed
/// widths, so boxes wider than 79 columns are ragged on the right except
/// where a row pads to `max_width`.
async fn render_issue(
    client: &JiraClient,
    config: &Config,
    catalog: &[FieldInfo],
    issue: &Issue,
    max_width: usize,
) -> Result<String> {
    let excluded = config.excluded_fields();
    let is_excluded = |name: &str| excluded.iter().any(|field| field == name);

    let field = |name: &str, substruct: Option<&str>| {
        rendered_field(issue, catalog, name, substruct, config)
    };

    let mut output = hline(max_width);
    output.push_str(&f!(
        "| {:<10} | {:<20} | {:<39} |\n",
        issue.key,
        field("project", Some("name")),
        field("assignee", Some("name"))
    ));
    output.push_str(&hline(max_width));
    output.push_str(&f!(
        "| priority: {:<20} | status: {:<34} |\n",
        field("priority", Some("name")),
        field("status", Some("name"))
    ));
    output.push_str(&hline(max_width));
    output.push_str(&f!(
        "| Reporter: {:<width$} |\n",
        field("reporter", Some("name")),
        width = max_width - 14
    ));
    output.push_str(&hline(max_width));

    if !is_excluded("url") {
        output.push_str(&f!(
            "| URL: {:<width$} |\n",
            client.issue_url(&issue.key),
            width = max_width - 9
        ));
        output.push_str(&hline(max_width));
    }

    if !is_excluded("summary") {
        output.push_str(&f!("| summary: {} |\n", " ".repeat(max_width - 13)));
        output.push_str(&f!("| ------- {} |\n", " ".repeat(max_width - 12)));
    }

    for issue_field in config.requested_fields() {
        output.push_str(&f!(
            "| {:<25}: {:<width$} |\n",
            issue_field,
            field(&issue_field, None),
            width = max_width - 31
        ));
    }

    let summary: Vec<char> = field("summary", None).chars().collect();
    let mut start = 0;
    loop {
        let end = std::cmp::min(start + max_width - 4, summary.len());
        let chunk: String = summary[start..end].iter().collect();
        output.push_str(&f!("| {:<width$} |\n", chunk, width = max_width - 4));
        start = end;
        if start >= summary.len() {
            break;
        }
    }
    output.push_str(&hline(max_width));
    output.push('\n');

    if !is_excluded("eausm") {
        if let Some(eausm) = issue.fields.get("eausm") {
            output.push_str(&hline(max_width));
            output.push_str(&f!("| EZ Agile: {} |\n", " ".repeat(max_width - 14)));
            output.push_str(&vote_lines(client, eausm, max_width).await);
            output.push_str(&hline(max_width));
            output.push('\n');
        }
    }

    let links: Vec<IssueLink> = json_value(&issue.fields, "issuelinks").unwrap_or_default();
    if !is_excluded("links") && !links.is_empty() {
        output.push_str(&f!("| Links: {} |\n", " ".repeat(max_width - 11)));
        output.push_str(&mid_line(max_width));
        for link in &links {
            let mut link_text = String::new();
            if let Some(outward) = &link.outward_issue {
                link_text = f!("| - Linked To Issue: {}", outward.key);
            }
            if let Some(inward) = &link.inward_issue {
                link_text = f!("| - Linked From Issue: {}", inward.key);
            }
            if let Some(kind) = &link.kind {
                link_text.push_str(&f!(", Relationship: {}", kind.name));
            }
            if !link_text.is_empty() {
                output.push_str(&pad_row(&link_text, max_width));
            }
        }

        match client.remote_links(&issue.key).await {
            Ok(remote) => {
                for link in remote {
                    let Some(object) = link.object else { continue };
                    let url = if object.title.is_empty() {
                        object.url
                    } else {
                        f!("[{}|{}]", object.title, object.url)
                    };
                    output.push_str(&pad_row(&f!("| - Remote: {}", url), max_width));
                }
            }
            Err(err) => warn!("Failed to fetch remote links: {err}"),
        }
        output.push('\n');
    }

    let attachments: Vec<Attachment> = json_value(&issue.fields, "attachment").unwrap_or_default();
    if !is_excluded("attachments") && !attachments.is_empty() {
        output.push_str(&f!("| Attachments: {} |\n", " ".repeat(max_width - 17)));
        output.push_str(&mid_line(max_width));

        let mut table = psql_table();
        table.set_titles(prettytable::row!["File", "Created", "Size", "Creator"]);
        for attachment in &attachments {
            table.add_row(prettytable::row![
                attachment.filename,
                attachment.created,
                attachment.size,
                attachment.creator()
            ]);
        }
        output.push_str(&table.to_string());
        output.push('\n');
    }

    let description = tracker_to_display(&field("description", None), config);
    if !is_excluded("description") && !description.is_empty() {
        output.push_str(&f!("| Description: {} |\n", " ".repeat(max_width - 17)));
        output.push_str(&mid_line(max_width));
        output.push_str(&fitted_blocks(&description, max_width - 4, Some("|")));
    }

    let comments = json_value::<CommentsResponse>(&issue.fields, "comment")
        .map(|response| response.comments)
        .unwrap_or_default();
    if !is_excluded("comments") {
        output.push_str(&f!("+ Comments: {} |\n", " ".repeat(max_width - 14)));
        for comment in &comments {
            if max_width < 80 {
                output.push_str(&f!(
                    "| Author: {:<14} [~{:<18}] | {:<20} |\n",
                    comment.author_display_name(),
                    comment.author_account(),
                    comment.created
                ));
            } else {
                let mut line = f!(
                    "| Author: {:<20} [~{:<20}] | {:<18} | {:<20} | {:<20}",
                    comment.author_display_name(),
                    comment.author_account(),
                    comment.id,
                    comment.visibility_label(),
                    comment.created
                );
                let used = line.chars().count();
                if used > max_width {
                    line.push('\n');
                } else {
                    line.push_str(&" ".repeat(max_width.saturating_sub(used + 1)));
                    line.push_str("|\n");
                }
                output.push_str(&line);
            }
            output.push_str(&mid_line(max_width));
            output.push_str(&fitted_blocks(
                &tracker_to_display(&comment.body, config),
                max_width - 4,
                Some("|"),
            ));
            output.push_str(&hline(max_width));
        }
    }

    Ok(output)
}

pub async fn run(options: ShowOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;
    let catalog = client.fields().await?;

    let issue = client.get_issue(&options.issue_key).await?;

    if options.raw {
        let field_map = fields::custom_field_map(&catalog);
        if options.json {
            println!("[");
            println!("{}", serde_json::to_string(&issue)?);
            println!(",");
            println!("{}", serde_json::to_string(&field_map)?);
            println!("]");
        } else {
            println!("{}", serde_json::to_string_pretty(&issue)?);
            println!("{}", serde_json::to_string_pretty(&field_map)?);
        }
        return Ok(());
    }
    if options.json {
        println!("Cannot use 'json' without 'raw'");
        return Ok(());
    }

    let width = if options.width == 0 {
        terminal_size::terminal_size()
            .map(|(terminal_size::Width(w), _)| (w as usize).saturating_sub(2))
            .unwrap_or(79)
    } else {
        options.width
    };
    let max_width = std::cmp::max(width, 79);

    let output = render_issue(&client, &config, &catalog, &issue, max_width).await?;
    page_output(&output, &f!("Issue: {}", options.issue_key));

    Ok(())
}
