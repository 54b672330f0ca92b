use crate::client::JiraClient;
use crate::config::Config;
use crate::issues::rendered_field;
use crate::prelude::{println, *};
use colored::Colorize;
use jtools_core::fields;
use jtools_core::jql::{build_issues_query, FieldMatch, IssueCriteria};
use jtools_core::text::trim_text;
use jtools_core::tracker::{
    issue_row, issues_json_payload, terminal_state_names, ISSUE_COLUMNS,
};

/// Options for listing issues
#[derive(Debug, clap::Args)]
#[command(after_help = "EXAMPLES:
  # Your open issues:
  jtools issues list

  # Everything in a project, closed issues included:
  jtools issues list --project NET --closed

  # Pointed bugs first, newest on top:
  jtools issues list --matching-gt \"Story Points\" 0 --sort created-desc

  # Issues whose comments mention you:
  jtools issues list --mentions

  # Machine-readable dump with the custom field map attached:
  jtools issues list --output json")]
pub struct ListOptions {
    /// The name of the assignee (defaults to the current user; '-' clears the clause)
    #[arg(long, default_value = "")]
    pub assignee: String,

    /// The name of the project
    #[arg(long)]
    pub project: Option<String>,

    /// A raw JQL string to execute against the issues search
    #[arg(long)]
    pub jql: Option<String>,

    /// Include closed issues
    #[arg(long)]
    pub closed: bool,

    /// Trim the summary to this many chars (0 for no trim)
    #[arg(long, default_value = "45")]
    pub summary_len: usize,

    /// Output format
    #[arg(long, default_value = "table",
          value_parser = clap::builder::PossibleValuesParser::new(["table", "simple", "csv", "json"]))]
    pub output: String,

    /// Custom JQL pair: FIELD = VALUE
    #[arg(long, num_args = 2, value_names = ["FIELD", "VALUE"], action = clap::ArgAction::Append)]
    pub matching_eq: Vec<String>,

    /// Custom JQL pair: FIELD != VALUE
    #[arg(long, num_args = 2, value_names = ["FIELD", "VALUE"], action = clap::ArgAction::Append)]
    pub matching_neq: Vec<String>,

    /// Custom JQL pair: FIELD ~ VALUE
    #[arg(long, num_args = 2, value_names = ["FIELD", "VALUE"], action = clap::ArgAction::Append)]
    pub matching_contains: Vec<String>,

    /// Custom JQL pair: FIELD is not VALUE
    #[arg(long, num_args = 2, value_names = ["FIELD", "VALUE"], action = clap::ArgAction::Append)]
    pub matching_not: Vec<String>,

    /// Custom JQL pair: FIELD in VALUE
    #[arg(long, num_args = 2, value_names = ["FIELD", "VALUE"], action = clap::ArgAction::Append)]
    pub matching_in: Vec<String>,

    /// Custom JQL pair: FIELD > VALUE
    #[arg(long, num_args = 2, value_names = ["FIELD", "VALUE"], action = clap::ArgAction::Append)]
    pub matching_gt: Vec<String>,

    /// Custom JQL pair: FIELD < VALUE
    #[arg(long, num_args = 2, value_names = ["FIELD", "VALUE"], action = clap::ArgAction::Append)]
    pub matching_lt: Vec<String>,

    /// Custom JQL pair: FIELD >= VALUE
    #[arg(long, num_args = 2, value_names = ["FIELD", "VALUE"], action = clap::ArgAction::Append)]
    pub matching_ge: Vec<String>,

    /// Custom JQL pair: FIELD <= VALUE
    #[arg(long, num_args = 2, value_names = ["FIELD", "VALUE"], action = clap::ArgAction::Append)]
    pub matching_le: Vec<String>,

    /// Issues whose comments mention you, regardless of assignee
    #[arg(long)]
    pub mentions: bool,

    /// Only issues updated since a date (YYYY-MM-DD) or offset (-1d, -3h, ...)
    #[arg(long)]
    pub updated_since: Option<String>,

    /// Offset into the result set
    #[arg(long, default_value = "0")]
    pub issue_offset: u64,

    /// Max number of issues to pull
    #[arg(long, default_value = "100")]
    pub max_issues: u64,

    /// Sort the output
    #[arg(long, default_value = "none", ignore_case = true,
          value_parser = clap::builder::PossibleValuesParser::new([
              "none", "prio-asc", "prio-desc", "type-asc", "type-desc",
              "created-asc", "created-desc", "duedate-asc", "duedate-desc",
              "status-asc", "status-desc", "project-asc", "project-desc",
          ]))]
    pub sort: String,
}

fn push_matchers(criteria: &mut IssueCriteria, pairs: &[String], operator: &str) {
    for pair in pairs.chunks(2) {
        if let [field, value] = pair {
            criteria
                .matchers
                .push(FieldMatch::new(field, operator, value));
        }
    }
}

/// Relative offsets pass straight through to the server; absolute dates are
/// checked here so a typo fails before the search does.
fn updated_since_matcher(raw: &str) -> Result<FieldMatch> {
    if !raw.starts_with('-') {
        fields::coerce_field_value("date", raw)
            .map_err(|_| eyre!("Invalid date '{}' - use YYYY-MM-DD or an offset like -1d", raw))?;
    }
    Ok(FieldMatch::new("updatedDate", ">=", raw))
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;
    let catalog = client.fields().await?;

    let jql = match &options.jql {
        Some(jql) => jql.clone(),
        None => {
            let mut criteria = IssueCriteria {
                project: options.project.clone(),
                include_closed: options.closed,
                order_by: Some(options.sort.clone()),
                ..Default::default()
            };

            push_matchers(&mut criteria, &options.matching_eq, "=");
            push_matchers(&mut criteria, &options.matching_neq, "!=");
            push_matchers(&mut criteria, &options.matching_contains, "~");
            push_matchers(&mut criteria, &options.matching_not, "is not");
            push_matchers(&mut criteria, &options.matching_in, "in");
            push_matchers(&mut criteria, &options.matching_gt, ">");
            push_matchers(&mut criteria, &options.matching_lt, "<");
            push_matchers(&mut criteria, &options.matching_ge, ">=");
            push_matchers(&mut criteria, &options.matching_le, "<=");

            if options.mentions {
                criteria.assignee = None;
                criteria
                    .matchers
                    .push(FieldMatch::new("comment", "~", "currentUser()"));
            } else {
                criteria.assignee = match options.assignee.as_str() {
                    "-" => None,
                    "" => Some(client.myself().await?.name.unwrap_or_default()),
                    name => Some(name.to_string()),
                };
            }

            if let Some(since) = &options.updated_since {
                criteria.matchers.push(updated_since_matcher(since)?);
            }

            let terminal_states = if options.closed {
                Vec::new()
            } else {
                terminal_state_names(&client.statuses().await?)
            };

            build_issues_query(&criteria, &terminal_states, &catalog)
                .map_err(|err| eyre!("{}", err))?
        }
    };

    let issues = client
        .search_issues(&jql, options.issue_offset, options.max_issues)
        .await?;

    if options.output == "json" {
        let payload = issues_json_payload(&issues, &fields::custom_field_map(&catalog))?;
        println!("{}", payload);
        return Ok(());
    }

    if issues.is_empty() {
        return Ok(());
    }

    let requested = config.requested_fields();
    let mut headers: Vec<String> = ISSUE_COLUMNS.iter().map(|name| name.to_string()).collect();
    headers.extend(requested.iter().cloned());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for issue in &issues {
        let mut row = issue_row(issue);
        row[3] = trim_text(&row[3], options.summary_len);
        for field_name in &requested {
            row.push(rendered_field(issue, &catalog, field_name, None, &config));
        }
        rows.push(row);
    }

    match options.output.as_str() {
        "table" => {
            let mut table = psql_table();
            table.set_titles(prettytable::Row::new(
                headers
                    .iter()
                    .map(|header| prettytable::Cell::new(&header.bold().cyan().to_string()))
                    .collect(),
            ));
            for row in rows {
                let cells = row
                    .iter()
                    .enumerate()
                    .map(|(index, cell)| {
                        let text = match index {
                            0 => cell.cyan().to_string(),
                            4 => cell.yellow().to_string(),
                            _ => cell.clone(),
                        };
                        prettytable::Cell::new(&text)
                    })
                    .collect();
                table.add_row(prettytable::Row::new(cells));
            }
            table.printstd();
        }
        "simple" => {
            let mut table = new_table();
            table.add_row(prettytable::Row::new(
                headers.iter().map(|header| prettytable::Cell::new(header)).collect(),
            ));
            for row in rows {
                table.add_row(prettytable::Row::new(
                    row.iter().map(|cell| prettytable::Cell::new(cell)).collect(),
                ));
            }
            table.printstd();
        }
        "csv" => {
            println!("{}", headers.join(","));
            for row in &rows {
                println!("{}", row.join(","));
            }
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matcher_pairs_chunk_in_order() {
        let mut criteria = IssueCriteria::default();
        let pairs = vec![
            "Story Points".to_string(),
            "3".to_string(),
            "labels".to_string(),
            "(triage)".to_string(),
        ];

        push_matchers(&mut criteria, &pairs, "in");

        assert_eq!(criteria.matchers.len(), 2);
        assert_eq!(criteria.matchers[0], FieldMatch::new("Story Points", "in", "3"));
        assert_eq!(criteria.matchers[1], FieldMatch::new("labels", "in", "(triage)"));
    }

    #[test]
    fn test_updated_since_accepts_offsets_and_dates() {
        assert_eq!(
            updated_since_matcher("-3h").unwrap(),
            FieldMatch::new("updatedDate", ">=", "-3h")
        );
        assert_eq!(
            updated_since_matcher("2026-01-15").unwrap(),
            FieldMatch::new("updatedDate", ">=", "2026-01-15")
        );
        assert!(updated_since_matcher("last tuesday").is_err());
    }
}
