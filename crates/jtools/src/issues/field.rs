use crate::client::JiraClient;
use crate::config::Config;
use crate::issues::{coerced_to_value, field_key, plain_field};
use crate::prelude::{eprintln, println, *};
use jtools_core::fields::{self, Coerced, FieldInfo};
use jtools_core::tracker::Issue;
use serde_json::Value;

/// Options for reading a field
#[derive(Debug, clap::Args)]
pub struct GetFieldOptions {
    /// The issue key
    pub issue_key: String,

    /// The field name (case sensitive unless configured otherwise)
    pub field_name: String,

    /// Also display the allowed values
    #[arg(long)]
    pub allowed: bool,
}

/// Options for setting a field
#[derive(Debug, clap::Args)]
pub struct SetFieldOptions {
    /// The issue key
    pub issue_key: String,

    /// The field name
    pub field_name: String,

    /// The new value
    pub field_value: String,

    /// Skip coercion and send the value as literal JSON
    #[arg(long)]
    pub forced: bool,
}

/// Options for bulk field setting
#[derive(Debug, clap::Args)]
#[command(after_help = "The CSV is expected without a header, formed as:
  issue1,field,value[,field2,value2,...]
  issue2,field,value")]
pub struct SetFieldFromCsvOptions {
    /// Path to the CSV file
    pub csv_file: String,
}

/// Coerces and pushes one field value to the server. Populated fields take
/// their shape from the current value; empty system fields stay strings
/// (assignee excepted); custom fields go through their schema type. Nothing
/// is sent when the name resolves to no field at all.
async fn set_field_on_issue(
    client: &JiraClient,
    config: &Config,
    catalog: &[FieldInfo],
    issue: &Issue,
    field_name: &str,
    raw_value: &str,
    forced: bool,
) -> Result<()> {
    let case_sensitive = config.case_sensitive();
    let mut payload = serde_json::Map::new();

    if let Some(key) = fields::find_field_key(&issue.fields, field_name, case_sensitive) {
        let key = key.to_string();
        let current = issue.fields.get(&key).cloned().unwrap_or(Value::Null);

        let value = if forced {
            fields::forced_value(raw_value)
        } else if !current.is_null() {
            let coerced =
                fields::coerce_like_current(&current, raw_value).map_err(|err| eyre!("{}", err))?;
            coerced_to_value(client, coerced).await?
        } else if key == "assignee" {
            serde_json::json!({ "name": raw_value })
        } else {
            Value::String(raw_value.to_string())
        };
        payload.insert(key, value);
    } else if let Some(info) = catalog.iter().find(|info| {
        info.custom
            && if case_sensitive {
                info.name == field_name
            } else {
                info.name.eq_ignore_ascii_case(field_name)
            }
    }) {
        let value = if forced {
            fields::forced_value(raw_value)
        } else {
            let schema = fields::schema_type_for(catalog, &info.id);
            let coerced = fields::convert_field_value(schema.as_deref(), raw_value);
            coerced_to_value(client, coerced).await?
        };
        payload.insert(info.id.clone(), value);
    }

    if payload.is_empty() {
        return Ok(());
    }
    client
        .update_issue_fields(&issue.key, &Value::Object(payload))
        .await
}

async fn allowed_value_lines(
    client: &JiraClient,
    issue_key: &str,
    field_id: &str,
) -> Result<Vec<String>> {
    let meta = client.editmeta(issue_key).await?;
    let Some(values) = meta
        .pointer(&f!("/fields/{}/allowedValues", field_id))
        .and_then(|value| value.as_array())
    else {
        return Ok(Vec::new());
    };

    let mut lines = Vec::new();
    for value in values {
        let mut parts = Vec::new();
        if let Some(name) = value.get("name").and_then(|v| v.as_str()) {
            parts.push(f!("\"name\": \"{}\"", name));
        }
        if let Some(option) = value.get("value").and_then(|v| v.as_str()) {
            parts.push(f!("\"value\": \"{}\"", option));
        }
        lines.push(f!("- {}", parts.join(", ")));
    }
    Ok(lines)
}

pub async fn get(options: GetFieldOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;
    let catalog = client.fields().await?;

    let issue = client.get_issue(&options.issue_key).await?;
    let value = plain_field(&issue, &catalog, &options.field_name, &config);
    println!("{}: {}", options.field_name, value);

    if options.allowed {
        let lines = match field_key(&issue, &catalog, &options.field_name, &config) {
            Some(key) => allowed_value_lines(&client, &issue.key, &key).await?,
            None => Vec::new(),
        };
        if lines.is_empty() {
            println!("- No allowed values found.");
        } else {
            for line in lines {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

pub async fn set(options: SetFieldOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;
    let catalog = client.fields().await?;

    let issue = client.get_issue(&options.issue_key).await?;
    let old = plain_field(&issue, &catalog, &options.field_name, &config);

    set_field_on_issue(
        &client,
        &config,
        &catalog,
        &issue,
        &options.field_name,
        &options.field_value,
        options.forced,
    )
    .await?;

    let refreshed = client.get_issue(&issue.key).await?;
    let new = plain_field(&refreshed, &catalog, &options.field_name, &config);
    println!(
        "Updated {}, set {}: {} -> {}",
        options.issue_key, options.field_name, old, new
    );

    Ok(())
}

/// Splits one CSV line the way a standard reader would: commas separate
/// fields, double quotes protect embedded commas, doubled quotes escape a
/// literal quote. An empty line is an empty row.
fn split_csv_line(line: &str) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }

    let mut row = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    quoted = false;
                }
            }
            '"' if field.is_empty() => quoted = true,
            ',' if !quoted => {
                row.push(std::mem::take(&mut field));
            }
            other => field.push(other),
        }
    }
    row.push(field);
    row
}

pub async fn set_from_csv(options: SetFieldFromCsvOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;
    let catalog = client.fields().await?;

    let content = std::fs::read_to_string(&options.csv_file)
        .context(f!("Failed to read {}", options.csv_file))?;

    for line in content.lines() {
        let row = split_csv_line(line);
        if row.len() < 3 {
            println!("Skipping invalid row: {:?}", row);
            continue;
        }

        let issue_key = &row[0];
        let issue = match client.get_issue(issue_key).await {
            Ok(issue) => issue,
            Err(_) => {
                println!("Error: {} not found - skipping row.", issue_key);
                continue;
            }
        };

        for pair in row[1..].chunks(2) {
            let [field_name, field_value] = pair else {
                continue;
            };

            let old = plain_field(&issue, &catalog, field_name, &config);
            if let Err(err) = set_field_on_issue(
                &client,
                &config,
                &catalog,
                &issue,
                field_name,
                field_value,
                false,
            )
            .await
            {
                eprintln!("{}", err);
                continue;
            }

            let refreshed = match client.get_issue(&issue.key).await {
                Ok(issue) => issue,
                Err(_) => continue,
            };
            let new = plain_field(&refreshed, &catalog, field_name, &config);
            println!(
                "Updated {}, set {}: {} -> {}",
                issue_key, field_name, old, new
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_rows_split_on_commas() {
        assert_eq!(
            split_csv_line("NET-1,priority,High,labels,triage"),
            vec!["NET-1", "priority", "High", "labels", "triage"]
        );
    }

    #[test]
    fn test_csv_quotes_protect_commas() {
        assert_eq!(
            split_csv_line("NET-2,\"Story Points\",3,summary,\"a, quoted, phrase\""),
            vec!["NET-2", "Story Points", "3", "summary", "a, quoted, phrase"]
        );
    }

    #[test]
    fn test_csv_doubled_quotes_escape() {
        assert_eq!(
            split_csv_line("NET-3,summary,\"say \"\"hi\"\"\""),
            vec!["NET-3", "summary", "say \"hi\""]
        );
    }

    #[test]
    fn test_csv_empty_line_is_empty_row() {
        assert!(split_csv_line("").is_empty());
    }
}
