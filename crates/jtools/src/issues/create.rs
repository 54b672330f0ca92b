use crate::client::JiraClient;
use crate::config::Config;
use crate::editor::edit_text;
use crate::issues::coerced_to_value;
use crate::prelude::{println, *};
use jtools_core::compose::{self, Directive};
use jtools_core::fields;
use serde_json::Value;

const ISSUE_TYPES: [&str; 5] = ["Epic", "Bug", "Story", "Task", "Subtask"];

const SUMMARY_HINT: &str = "# The first line in this will be treated as the summary.";
const DESCRIPTION_HINT: &str = "# Add your description here.  By default, all lines\n\
                                # starting with a '#' are used to denote special lines";

/// Options for creating an issue
#[derive(Debug, clap::Args)]
#[command(after_help = "The issue text can come from the editor, a file, a git patch, or a
list of git commits.  With --dry-run the assembled issue is printed and
nothing is pushed.  The text is not saved anywhere, so keep a copy if
you may want to resubmit it.")]
pub struct CreateOptions {
    /// The summary for the issue; default is taken from the editor text
    #[arg(long)]
    pub summary: Option<String>,

    /// Description of the issue; default is taken from the editor text
    #[arg(long)]
    pub description: Option<String>,

    /// The project to open the issue in
    #[arg(long)]
    pub project: Option<String>,

    /// Specific issue type
    #[arg(
        long,
        value_parser = clap::builder::PossibleValuesParser::new(ISSUE_TYPES),
        ignore_case = true,
        default_value = "Bug"
    )]
    pub issue_type: String,

    /// Set a specific field; may be repeated
    #[arg(long = "set-field", num_args = 2, value_names = ["FIELD", "VALUE"], action = clap::ArgAction::Append)]
    pub set_field: Vec<String>,

    /// Seed the issue text from a file (like a git patch file)
    #[arg(long = "from-file")]
    pub from_file: Option<String>,

    /// Reference one or more git commits in the ticket
    #[arg(long)]
    pub commit: Vec<String>,

    /// With a single commit, force the one-line reference style
    #[arg(long)]
    pub oneline: bool,

    /// Print the issue details being added; ignored with --dry-run
    #[arg(long)]
    pub verbose: bool,

    /// Seed the editor with the fields assignable for the project and
    /// issue type; both must be valid on the command line
    #[arg(long = "show-fields")]
    pub show_fields: bool,

    /// Assemble everything but do not push the issue to the server
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// Issue type names go to the server capitalized, whatever the shell passed.
fn canonical_issue_type(raw: &str) -> String {
    ISSUE_TYPES
        .iter()
        .find(|name| raw.eq_ignore_ascii_case(name))
        .map(|name| name.to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn git_stdout(args: &[&str], sha: &str) -> Option<String> {
    let output = std::process::Command::new("git")
        .args(args)
        .arg(sha)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn commit_not_found(sha: &str) -> color_eyre::Report {
    eyre!(
        "Unable to find {}.  Please make sure you are in a git tree, or GIT_DIR is defined.",
        sha
    )
}

fn git_commit_patch(sha: &str) -> Result<String> {
    git_stdout(&["format-patch", "--stdout", "-1"], sha).ok_or_else(|| commit_not_found(sha))
}

fn git_commit_oneline(sha: &str) -> Result<String> {
    git_stdout(&["log", "--oneline", "-1"], sha).ok_or_else(|| commit_not_found(sha))
}

pub async fn run(options: CreateOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;
    let catalog = client.fields().await?;

    let filled_all =
        options.summary.is_some() && options.description.is_some() && options.project.is_some();
    let mut needs_editor = !filled_all;

    let mut summary = options.summary.clone();
    let mut description = options.description.clone();
    let mut project = options.project.clone();
    let mut issue_type = canonical_issue_type(&options.issue_type);
    let mut special_lines: Option<String> = None;

    if !options.commit.is_empty() {
        if options.commit.len() == 1 && !options.oneline {
            // A single commit reads like a patch file.
            let patch = git_commit_patch(&options.commit[0])?;
            let parsed = compose::extract(&patch);
            summary = Some(parsed.summary);
            description = Some(parsed.description);
        } else {
            let mut referenced =
                String::from("# The following commits will be referenced in the ticket:\n");
            for sha in &options.commit {
                let oneline = git_commit_oneline(sha)?;
                for entry in oneline.split('\n').filter(|entry| !entry.is_empty()) {
                    referenced.push_str(&f!("   {}\n", entry));
                }
            }
            description = Some(referenced);
        }
    }

    if let Some(path) = &options.from_file {
        // File-seeded text still goes through the editor for a final look.
        needs_editor = true;

        let content =
            std::fs::read_to_string(path).context(f!("Failed to read {}", path))?;
        let parsed = compose::extract(&content);
        summary = Some(parsed.summary);
        description = Some(parsed.description);

        if parsed
            .directives
            .iter()
            .any(|line| line.starts_with("# set-project: "))
        {
            for line in &parsed.directives {
                if let Some(Directive::SetProject(name)) = compose::parse_directive(line) {
                    if project.is_none() {
                        project = Some(name);
                    }
                }
            }
            special_lines = Some(parsed.directives.join("\n"));
        }
    } else {
        summary.get_or_insert_with(|| SUMMARY_HINT.to_string());
        description.get_or_insert_with(|| DESCRIPTION_HINT.to_string());
    }

    let mut project = project
        .or_else(|| config.default_project())
        .unwrap_or_else(|| "Default Project".to_string());

    let directives = special_lines
        .unwrap_or_else(|| compose::default_directives(&project, &issue_type));

    let show_assignable = options.show_fields && project != "Default Project";
    let assignable = if show_assignable {
        client.createmeta_field_names(&project, &issue_type).await?
    } else {
        Vec::new()
    };

    let set_pairs: Vec<(String, String)> = options
        .set_field
        .chunks(2)
        .filter_map(|pair| match pair {
            [field, value] => Some((field.clone(), value.clone())),
            _ => None,
        })
        .collect();
    let directives =
        compose::append_field_directives(&directives, &set_pairs, &assignable, show_assignable);

    let template = compose::create_template(
        summary.as_deref().unwrap_or_default(),
        description.as_deref().unwrap_or_default(),
        &directives,
    );

    let buffer = if needs_editor {
        edit_text(&template)?
    } else {
        template.clone()
    };

    let seeded =
        options.from_file.is_some() || (!options.commit.is_empty() && !options.oneline);
    if needs_editor && buffer == template && !seeded {
        return Err(eyre!(
            "Issue text not set.  Please fill in project, summary, and description."
        ));
    }

    let parsed = compose::extract(&buffer);
    let mut payload = serde_json::Map::new();
    payload.insert("summary".to_string(), Value::String(parsed.summary));
    payload.insert(
        "description".to_string(),
        Value::String(parsed.description),
    );

    for line in &parsed.directives {
        match compose::parse_directive(line) {
            Some(Directive::SetField {
                field,
                value,
                forced,
            }) => {
                let field_id = fields::resolve_field_id(&catalog, &field);
                let converted = if forced {
                    fields::forced_value(&value)
                } else {
                    let schema = fields::schema_type_for(&catalog, &field_id);
                    let coerced = fields::convert_field_value(schema.as_deref(), &value);
                    coerced_to_value(&client, coerced).await?
                };
                payload.insert(field_id, converted);
            }
            Some(Directive::SetProject(name)) => project = name,
            Some(Directive::IssueType(name)) => issue_type = name,
            None => {}
        }
    }

    payload.insert(
        "project".to_string(),
        serde_json::json!({ "key": project }),
    );
    payload.insert(
        "issuetype".to_string(),
        serde_json::json!({ "name": issue_type }),
    );

    let issue = Value::Object(payload);
    if options.dry_run || options.verbose {
        println!("Creating: {}", serde_json::to_string_pretty(&issue)?);
    }
    let result = if options.dry_run {
        "DRY-OKAY".to_string()
    } else {
        client.create_issue(&issue).await?.key
    };
    println!("done - Result: {}.", result);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_type_is_canonicalized() {
        assert_eq!(canonical_issue_type("bug"), "Bug");
        assert_eq!(canonical_issue_type("EPIC"), "Epic");
        assert_eq!(canonical_issue_type("subTask"), "Subtask");
    }

    #[test]
    fn test_unknown_issue_type_passes_through() {
        assert_eq!(canonical_issue_type("Incident"), "Incident");
    }
}
