pub mod attachment;
pub mod comment;
pub mod create;
pub mod field;
pub mod link;
pub mod list;
pub mod show;
pub mod state;
pub mod vote;
pub mod watcher;

use crate::client::JiraClient;
use crate::config::Config;
use crate::prelude::*;
use jtools_core::fields::{self, Coerced, FieldInfo};
use jtools_core::markup;
use jtools_core::tracker::Issue;
use serde_json::Value;

/// Issue module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "issues")]
#[command(about = "Work with Jira issues")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List issues matching the given criteria
    #[clap(name = "list")]
    List(list::ListOptions),

    /// Show one issue in full
    #[clap(name = "show")]
    Show(show::ShowOptions),

    /// Create a new issue, usually through your editor
    #[clap(name = "create")]
    Create(create::CreateOptions),

    /// Add a comment to an issue
    #[clap(name = "add-comment")]
    AddComment(comment::AddCommentOptions),

    /// Update an existing comment
    #[clap(name = "update-comment")]
    UpdateComment(comment::UpdateCommentOptions),

    /// Delete a comment
    #[clap(name = "del-comment")]
    DelComment(comment::DelCommentOptions),

    /// List the states an issue can move to
    #[clap(name = "states")]
    States(state::StatesOptions),

    /// Move an issue to a new state
    #[clap(name = "set-status")]
    SetStatus(state::SetStatusOptions),

    /// Start watching an issue
    #[clap(name = "add-watcher")]
    AddWatcher(watcher::WatcherOptions),

    /// Stop watching an issue
    #[clap(name = "del-watcher")]
    DelWatcher(watcher::WatcherOptions),

    /// Print one field of an issue
    #[clap(name = "get-field")]
    GetField(field::GetFieldOptions),

    /// Set one field of an issue
    #[clap(name = "set-field")]
    SetField(field::SetFieldOptions),

    /// Set fields on many issues from a CSV file
    #[clap(name = "set-field-from-csv")]
    SetFieldFromCsv(field::SetFieldFromCsvOptions),

    /// List, download, or upload attachments
    #[clap(name = "attachments")]
    Attachments(attachment::AttachmentOptions),

    /// Link an issue to another issue or an external URL
    #[clap(name = "add-link")]
    AddLink(link::AddLinkOptions),

    /// Cast a planning poker vote on an issue
    #[clap(name = "vote")]
    Vote(vote::VoteOptions),
}

/// Module entry point
pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::List(options) => list::run(options, global).await,
        Commands::Show(options) => show::run(options, global).await,
        Commands::Create(options) => create::run(options, global).await,
        Commands::AddComment(options) => comment::add(options, global).await,
        Commands::UpdateComment(options) => comment::update(options, global).await,
        Commands::DelComment(options) => comment::delete(options, global).await,
        Commands::States(options) => state::states(options, global).await,
        Commands::SetStatus(options) => state::set_status(options, global).await,
        Commands::AddWatcher(options) => watcher::add(options, global).await,
        Commands::DelWatcher(options) => watcher::delete(options, global).await,
        Commands::GetField(options) => field::get(options, global).await,
        Commands::SetField(options) => field::set(options, global).await,
        Commands::SetFieldFromCsv(options) => field::set_from_csv(options, global).await,
        Commands::Attachments(options) => attachment::run(options, global).await,
        Commands::AddLink(options) => link::run(options, global).await,
        Commands::Vote(options) => vote::run(options, global).await,
    }
}

/// Tracker markup to the form shown to the user. A no-op unless markdown
/// rendering is enabled in the config.
pub(crate) fn tracker_to_display(text: &str, config: &Config) -> String {
    if config.markdown_enabled() {
        markup::to_markdown(&markup::comment_refs_to_markdown(text))
    } else {
        text.to_string()
    }
}

/// User-entered text to tracker markup, the inverse of [`tracker_to_display`].
pub(crate) fn display_to_tracker(text: &str, config: &Config, server_url: &str) -> String {
    if config.markdown_enabled() {
        markup::to_tracker(&markup::comment_refs_to_tracker(text, server_url))
    } else {
        text.to_string()
    }
}

/// Resolves a user-supplied field name to the key it lives under in the
/// issue's raw fields. The raw keys are checked first, then custom field
/// display names, honoring the configured case policy.
pub(crate) fn field_key(
    issue: &Issue,
    catalog: &[FieldInfo],
    field_name: &str,
    config: &Config,
) -> Option<String> {
    let case_sensitive = config.case_sensitive();
    fields::find_field_key(&issue.fields, field_name, case_sensitive)
        .map(str::to_string)
        .or_else(|| {
            catalog
                .iter()
                .find(|info| {
                    info.custom
                        && if case_sensitive {
                            info.name == field_name
                        } else {
                            info.name.eq_ignore_ascii_case(field_name)
                        }
                })
                .map(|info| info.id.clone())
        })
}

/// One field of an issue as a display string; unknown or absent fields
/// render as the empty string.
pub(crate) fn plain_field(
    issue: &Issue,
    catalog: &[FieldInfo],
    field_name: &str,
    config: &Config,
) -> String {
    let Some(key) = field_key(issue, catalog, field_name, config) else {
        return String::new();
    };
    match issue.fields.get(&key) {
        Some(value) => fields::field_display_value(value, None),
        None => String::new(),
    }
}

/// Like [`plain_field`], but honoring the `render` sub-path selectors from
/// the config, for the listing and show views.
pub(crate) fn rendered_field(
    issue: &Issue,
    catalog: &[FieldInfo],
    field_name: &str,
    substruct: Option<&str>,
    config: &Config,
) -> String {
    let Some(key) = field_key(issue, catalog, field_name, config) else {
        return String::new();
    };
    let Some(value) = issue.fields.get(&key) else {
        return String::new();
    };

    match config.render_for(field_name) {
        Some(path) => match fields::drill(value, &path) {
            Some(leaf) => fields::field_display_value(leaf, None),
            None => String::new(),
        },
        None => fields::field_display_value(value, substruct),
    }
}

/// Resolves a free-form user string to exactly one account name through the
/// server's user search. Anything other than one match is an error.
pub(crate) async fn resolve_unique_user(client: &JiraClient, name: &str) -> Result<String> {
    let users = client.user_search(name).await?;
    if users.len() != 1 {
        return Err(eyre!(
            "Unable to convert \"{}\" to unambiguous name - {} results.",
            name,
            users.len()
        ));
    }
    users
        .into_iter()
        .next()
        .and_then(|user| user.name)
        .ok_or_else(|| eyre!("User {} has no name attribute", name))
}

/// Finishes a coerced field value, resolving user lookups over the wire.
pub(crate) async fn coerced_to_value(client: &JiraClient, coerced: Coerced) -> Result<Value> {
    match coerced {
        Coerced::Value(value) => Ok(value),
        Coerced::UserLookup(name) => {
            let account = resolve_unique_user(client, &name).await?;
            Ok(serde_json::json!({ "name": account }))
        }
    }
}
