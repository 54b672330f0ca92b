use crate::client::JiraClient;
use crate::config::Config;
use crate::editor::edit_text;
use crate::issues::{display_to_tracker, tracker_to_display};
use crate::prelude::{println, *};
use jtools_core::tracker::quoted_reply_seed;
use serde_json::Value;

/// Options for adding a comment
#[derive(Debug, clap::Args)]
#[command(after_help = "EXAMPLES:
  # Comment through your editor:
  jtools issues add-comment NET-1234

  # Reply to the most recent comment, quoting it:
  jtools issues add-comment NET-1234 --in-reply-to last

  # Restrict the comment to one group:
  jtools issues add-comment NET-1234 --comment \"ack\" --visibility developers")]
pub struct AddCommentOptions {
    /// The issue key
    pub issue_key: String,

    /// The comment text to add; defaults to opening an editor
    #[arg(long)]
    pub comment: Option<String>,

    /// Sets the group / role for visibility; defaults to 'all'
    #[arg(long)]
    pub visibility: Option<String>,

    /// Quote an existing comment (an id, or 'last') as a reply
    #[arg(long)]
    pub in_reply_to: Option<String>,
}

/// Options for updating a comment
#[derive(Debug, clap::Args)]
pub struct UpdateCommentOptions {
    /// The issue key
    pub issue_key: String,

    /// The comment id, or 'last'
    pub comment_id: String,

    /// Set new body to the argument; empty keeps the current body
    #[arg(long)]
    pub body: Option<String>,

    /// Sets the group / role for visibility; 'all' clears the restriction
    #[arg(long)]
    pub visibility: Option<String>,
}

/// Options for deleting a comment
#[derive(Debug, clap::Args)]
pub struct DelCommentOptions {
    /// The issue key
    pub issue_key: String,

    /// The comment id, or 'last'
    pub comment_id: String,
}

pub async fn add(options: AddCommentOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    if options.comment.is_some() && options.in_reply_to.is_some() {
        return Err(eyre!("Cannot reply with defaulted text."));
    }

    let mut visibility = options.visibility.clone();
    let mut seed: Option<String> = None;

    if let Some(reply_id) = &options.in_reply_to {
        if let Some(reference) = client.find_comment(&options.issue_key, reply_id).await? {
            seed = Some(quoted_reply_seed(&config.reply_header(), &reference));
            if visibility.is_none() {
                if let Some(restriction) = &reference.visibility {
                    visibility = Some(restriction.value.clone());
                }
            }
        }
    }

    let comment = match &options.comment {
        Some(text) => text.clone(),
        None => edit_text(seed.as_deref().unwrap_or(""))?,
    };

    let unchanged = seed.as_deref().map(|text| text == comment).unwrap_or(false);
    if comment.trim().is_empty() || unchanged {
        return Err(eyre!("No comment provided."));
    }

    let body = display_to_tracker(&comment, &config, client.base_url());
    client
        .add_comment(
            &options.issue_key,
            &body,
            visibility.as_deref().unwrap_or("all"),
        )
        .await?;

    Ok(())
}

pub async fn update(options: UpdateCommentOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    let issue = client.get_issue(&options.issue_key).await?;
    let Some(comment) = client.find_comment(&issue.key, &options.comment_id).await? else {
        println!(
            "Comment {} for issue {} not found.",
            options.comment_id, options.issue_key
        );
        return Ok(());
    };

    let body_text = match &options.body {
        None => {
            let seed = tracker_to_display(&comment.body, &config);
            let edited = edit_text(&seed)?;
            if edited.is_empty() {
                None
            } else {
                Some(edited)
            }
        }
        Some(text) if text.is_empty() => None,
        Some(text) => Some(text.clone()),
    };

    let mut update = serde_json::Map::new();
    if let Some(text) = body_text {
        update.insert(
            "body".to_string(),
            Value::String(display_to_tracker(&text, &config, client.base_url())),
        );
    }
    if let Some(visibility) = &options.visibility {
        if visibility.eq_ignore_ascii_case("all") {
            update.insert(
                "visibility".to_string(),
                serde_json::json!({ "identifier": null }),
            );
        } else {
            update.insert(
                "visibility".to_string(),
                serde_json::json!({ "type": "group", "value": visibility }),
            );
        }
    }

    if update.is_empty() {
        println!("No Changes.");
        return Ok(());
    }

    client
        .update_comment(&issue.key, &comment.id, &Value::Object(update))
        .await?;
    println!("Comment {} updated.", options.comment_id);

    Ok(())
}

pub async fn delete(options: DelCommentOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    let issue = client.get_issue(&options.issue_key).await?;
    match client.find_comment(&issue.key, &options.comment_id).await? {
        Some(comment) => {
            client.delete_comment(&issue.key, &comment.id).await?;
            println!("Comment {} deleted.", options.comment_id);
        }
        None => println!(
            "Comment {} for issue {} not found.",
            options.comment_id, options.issue_key
        ),
    }

    Ok(())
}
