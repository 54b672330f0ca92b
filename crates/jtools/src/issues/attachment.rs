use crate::client::JiraClient;
use crate::config::Config;
use crate::prelude::{println, *};
use jtools_core::tracker::Attachment;

/// Options for listing, pulling, or pushing attachments
#[derive(Debug, clap::Args)]
pub struct AttachmentOptions {
    /// The issue key
    pub issue_key: String,

    /// Attachment to download, by filename or by list index
    #[arg(long)]
    pub pull: Option<String>,

    /// File to upload as an attachment
    #[arg(long)]
    pub push: Option<String>,
}

fn issue_attachments(fields: &serde_json::Map<String, serde_json::Value>) -> Result<Vec<Attachment>> {
    match fields.get("attachment") {
        Some(value) if !value.is_null() => Ok(serde_json::from_value(value.clone())?),
        _ => Ok(Vec::new()),
    }
}

pub async fn run(options: AttachmentOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    if options.pull.is_some() && options.push.is_some() {
        return Err(eyre!("Invalid pull and push specified."));
    }

    let issue = client.get_issue(&options.issue_key).await?;
    let attachments = issue_attachments(&issue.fields)?;

    if let Some(pull) = &options.pull {
        for (index, attachment) in attachments.iter().enumerate() {
            if *pull != attachment.filename && *pull != index.to_string() {
                continue;
            }
            println!("Downloading: {}", attachment.filename);
            let url = attachment
                .content
                .as_deref()
                .ok_or_else(|| eyre!("Attachment {} has no content link", attachment.filename))?;
            let bytes = client.download(url).await?;
            std::fs::write(&attachment.filename, bytes)
                .context(f!("Failed to write {}", attachment.filename))?;
            return Ok(());
        }
        println!("Unknown attachment {}.", pull);
        return Ok(());
    }

    if let Some(push) = &options.push {
        client
            .upload_attachment(&issue.key, std::path::Path::new(push))
            .await?;
        return Ok(());
    }

    let mut output = String::from("Attachments:\n");
    if !attachments.is_empty() {
        let mut table = psql_table();
        table.set_titles(prettytable::row![
            "Id", "File", "Created", "Size", "Creator"
        ]);
        for (index, attachment) in attachments.iter().enumerate() {
            table.add_row(prettytable::row![
                index,
                attachment.filename,
                attachment.created,
                attachment.size,
                attachment.creator()
            ]);
        }
        output.push_str(&table.to_string());
        output.push('\n');
    }
    println!("{}", output);

    Ok(())
}
