use crate::client::JiraClient;
use crate::config::Config;
use crate::prelude::{println, *};
use jtools_core::tracker::IssueLink;
use regex::Regex;

/// Options for linking an issue to another issue or an external URL
#[derive(Debug, clap::Args)]
#[command(after_help = "URL may be another issue key (NET-123) or an external link.  TITLE
becomes the link title for external links, or a comment on issue-to-issue
links; pass 'none' to default it.")]
pub struct AddLinkOptions {
    /// The issue key
    pub issue_key: String,

    /// The link target: an issue key or an external URL
    pub url: String,

    /// Title for the link, or 'none' to default it
    pub title: String,

    /// Direction of an issue-to-issue relationship
    #[arg(
        long = "relationship-type",
        value_parser = clap::builder::PossibleValuesParser::new(["inward", "outward"]),
        ignore_case = true,
        default_value = "outward"
    )]
    pub relationship_type: String,

    /// The relationship to create, from the server's link types
    #[arg(long = "link-type")]
    pub link_type: Option<String>,
}

fn looks_like_issue_key(target: &str) -> bool {
    let pattern = Regex::new(r"^[A-Z][A-Z0-9]*-\d+$").unwrap();
    pattern.is_match(target)
}

/// Link targets already present on the issue: linked issue keys plus remote
/// link URLs.
fn issue_link_targets(links: &[IssueLink]) -> Vec<String> {
    let mut targets = Vec::new();
    for link in links {
        if let Some(issue) = &link.outward_issue {
            targets.push(issue.key.clone());
        }
        if let Some(issue) = &link.inward_issue {
            targets.push(issue.key.clone());
        }
    }
    targets
}

pub async fn run(options: AddLinkOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    let issue = client.get_issue(&options.issue_key).await?;

    let title = if options.title.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(options.title.clone())
    };

    let links: Vec<IssueLink> = match issue.fields.get("issuelinks") {
        Some(value) if !value.is_null() => serde_json::from_value(value.clone())?,
        _ => Vec::new(),
    };
    let mut targets = issue_link_targets(&links);
    for remote in client.remote_links(&issue.key).await? {
        if let Some(object) = remote.object {
            targets.push(object.url);
        }
    }
    if targets.iter().any(|target| *target == options.url) {
        println!("{} already added to issue.", options.url);
        return Ok(());
    }

    if looks_like_issue_key(&options.url) {
        client.get_issue(&options.url).await.map_err(|_| {
            eyre!(
                "Target {} looks like an issue, but no issue matches.",
                options.url
            )
        })?;

        let link_types = client.link_types().await?;
        let names: Vec<&str> = link_types.iter().map(|t| t.name.as_str()).collect();
        let link_type = options
            .link_type
            .as_deref()
            .and_then(|wanted| {
                link_types
                    .iter()
                    .find(|t| t.name.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| {
                eyre!(
                    "Invalid link type.  Please specify one of {}.",
                    names.join(",")
                )
            })?;

        let (inward, outward) = if options.relationship_type.eq_ignore_ascii_case("inward") {
            (issue.key.as_str(), options.url.as_str())
        } else {
            (options.url.as_str(), issue.key.as_str())
        };
        client
            .add_issue_link(&link_type.name, inward, outward, title.as_deref())
            .await?;
    } else {
        let title = title.unwrap_or_else(|| options.url.clone());
        client
            .add_remote_link(&issue.key, &options.url, &title)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jtools_core::tracker::{LinkType, LinkedIssue};

    #[test]
    fn test_issue_key_detection() {
        assert!(looks_like_issue_key("NET-123"));
        assert!(looks_like_issue_key("AB2-9"));
        assert!(!looks_like_issue_key("https://example.com/page"));
        assert!(!looks_like_issue_key("net-123"));
        assert!(!looks_like_issue_key("NET-"));
    }

    #[test]
    fn test_existing_targets_cover_both_directions() {
        let links = vec![
            IssueLink {
                kind: Some(LinkType {
                    name: "Blocks".to_string(),
                    inward: "is blocked by".to_string(),
                    outward: "blocks".to_string(),
                }),
                outward_issue: Some(LinkedIssue {
                    key: "NET-2".to_string(),
                }),
                inward_issue: None,
            },
            IssueLink {
                kind: None,
                outward_issue: None,
                inward_issue: Some(LinkedIssue {
                    key: "NET-3".to_string(),
                }),
            },
        ];

        assert_eq!(issue_link_targets(&links), vec!["NET-2", "NET-3"]);
    }
}
