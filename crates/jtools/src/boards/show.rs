use crate::boards::{board_filter_jql, column_layout, column_table};
use crate::client::JiraClient;
use crate::config::Config;
use crate::editor::page_output;
use crate::prelude::*;
use jtools_core::jql::board_issues_query;
use jtools_core::text::trim_text;
use jtools_core::tracker::{terminal_state_names, BoardCard};

/// Options for showing a board
#[derive(Debug, clap::Args)]
pub struct ShowOptions {
    /// The board name
    pub board_name: String,

    /// Only show cards assigned to this user (defaults to all)
    #[arg(long)]
    pub assignee: Option<String>,

    /// Only show cards from this project
    #[arg(long)]
    pub project: Option<String>,

    /// Applies a quick filter to the results
    #[arg(long)]
    pub filter: Option<String>,

    /// Include a summary trimmed to this length (0 means no summary)
    #[arg(long, default_value = "0")]
    pub summary_len: usize,

    /// Sets the offset for pulling issues
    #[arg(long, default_value = "0")]
    pub issue_offset: u64,

    /// Sets the max number of issues to pull
    #[arg(long, default_value = "100")]
    pub max_issues: u64,
}

fn card_text(card: &BoardCard, summary_len: usize) -> String {
    if summary_len == 0 {
        return card.key.clone();
    }
    f!(
        "{}\n{}\n{}\n{}",
        card.key,
        "-".repeat(summary_len),
        trim_text(&card.summary, summary_len),
        "_".repeat(summary_len)
    )
}

fn card_in_project(card: &BoardCard, project: &str) -> bool {
    card.key
        .rsplit_once('-')
        .map(|(prefix, _)| prefix.eq_ignore_ascii_case(project))
        .unwrap_or(false)
}

pub async fn run(options: ShowOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    let board = client.board_by_name(&options.board_name).await?;
    let (board_config, columns) = column_layout(&client, board.id).await?;

    let cards: Vec<BoardCard> = if let Some(filter) = &options.filter {
        let quickfilters = client.board_quickfilters(board.id).await?;
        let quickfilter = quickfilters
            .iter()
            .find(|qf| qf.name == *filter)
            .ok_or_else(|| eyre!("Unknown query: {}", filter))?;
        client
            .board_work_items(board.id, quickfilter.id)
            .await?
            .iter()
            .filter_map(BoardCard::from_work_item)
            .collect()
    } else {
        let filter_jql = board_filter_jql(&client, &board_config).await?;
        let terminal_states = terminal_state_names(&client.statuses().await?);
        let query = board_issues_query(&filter_jql, &terminal_states);
        client
            .search_issues(&query, options.issue_offset, options.max_issues)
            .await?
            .iter()
            .map(BoardCard::from_issue)
            .collect()
    };

    let mut laid_out: Vec<(String, Vec<String>)> = columns
        .iter()
        .map(|(name, _)| (name.clone(), Vec::new()))
        .collect();
    for card in &cards {
        if let Some(assignee) = &options.assignee {
            if !card.assigned_to(assignee) {
                continue;
            }
        }
        if let Some(project) = &options.project {
            if !card_in_project(card, project) {
                continue;
            }
        }
        for (index, (_, statuses)) in columns.iter().enumerate() {
            if card.in_column(statuses) {
                laid_out[index].1.push(card_text(card, options.summary_len));
            }
        }
    }

    let table = column_table(&laid_out);
    page_output(&table.to_string(), &f!("Board: {}", options.board_name));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(key: &str, summary: &str) -> BoardCard {
        BoardCard {
            key: key.to_string(),
            summary: summary.to_string(),
            status_name: None,
            status_id: None,
            assignees: Vec::new(),
        }
    }

    #[test]
    fn test_card_text_plain_and_with_summary() {
        let card = card("NET-7", "Fix the frobnicator before it frobs again");

        assert_eq!(card_text(&card, 0), "NET-7");
        assert_eq!(
            card_text(&card, 10),
            "NET-7\n----------\nFix the f...\n__________"
        );
    }

    #[test]
    fn test_card_project_prefix_match() {
        let card = card("NET-7", "");

        assert!(card_in_project(&card, "NET"));
        assert!(card_in_project(&card, "net"));
        assert!(!card_in_project(&card, "OVS"));
    }
}
