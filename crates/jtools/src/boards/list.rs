use crate::client::JiraClient;
use crate::config::Config;
use crate::editor::page_output;
use crate::prelude::*;
use jtools_core::tracker::{board_row, BOARD_COLUMNS};

/// Options for listing boards
#[derive(Debug, clap::Args)]
pub struct ListOptions {
    /// Limit the number of entries to display
    #[arg(long, default_value = "25")]
    pub limit: u64,

    /// Search for a board by name
    #[arg(long)]
    pub name: Option<String>,
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    let boards = client
        .boards(options.limit, options.name.as_deref())
        .await?;

    let mut table = psql_table();
    table.set_titles(prettytable::Row::new(
        BOARD_COLUMNS
            .iter()
            .map(|name| prettytable::Cell::new(name))
            .collect(),
    ));
    for board in &boards {
        table.add_row(prettytable::Row::new(
            board_row(board)
                .iter()
                .map(|cell| prettytable::Cell::new(cell))
                .collect(),
        ));
    }

    page_output(&table.to_string(), "Jira Board List");

    Ok(())
}
