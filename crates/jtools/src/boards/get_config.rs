use crate::boards::{board_filter_jql, column_layout};
use crate::client::JiraClient;
use crate::config::Config;
use crate::prelude::{println, *};

/// Options for dumping a board configuration
#[derive(Debug, clap::Args)]
pub struct GetConfigOptions {
    /// The board name
    pub board_name: String,
}

pub async fn run(options: GetConfigOptions, global: crate::Global) -> Result<()> {
    let config = Config::load(&global)?;
    let client = JiraClient::login(&config)?;

    let board = client.board_by_name(&options.board_name).await?;
    let (board_config, columns) = column_layout(&client, board.id).await?;

    let filter_jql = board_filter_jql(&client, &board_config).await?;
    println!("filter = {}", filter_jql);

    for (name, statuses) in &columns {
        let status_names: Vec<&str> = statuses.iter().map(|status| status.name.as_str()).collect();
        println!("column.{} = {:?}", name, status_names);
    }

    for quickfilter in client.board_quickfilters(board.id).await? {
        println!("quickfilter.name = \"{}\"", quickfilter.name);
        println!("quickfilter.query = \"{}\"", quickfilter.query);
        println!("quickfilter.id = \"{}\"", quickfilter.id);
    }

    Ok(())
}
