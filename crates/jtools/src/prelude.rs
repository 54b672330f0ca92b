pub use crate::error::Error;

pub use anstream::eprintln;
pub use anstream::println;
pub use color_eyre::eyre::{eyre, Context, OptionExt, Result};
pub use std::format as f;
pub fn new_table() -> prettytable::Table {
    let mut table = prettytable::Table::new();

    let format = prettytable::format::FormatBuilder::new()
        .padding(1, 1)
        .build();

    table.set_format(format);

    table
}

/// Bordered table in the `psql` style used for issue and board listings.
/// The header goes in with `set_titles` so it gets its own separator.
pub fn psql_table() -> prettytable::Table {
    use prettytable::format::{FormatBuilder, LinePosition, LineSeparator};

    let mut table = prettytable::Table::new();

    let format = FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separators(
            &[LinePosition::Top, LinePosition::Title, LinePosition::Bottom],
            LineSeparator::new('-', '+', '+', '+'),
        )
        .padding(1, 1)
        .build();

    table.set_format(format);

    table
}
