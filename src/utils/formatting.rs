use comfy_table::presets::UTF8_FULL;
use comfy_table::*;

use crate::constants::DEFAULT_TABLE_WIDTH;

/// Two-column table with bold keys
pub fn format_key_value_table(data: Vec<(&str, String)>) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(DEFAULT_TABLE_WIDTH)
        .set_header(vec!["Key", "Value"]);

    for (key, value) in data {
        table.add_row(vec![
            Cell::new(key).add_attribute(Attribute::Bold),
            Cell::new(value),
        ]);
    }

    table.to_string()
}

pub fn format_table(headers: Vec<&str>, rows: Vec<Vec<Cell>>) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(DEFAULT_TABLE_WIDTH)
        .set_header(headers);

    for row in rows {
        table.add_row(row);
    }

    table.to_string()
}
