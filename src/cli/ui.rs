use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use rust_decimal::Decimal;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Liability,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Liability => style(text).red().bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned decimal with a fixed number of places.
pub fn decimal_cell(value: Decimal, precision: u32) -> Cell {
    Cell::new(format!("{:.*}", precision as usize, value)).set_alignment(CellAlignment::Right)
}

/// USD value cell; liabilities are shown in red.
pub fn usd_cell(value: Decimal, precision: u32, liability: bool) -> Cell {
    let cell = decimal_cell(value, precision);
    if liability { cell.fg(Color::Red) } else { cell }
}

/// Placeholder for an empty location column.
pub fn empty_cell() -> Cell {
    Cell::new("-").fg(Color::DarkGrey)
}
