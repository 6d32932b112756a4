use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{Description, FitResult, ParamRow};

pub fn print_fit(result: &FitResult) {
    println!("Scaler: {}", result.scaler);
    println!(
        "Frame: {} ({} rows x {} columns)",
        result.kind, result.shape.0, result.shape.1
    );
    println!("{}", params_table(&result.params));
    for path in &result.outputs {
        println!("Wrote {}", path.display());
    }
}

pub fn print_description(description: &Description) {
    println!(
        "Frame: {} ({} rows x {} columns)",
        description.kind, description.shape.0, description.shape.1
    );
    println!("{}", description_table(description));
}

pub fn params_table(rows: &[ParamRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Held by"),
        header_cell("Column"),
        header_cell("Shift"),
        header_cell("Scale"),
        header_cell("Offset"),
    ]);
    apply_table_style(&mut table);
    for idx in 2..5 {
        align_column(&mut table, idx, CellAlignment::Right);
    }
    for row in rows {
        table.add_row(vec![
            scope_cell(&row.scope),
            Cell::new(&row.column),
            number_cell(row.shift),
            number_cell(row.scale),
            number_cell(row.offset),
        ]);
    }
    table
}

pub fn description_table(description: &Description) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Count"),
        header_cell("Mean"),
        header_cell("Std"),
        header_cell("Min"),
        header_cell("Max"),
    ]);
    apply_table_style(&mut table);
    for idx in 1..6 {
        align_column(&mut table, idx, CellAlignment::Right);
    }
    for (column, count) in description.count.iter() {
        let stat = |values: &fedprep_frame::ColumnValues| {
            values
                .get(column)
                .map_or_else(|| dim_cell("-"), number_cell)
        };
        table.add_row(vec![
            Cell::new(column).add_attribute(Attribute::Bold),
            Cell::new(count),
            stat(&description.mean),
            stat(&description.std),
            stat(&description.min),
            stat(&description.max),
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn scope_cell(scope: &str) -> Cell {
    if scope == "global" {
        Cell::new(scope).fg(Color::DarkGrey)
    } else {
        Cell::new(scope)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    }
}

fn number_cell(value: f64) -> Cell {
    if value.is_nan() {
        dim_cell("NaN")
    } else {
        Cell::new(format!("{value:.6}"))
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
