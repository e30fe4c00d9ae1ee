use anyhow::Result;
use console::style;

use crate::api::ApiClient;
use crate::api::models::SensorKind;
use crate::core::terminal::{print_error, print_info};
use crate::data::preview::{columns_of, render_cell};

/// Print the newest rows of a collection as a plain table. A fetch failure
/// is reported inline, matching the per-panel behavior of the executive
/// screen.
pub async fn run_preview(kind: SensorKind, api_url: String) -> Result<()> {
    let client = ApiClient::new(api_url);
    let rows = match client.preview_rows(kind).await {
        Ok(rows) => rows,
        Err(e) => {
            print_error(&format!("{}", e));
            return Ok(());
        }
    };

    println!("\n {}", style(kind.label()).bold().underlined());
    if rows.is_empty() {
        print_info("No hay datos para mostrar.");
        return Ok(());
    }

    let columns = columns_of(&rows);
    let widths: Vec<usize> = columns
        .iter()
        .map(|col| {
            rows.iter()
                .map(|row| render_cell(row, col).chars().count())
                .chain(std::iter::once(col.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| format!("{:<width$}", style(col).bold().cyan(), width = *w))
        .collect();
    println!("  {}", header.join("  "));

    for row in &rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", render_cell(row, col), width = *w))
            .collect();
        println!("  {}", cells.join("  "));
    }
    println!();
    Ok(())
}
