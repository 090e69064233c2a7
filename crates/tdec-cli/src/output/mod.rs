use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let max_width = ui::prefs().term_width;
    let rendered = match serde_json::to_value(value)? {
        Value::Array(items) => table::render_rows(&items, max_width),
        Value::Object(map) => {
            let rows: Vec<Vec<String>> = map
                .into_iter()
                .map(|(key, value)| vec![key, table::cell(&value)])
                .collect();
            table::render(&["field", "value"], &rows, max_width)
        }
        scalar => table::cell(&scalar),
    };
    Ok(rendered)
}
