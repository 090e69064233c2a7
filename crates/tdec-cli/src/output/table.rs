//! Plain aligned text tables.

use serde_json::Value;

const MIN_COLUMN: usize = 4;
const SEPARATOR: &str = "  ";

/// A table of a JSON array: one row per element, one column per key in
/// first-seen order. Nested values render as compact JSON.
#[must_use]
pub fn render_rows(items: &[Value], max_width: Option<usize>) -> String {
    if items.is_empty() {
        return "(no rows)".to_string();
    }
    if !items.iter().all(Value::is_object) {
        let rows: Vec<Vec<String>> = items.iter().map(|item| vec![cell(item)]).collect();
        return render(&["value"], &rows, max_width);
    }

    let mut headers: Vec<&str> = Vec::new();
    for key in items.iter().filter_map(Value::as_object).flat_map(|map| map.keys()) {
        if !headers.contains(&key.as_str()) {
            headers.push(key);
        }
    }
    let rows: Vec<Vec<String>> = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(*header).map_or_else(|| "-".to_string(), cell))
                .collect()
        })
        .collect();
    render(&headers, &rows, max_width)
}

/// Align `rows` under `headers`, shrinking the widest columns to fit
/// `max_width`.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>], max_width: Option<usize>) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|value| value.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    if let Some(max_width) = max_width {
        shrink(&mut widths, max_width);
    }

    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(value, width)| pad(value, *width))
            .collect::<Vec<_>>()
            .join(SEPARATOR)
            .trim_end()
            .to_string()
    };

    let header_line = line(headers.iter().map(|h| (*h).to_string()).collect());
    let divider = "-".repeat(header_line.chars().count());
    let mut lines = vec![header_line, divider];
    lines.extend(rows.iter().map(|row| {
        line(
            (0..widths.len())
                .map(|index| row.get(index).cloned().unwrap_or_default())
                .collect(),
        )
    }));
    lines.join("\n")
}

/// Display text of one JSON value.
#[must_use]
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        nested => nested.to_string(),
    }
}

fn shrink(widths: &mut [usize], max_width: usize) {
    let separators = widths.len().saturating_sub(1) * SEPARATOR.len();
    while widths.iter().sum::<usize>() + separators > max_width {
        let Some((index, width)) = widths
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, width)| *width > MIN_COLUMN)
            .max_by_key(|(_, width)| *width)
        else {
            break;
        };
        widths[index] = width - 1;
    }
}

fn pad(value: &str, width: usize) -> String {
    let length = value.chars().count();
    if length > width {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        return cut;
    }
    format!("{value}{}", " ".repeat(width - length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn columns_follow_first_seen_keys() {
        let items = vec![
            json!({"structure_id": 101, "external_code": "1ABC"}),
            json!({"structure_id": 2, "title": "kinase"}),
        ];
        let table = render_rows(&items, None);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "structure_id  external_code  title");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "101           1ABC           -");
        assert_eq!(lines[3], "2             -              kinase");
    }

    #[test]
    fn long_cells_are_truncated_to_fit() {
        let rows = vec![vec!["x".repeat(50), "short".to_string()]];
        let table = render(&["title", "code"], &rows, Some(30));
        for line in table.lines() {
            assert!(line.chars().count() <= 30, "{line}");
        }
        assert!(table.contains('…'));
    }

    #[test]
    fn empty_array() {
        assert_eq!(render_rows(&[], None), "(no rows)");
    }
}
