use serde_json::Value as JsonValue;
use unicode_width::UnicodeWidthStr;

use crate::condition::SearchCondition;
use crate::query::BuiltQuery;
use crate::search::Page;

/// Widest a result column is allowed to get before values are truncated.
const MAX_COLUMN_WIDTH: usize = 32;

/// Truncate a string to fit within max_width (respecting unicode width).
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

/// Left-align `s` in a field of `width` display columns.
fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{s}{}", " ".repeat(width.saturating_sub(w)))
}

fn cell(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "NULL".to_string(),
        JsonValue::String(s) => s.replace('\n', " "),
        other => other.to_string(),
    }
}

/// Queries, bound parameters and window for `sqb build`.
pub fn format_built_query(entity: &str, condition: &SearchCondition, built: &BuiltQuery) -> String {
    let mut lines = vec![
        format!("Entity: {entity}"),
        format!("  Count:  {}", built.count_query.trim_end()),
        format!("  Search: {}", built.search_query.trim_end()),
        format!(
            "  Window: offset {}, limit {}",
            condition.filter.offset(),
            condition.filter.limit()
        ),
    ];

    if condition.query_params.is_empty() {
        lines.push("  Params: (none)".to_string());
    } else {
        lines.push("  Params:".to_string());
        for (name, value) in &condition.query_params {
            lines.push(format!("    :{:<16} {}", name, value.to_text()));
        }
    }
    lines.join("\n")
}

pub fn print_built_query(entity: &str, condition: &SearchCondition, built: &BuiltQuery) {
    println!("{}", format_built_query(entity, condition, built));
}

/// Rows of a search page as an aligned table with a count header.
pub fn format_page(page: &Page) -> String {
    if page.rows.is_empty() {
        return if page.total == 0 {
            format!("No {} rows matched.", page.entity)
        } else {
            format!(
                "{} {} row{} matched, none at offset {}.",
                page.total,
                page.entity,
                if page.total == 1 { "" } else { "s" },
                page.offset
            )
        };
    }

    let columns: Vec<&String> = page.rows[0].keys().collect();
    let cells: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| truncate(&row.get(*c).map(cell).unwrap_or_default(), MAX_COLUMN_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| UnicodeWidthStr::width(r[i].as_str()))
                .chain(std::iter::once(UnicodeWidthStr::width(c.as_str())))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let first = page.offset.saturating_add(1);
    let last = page.offset.saturating_add(page.rows.len());
    let mut out = vec![format!(
        "{} {} row{} ({first}-{last} shown):\n",
        page.total,
        page.entity,
        if page.total == 1 { "" } else { "s" }
    )];

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(&truncate(&c.to_uppercase(), *w), *w))
        .collect();
    out.push(format!("  {}", header.join("  ").trim_end()));
    out.push(format!(
        "  {}",
        "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1))
    ));

    for row in &cells {
        let line: Vec<String> = row.iter().zip(&widths).map(|(v, w)| pad(v, *w)).collect();
        out.push(format!("  {}", line.join("  ").trim_end()));
    }

    if page.has_more() {
        out.push(format!("\n  more rows: --offset {}", last));
    }
    out.join("\n")
}

pub fn print_page(page: &Page) {
    println!("{}", format_page(page));
}
