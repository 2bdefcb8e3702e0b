//! Table rendering for structured JSON replies and markdown-style tables

use serde_json::{Map, Value};

use super::escape::escape_html;

const TABLE_OPEN: &str = r#"<table class="data-table">"#;
const TABLE_CLOSE: &str = "</table>";

/// Shown in place of a table when a JSON array has no rows
pub const NO_DATA: &str = "<p>No data</p>";

/// Header used when array rows are not objects
const VALUE_HEADER: &str = "value";

/// Cell text for a header the row does not have
const MISSING_CELL: &str = "undefined";

/// Render a parsed JSON value: arrays and objects become tables, anything
/// else is shown as escaped pretty-printed JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Array(items) => array_table(items),
        Value::Object(map) => object_table(map),
        Value::Number(_) => display_string(value),
        other => {
            let pretty = serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string());
            escape_html(&pretty)
        }
    }
}

fn array_table(items: &[Value]) -> String {
    let Some(first) = items.first() else {
        return NO_DATA.to_string();
    };

    let headers: Vec<&str> = match first {
        Value::Object(map) => map.keys().map(String::as_str).collect(),
        _ => vec![VALUE_HEADER],
    };
    let keyed = first.is_object();

    let mut html = String::from(TABLE_OPEN);
    push_header_row(&mut html, headers.iter().copied());
    html.push_str("<tbody>");

    for item in items {
        html.push_str("<tr>");
        if keyed {
            for header in &headers {
                let cell = match item.get(header) {
                    Some(v) => display_string(v),
                    None => MISSING_CELL.to_string(),
                };
                push_cell(&mut html, "td", &cell);
            }
        } else {
            push_cell(&mut html, "td", &display_string(item));
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody>");
    html.push_str(TABLE_CLOSE);
    html
}

fn object_table(map: &Map<String, Value>) -> String {
    let mut html = String::from(TABLE_OPEN);
    html.push_str("<tbody>");

    for (key, value) in map {
        html.push_str("<tr><td><strong>");
        html.push_str(&escape_html(key));
        html.push_str("</strong></td>");
        push_cell(&mut html, "td", &display_string(value));
        html.push_str("</tr>");
    }

    html.push_str("</tbody>");
    html.push_str(TABLE_CLOSE);
    html
}

/// Render a pipe-delimited markdown table.
///
/// The first non-blank line is the header; separator rows (`---|:---:`)
/// are skipped; every other line is a data row.
pub fn render_markdown_table(text: &str) -> String {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let mut html = String::from(TABLE_OPEN);
    if let Some(header) = lines.next() {
        push_header_row(&mut html, split_cells(header));
    }
    html.push_str("<tbody>");

    for line in lines {
        if is_separator_row(line) {
            continue;
        }
        html.push_str("<tr>");
        for cell in split_cells(line) {
            push_cell(&mut html, "td", cell);
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody>");
    html.push_str(TABLE_CLOSE);
    html
}

fn split_cells(line: &str) -> impl Iterator<Item = &str> {
    line.split('|').map(str::trim).filter(|cell| !cell.is_empty())
}

fn is_separator_row(line: &str) -> bool {
    line.contains("---")
        && line
            .chars()
            .all(|c| c == '-' || c == '|' || c == ':' || c.is_whitespace())
}

fn push_header_row<'a>(html: &mut String, cells: impl Iterator<Item = &'a str>) {
    html.push_str("<thead><tr>");
    for cell in cells {
        push_cell(html, "th", cell);
    }
    html.push_str("</tr></thead>");
}

fn push_cell(html: &mut String, tag: &str, text: &str) {
    html.push('<');
    html.push_str(tag);
    html.push('>');
    html.push_str(&escape_html(text));
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}

/// Display form of a JSON value inside a table cell.
///
/// Strings are shown bare, numbers use the JavaScript number formatting
/// (`1.0` shows as `1`), nested arrays are comma-joined and nested objects
/// collapse to `[object Object]`, matching what browser chat widgets show
/// for the same payloads.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) if n.is_f64() => n.as_f64().map_or_else(|| n.to_string(), js_number),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// `String(x)` for a finite float: plain decimal in `[1e-6, 1e21)`,
/// exponent form with an explicit sign outside it.
fn js_number(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }
    let exp = format!("{f:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_of_objects_table() {
        let html = render_value(&json!([
            {"name": "Latte", "price": 25000},
            {"name": "Mocha", "price": 28000}
        ]));
        assert_eq!(
            html,
            "<table class=\"data-table\"><thead><tr><th>name</th><th>price</th></tr></thead>\
             <tbody><tr><td>Latte</td><td>25000</td></tr><tr><td>Mocha</td><td>28000</td></tr>\
             </tbody></table>"
        );
    }

    #[test]
    fn test_headers_follow_first_row_key_order() {
        let html = render_value(&json!([{"zeta": 1, "alpha": 2, "mid": 3}]));
        let zeta = html.find("<th>zeta</th>").unwrap();
        let alpha = html.find("<th>alpha</th>").unwrap();
        let mid = html.find("<th>mid</th>").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_missing_key_renders_undefined() {
        let html = render_value(&json!([{"a": 1, "b": 2}, {"a": 3}]));
        assert!(html.contains("<tr><td>3</td><td>undefined</td></tr>"));
    }

    #[test]
    fn test_extra_keys_in_later_rows_ignored() {
        let html = render_value(&json!([{"a": 1}, {"a": 2, "b": "<x>"}]));
        assert!(!html.contains("&lt;x&gt;"));
        assert!(!html.contains("<th>b</th>"));
    }

    #[test]
    fn test_empty_array_is_no_data() {
        assert_eq!(render_value(&json!([])), NO_DATA);
    }

    #[test]
    fn test_array_of_scalars_single_column() {
        let html = render_value(&json!(["espresso", 3, null]));
        assert!(html.contains("<th>value</th>"));
        assert!(html.contains("<td>espresso</td>"));
        assert!(html.contains("<td>3</td>"));
        assert!(html.contains("<td>null</td>"));
    }

    #[test]
    fn test_object_key_value_table() {
        let html = render_value(&json!({"status": "open", "tables": 12}));
        assert_eq!(
            html,
            "<table class=\"data-table\"><tbody>\
             <tr><td><strong>status</strong></td><td>open</td></tr>\
             <tr><td><strong>tables</strong></td><td>12</td></tr>\
             </tbody></table>"
        );
    }

    #[test]
    fn test_cells_are_escaped() {
        let html = render_value(&json!({"<k>": "<b>&</b>"}));
        assert!(html.contains("<strong>&lt;k&gt;</strong>"));
        assert!(html.contains("<td>&lt;b&gt;&amp;&lt;/b&gt;</td>"));
    }

    #[test]
    fn test_scalars_pretty_printed_and_escaped() {
        assert_eq!(render_value(&json!(42)), "42");
        assert_eq!(render_value(&json!(7.0)), "7");
        assert_eq!(render_value(&json!(true)), "true");
        assert_eq!(render_value(&json!(null)), "null");
        assert_eq!(render_value(&json!("a<b")), "&quot;a&lt;b&quot;");
    }

    #[test]
    fn test_integral_floats_drop_the_fraction() {
        let html = render_value(&json!([{"price": 1.0, "rate": 2.5}]));
        assert!(html.contains("<td>1</td><td>2.5</td>"));
    }

    #[test]
    fn test_float_display_matches_javascript() {
        assert_eq!(display_string(&json!(-3.0)), "-3");
        assert_eq!(display_string(&json!(0.1)), "0.1");
        assert_eq!(display_string(&json!(-0.0)), "0");
        assert_eq!(display_string(&json!(1e21)), "1e+21");
        assert_eq!(display_string(&json!(1.5e-7)), "1.5e-7");
        assert_eq!(display_string(&json!(1e20)), "100000000000000000000");
        assert_eq!(display_string(&json!(42)), "42");
    }

    #[test]
    fn test_display_string_nested_values() {
        assert_eq!(display_string(&json!([1, null, "x"])), "1,,x");
        assert_eq!(display_string(&json!({"a": 1})), "[object Object]");
        assert_eq!(display_string(&json!([[1, 2], 3])), "1,2,3");
        assert_eq!(display_string(&json!(1.5)), "1.5");
    }

    #[test]
    fn test_markdown_table() {
        let html = render_markdown_table("a | b\n---|---\n1 | 2");
        assert_eq!(
            html,
            "<table class=\"data-table\"><thead><tr><th>a</th><th>b</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_markdown_table_with_outer_pipes_and_blank_lines() {
        let html = render_markdown_table("\n| Menu | Price |\n|:---|---:|\n\n| Latte | 25k |\n");
        assert!(html.contains("<th>Menu</th><th>Price</th>"));
        assert!(html.contains("<tr><td>Latte</td><td>25k</td></tr>"));
        assert_eq!(html.matches("<tr>").count(), 2);
    }

    #[test]
    fn test_markdown_data_row_with_dashes_kept() {
        let html = render_markdown_table("k | v\n---|---\nrange | 1---5");
        assert!(html.contains("<td>1---5</td>"));
    }

    #[test]
    fn test_markdown_cells_escaped() {
        let html = render_markdown_table("<i>h</i> | x\n---|---\na&b | <script>");
        assert!(html.contains("<th>&lt;i&gt;h&lt;/i&gt;</th>"));
        assert!(html.contains("<td>a&amp;b</td>"));
        assert!(html.contains("<td>&lt;script&gt;</td>"));
    }

    #[test]
    fn test_separator_detection() {
        assert!(is_separator_row("---|---"));
        assert!(is_separator_row("| :--- | ---: |"));
        assert!(is_separator_row("------"));
        assert!(!is_separator_row("a | ---"));
        assert!(!is_separator_row("--|--"));
    }
}
