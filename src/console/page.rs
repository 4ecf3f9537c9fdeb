//! HTML rendering of a [`ConsoleView`].

use std::fmt::{self, Write};

use super::{ConsoleView, Outcome, TITLE};
use crate::query::ResultTable;
use crate::schema::{self, TableSchema};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;display:flex;color:#262730}\
aside{width:18rem;padding:1rem 1.5rem;background:#f0f2f6;min-height:100vh;font-size:.85rem}\
aside h3{margin:1rem 0 .25rem}aside ul{margin:0;padding-left:1.1rem}\
main{flex:1;padding:2rem 3rem;max-width:60rem}\
textarea{width:100%;min-height:8rem;font-family:monospace;font-size:.95rem}\
button{margin-top:.5rem;padding:.4rem 1rem}\
.banner{padding:.75rem 1rem;border-radius:.4rem;margin:1rem 0;white-space:pre-wrap}\
.banner-success{background:#dff5e3}.banner-error{background:#fde2e1}\
.banner-failure{background:#fbd0ce;border:1px solid #e06c66}.banner-warning{background:#fff4d6}\
table{border-collapse:collapse;font-size:.9rem}\
th,td{border:1px solid #d6d6d9;padding:.3rem .6rem;text-align:left}\
th{background:#f0f2f6}pre{background:#f6f6f8;padding:.5rem;overflow:auto}";

/// Renders a complete HTML document.
pub(super) fn render(view: &ConsoleView, show_schema: bool) -> String {
    let mut out = String::with_capacity(8 * 1024);
    // Writing into a String cannot fail.
    let _ = write_page(&mut out, view, show_schema);
    out
}

/// Escapes text for use in element content and quoted attribute values.
///
/// # Examples
///
/// ```
/// use query_console::console::escape_html;
///
/// assert_eq!(escape_html(r#"<b a="1">&'"#), "&lt;b a=&quot;1&quot;&gt;&amp;&#39;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn write_page(out: &mut String, view: &ConsoleView, show_schema: bool) -> fmt::Result {
    write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n"
    )?;

    if show_schema {
        write_schema_panel(out, schema::TABLES)?;
    }

    write!(
        out,
        "<main>\n<h1>{TITLE}</h1>\n\
         <form method=\"post\" action=\"/query\">\n\
         <label for=\"query\">Enter your SQL query:</label>\n\
         <textarea id=\"query\" name=\"query\">\n{}</textarea>\n\
         <button type=\"submit\">Execute Query</button>\n\
         </form>\n<section id=\"result\">\n",
        escape_html(view.query_text())
    )?;

    if let Some(outcome) = view.outcome() {
        write_outcome(out, outcome)?;
    }

    out.write_str("</section>\n</main>\n</body>\n</html>\n")
}

fn write_schema_panel(out: &mut String, tables: &[TableSchema]) -> fmt::Result {
    out.write_str("<aside id=\"schema\">\n<h2>Database Schema</h2>\n")?;
    for table in tables {
        writeln!(out, "<h3>{}</h3>\n<ul>", escape_html(table.name))?;
        for column in table.columns {
            write!(
                out,
                "<li><code>{}</code> {}",
                escape_html(column.name),
                escape_html(column.data_type)
            )?;
            if !column.constraints.is_empty() {
                write!(out, " {}", escape_html(column.constraints))?;
            }
            out.write_str("</li>\n")?;
        }
        out.write_str("</ul>\n")?;
    }
    out.write_str("</aside>\n")
}

fn write_outcome(out: &mut String, outcome: &Outcome) -> fmt::Result {
    if let Some(banner) = outcome.banner() {
        writeln!(
            out,
            "<div class=\"banner {}\" role=\"alert\">{}</div>",
            banner.kind.css_class(),
            escape_html(&banner.to_string())
        )?;
    }

    if let Some((_, body)) = outcome.unrecognized() {
        writeln!(out, "<pre>{}</pre>", escape_html(&body.to_string()))?;
    }

    if let Some(table) = outcome.table() {
        out.write_str("<p>Query Results:</p>\n")?;
        write_table(out, &table)?;
    }

    Ok(())
}

fn write_table(out: &mut String, table: &ResultTable) -> fmt::Result {
    out.write_str("<table>\n<thead><tr>")?;
    for column in table.columns() {
        write!(out, "<th>{}</th>", escape_html(column))?;
    }
    out.write_str("</tr></thead>\n<tbody>\n")?;
    for row in table.rows() {
        out.write_str("<tr>")?;
        for cell in row {
            write!(out, "<td>{}</td>", escape_html(cell))?;
        }
        out.write_str("</tr>\n")?;
    }
    out.write_str("</tbody>\n</table>\n")
}
