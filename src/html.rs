use std::fmt::Write;

use crate::dashboard::Dashboard;
use crate::format::html_escape;
use crate::loader::DataSource;
use crate::tab::TabId;
use crate::table::Table;

pub const SHOW_REVERTED_ID: &str = "show_reverted";
pub const DATA_SOURCE_RADIO: &str = "radio_data_src";
pub const SERVER_DATA_OPTION_ID: &str = "option_server_data";
pub const UPLOAD_OPTION_ID: &str = "option_upload";

const HEADER_BACKGROUND: &str = "#333f67";

pub fn render_page(dashboard: &Dashboard, source: &DataSource) -> String {
    let tabs: String = TabId::ALL
        .into_iter()
        .map(|tab| render_tab_content(dashboard, tab))
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Fork sync status</title>
    <style>{css}</style>
</head>
<body>
    {controls}
    <div class="tab">
{links}    </div>
{tabs}</body>
</html>
"#,
        css = inline_css(),
        controls = render_controls(dashboard, source),
        links = render_tab_links(dashboard.active_tab()),
        tabs = tabs,
    )
}

fn render_controls(dashboard: &Dashboard, source: &DataSource) -> String {
    let checked = |on: bool| if on { " checked" } else { "" };
    let is_cache = matches!(source, DataSource::Cache);
    format!(
        r#"<div class="controls">
        <input type="radio" name="{radio}" id="{server}"{server_checked}>
        <label for="{server}">Cached data</label>
        <input type="radio" name="{radio}" id="{upload}"{upload_checked}>
        <label for="{upload}">Upload file</label>
        <input type="checkbox" id="{reverted}"{reverted_checked}>
        <label for="{reverted}">Show reverted commits</label>
    </div>"#,
        radio = DATA_SOURCE_RADIO,
        server = SERVER_DATA_OPTION_ID,
        upload = UPLOAD_OPTION_ID,
        reverted = SHOW_REVERTED_ID,
        server_checked = checked(is_cache),
        upload_checked = checked(!is_cache),
        reverted_checked = checked(dashboard.show_reverted()),
    )
}

fn render_tab_links(active: TabId) -> String {
    let mut result = String::new();
    for tab in TabId::ALL {
        let class = if tab == active {
            "tablinks active"
        } else {
            "tablinks"
        };
        let _ = writeln!(
            result,
            r##"        <a class="{class}" href="#{id}">{label}</a>"##,
            id = tab.as_str(),
            label = html_escape(tab.label()),
        );
    }
    result
}

fn render_tab_content(dashboard: &Dashboard, tab: TabId) -> String {
    let display = if tab == dashboard.active_tab() {
        "block"
    } else {
        "none"
    };
    let (table, summary) = match dashboard.table(tab) {
        Some(table) => (render_table(table), table.summary.to_string()),
        None => (
            format!(r#"<table id="{}"></table>"#, tab.table_id()),
            String::new(),
        ),
    };
    format!(
        r#"    <div id="{id}" class="tabcontent" style="display: {display}">
        <p id="{summary_id}">{summary}</p>
        {table}
    </div>
"#,
        id = tab.as_str(),
        summary_id = tab.summary_id(),
        summary = html_escape(&summary),
    )
}

pub fn render_table(table: &Table) -> String {
    let mut result = format!(r#"<table id="{}">"#, table.tab.table_id());

    result.push_str(&format!(
        r#"<tr style="background-color: {HEADER_BACKGROUND}; color: white">"#
    ));
    for header in &table.headers {
        let _ = write!(result, "<td>{}</td>", html_escape(header));
    }
    result.push_str("</tr>");

    result.push_str("<tr>");
    for (column, input) in table.inputs.iter().enumerate() {
        let autofocus = match table.focus {
            Some(focus) if focus.column == column => " autofocus",
            _ => "",
        };
        let _ = write!(
            result,
            r#"<td style="background-color: {color}"><input name="f{column}" value="{value}"{autofocus}></td>"#,
            color = input.validity.color(),
            value = html_escape(&input.value),
        );
    }
    result.push_str("</tr>");

    for row in &table.rows {
        let display = if row.visible { "table-row" } else { "none" };
        let _ = write!(result, r#"<tr style="display: {display}">"#);
        for cell in &row.cells {
            let _ = write!(result, "<td>{}</td>", cell.html);
        }
        result.push_str("</tr>");
    }
    result.push_str("</table>");
    result
}

fn inline_css() -> &'static str {
    r#"
body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
}

.tab {
    overflow: hidden;
    border: 1px solid #ccc;
    background-color: #f1f1f1;
}

.tab a {
    float: left;
    padding: 14px 16px;
    text-decoration: none;
    color: black;
}

.tab a:hover {
    background-color: #ddd;
}

.tab a.active {
    background-color: #ccc;
}

.tabcontent {
    padding: 6px 12px;
    border: 1px solid #ccc;
    border-top: none;
}

.tabcontent:target {
    display: block !important;
}

body:has(.tabcontent:target) .tabcontent:not(:target) {
    display: none !important;
}

table {
    border-collapse: collapse;
}

td {
    border: 1px solid #ddd;
    padding: 4px 8px;
}
"#
}
