//! HTML usage pages of the table module.

use crate::table::{TableSummary, DEFAULT_DELIMITER};

const INDENT: &str = "&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;";

fn indent(level: usize, text: &str) -> String {
    format!("{}{}", INDENT.repeat(level), text)
}

fn table_list(tables: &[TableSummary]) -> String {
    let mut list = String::from("Existing tables:<br/>");
    for table in tables {
        list.push_str(&indent(1, &format!("{} - {} rows<br/>", table.name, table.rows)));
    }
    list
}

/// Overview of the two entry points.
pub fn module_usage() -> String {
    "The module has two modes: table access and table manager.<br/>\
     Access a table with host:port/vts/table/&lt;table_name&gt;, \
     manage tables with host:port/vts/manager"
        .to_string()
}

/// Commands available under `/vts/table/<name>`.
pub fn table_usage(tables: &[TableSummary]) -> String {
    let mut page = String::from(
        "Table access:<br/>\
         Example: http://localhost:8888/vts/table/&lt;table_name&gt;[?param=value&amp;...&amp;param=value]<br/>\
         Commands:<br/>\
         cmd - table command, one of:<br/>",
    );
    page.push_str(&indent(1, "get - read a row. Parameters:<br/>"));
    page.push_str(&indent(
        2,
        "[row], if absent - read the row under the cursor and move the cursor to the next row, otherwise read the given row<br/>",
    ));
    page.push_str(&indent(2, "[col], if given - return this cell instead of the whole row<br/>"));
    page.push_str(&indent(
        2,
        &format!("[delimiter], if absent the table delimiter is used (default '{}')<br/>", DEFAULT_DELIMITER),
    ));
    page.push_str(&indent(
        1,
        "pop - take a row/cell out of the table. Taking the last cell of a row removes the row. Parameters: see get, and:<br/>",
    ));
    page.push_str(&indent(2, "[deleterow] - remove the whole row, otherwise only the given cell. Default: true<br/>"));
    page.push_str(&indent(
        1,
        "push - insert a row into the table. The value is sent in the POST/PUT body. Parameters:<br/>",
    ));
    page.push_str(&indent(2, "[row], insert before this position, otherwise before the cursor<br/>"));
    page.push_str(&indent(2, "[col], insert a single cell before this position of an existing row<br/>"));
    page.push_str(&indent(
        2,
        &format!("[delimiter], if absent the table delimiter is used (default '{}')<br/>", DEFAULT_DELIMITER),
    ));
    page.push_str(&table_list(tables));
    page
}

/// Commands available under `/vts/manager`.
pub fn manager_usage(tables: &[TableSummary]) -> String {
    let mut page = String::from(
        "Table manager:<br/>\
         Example: http://localhost:8888/vts/manager?param=value&amp;...&amp;param=value<br/>\
         Commands:<br/>\
         cmd - manager command, one of:<br/>",
    );
    page.push_str(&indent(1, "create - create a new table. Parameters:<br/>"));
    page.push_str(&indent(2, "table, table name<br/>"));
    page.push_str(&indent(2, "[filename], if given - load the table from this file<br/>"));
    page.push_str(&indent(2, &format!("[delimiter], default '{}'<br/>", DEFAULT_DELIMITER)));
    page.push_str(&indent(1, "delete - delete a table. Parameters:<br/>"));
    page.push_str(&indent(2, "table, table name<br/>"));
    page.push_str(&indent(1, "reload - reload a table from its file. Parameters:<br/>"));
    page.push_str(&indent(2, "table, table name<br/>"));
    page.push_str(&indent(2, "[filename], required for tables not created from a file<br/>"));
    page.push_str(&indent(2, "[delimiter], if absent the current delimiter is kept<br/>"));
    page.push_str(&table_list(tables));
    page
}
