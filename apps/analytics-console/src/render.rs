//! Plain-text rendering of view states

use std::fmt::Write as _;

use analytics_sdk::{ClientError, FilterOptions};
use view_state::PageInfo;

/// Pager line: `page 3 of 5 (100 items)`
#[must_use]
pub fn pager_line(info: &PageInfo) -> String {
    format!(
        "page {} of {} ({} items)",
        info.page, info.page_count, info.item_count
    )
}

/// Error state listing every message of `error`
#[must_use]
pub fn error_state(error: &ClientError) -> String {
    let mut out = String::from("Error\n");
    for message in error.messages() {
        _ = writeln!(out, "  {message}");
    }
    out
}

/// Empty state shown when the authorization check fails
#[must_use]
pub fn not_authorized_state(error: &ClientError) -> String {
    let mut out = String::from("Not authorized\n");
    out.push_str("  You do not have permission to view automation analytics.\n");
    if let Some(status) = error.http_status() {
        _ = writeln!(out, "  ({status})");
    } else {
        _ = writeln!(out, "  ({error})");
    }
    out
}

/// Shown when a successful report has no rows
pub const NO_RESULTS: &str = "No results found\n";

/// US-dollar amount with thousands separators: `$1,250.50`, `-$3.00`
#[must_use]
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Label of option `key` under filter `name`, or the key itself
#[must_use]
pub fn option_label(options: &FilterOptions, name: &str, key: &str) -> String {
    options
        .label_for(name, key)
        .unwrap_or_else(|| key.to_owned())
}

/// Left-aligned text table; columns are as wide as their widest cell
#[must_use]
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| (*h).to_owned()).collect();
    push_row(&mut out, &widths, &header_cells);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &widths, &rule);
    for row in rows {
        push_row(&mut out, &widths, row);
    }
    out
}

fn push_row(out: &mut String, widths: &[usize], cells: &[String]) {
    let line = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let cell = cells.get(i).map_or("", String::as_str);
            format!("{cell:<width$}")
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
