// src/cli/display.rs
use std::io::{self, IsTerminal, Write};

use crossterm::style::Stylize;

use crate::domain::aggregate::Heatmap;

/// Terminal columns taken by `c`; East Asian wide characters take two
fn char_width(c: char) -> usize {
    match c as u32 {
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6 => 2,
        _ => 1,
    }
}

pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{}{}", s, " ".repeat(fill))
}

/// Plain table: header, dashed rule, rows; columns padded to the widest cell
pub fn format_table<S: AsRef<str>>(headers: &[S], rows: &[Vec<String>], color: bool) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h.as_ref())).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(display_width(cell));
            }
        }
    }

    let header = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h.as_ref(), *w))
        .collect::<Vec<_>>()
        .join("  ");
    let header = header.trim_end();
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(if color {
        header.bold().to_string()
    } else {
        header.to_string()
    });
    lines.push(rule);
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(cell, *w))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

/// Heatmap as a table, one row per y label
pub fn format_heatmap(heatmap: &Heatmap, corner: &str, color: bool) -> String {
    let headers: Vec<&str> = std::iter::once(corner)
        .chain(heatmap.x_labels.iter().map(String::as_str))
        .collect();
    let rows: Vec<Vec<String>> = heatmap
        .y_labels
        .iter()
        .zip(&heatmap.values)
        .map(|(label, values)| {
            std::iter::once(label.clone())
                .chain(values.iter().map(|v| v.to_string()))
                .collect()
        })
        .collect();
    format_table(&headers, &rows, color)
}

/// Aligned `key: value` lines
pub fn format_key_values(pairs: &[(String, String)], color: bool) -> String {
    let width = pairs.iter().map(|(k, _)| display_width(k)).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| {
            let key = pad(k, width);
            if color {
                format!("{}  {}", key.green(), v)
            } else {
                format!("{}  {}", key, v)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Colors only on a terminal and when not disabled
pub fn use_color(no_color: bool) -> bool {
    !no_color && io::stdout().is_terminal()
}

pub fn print_output(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    stdout.flush()
}
