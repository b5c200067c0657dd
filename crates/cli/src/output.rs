//! Terminal output.
//!
//! Everything a command prints goes through here so `--json` can swap the
//! human-readable layout for the raw response body.

#![allow(clippy::print_stdout)]

use serde::Serialize;

/// Print `value` as pretty JSON.
pub fn json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => tracing::error!(error = %e, "Failed to serialize output"),
    }
}

/// Print one line.
pub fn line(text: impl std::fmt::Display) {
    println!("{text}");
}

/// Print an aligned `label: value` pair.
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {label:<18} {value}");
}

/// Print a heading followed by an underline.
pub fn heading(text: &str) {
    println!("{text}");
    println!("{}", "-".repeat(text.chars().count()));
}

/// Print rows with left-aligned columns sized to their widest cell.
pub fn table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("(none)");
        return;
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: &mut dyn Iterator<Item = &str>| {
        cells
            .zip(&widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", render(&mut headers.iter().copied()));
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
    );
    for row in rows {
        println!("{}", render(&mut row.iter().map(String::as_str)));
    }
}
