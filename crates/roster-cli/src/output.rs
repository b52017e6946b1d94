use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    print!("{}", render_table(headers, &rows));
}

/// A column of ids and counts: digits or the `-` placeholder only.
fn is_numeric_column(rows: &[Vec<String>], col: usize) -> bool {
    let mut cells = rows.iter().filter_map(|r| r.get(col)).peekable();
    cells.peek().is_some()
        && cells.all(|c| c == "-" || (!c.is_empty() && c.bytes().all(|b| b.is_ascii_digit())))
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize], right: &[bool]) -> String {
    let padded: Vec<String> = cells
        .zip(widths.iter().zip(right))
        .map(|(cell, (&width, &align_right))| {
            if align_right {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

/// Numeric columns are right-aligned so ids and day counts line up.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }
    let right: Vec<bool> = (0..headers.len())
        .map(|col| is_numeric_column(rows, col))
        .collect();

    let mut out = render_line(headers.iter().copied(), &widths, &right);
    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&sep.join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&render_line(row.iter().map(String::as_str), &widths, &right));
    }
    out
}
