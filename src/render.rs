//! Images for the posts. Both are drawn as SVG; `rasterize` turns them
//! into the PNG that Bluesky wants.

use std::fmt::Write as _;
use std::io::Write;
use std::process::{Command, Stdio};

use itertools::Itertools;

const SIZE: f64 = 800.0;
const FONT: &str = "DejaVu Sans, Helvetica, Arial, sans-serif";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Smallest "nice" integer step that keeps the axis at ten ticks or fewer.
pub fn tick_step(span: u32) -> u32 {
    let mut magnitude = 1;
    loop {
        for m in [1, 2, 5] {
            let step = m * magnitude;
            if span / step <= 10 {
                return step;
            }
        }
        magnitude *= 10;
    }
}

fn header(out: &mut String, width: f64, height: f64) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{f}"><rect width="100%" height="100%" fill="white"/>"#,
        w = width,
        h = height,
        f = FONT
    );
}

fn text(out: &mut String, x: f64, y: f64, size: u32, anchor: &str, extra: &str, body: &str) {
    let _ = write!(
        out,
        r#"<text x="{:.1}" y="{:.1}" font-size="{}" text-anchor="{}"{}>{}</text>"#,
        x,
        y,
        size,
        anchor,
        extra,
        escape(body)
    );
}

pub struct Series<'a> {
    pub label: String,
    pub color: &'a str,
    pub wins: &'a [u32],
}

/// Step plot of wins against games played, one line per series, with
/// x running from 1 to the length of the longest series.
pub fn step_plot(title: &str, series: &[Series]) -> String {
    let games = series.iter().map(|s| s.wins.len()).max().unwrap_or(0).max(1) as u32;
    let y_max = series.iter().flat_map(|s| s.wins.iter().copied()).max().unwrap_or(0) + 1;

    let (left, right, top, bottom) = (80.0, SIZE - 40.0, 70.0, SIZE - 80.0);
    let x_span = (games - 1).max(1) as f64;
    let sx = |g: f64| left + (g - 1.0) * (right - left) / x_span;
    let sy = |w: f64| bottom - w * (bottom - top) / y_max as f64;

    let mut out = String::new();
    header(&mut out, SIZE, SIZE);
    text(&mut out, SIZE / 2.0, 40.0, 18, "middle", "", title);

    // Grid and ticks
    let x_step = tick_step(games);
    let x_ticks = (1..=games).filter(|g| *g == 1 || g % x_step == 0);
    for g in x_ticks {
        let x = sx(g as f64);
        let _ = write!(out, r##"<line x1="{x:.1}" y1="{top}" x2="{x:.1}" y2="{bottom}" stroke="#b0b0b0" stroke-width="0.8"/>"##);
        text(&mut out, x, bottom + 20.0, 12, "middle", "", &g.to_string());
    }
    let y_step = tick_step(y_max);
    for w in (0..=y_max).step_by(y_step as usize) {
        let y = sy(w as f64);
        let _ = write!(out, r##"<line x1="{left}" y1="{y:.1}" x2="{right}" y2="{y:.1}" stroke="#b0b0b0" stroke-width="0.8"/>"##);
        text(&mut out, left - 8.0, y + 4.0, 12, "end", "", &w.to_string());
    }
    let _ = write!(
        out,
        r#"<rect x="{left}" y="{top}" width="{}" height="{}" fill="none" stroke="black"/>"#,
        right - left,
        bottom - top
    );
    text(&mut out, (left + right) / 2.0, SIZE - 30.0, 14, "middle", "", "Games Played");
    text(&mut out, 25.0, (top + bottom) / 2.0, 14, "middle", &format!(r#" transform="rotate(-90 25 {:.1})""#, (top + bottom) / 2.0), "Wins");

    // Lines: steps halfway between games, like matplotlib's where='mid'
    for s in series {
        if s.wins.is_empty() {
            continue;
        }
        let mut d = format!("M{:.1},{:.1}", sx(1.0), sy(s.wins[0] as f64));
        for (i, (a, b)) in s.wins.iter().tuple_windows().enumerate() {
            let mid = sx(i as f64 + 1.5);
            let _ = write!(d, " L{:.1},{:.1} L{:.1},{:.1}", mid, sy(*a as f64), mid, sy(*b as f64));
        }
        let _ = write!(d, " L{:.1},{:.1}", sx(s.wins.len() as f64), sy(*s.wins.last().unwrap_or(&0) as f64));
        let _ = write!(out, r#"<path d="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#, d, escape(s.color));
    }

    // Legend, upper left
    let _ = write!(
        out,
        r##"<rect x="{}" y="{}" width="220" height="{}" fill="white" stroke="#cccccc"/>"##,
        left + 10.0,
        top + 10.0,
        10.0 + 22.0 * series.len() as f64
    );
    for (i, s) in series.iter().enumerate() {
        let y = top + 30.0 + 22.0 * i as f64;
        let _ = write!(
            out,
            r#"<line x1="{}" y1="{y:.1}" x2="{}" y2="{y:.1}" stroke="{}" stroke-width="2"/>"#,
            left + 18.0,
            left + 43.0,
            escape(s.color)
        );
        text(&mut out, left + 50.0, y + 4.0, 13, "start", "", &s.label);
    }

    out.push_str("</svg>");
    out
}

/// A table with a header row filling the image under a title. The first
/// column is right-aligned, the others centered.
pub fn table(title: &str, headers: &[&str], rows: &[[String; 3]]) -> String {
    let width = SIZE.max(rows.len() as f64 * 50.0);
    let (left, right, top, bottom) = (20.0, width - 20.0, 70.0, SIZE - 20.0);
    let row_h = (bottom - top) / (rows.len() + 1) as f64;

    // Column widths follow the longest cell, roughly.
    let widths: Vec<f64> = (0..3)
        .map(|c| {
            rows.iter()
                .map(|r| r[c].chars().count())
                .chain(headers.get(c).map(|h| h.chars().count()))
                .max()
                .unwrap_or(1)
                .max(4) as f64
        })
        .collect();
    let total: f64 = widths.iter().sum();
    let mut col_x = vec![left];
    for w in &widths {
        let last = *col_x.last().unwrap_or(&left);
        col_x.push(last + w / total * (right - left));
    }

    let mut out = String::new();
    header(&mut out, width, SIZE);
    text(&mut out, width / 2.0, 45.0, 26, "middle", "", title);

    let cells = std::iter::once(headers.iter().map(|h| h.to_string()).collect::<Vec<_>>())
        .chain(rows.iter().map(|r| r.to_vec()));
    for (r, row) in cells.enumerate() {
        let y = top + r as f64 * row_h;
        for (c, cell) in row.iter().enumerate() {
            let (x0, x1) = (col_x[c], col_x[c + 1]);
            let _ = write!(
                out,
                r#"<rect x="{x0:.1}" y="{y:.1}" width="{:.1}" height="{row_h:.1}" fill="none" stroke="black"/>"#,
                x1 - x0
            );
            let (x, anchor) = if c == 0 && r > 0 { (x1 - 8.0, "end") } else { ((x0 + x1) / 2.0, "middle") };
            text(&mut out, x, y + row_h / 2.0 + 7.0, 20, anchor, "", cell);
        }
    }

    out.push_str("</svg>");
    out
}

/// Render an SVG document to PNG with `rsvg-convert`.
pub fn rasterize(svg: &str) -> Result<Vec<u8>, String> {
    let mut child = Command::new("rsvg-convert")
        .args(["--format", "png"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Cannot run rsvg-convert: {}", e))?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(svg.as_bytes())
            .map_err(|e| format!("Cannot feed rsvg-convert: {}", e))?;
    }
    let out = child
        .wait_with_output()
        .map_err(|e| format!("rsvg-convert failed: {}", e))?;
    if !out.status.success() {
        return Err(format!(
            "rsvg-convert failed ({}): {}",
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        ));
    }
    Ok(out.stdout)
}
