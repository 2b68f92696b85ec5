//! Bar charts of measurement counts.
//!
//! [`render_histogram`] writes a styled terminal chart; [`render_svg`]
//! produces a standalone SVG document. Both order bars by count descending,
//! then bitstring ascending.

use std::fmt::Write as _;
use std::io::{self, Write};

use console::style;
use kickback_hal::Counts;

/// Layout of the terminal histogram.
#[derive(Debug, Clone)]
pub struct HistogramOptions {
    /// Maximum number of bars; the rest are summarised in one line.
    pub max_rows: usize,
    /// Width in characters of the longest bar.
    pub bar_width: usize,
    /// Bars whose bitstring starts with this prefix are highlighted.
    pub highlight: Option<String>,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            max_rows: 16,
            bar_width: 40,
            highlight: None,
        }
    }
}

impl HistogramOptions {
    /// Highlight bitstrings starting with `prefix`.
    pub fn with_highlight(mut self, prefix: impl Into<String>) -> Self {
        self.highlight = Some(prefix.into());
        self
    }

    /// Cap the number of rows.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }
}

fn bar_len(count: u64, max: u64, width: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    let len = (count as f64 / max as f64 * width as f64).round() as usize;
    len.max(1)
}

/// Write a bar chart of `counts` to `out`.
pub fn render_histogram<W: Write>(
    counts: &Counts,
    out: &mut W,
    options: &HistogramOptions,
) -> io::Result<()> {
    if counts.is_empty() {
        return writeln!(out, "  (no outcomes)");
    }

    let sorted = counts.sorted();
    let total = counts.total_shots() as f64;
    let max = *sorted[0].1;
    let key_width = sorted.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    for &(bitstring, &count) in sorted.iter().take(options.max_rows) {
        let pct = count as f64 / total * 100.0;
        let bar = "█".repeat(bar_len(count, max, options.bar_width));
        let highlighted = options
            .highlight
            .as_deref()
            .is_some_and(|prefix| bitstring.starts_with(prefix));

        let label = format!("{bitstring:>key_width$}");
        let (label, bar) = if highlighted {
            (style(label).green().bold(), style(bar).green())
        } else {
            (style(label).cyan(), style(bar).blue())
        };
        writeln!(out, "  {label}: {count:>6} ({pct:>6.2}%) {bar}")?;
    }

    if sorted.len() > options.max_rows {
        writeln!(
            out,
            "  {}",
            style(format!(
                "... and {} more outcomes",
                sorted.len() - options.max_rows
            ))
            .dim()
        )?;
    }
    Ok(())
}

const SVG_MAX_BARS: usize = 64;
const SVG_BAR_WIDTH: usize = 36;
const SVG_GAP: usize = 12;
const SVG_PLOT_HEIGHT: usize = 240;
const SVG_MARGIN: usize = 48;

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render `counts` as a standalone SVG bar chart.
///
/// Bitstrings run along the x axis (rotated labels), counts up the y axis.
/// At most 64 bars are drawn.
pub fn render_svg(counts: &Counts, title: &str) -> String {
    let sorted = counts.sorted();
    let shown = &sorted[..sorted.len().min(SVG_MAX_BARS)];
    let max = shown.first().map_or(0, |&(_, &c)| c);
    let key_len = shown.iter().map(|(k, _)| k.len()).max().unwrap_or(1);

    let label_space = 8 * key_len + 16;
    let plot_width = shown.len().max(1) * (SVG_BAR_WIDTH + SVG_GAP);
    let width = plot_width + 2 * SVG_MARGIN;
    let height = SVG_PLOT_HEIGHT + 2 * SVG_MARGIN + label_space;
    let baseline = SVG_MARGIN + SVG_PLOT_HEIGHT;

    let mut svg = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="monospace" font-size="12">"#
    );
    let _ = writeln!(
        svg,
        r##"  <rect width="{width}" height="{height}" fill="#ffffff"/>"##
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" text-anchor="middle" font-size="16">{}</text>"#,
        width / 2,
        SVG_MARGIN / 2 + 6,
        escape_xml(title)
    );
    let _ = writeln!(
        svg,
        r##"  <line x1="{m}" y1="{baseline}" x2="{x2}" y2="{baseline}" stroke="#333333"/>"##,
        m = SVG_MARGIN,
        x2 = SVG_MARGIN + plot_width,
    );

    for (i, &(bitstring, &count)) in shown.iter().enumerate() {
        let bar_height = if max == 0 {
            0
        } else {
            (count as f64 / max as f64 * SVG_PLOT_HEIGHT as f64).round() as usize
        };
        let x = SVG_MARGIN + i * (SVG_BAR_WIDTH + SVG_GAP) + SVG_GAP / 2;
        let y = baseline - bar_height;
        let cx = x + SVG_BAR_WIDTH / 2;
        let key = escape_xml(bitstring);

        let _ = writeln!(
            svg,
            r##"  <rect x="{x}" y="{y}" width="{SVG_BAR_WIDTH}" height="{bar_height}" fill="#4c72b0"><title>{key}: {count}</title></rect>"##
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{cx}" y="{}" text-anchor="middle">{count}</text>"#,
            y.saturating_sub(4)
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{cx}" y="{}" text-anchor="end" transform="rotate(-60 {cx} {})">{key}</text>"#,
            baseline + 14,
            baseline + 14
        );
    }

    if sorted.len() > shown.len() {
        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="{}" text-anchor="end" font-style="italic">+{} more outcomes</text>"#,
            width - SVG_MARGIN,
            height - 8,
            sorted.len() - shown.len()
        );
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(counts: &Counts, options: &HistogramOptions) -> String {
        let mut out = Vec::new();
        render_histogram(counts, &mut out, options).unwrap();
        console::strip_ansi_codes(&String::from_utf8(out).unwrap()).into_owned()
    }

    #[test]
    fn test_single_outcome() {
        let counts = Counts::from_pairs([("1011", 100)]);
        let text = render(&counts, &HistogramOptions::default());

        assert!(text.contains("1011:    100 (100.00%)"));
        assert_eq!(text.matches('█').count(), 40);
    }

    #[test]
    fn test_rows_sorted_by_count_then_bitstring() {
        let counts = Counts::from_pairs([("01", 10), ("11", 30), ("00", 10)]);
        let text = render(&counts, &HistogramOptions::default());
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("11:"));
        assert!(lines[1].contains("00:"));
        assert!(lines[2].contains("01:"));
    }

    #[test]
    fn test_row_cap_summarises_rest() {
        let counts: Counts = (0..20u64).map(|i| (format!("{i:05b}"), i + 1)).collect();
        let text = render(&counts, &HistogramOptions::default().with_max_rows(5));

        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("... and 15 more outcomes"));
    }

    #[test]
    fn test_small_counts_still_get_a_bar() {
        let counts = Counts::from_pairs([("0", 10_000), ("1", 1)]);
        let text = render(&counts, &HistogramOptions::default());
        let last = text.lines().last().unwrap();
        assert!(last.ends_with('█'));
    }

    #[test]
    fn test_empty_counts() {
        let text = render(&Counts::new(), &HistogramOptions::default());
        assert_eq!(text.trim(), "(no outcomes)");
    }

    #[test]
    fn test_svg_structure() {
        let counts = Counts::from_pairs([("1011", 90), ("0011", 10)]);
        let svg = render_svg(&counts, "secret <101>");

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("secret &lt;101&gt;"));
        assert_eq!(svg.matches("fill=\"#4c72b0\"").count(), 2);
        assert!(svg.contains("<title>1011: 90</title>"));
        // Tallest bar spans the full plot height.
        assert!(svg.contains(&format!("height=\"{SVG_PLOT_HEIGHT}\" fill")));
    }

    #[test]
    fn test_svg_caps_bars() {
        let counts: Counts = (0..100u64).map(|i| (format!("{i:07b}"), 1)).collect();
        let svg = render_svg(&counts, "uniform");
        assert_eq!(svg.matches("fill=\"#4c72b0\"").count(), SVG_MAX_BARS);
        assert!(svg.contains("+36 more outcomes"));
    }
}
