//! Plain-text renderers for the dashboard panels.

use std::fmt::Write;

use analysis_engine::Notification;
use risk_view::{ChartBar, FeedColumn, FeedView, GaugeView};

const GAUGE_CELLS: usize = 18;
const CHART_HALF_WIDTH: usize = 20;

pub fn header(analyzing: bool) -> String {
    let button = if analyzing {
        "[Analyzing...]"
    } else {
        "[+ Ingest Trade Stream]"
    };
    format!(
        "SettlementGuard v1.0  Intelligent Trade Failure Prediction   {}\n",
        button
    )
}

pub fn feed_table(view: &FeedView) -> String {
    let widths = [14usize, 10, 20, 7, 9];
    let mut out = String::new();

    out.push_str("   ");
    for (col, width) in FeedColumn::ALL.iter().zip(widths) {
        let _ = write!(out, "{:<width$} ", col.header(), width = width);
    }
    out.push('\n');

    if view.rows.is_empty() {
        out.push_str("   (no trades)\n");
        return out;
    }

    for row in &view.rows {
        let marker = match (row.selected, row.highlighted) {
            (true, true) => ">!",
            (true, false) => "> ",
            (false, true) => " !",
            (false, false) => "  ",
        };
        let _ = write!(out, "{} ", marker);
        for (col, width) in FeedColumn::ALL.iter().zip(widths) {
            let _ = write!(out, "{:<width$} ", truncate(row.cell(*col), width), width = width);
        }
        let _ = writeln!(out, "({})", row.tier.color_name());
    }
    out
}

pub fn gauge(view: &GaugeView) -> String {
    let filled = ((view.rotation_degrees / 180.0) * GAUGE_CELLS as f64).round() as usize;
    let filled = filled.min(GAUGE_CELLS);
    let mut out = String::from("Settlement Risk Score\n");
    let _ = writeln!(
        out,
        "  [{}{}] {:>5.1}°",
        "#".repeat(filled),
        "-".repeat(GAUGE_CELLS - filled),
        view.rotation_degrees
    );
    let _ = writeln!(out, "  {}  ({})", view.percent_text, view.tier.color_name());
    let _ = writeln!(out, "  <{}>", view.badge_text);
    out
}

pub fn action_panel(analyzing: bool) -> String {
    let button = if analyzing {
        "[Processing Match...]"
    } else {
        "[Auto-Correct SSI]"
    };
    format!(
        "Prescriptive Action\n  Correct Standing Settlement Instructions (SSI) to match Counterparty preferences.\n  {}\n",
        button
    )
}

/// Horizontal bars around a zero line: risk-increasing bars extend right
/// (`█`), risk-decreasing bars extend left (`░`).
pub fn attribution_chart(bars: &[ChartBar]) -> String {
    let mut out = String::from("Risk Drivers (SHAP)\n");
    if bars.is_empty() {
        out.push_str("  (no attribution data)\n");
        return out;
    }

    let max = bars.iter().map(|b| b.value.abs()).fold(0.0_f64, f64::max);
    for bar in bars {
        let cells = if max > 0.0 {
            ((bar.value.abs() / max) * CHART_HALF_WIDTH as f64).round() as usize
        } else {
            0
        };
        let (left, right) = if bar.value > 0.0 {
            (" ".repeat(CHART_HALF_WIDTH), "█".repeat(cells))
        } else {
            (
                format!("{}{}", " ".repeat(CHART_HALF_WIDTH - cells), "░".repeat(cells)),
                String::new(),
            )
        };
        let _ = writeln!(
            out,
            "  {:<22} {}|{:<width$} {:+.4}",
            truncate(&bar.label, 22),
            left,
            right,
            bar.value,
            width = CHART_HALF_WIDTH
        );
    }
    out.push_str("  Right bars increase risk. Left bars decrease risk.\n");
    out
}

pub fn notifications(items: &[Notification]) -> String {
    let mut out = String::new();
    for note in items {
        let _ = writeln!(
            out,
            "[{}] {:?}: {}",
            note.at.format("%H:%M:%S"),
            note.level,
            note.message
        );
    }
    out
}

fn truncate(raw: &str, width: usize) -> String {
    if raw.chars().count() <= width {
        return raw.to_string();
    }
    let mut cut: String = raw.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
