//! SVG line chart of a latency time series.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::Result;

const WIDTH: f64 = 800.;
const HEIGHT: f64 = 400.;
const MARGIN_LEFT: f64 = 80.;
const MARGIN_RIGHT: f64 = 20.;
const MARGIN_TOP: f64 = 40.;
const MARGIN_BOTTOM: f64 = 50.;
const TICKS: usize = 5;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders `samples` (seconds, in iteration order) with the iteration index on
/// the x axis and the latency on the y axis.
pub fn write_svg<W: Write>(w: &mut W, samples: &[f64], title: &str) -> std::io::Result<()> {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let last = samples.len().saturating_sub(1).max(1) as f64;
    let lo = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, span) = if !lo.is_finite() {
        (0., 1.)
    } else if hi > lo {
        (lo, hi - lo)
    } else {
        (lo, lo.abs().max(1e-9))
    };
    let x = |i: f64| MARGIN_LEFT + i / last * plot_w;
    let y = |v: f64| MARGIN_TOP + (1. - (v - lo) / span) * plot_h;

    writeln!(
        w,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="11">"#
    )?;
    writeln!(w, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        w,
        r#"<text x="{}" y="24" text-anchor="middle" font-size="14">{}</text>"#,
        WIDTH / 2.,
        escape(title)
    )?;

    let (x0, x1) = (MARGIN_LEFT, MARGIN_LEFT + plot_w);
    let (y0, y1) = (MARGIN_TOP, MARGIN_TOP + plot_h);
    writeln!(
        w,
        r#"<path d="M{x0},{y0} L{x0},{y1} L{x1},{y1}" fill="none" stroke="black"/>"#
    )?;
    for t in 0..TICKS {
        let frac = t as f64 / (TICKS - 1) as f64;
        let iteration = (frac * last).round();
        let tx = x(iteration);
        writeln!(
            w,
            r#"<text x="{tx:.2}" y="{}" text-anchor="middle">{iteration}</text>"#,
            y1 + 16.
        )?;
        let value = lo + frac * span;
        let ty = y(value);
        writeln!(
            w,
            r#"<text x="{}" y="{ty:.2}" text-anchor="end" dominant-baseline="middle">{value:.3e}</text>"#,
            x0 - 6.
        )?;
    }
    writeln!(
        w,
        r#"<text x="{}" y="{}" text-anchor="middle">Iteration</text>"#,
        x0 + plot_w / 2.,
        HEIGHT - 10.
    )?;
    writeln!(
        w,
        r#"<text x="16" y="{0}" text-anchor="middle" transform="rotate(-90 16 {0})">Time (s)</text>"#,
        y0 + plot_h / 2.
    )?;

    write!(
        w,
        r#"<polyline fill="none" stroke="steelblue" stroke-width="0.7" points=""#
    )?;
    for (i, &v) in samples.iter().enumerate() {
        write!(w, "{:.2},{:.2} ", x(i as f64), y(v))?;
    }
    writeln!(w, r#""/>"#)?;
    writeln!(w, "</svg>")?;
    Ok(())
}

pub fn save_svg(samples: &[f64], title: &str, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_svg(&mut writer, samples, title)?;
    writer.flush()?;
    Ok(())
}
