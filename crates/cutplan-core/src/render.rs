//! SVG bar diagrams for a finished plan.

use crate::types::CuttingPlan;
use std::fmt::{self, Write};

const MARGIN: f64 = 20.0;
const BAR_WIDTH: f64 = 800.0;
const BAR_HEIGHT: f64 = 28.0;
const BAR_SPACING: f64 = 26.0;
const FOOTER: f64 = 30.0;

/// Draws one horizontal bar per pattern, scaled to a fixed width.
///
/// Pieces are green segments labelled with their length, kerf gaps are
/// left blank and the leftover is grey.
pub fn render_svg(plan: &CuttingPlan) -> Result<String, fmt::Error> {
    let mut svg = String::new();
    write_svg(&mut svg, plan)?;
    Ok(svg)
}

fn write_svg(svg: &mut String, plan: &CuttingPlan) -> fmt::Result {
    let scale = if plan.stock_length > 0.0 {
        BAR_WIDTH / plan.stock_length
    } else {
        0.0
    };

    let svg_width = BAR_WIDTH + 2.0 * MARGIN;
    let svg_height =
        2.0 * MARGIN + plan.patterns.len() as f64 * (BAR_HEIGHT + BAR_SPACING) + FOOTER;

    writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        svg_width, svg_height, svg_width, svg_height
    )?;
    writeln!(svg, r##"  <rect width="100%" height="100%" fill="#f5f5f5"/>"##)?;

    let mut y = MARGIN + BAR_SPACING;
    for pattern in &plan.patterns {
        writeln!(
            svg,
            r##"  <text x="{}" y="{}" font-family="Arial" font-size="12" fill="#333">#{} {} ({:.1}%)</text>"##,
            MARGIN,
            y - 6.0,
            pattern.pattern_id,
            escape(&pattern.pattern_string),
            pattern.yield_percentage
        )?;
        writeln!(
            svg,
            r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#ffffff" stroke="#333" stroke-width="1"/>"##,
            MARGIN, y, BAR_WIDTH, BAR_HEIGHT
        )?;

        let mut x = MARGIN;
        for (i, length) in pattern.pieces.iter().enumerate() {
            if i > 0 {
                x += plan.kerf * scale;
            }
            let w = length * scale;
            writeln!(
                svg,
                r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#4CAF50" stroke="#2E7D32" stroke-width="1" opacity="0.8"/>"##,
                x, y, w, BAR_HEIGHT
            )?;
            writeln!(
                svg,
                r##"  <text x="{}" y="{}" font-family="Arial" font-size="10" fill="#fff" text-anchor="middle">{}</text>"##,
                x + w / 2.0,
                y + BAR_HEIGHT / 2.0 + 3.0,
                length
            )?;
            x += w;
        }

        if pattern.leftover > 0.0 {
            writeln!(
                svg,
                r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#bdbdbd" opacity="0.6"/>"##,
                MARGIN + BAR_WIDTH - pattern.leftover * scale,
                y,
                pattern.leftover * scale,
                BAR_HEIGHT
            )?;
        }

        y += BAR_HEIGHT + BAR_SPACING;
    }

    writeln!(
        svg,
        r##"  <text x="{}" y="{}" font-family="Arial" font-size="12" fill="#666">Bars: {} | Yield: {:.1}% | Scrap: {:.1}% ({}mm)</text>"##,
        MARGIN,
        y,
        plan.summary.total_bars,
        plan.summary.total_yield_percentage,
        plan.summary.total_scrap_percentage,
        plan.summary.total_scrap_length
    )?;
    writeln!(svg, "</svg>")?;

    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
