//! Proportional bar visualization of relative performance.

use crate::report::table::display_width;
use crate::report::RankedEntry;

/// Glyph for one bar unit
pub const BAR_GLYPH: char = '█';

/// A bar of `round(ratio / unit)` glyphs; empty for a non-positive unit.
pub fn bar(ratio: f64, unit: f64) -> String {
    if unit.is_nan() || unit <= 0.0 || !ratio.is_finite() || ratio <= 0.0 {
        return String::new();
    }
    let glyphs = (ratio / unit).round() as usize;
    std::iter::repeat(BAR_GLYPH).take(glyphs).collect()
}

/// One line per ranked entry: padded name, bar, ratio.
pub fn render_bars(ranking: &[RankedEntry<'_>], unit: f64) -> Vec<String> {
    let name_width = ranking
        .iter()
        .map(|entry| display_width(&entry.stats.name))
        .max()
        .unwrap_or(0);

    ranking
        .iter()
        .map(|entry| {
            let name = &entry.stats.name;
            let fill = " ".repeat(name_width - display_width(name));
            format!(
                "  {name}{fill} {} {:.1}%",
                bar(entry.ratio, unit),
                entry.ratio
            )
        })
        .collect()
}
