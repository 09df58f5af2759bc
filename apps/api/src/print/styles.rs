//! Embedded stylesheet for the practice sheet, sized from the grid tier.

use crate::models::PrintLayoutConfig;

/// Glyph height relative to the cell edge.
const GLYPH_SCALE: f32 = 0.72;

pub fn stylesheet(layout: &PrintLayoutConfig) -> String {
    let cell = layout.grid_size.cell_px();
    let glyph = (cell as f32 * GLYPH_SCALE).round() as u32;

    format!(
        r#"@page {{ size: A4; margin: 12mm; }}
* {{ box-sizing: border-box; }}
body {{ margin: 0; font-family: "KaiTi", "STKaiti", "Kaiti SC", serif; color: #222; }}
.sheet-header {{ display: flex; justify-content: space-between; align-items: center; margin-bottom: 12px; }}
.sheet-title {{ font-size: 24px; margin: 0; letter-spacing: 4px; }}
.ornaments {{ display: flex; gap: 8px; font-size: 24px; }}
.sheet-date {{ font-size: 14px; color: #555; }}
.char-block {{ display: flex; gap: 4px; margin-bottom: 10px; break-inside: avoid; page-break-inside: avoid; }}
.practice-rows {{ display: flex; flex-direction: column; gap: 4px; }}
.practice-row {{ display: flex; }}
.cell {{ position: relative; width: {cell}px; height: {cell}px; }}
.cell svg {{ position: absolute; inset: 0; width: 100%; height: 100%; }}
.grid-border {{ fill: none; stroke: #c0392b; stroke-width: 1.5; }}
.grid-guide {{ stroke: #e6a29b; stroke-width: 0.8; stroke-dasharray: 4 3; }}
.glyph {{ position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; font-size: {glyph}px; line-height: 1; }}
@media print {{ .sheet-header {{ -webkit-print-color-adjust: exact; print-color-adjust: exact; }} }}
"#
    )
}
