//! Calibration screen: a high-contrast target for lining up the physical
//! display with the calibrated rectangle
use super::FrameInfo;
use crate::calibration::CalibrationEdge;
use crate::hit::{HitRegion, Rect};
use crate::state::CalibrationData;
use crate::surface::{Surface, GLYPH_SIZE};
use crate::theme;

const GRID_STEP: i32 = 40;
const MARKER: i32 = 24;

pub(super) fn draw(
    surface: &mut Surface,
    data: &CalibrationData,
    frame: &FrameInfo,
) -> Vec<HitRegion> {
    let w = surface.width() as i32;
    let h = surface.height() as i32;
    surface.clear(theme::GRID_BACKGROUND);

    for x in (0..w).step_by(GRID_STEP as usize) {
        surface.fill_rect(Rect::new(x, 0, 1, h), theme::GRID_LINE);
    }
    for y in (0..h).step_by(GRID_STEP as usize) {
        surface.fill_rect(Rect::new(0, y, w, 1), theme::GRID_LINE);
    }
    surface.stroke_rect(surface.bounds(), 2, theme::GRID_LINE);

    // Corner squares show where the surface edges actually land
    for (x, y) in [(0, 0), (w - MARKER, 0), (0, h - MARKER), (w - MARKER, h - MARKER)] {
        surface.fill_rect(Rect::new(x, y, MARKER, MARKER), theme::MARKER_CORNER);
    }
    let (cx, cy) = (w / 2, h / 2);
    surface.fill_rect(Rect::new(cx - MARKER, cy - 1, MARKER * 2, 3), theme::MARKER_CENTER);
    surface.fill_rect(Rect::new(cx - 1, cy - MARKER, 3, MARKER * 2), theme::MARKER_CENTER);

    let line_h = GLYPH_SIZE * theme::TEXT_SCALE + 4;
    let block = Rect::new(
        MARKER + theme::MARGIN,
        MARKER + theme::MARGIN,
        w / 2 - MARKER,
        line_h * 4,
    );
    surface.fill_rect(block.inset(-4), theme::GRID_BACKGROUND);
    for (i, edge) in CalibrationEdge::ALL.into_iter().enumerate() {
        let text = format!(
            "{} {}={:.4}",
            i + 1,
            edge.label(),
            frame.calibration.get(edge)
        );
        let y = block.y + i as i32 * line_h;
        let colour = if edge == data.selected {
            surface.stroke_rect(
                Rect::new(block.x - 3, y - 2, block.w, line_h),
                1,
                theme::SELECTED_EDGE,
            );
            theme::SELECTED_EDGE
        } else {
            theme::FOREGROUND
        };
        surface.text(block.x, y, &text, theme::TEXT_SCALE, colour);
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::SurfaceCalibration;

    #[test]
    fn test_no_regions_and_markers_drawn() {
        let calibration = SurfaceCalibration::full();
        let frame = FrameInfo {
            frame: 0,
            now_ms: 0,
            feedback: None,
            calibration: &calibration,
        };
        let mut surface = Surface::new(480, 320);
        let regions = draw(&mut surface, &CalibrationData::default(), &frame);
        assert!(regions.is_empty());
        assert_eq!(surface.pixel(479, 319), Some(theme::MARKER_CORNER));
        assert_eq!(surface.pixel(240, 240 - 80), Some(theme::MARKER_CENTER));
    }
}
