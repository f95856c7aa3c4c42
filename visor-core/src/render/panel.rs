//! Panel screen: a cancel/confirm bracket frame around a delegated panel
use super::{button, FrameInfo};
use crate::hit::{HitRegion, Rect, RegionAction};
use crate::panel::PanelHandle;
use crate::state::PanelSlot;
use crate::surface::Surface;
use crate::theme;

/// Bracket columns and the interior handed to the panel
pub(crate) fn frame_layout(width: i32, height: i32) -> (Rect, Rect, Rect) {
    let bracket_w = (width as f32 * theme::BRACKET_FRACTION).round() as i32;
    let cancel = Rect::new(0, 0, bracket_w, height);
    let confirm = Rect::new(width - bracket_w, 0, bracket_w, height);
    let interior = Rect::new(bracket_w, 0, width - bracket_w * 2, height);
    (cancel, confirm, interior)
}

pub(super) fn draw(surface: &mut Surface, slot: &PanelSlot, frame: &FrameInfo) -> Vec<HitRegion> {
    let (cancel_rect, confirm_rect, interior) =
        frame_layout(surface.width() as i32, surface.height() as i32);

    let cancel = RegionAction::Cancel;
    let confirm = RegionAction::Confirm;
    button(surface, cancel_rect, theme::CANCEL_FILL, "X", frame.flash(&cancel));
    button(surface, confirm_rect, theme::CONFIRM_FILL, "OK", frame.flash(&confirm));

    let mut regions = Vec::new();
    match &slot.panel {
        Some(panel) => {
            let handle = PanelHandle {
                area: interior,
                frame: frame.frame,
                now_ms: frame.now_ms,
            };
            panel.render(surface, &handle);
            // Panel overlays must see the tap before the frame does
            regions.extend(panel.hit_regions(&handle));
        }
        None => {
            surface.text_centered(interior, "No panel", theme::TEXT_SCALE, theme::DIM_TEXT);
        }
    }

    regions.push(HitRegion::new(cancel_rect, cancel));
    regions.push(HitRegion::new(confirm_rect, confirm));
    regions
}
