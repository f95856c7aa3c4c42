use super::FrameInfo;
use crate::hit::{HitRegion, Rect, RegionAction};
use crate::state::IdleData;
use crate::surface::{lerp_colour, Surface};
use crate::theme;

const MENU_SIZE: i32 = 48;
const PULSE_SPEED: f32 = 0.08;
const PULSE_DEPTH: f32 = 0.12;

pub(super) fn draw(surface: &mut Surface, data: &IdleData, frame: &FrameInfo) -> Vec<HitRegion> {
    let w = surface.width() as i32;
    let h = surface.height() as i32;

    let prompt = Rect::new(0, theme::MARGIN, w, h / 4);
    surface.text_wrapped(prompt, &data.prompt, theme::TEXT_SCALE, theme::FOREGROUND);

    // Pulsing affordance; the region covers the largest the circle gets
    let base = (h.min(w) as f32) * 0.22;
    let pulse = 1.0 + PULSE_DEPTH * (frame.frame as f32 * PULSE_SPEED).sin();
    let (cx, cy) = (w as f32 / 2.0, h as f32 * 0.6);
    let start = RegionAction::Start;
    let swell = (pulse - 1.0 + PULSE_DEPTH) / (2.0 * PULSE_DEPTH);
    let glow = lerp_colour(theme::ACCENT_SOFT, theme::ACCENT, swell);
    let fill = lerp_colour(glow, 0xFF_FF_FF_FF, frame.flash(&start));
    surface.fill_circle(cx, cy, base * pulse, fill);
    surface.ring(cx, cy, base * pulse, 3.0, theme::ACCENT);
    let reach = (base * (1.0 + PULSE_DEPTH)).ceil() as i32;
    let start_rect = Rect::new(cx as i32 - reach, cy as i32 - reach, reach * 2, reach * 2);

    // Menu toggle, top-right, always present
    let menu = RegionAction::MenuToggle;
    let menu_rect = Rect::new(
        w - MENU_SIZE - theme::MARGIN,
        theme::MARGIN,
        MENU_SIZE,
        MENU_SIZE,
    );
    surface.fill_rect(
        menu_rect,
        lerp_colour(theme::BUTTON_FILL, 0xFF_FF_FF_FF, frame.flash(&menu)),
    );
    let bar = menu_rect.inset(MENU_SIZE / 4);
    for i in 0..3 {
        surface.fill_rect(
            Rect::new(bar.x, bar.y + i * bar.h / 2 - 1, bar.w, 3),
            theme::FOREGROUND,
        );
    }

    // Menu wins where the two overlap
    vec![
        HitRegion::new(menu_rect, menu),
        HitRegion::new(start_rect, start),
    ]
}
