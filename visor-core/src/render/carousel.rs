//! Carousel: split brackets either side and a variant control between them
use super::{button, FrameInfo};
use crate::hit::{HitRegion, Rect, RegionAction, Side};
use crate::state::{CarouselData, CarouselItem, VariantKind};
use crate::surface::{lerp_colour, sample_stops, text_width, Surface, GLYPH_SIZE};
use crate::theme;

const SLIDER_HEIGHT: i32 = 16;
const SLIDER_TOUCH_PAD: i32 = 12;
const PILL_HEIGHT: i32 = 36;
const PILL_GAP: i32 = 8;
const PHASE_HEIGHT: i32 = 10;
const KNOB_RADIUS: f32 = 11.0;

/// Fixed geometry of the carousel screen for a surface size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselLayout {
    pub left: Rect,
    pub right: Rect,
    pub title: Rect,
    /// Gradient slider track, or the pill row
    pub control: Rect,
    /// Secondary slider track under the pills
    pub phase: Rect,
    pub caption: Rect,
}

impl CarouselLayout {
    pub fn new(width: i32, height: i32) -> Self {
        let bracket_w = (width as f32 * theme::BRACKET_FRACTION).round() as i32;
        let center_x = bracket_w;
        let center_w = width - bracket_w * 2;
        let inner_x = center_x + theme::MARGIN * 2;
        let inner_w = center_w - theme::MARGIN * 4;
        let title_h = GLYPH_SIZE * theme::TEXT_SCALE + theme::MARGIN * 2;
        let control_y = (height as f32 * 0.4).round() as i32;

        Self {
            left: Rect::new(0, 0, bracket_w, height),
            right: Rect::new(width - bracket_w, 0, bracket_w, height),
            title: Rect::new(center_x, theme::MARGIN, center_w, title_h),
            control: Rect::new(inner_x, control_y, inner_w, PILL_HEIGHT),
            phase: Rect::new(
                inner_x,
                (height as f32 * 0.7).round() as i32,
                inner_w,
                PHASE_HEIGHT,
            ),
            caption: Rect::new(
                center_x,
                height - title_h - theme::MARGIN,
                center_w,
                title_h,
            ),
        }
    }

    /// The gradient track sits centered in the control row
    pub fn slider(&self) -> Rect {
        Rect::new(
            self.control.x,
            self.control.y + (self.control.h - SLIDER_HEIGHT) / 2,
            self.control.w,
            SLIDER_HEIGHT,
        )
    }

    fn pills(&self, count: usize) -> Vec<Rect> {
        if count == 0 {
            return Vec::new();
        }
        let n = count as i32;
        let w = ((self.control.w - PILL_GAP * (n - 1)) / n).max(1);
        (0..n)
            .map(|i| {
                Rect::new(
                    self.control.x + i * (w + PILL_GAP),
                    self.control.y,
                    w,
                    self.control.h,
                )
            })
            .collect()
    }
}

/// Knob center for variant `index` of `count` on `slider`
pub fn knob_x(slider: Rect, index: usize, count: usize) -> f32 {
    if count <= 1 {
        return slider.x as f32;
    }
    let t = index.min(count - 1) as f32 / (count - 1) as f32;
    slider.x as f32 + t * slider.w as f32
}

pub(super) fn draw(
    surface: &mut Surface,
    data: &CarouselData,
    frame: &FrameInfo,
) -> Vec<HitRegion> {
    let layout = CarouselLayout::new(surface.width() as i32, surface.height() as i32);
    let mut regions = Vec::with_capacity(8);

    regions.extend(bracket(surface, layout.left, Side::Left, frame));
    regions.extend(bracket(surface, layout.right, Side::Right, frame));

    let Some(item) = data.current_item() else {
        surface.text_centered(
            layout.title,
            "Nothing here",
            theme::TEXT_SCALE,
            theme::DIM_TEXT,
        );
        return regions;
    };

    let title = format!("{} {}/{}", item.name, data.current_index + 1, data.items.len());
    surface.text_centered(layout.title, &title, theme::TEXT_SCALE, theme::FOREGROUND);
    if let Some(variant) = item.variants.get(data.current_variant_index) {
        surface.text_centered(layout.caption, variant, theme::TEXT_SCALE, theme::DIM_TEXT);
    }

    // Exactly one variant control per frame, picked by the item's kind
    match &item.kind {
        VariantKind::Gradient { stops } => {
            regions.push(gradient_slider(surface, &layout, item, data, stops));
        }
        VariantKind::Pills => {
            regions.extend(pill_row(surface, &layout, item, data, frame));
        }
        VariantKind::PillsWithPhase => {
            regions.extend(pill_row(surface, &layout, item, data, frame));
            regions.push(phase_slider(surface, &layout, data));
        }
    }

    regions
}

/// Action third on top, navigation two-thirds below
fn bracket(surface: &mut Surface, rect: Rect, side: Side, frame: &FrameInfo) -> [HitRegion; 2] {
    let (action_rect, nav_rect) = rect.split_top(1.0 / 3.0);
    let (action, nav, label, arrow, fill) = match side {
        Side::Left => (
            RegionAction::CarouselAction(Side::Left),
            RegionAction::CarouselNav(-1),
            "Close",
            "<",
            theme::CANCEL_FILL,
        ),
        Side::Right => (
            RegionAction::CarouselAction(Side::Right),
            RegionAction::CarouselNav(1),
            "Use",
            ">",
            theme::CONFIRM_FILL,
        ),
    };

    let action_flash = frame.flash(&action);
    let nav_flash = frame.flash(&nav);

    surface.fill_rect(action_rect, lerp_colour(fill, 0xFF_FF_FF_FF, action_flash));
    surface.stroke_rect(action_rect, 1, theme::BUTTON_EDGE);
    surface.text_centered(action_rect, label, 1, theme::FOREGROUND);
    button(surface, nav_rect, theme::BUTTON_FILL, "", nav_flash);
    surface.text_centered(nav_rect, arrow, theme::LARGE_TEXT_SCALE / 2, theme::FOREGROUND);

    [HitRegion::new(action_rect, action), HitRegion::new(nav_rect, nav)]
}

fn gradient_slider(
    surface: &mut Surface,
    layout: &CarouselLayout,
    item: &CarouselItem,
    data: &CarouselData,
    stops: &[u32],
) -> HitRegion {
    let slider = layout.slider();
    surface.gradient_rect(slider, stops);
    surface.stroke_rect(slider, 1, theme::BUTTON_EDGE);

    let count = item.variants.len();
    let x = knob_x(slider, data.current_variant_index, count);
    let y = slider.y as f32 + slider.h as f32 / 2.0;
    let t = if slider.w > 0 {
        (x - slider.x as f32) / slider.w as f32
    } else {
        0.0
    };
    surface.fill_circle(x, y, KNOB_RADIUS + 2.0, theme::KNOB_EDGE);
    surface.fill_circle(x, y, KNOB_RADIUS, theme::KNOB);
    surface.fill_circle(x, y, KNOB_RADIUS - 4.0, sample_stops(stops, t));

    HitRegion::new(
        Rect::new(
            slider.x,
            slider.y - SLIDER_TOUCH_PAD,
            slider.w,
            slider.h + SLIDER_TOUCH_PAD * 2,
        ),
        RegionAction::VariantSlider { count },
    )
}

fn pill_row(
    surface: &mut Surface,
    layout: &CarouselLayout,
    item: &CarouselItem,
    data: &CarouselData,
    frame: &FrameInfo,
) -> Vec<HitRegion> {
    let mut regions = Vec::with_capacity(item.variants.len());
    for (i, (rect, label)) in layout
        .pills(item.variants.len())
        .into_iter()
        .zip(&item.variants)
        .enumerate()
    {
        let fill = if i == data.current_variant_index {
            theme::PILL_SELECTED
        } else {
            theme::PILL_IDLE
        };
        let action = RegionAction::Variant(i);
        surface.fill_rect(rect, lerp_colour(fill, 0xFF_FF_FF_FF, frame.flash(&action)));
        surface.stroke_rect(rect, 1, theme::BUTTON_EDGE);
        // Pills can be narrow; fall back to the first letter
        let text = if text_width(label, 1) <= rect.w - 4 {
            label.clone()
        } else {
            label.chars().take(1).collect()
        };
        surface.text_centered(rect, &text, 1, theme::FOREGROUND);
        regions.push(HitRegion::new(rect, action));
    }
    regions
}

fn phase_slider(surface: &mut Surface, layout: &CarouselLayout, data: &CarouselData) -> HitRegion {
    let track = layout.phase;
    surface.fill_rect(track, theme::ACCENT_SOFT);
    let x = track.x as f32 + data.extra_scalar.clamp(0.0, 1.0) * track.w as f32;
    surface.fill_rect(
        Rect::new(track.x, track.y, (x - track.x as f32).round() as i32, track.h),
        theme::ACCENT,
    );
    let y = track.y as f32 + track.h as f32 / 2.0;
    surface.fill_circle(x, y, KNOB_RADIUS - 3.0, theme::KNOB);

    HitRegion::new(
        Rect::new(
            track.x,
            track.y - SLIDER_TOUCH_PAD,
            track.w,
            track.h + SLIDER_TOUCH_PAD * 2,
        ),
        RegionAction::PhaseSlider,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knob_position() {
        let slider = Rect::new(100, 50, 250, 16);
        assert_eq!(knob_x(slider, 3, 6), 100.0 + (3.0 / 5.0) * 250.0);
        assert_eq!(knob_x(slider, 0, 6), 100.0);
        assert_eq!(knob_x(slider, 5, 6), 350.0);
        assert_eq!(knob_x(slider, 9, 6), 350.0);
        assert_eq!(knob_x(slider, 0, 1), 100.0);
    }

    #[test]
    fn test_layout_is_symmetric() {
        let layout = CarouselLayout::new(480, 320);
        assert_eq!(layout.left.w, layout.right.w);
        assert_eq!(layout.right.right(), 480);
        assert!(layout.control.x > layout.left.right());
        assert!(layout.control.right() < layout.right.x);
        assert_eq!(layout.pills(4).len(), 4);
        assert!(layout.pills(4)[3].right() <= layout.control.right());
    }
}
