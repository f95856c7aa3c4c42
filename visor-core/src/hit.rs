//! Hit regions and the first-match dispatcher
use std::fmt;

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open: the right and bottom edges belong to the neighbour
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x as f32
            && x < (self.x + self.w) as f32
            && y >= self.y as f32
            && y < (self.y + self.h) as f32
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Shrink by `by` pixels on every side
    pub fn inset(&self, by: i32) -> Rect {
        Rect::new(
            self.x + by,
            self.y + by,
            (self.w - 2 * by).max(0),
            (self.h - 2 * by).max(0),
        )
    }

    /// Split vertically at `fraction` of the height into (top, bottom)
    pub fn split_top(&self, fraction: f32) -> (Rect, Rect) {
        let top = (self.h as f32 * fraction).round() as i32;
        (
            Rect::new(self.x, self.y, self.w, top),
            Rect::new(self.x, self.y + top, self.w, self.h - top),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Previous,
    PlayPause,
    Next,
}

/// What activating a region means. The region's name is derived from
/// the variant, so the tag and the payload cannot disagree.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionAction {
    Start,
    MenuToggle,
    Cancel,
    Confirm,
    /// Action third of a carousel bracket
    CarouselAction(Side),
    /// Navigation two-thirds of a carousel bracket; -1 or +1
    CarouselNav(i32),
    /// One pill in a pill row
    Variant(usize),
    /// Continuous slider over `count` variants
    VariantSlider { count: usize },
    /// Secondary 0..1 slider
    PhaseSlider,
    Transport(Transport),
    /// Anything a panel emits
    Panel { name: String, value: Option<f32> },
}

impl RegionAction {
    pub fn name(&self) -> &str {
        match self {
            RegionAction::Start => "start",
            RegionAction::MenuToggle => "menu",
            RegionAction::Cancel => "cancel",
            RegionAction::Confirm => "confirm",
            RegionAction::CarouselAction(_) => "carousel_action",
            RegionAction::CarouselNav(_) => "carousel_nav",
            RegionAction::Variant(_) => "variant",
            RegionAction::VariantSlider { .. } => "variant_slider",
            RegionAction::PhaseSlider => "phase_slider",
            RegionAction::Transport(Transport::Previous) => "prev",
            RegionAction::Transport(Transport::PlayPause) => "play_pause",
            RegionAction::Transport(Transport::Next) => "next",
            RegionAction::Panel { name, .. } => name,
        }
    }

    /// Key for press feedback. Unlike `name`, it tells apart controls that
    /// share a name, such as the two halves of each carousel bracket.
    pub fn feedback_key(&self) -> String {
        match self {
            RegionAction::CarouselAction(Side::Left) => "carousel_action_left".to_string(),
            RegionAction::CarouselAction(Side::Right) => "carousel_action_right".to_string(),
            RegionAction::CarouselNav(step) if *step < 0 => "carousel_nav_prev".to_string(),
            RegionAction::CarouselNav(_) => "carousel_nav_next".to_string(),
            RegionAction::Variant(index) => format!("variant_{}", index),
            other => other.name().to_string(),
        }
    }
}

/// A named rectangle for one interactive control of the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub rect: Rect,
    pub action: RegionAction,
}

impl HitRegion {
    pub fn new(rect: Rect, action: RegionAction) -> Self {
        Self { rect, action }
    }

    pub fn name(&self) -> &str {
        self.action.name()
    }

    /// Horizontal position of `x` across the region, in [0, 1]
    pub fn fraction_x(&self, x: f32) -> f32 {
        if self.rect.w <= 0 {
            return 0.0;
        }
        ((x - self.rect.x as f32) / self.rect.w as f32).clamp(0.0, 1.0)
    }
}

impl fmt::Display for HitRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.rect;
        write!(f, "{} [{},{} {}x{}]", self.name(), r.x, r.y, r.w, r.h)
    }
}

/// First region in list order that contains the point.
///
/// Order is the renderer's business: an overlay listed before the
/// controls beneath it intercepts their clicks.
pub fn dispatch(x: f32, y: f32, regions: &[HitRegion]) -> Option<&HitRegion> {
    regions.iter().find(|region| region.rect.contains(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let regions = vec![
            HitRegion::new(Rect::new(0, 0, 100, 100), RegionAction::Cancel),
            HitRegion::new(Rect::new(50, 50, 100, 100), RegionAction::Confirm),
        ];
        assert_eq!(dispatch(75.0, 75.0, &regions).unwrap().name(), "cancel");
        assert_eq!(dispatch(120.0, 120.0, &regions).unwrap().name(), "confirm");
    }

    #[test]
    fn test_overlay_listed_first_intercepts() {
        let tooltip = HitRegion::new(
            Rect::new(0, 0, 480, 320),
            RegionAction::Panel {
                name: "tooltip_dismiss".into(),
                value: None,
            },
        );
        let control = HitRegion::new(Rect::new(10, 10, 40, 40), RegionAction::Variant(2));
        let regions = vec![tooltip, control];
        assert_eq!(dispatch(20.0, 20.0, &regions).unwrap().name(), "tooltip_dismiss");
    }

    #[test]
    fn test_no_region_yields_none() {
        let regions = vec![HitRegion::new(Rect::new(0, 0, 10, 10), RegionAction::Start)];
        assert!(dispatch(10.0, 5.0, &regions).is_none());
        assert!(dispatch(-0.5, 5.0, &regions).is_none());
        assert!(dispatch(5.0, 5.0, &[]).is_none());
    }

    #[test]
    fn test_fraction_x() {
        let slider = HitRegion::new(
            Rect::new(100, 0, 200, 20),
            RegionAction::VariantSlider { count: 6 },
        );
        assert_eq!(slider.fraction_x(100.0), 0.0);
        assert_eq!(slider.fraction_x(200.0), 0.5);
        assert_eq!(slider.fraction_x(999.0), 1.0);
        assert_eq!(slider.to_string(), "variant_slider [100,0 200x20]");
    }

    #[test]
    fn test_feedback_keys_tell_brackets_apart() {
        let actions = [
            RegionAction::CarouselAction(Side::Left),
            RegionAction::CarouselAction(Side::Right),
            RegionAction::CarouselNav(-1),
            RegionAction::CarouselNav(1),
            RegionAction::Variant(0),
            RegionAction::Variant(1),
        ];
        for (i, a) in actions.iter().enumerate() {
            for b in &actions[i + 1..] {
                assert_ne!(a.feedback_key(), b.feedback_key());
            }
        }
        assert_eq!(RegionAction::Cancel.feedback_key(), "cancel");
    }

    #[test]
    fn test_split_top() {
        let (top, bottom) = Rect::new(0, 30, 60, 90).split_top(1.0 / 3.0);
        assert_eq!(top, Rect::new(0, 30, 60, 30));
        assert_eq!(bottom, Rect::new(0, 60, 60, 60));
    }
}
