//! Panels: content the panel screen delegates to
use crate::hit::{HitRegion, Rect, RegionAction};
use crate::surface::{Surface, GLYPH_SIZE};
use crate::theme;

/// What a panel gets to know about the frame it draws into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelHandle {
    /// The area between the cancel/confirm brackets
    pub area: Rect,
    pub frame: u64,
    pub now_ms: u64,
}

/// A panel draws itself inside `handle.area` and reports its regions for
/// the same handle. Both calls see the same handle each frame, so a panel
/// can derive drawing and hit geometry from one layout function.
pub trait Panel {
    fn id(&self) -> &str;
    fn render(&self, surface: &mut Surface, handle: &PanelHandle);
    fn hit_regions(&self, handle: &PanelHandle) -> Vec<HitRegion>;
}

/// A titled row of options with an optional hint bubble.
///
/// While the hint is showing, a full-area region is listed first so the
/// next tap dismisses it instead of choosing an option.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoicePanel {
    pub id: String,
    pub title: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub hint: Option<String>,
}

impl ChoicePanel {
    pub fn new(id: impl Into<String>, title: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            options,
            selected: None,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn title_height() -> i32 {
        GLYPH_SIZE * theme::TEXT_SCALE + theme::MARGIN * 2
    }

    fn option_rects(&self, area: Rect) -> Vec<Rect> {
        let count = self.options.len() as i32;
        if count == 0 {
            return Vec::new();
        }
        let top = area.y + Self::title_height();
        let gap = theme::MARGIN / 2;
        let h = ((area.h - Self::title_height() - theme::MARGIN) / count - gap).max(1);
        (0..count)
            .map(|i| {
                Rect::new(
                    area.x + theme::MARGIN,
                    top + i * (h + gap),
                    area.w - theme::MARGIN * 2,
                    h,
                )
            })
            .collect()
    }
}

impl Panel for ChoicePanel {
    fn id(&self) -> &str {
        &self.id
    }

    fn render(&self, surface: &mut Surface, handle: &PanelHandle) {
        let area = handle.area;
        let title = Rect::new(area.x, area.y, area.w, Self::title_height());
        surface.text_centered(title, &self.title, theme::TEXT_SCALE, theme::FOREGROUND);

        for (i, (rect, label)) in self
            .option_rects(area)
            .into_iter()
            .zip(&self.options)
            .enumerate()
        {
            let fill = if self.selected == Some(i) {
                theme::PILL_SELECTED
            } else {
                theme::BUTTON_FILL
            };
            surface.fill_rect(rect, fill);
            surface.stroke_rect(rect, 1, theme::BUTTON_EDGE);
            surface.text_centered(rect, label, theme::TEXT_SCALE, theme::FOREGROUND);
        }

        if let Some(hint) = &self.hint {
            let bubble = area.inset(area.w.min(area.h) / 6);
            surface.fill_rect(bubble, theme::ACCENT_SOFT);
            surface.stroke_rect(bubble, 2, theme::ACCENT);
            surface.text_wrapped(bubble.inset(theme::MARGIN), hint, 1, theme::FOREGROUND);
        }
    }

    fn hit_regions(&self, handle: &PanelHandle) -> Vec<HitRegion> {
        let mut regions = Vec::with_capacity(self.options.len() + 1);
        if self.hint.is_some() {
            regions.push(HitRegion::new(
                handle.area,
                RegionAction::Panel {
                    name: "dismiss_hint".to_string(),
                    value: None,
                },
            ));
        }
        for (i, rect) in self.option_rects(handle.area).into_iter().enumerate() {
            regions.push(HitRegion::new(
                rect,
                RegionAction::Panel {
                    name: format!("{}_option", self.id),
                    value: Some(i as f32),
                },
            ));
        }
        regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::dispatch;

    fn handle() -> PanelHandle {
        PanelHandle {
            area: Rect::new(60, 0, 360, 320),
            frame: 0,
            now_ms: 0,
        }
    }

    #[test]
    fn test_option_regions_fit_area() {
        let panel = ChoicePanel::new("effects", "Effects", vec!["Echo".into(), "Shimmer".into()]);
        let regions = panel.hit_regions(&handle());
        assert_eq!(regions.len(), 2);
        for region in &regions {
            assert_eq!(region.name(), "effects_option");
            assert!(region.rect.x >= 60 && region.rect.right() <= 420);
            assert!(region.rect.bottom() <= 320);
        }
        assert_eq!(
            regions[1].action,
            RegionAction::Panel {
                name: "effects_option".into(),
                value: Some(1.0)
            }
        );
    }

    #[test]
    fn test_hint_intercepts_first() {
        let panel = ChoicePanel::new("effects", "Effects", vec!["Echo".into()])
            .with_hint("Pick an effect");
        let regions = panel.hit_regions(&handle());
        let (x, y) = regions[1].rect.center();
        assert_eq!(
            dispatch(x as f32, y as f32, &regions).unwrap().name(),
            "dismiss_hint"
        );
    }
}
