//! Navigation stack: which logical screen is showing and how "back" is rebuilt.
//!
//! `NavStack` holds the history. `Navigator` runs the high-level moves on
//! top of it and replays the visual show/hide calls through a [`NavView`].
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKind {
    Idle,
    Menu,
    Panel,
    MoodMode,
    Carousel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavOptions {
    pub panel_id: Option<String>,
    pub mood_mode: Option<String>,
}

impl NavOptions {
    pub fn panel(id: impl Into<String>) -> Self {
        Self {
            panel_id: Some(id.into()),
            mood_mode: None,
        }
    }

    pub fn mood(mode: impl Into<String>) -> Self {
        Self {
            panel_id: None,
            mood_mode: Some(mode.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub kind: NavKind,
    pub panel_id: Option<String>,
    pub mood_mode: Option<String>,
    /// Kind of the entry this one replaced in place; `None` when pushed
    pub origin: Option<NavKind>,
}

impl NavState {
    fn new(kind: NavKind, opts: NavOptions, origin: Option<NavKind>) -> Self {
        Self {
            kind,
            panel_id: opts.panel_id,
            mood_mode: opts.mood_mode,
            origin,
        }
    }

    pub fn idle() -> Self {
        Self::new(NavKind::Idle, NavOptions::default(), None)
    }

    /// Same screen as far as history is concerned
    fn same_place(&self, kind: NavKind, panel_id: Option<&str>) -> bool {
        self.kind == kind && self.panel_id.as_deref() == panel_id
    }
}

/// Never empty; the bottom entry is always `Idle`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavStack {
    entries: Vec<NavState>,
}

impl NavStack {
    pub fn new() -> Self {
        Self {
            entries: vec![NavState::idle()],
        }
    }

    /// Append unless the top is already this place. Returns whether it grew.
    pub fn push(&mut self, kind: NavKind, opts: NavOptions) -> bool {
        if self.current().same_place(kind, opts.panel_id.as_deref()) {
            debug!("nav: dropped duplicate push of {:?}", kind);
            return false;
        }
        self.entries.push(NavState::new(kind, opts, None));
        true
    }

    /// Drop the top and return the entry now current. `None` at the root.
    pub fn pop(&mut self) -> Option<NavState> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop();
        Some(self.current().clone())
    }

    /// Swap the top in place. The root is never replaced, so at depth 1
    /// this pushes instead.
    pub fn replace(&mut self, kind: NavKind, opts: NavOptions) {
        match self.entries.len() {
            0 | 1 => {
                self.push(kind, opts);
            }
            _ => {
                let origin = self.current().kind;
                if let Some(top) = self.entries.last_mut() {
                    *top = NavState::new(kind, opts, Some(origin));
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.entries.truncate(1);
        self.entries[0] = NavState::idle();
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn current(&self) -> &NavState {
        &self.entries[self.entries.len() - 1]
    }

    pub fn previous(&self) -> Option<&NavState> {
        self.entries.len().checked_sub(2).map(|i| &self.entries[i])
    }

    pub fn entries(&self) -> &[NavState] {
        &self.entries
    }

    fn current_mut(&mut self) -> &mut NavState {
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }
}

impl Default for NavStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Visual side of navigation, implemented by the host
pub trait NavView {
    fn show_menu(&mut self);
    fn hide_menu(&mut self);
    fn show_mood_mode(&mut self, mode: &str);
    fn show_panel(&mut self, panel_id: &str);
    fn hide_panel(&mut self);
    fn show_idle(&mut self);
    fn current_mood_mode(&self) -> Option<String>;
    fn current_panel_id(&self) -> Option<String>;
}

/// High-level moves. Every one is a no-op until a view is wired.
#[derive(Default)]
pub struct Navigator {
    stack: NavStack,
    view: Option<Box<dyn NavView>>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(view: Box<dyn NavView>) -> Self {
        Self {
            stack: NavStack::new(),
            view: Some(view),
        }
    }

    pub fn set_view(&mut self, view: Option<Box<dyn NavView>>) {
        self.view = view;
    }

    pub fn stack(&self) -> &NavStack {
        &self.stack
    }

    pub fn current(&self) -> &NavState {
        self.stack.current()
    }

    pub fn menu_open(&self) -> bool {
        matches!(self.current().kind, NavKind::Menu | NavKind::MoodMode)
    }

    pub fn open_menu(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        if self.stack.push(NavKind::Menu, NavOptions::default()) {
            view.show_menu();
        }
        debug!("nav: open menu, depth {}", self.stack.depth());
    }

    pub fn close_menu(&mut self) {
        if self.view.is_none() || !self.menu_open() {
            return;
        }
        if let Some(view) = self.view.as_mut() {
            view.hide_menu();
        }
        self.back();
    }

    pub fn toggle_menu(&mut self) {
        if self.menu_open() {
            self.close_menu();
        } else {
            self.open_menu();
        }
    }

    pub fn open_carousel(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let top = self.stack.current_mut();
        if let Some(mode) = view.current_mood_mode() {
            top.mood_mode = Some(mode);
        }
        if let Some(id) = view.current_panel_id() {
            top.panel_id = Some(id);
        }
        view.hide_menu();
        view.hide_panel();
        self.stack.push(NavKind::Carousel, NavOptions::default());
        debug!("nav: open carousel, depth {}", self.stack.depth());
    }

    pub fn close_carousel(&mut self) {
        if self.view.is_none() {
            return;
        }
        // Entries the carousel did not push stay put; the root still resets
        let kind = self.stack.current().kind;
        if kind != NavKind::Carousel && self.stack.depth() > 1 {
            debug!("nav: close carousel ignored on {:?}", kind);
            return;
        }
        debug!("nav: close carousel");
        self.back();
    }

    pub fn open_panel(&mut self, panel_id: &str) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let current = self.stack.current();
        match current.kind {
            NavKind::Menu | NavKind::MoodMode => {
                let opts = NavOptions {
                    panel_id: Some(panel_id.to_string()),
                    mood_mode: current.mood_mode.clone(),
                };
                self.stack.replace(NavKind::Panel, opts);
            }
            _ => {
                self.stack.push(NavKind::Panel, NavOptions::panel(panel_id));
            }
        }
        view.hide_menu();
        view.show_panel(panel_id);
        debug!("nav: open panel {}, depth {}", panel_id, self.stack.depth());
    }

    pub fn close_panel(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let current = self.stack.current();
        if current.kind != NavKind::Panel {
            return;
        }
        view.hide_panel();
        match current.origin {
            Some(NavKind::MoodMode) => {
                let opts = NavOptions {
                    panel_id: None,
                    mood_mode: current.mood_mode.clone(),
                };
                self.stack.replace(NavKind::MoodMode, opts);
                self.restore_current();
            }
            Some(NavKind::Menu) => {
                self.stack.replace(NavKind::Menu, NavOptions::default());
                self.restore_current();
            }
            _ => self.back(),
        }
        debug!("nav: close panel, depth {}", self.stack.depth());
    }

    pub fn enter_mood_mode(&mut self, mode: &str) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        self.stack.replace(NavKind::MoodMode, NavOptions::mood(mode));
        view.show_mood_mode(mode);
    }

    pub fn exit_mood_mode(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        if self.stack.current().kind != NavKind::MoodMode {
            return;
        }
        self.stack.replace(NavKind::Menu, NavOptions::default());
        view.show_menu();
    }

    pub fn reset(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        self.stack.reset();
        view.hide_menu();
        view.hide_panel();
        view.show_idle();
        debug!("nav: reset");
    }

    /// Pop and replay the restored entry; underflow falls back to a reset
    fn back(&mut self) {
        if self.stack.pop().is_some() {
            self.restore_current();
        } else {
            self.reset();
        }
    }

    /// Replay the show calls that originally entered the current entry
    fn restore_current(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let state = self.stack.current();
        match state.kind {
            NavKind::Idle => {
                view.hide_menu();
                view.hide_panel();
                view.show_idle();
            }
            NavKind::Menu => {
                view.hide_panel();
                view.show_menu();
            }
            NavKind::MoodMode => {
                view.hide_panel();
                view.show_menu();
                if let Some(mode) = &state.mood_mode {
                    view.show_mood_mode(mode);
                }
            }
            NavKind::Panel => {
                if let Some(id) = &state.panel_id {
                    view.show_panel(id);
                }
            }
            // The carousel screen itself belongs to the state controller
            NavKind::Carousel => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<String>>>,
        panel: Option<String>,
    }

    impl Recorder {
        fn log(&self, call: impl Into<String>) {
            self.calls.borrow_mut().push(call.into());
        }
    }

    impl NavView for Recorder {
        fn show_menu(&mut self) {
            self.log("show_menu");
        }
        fn hide_menu(&mut self) {
            self.log("hide_menu");
        }
        fn show_mood_mode(&mut self, mode: &str) {
            self.log(format!("show_mood_mode {}", mode));
        }
        fn show_panel(&mut self, panel_id: &str) {
            self.log(format!("show_panel {}", panel_id));
            self.panel = Some(panel_id.to_string());
        }
        fn hide_panel(&mut self) {
            self.log("hide_panel");
            self.panel = None;
        }
        fn show_idle(&mut self) {
            self.log("show_idle");
        }
        fn current_mood_mode(&self) -> Option<String> {
            None
        }
        fn current_panel_id(&self) -> Option<String> {
            self.panel.clone()
        }
    }

    fn navigator() -> (Navigator, Rc<RefCell<Vec<String>>>) {
        let recorder = Recorder::default();
        let calls = recorder.calls.clone();
        (Navigator::with_view(Box::new(recorder)), calls)
    }

    fn kinds(nav: &Navigator) -> Vec<NavKind> {
        nav.stack().entries().iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_stack_invariant_holds() {
        let mut stack = NavStack::new();
        assert!(stack.pop().is_none());
        stack.replace(NavKind::Menu, NavOptions::default());
        assert_eq!(stack.depth(), 2);
        stack.push(NavKind::Carousel, NavOptions::default());
        stack.replace(NavKind::Panel, NavOptions::panel("effects"));
        assert_eq!(stack.current().origin, Some(NavKind::Carousel));
        assert_eq!(stack.previous().unwrap().kind, NavKind::Menu);
        for _ in 0..5 {
            stack.pop();
        }
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.entries()[0].kind, NavKind::Idle);
        stack.push(NavKind::Menu, NavOptions::default());
        stack.reset();
        assert_eq!(stack.entries(), &[NavState::idle()]);
    }

    #[test]
    fn test_duplicate_push_dropped() {
        let mut stack = NavStack::new();
        assert!(stack.push(NavKind::Panel, NavOptions::panel("music")));
        assert!(!stack.push(NavKind::Panel, NavOptions::panel("music")));
        assert_eq!(stack.depth(), 2);
        assert!(stack.push(NavKind::Panel, NavOptions::panel("effects")));
        assert_eq!(stack.depth(), 3);
    }

    #[test]
    fn test_menu_panel_close_returns_to_menu() {
        let (mut nav, calls) = navigator();
        nav.open_menu();
        assert_eq!(kinds(&nav), [NavKind::Idle, NavKind::Menu]);
        nav.open_panel("effects");
        assert_eq!(kinds(&nav), [NavKind::Idle, NavKind::Panel]);
        assert_eq!(nav.current().panel_id.as_deref(), Some("effects"));
        calls.borrow_mut().clear();
        nav.close_panel();
        assert_eq!(kinds(&nav), [NavKind::Idle, NavKind::Menu]);
        assert_eq!(calls.borrow().last().map(String::as_str), Some("show_menu"));
    }

    #[test]
    fn test_panel_from_mood_mode_closes_back_to_it() {
        let (mut nav, _) = navigator();
        nav.open_menu();
        nav.enter_mood_mode("calm");
        nav.open_panel("breath");
        nav.close_panel();
        assert_eq!(nav.current().kind, NavKind::MoodMode);
        assert_eq!(nav.current().mood_mode.as_deref(), Some("calm"));
        assert_eq!(nav.stack().depth(), 2);
        nav.exit_mood_mode();
        assert_eq!(nav.current().kind, NavKind::Menu);
    }

    #[test]
    fn test_carousel_round_trip_restores_entry() {
        let (mut nav, calls) = navigator();
        nav.open_menu();
        nav.enter_mood_mode("focus");
        let before = nav.current().clone();
        nav.open_carousel();
        assert_eq!(nav.current().kind, NavKind::Carousel);
        nav.close_carousel();
        let after = nav.current();
        assert_eq!(after.kind, before.kind);
        assert_eq!(after.panel_id, before.panel_id);
        assert_eq!(after.mood_mode, before.mood_mode);
        assert_eq!(
            calls.borrow().last().map(String::as_str),
            Some("show_mood_mode focus")
        );
    }

    #[test]
    fn test_close_carousel_at_root_resets() {
        let (mut nav, calls) = navigator();
        nav.close_carousel();
        assert_eq!(nav.stack().depth(), 1);
        assert_eq!(calls.borrow().last().map(String::as_str), Some("show_idle"));
    }

    #[test]
    fn test_no_view_is_a_no_op() {
        let mut nav = Navigator::new();
        nav.open_menu();
        nav.open_panel("effects");
        nav.open_carousel();
        nav.enter_mood_mode("calm");
        nav.reset();
        assert_eq!(nav.stack().depth(), 1);
        assert_eq!(nav.current().kind, NavKind::Idle);
    }

    #[test]
    fn test_toggle_menu() {
        let (mut nav, _) = navigator();
        nav.toggle_menu();
        assert!(nav.menu_open());
        nav.toggle_menu();
        assert!(!nav.menu_open());
        assert_eq!(nav.stack().depth(), 1);
    }

    #[test]
    fn test_carousel_round_trip_restores_panel() {
        let (mut nav, calls) = navigator();
        nav.open_panel("effects");
        let before = nav.current().clone();
        nav.open_carousel();
        assert_eq!(kinds(&nav), [NavKind::Idle, NavKind::Panel, NavKind::Carousel]);
        assert_eq!(nav.stack().previous(), Some(&before));

        nav.close_carousel();
        assert_eq!(nav.current(), &before);
        assert_eq!(nav.current().panel_id.as_deref(), Some("effects"));
        assert_eq!(
            calls.borrow().last().map(String::as_str),
            Some("show_panel effects")
        );
    }

    #[test]
    fn test_close_carousel_keeps_other_entries() {
        // Carousel shown by the host without a nav entry of its own
        let (mut nav, _) = navigator();
        nav.open_menu();
        nav.open_panel("effects");
        nav.close_carousel();
        assert_eq!(kinds(&nav), [NavKind::Idle, NavKind::Panel]);
        assert_eq!(nav.current().panel_id.as_deref(), Some("effects"));

        nav.close_panel();
        nav.close_carousel();
        assert_eq!(kinds(&nav), [NavKind::Idle, NavKind::Menu]);
    }
}
