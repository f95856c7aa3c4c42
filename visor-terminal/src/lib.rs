/// Terminal host for the control surface: draws the display object and
/// turns mouse clicks into pointer rays
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info};
use nalgebra::Vector3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use visor_core::hit::Side;
use visor_core::{
    Action, Camera, DisplayMesh, DisplayObject, Key, Mesh, NavKind, PointerOutcome, Pose,
    RegionAction, ScreenState, StateController,
};

pub mod demo;
pub mod renderer;

pub use renderer::CellRenderer;

/// Portrait face; the landscape surface sits on it a quarter turn round
const FACE_WIDTH: f32 = 2.0;
const FACE_HEIGHT: f32 = 3.0;

/// Main application struct for the terminal host
pub struct TerminalApp {
    controller: StateController,
    object: DisplayObject,
    camera: Camera,
    renderer: CellRenderer,
    running: bool,
    started: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    status: String,
    /// Last line copied in calibration mode
    calibration_line: Option<String>,
}

impl TerminalApp {
    pub fn new(mut controller: StateController) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        // The status line takes the top row
        let rows = height.saturating_sub(1).max(1) as usize;

        controller
            .navigator_mut()
            .set_view(Some(Box::new(demo::LoggingView::default())));
        controller.set_listener(Some(Box::new(|action: &Action| {
            info!("action {}", describe_action(action))
        })));
        demo::populate(&mut controller);

        let mut camera = Camera::new(width as u32, rows as u32 * 2);
        camera.position.z = 4.5;

        Ok(Self {
            controller,
            object: DisplayObject::new(
                Mesh::display_quad(FACE_WIDTH, FACE_HEIGHT),
                Pose::new(Vector3::new(0.0, 0.25, 0.0), Vector3::zeros()),
            ),
            camera,
            renderer: CellRenderer::new(width as usize, rows),
            running: true,
            started: Instant::now(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            status: String::from("Tab=next screen"),
            calibration_line: None,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    pub fn last_calibration(&self) -> Option<&str> {
        self.calibration_line.as_deref()
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.controller.tick(self.now_ms());
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => self.handle_click(column, row),
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        if self.controller.state() == ScreenState::Calibration {
            let key = match code {
                KeyCode::Char(c @ '1'..='4') => Some(Key::Digit(c as u8 - b'0')),
                KeyCode::Up => Some(Key::Up),
                KeyCode::Down => Some(Key::Down),
                KeyCode::Left => Some(Key::Left),
                KeyCode::Right => Some(Key::Right),
                KeyCode::Char('c') => Some(Key::Char('c')),
                _ => None,
            };
            if let Some(key) = key {
                if let Some(line) = self.controller.handle_key(key) {
                    self.status = line.clone();
                    self.calibration_line = Some(line);
                }
                return;
            }
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Tab => self.next_screen(),
            KeyCode::Char('w') | KeyCode::Up => {
                self.object.pose.rotate(0.1, 0.0, 0.0);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.object.pose.rotate(-0.1, 0.0, 0.0);
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.object.pose.rotate(0.0, -0.1, 0.0);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.object.pose.rotate(0.0, 0.1, 0.0);
            }
            KeyCode::Char('e') => {
                self.object.pose.rotate(0.0, 0.0, 0.1);
            }
            KeyCode::Char('r') => {
                self.object.pose.rotate(0.0, 0.0, -0.1);
            }
            _ => {}
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) {
        // Row 0 is the status line; each cell below holds two pixel rows
        let Some(cell_row) = row.checked_sub(1) else {
            return;
        };
        let x = column as f32 + 0.5;
        let y = cell_row as f32 * 2.0 + 1.0;
        let ray = self.camera.pointer_ray(
            x,
            y,
            self.renderer.width() as u32,
            self.renderer.height() as u32,
        );

        let now = self.now_ms();
        let mesh: &dyn DisplayMesh = &self.object;
        let outcome = self.controller.handle_pointer(ray.as_ref(), Some(mesh), now);
        debug!("click ({}, {}) -> {:?}", column, row, outcome);
        if let PointerOutcome::Hit { action, .. } = &outcome {
            self.status = format!("pressed {}", action.name());
        }
        self.follow(&outcome);
    }

    fn follow(&mut self, outcome: &PointerOutcome) {
        let PointerOutcome::Hit { action, .. } = outcome else {
            return;
        };
        follow_press(&mut self.controller, action);
        let nav = self.controller.navigator();
        debug!("nav now {:?}, depth {}", nav.current().kind, nav.stack().depth());
        if nav.current().kind == NavKind::Menu {
            self.status = String::from("menu open (Tab to pick a screen)");
        }
    }

    fn next_screen(&mut self) {
        let all = ScreenState::ALL;
        let current = all
            .iter()
            .position(|s| *s == self.controller.state())
            .unwrap_or(0);
        // Calibration is refused unless enabled; move past it
        for step in 1..=all.len() {
            let state = all[(current + step) % all.len()];
            if self.controller.set_state(state) {
                demo::populate(&mut self.controller);
                match state {
                    ScreenState::Carousel => self.controller.navigator_mut().open_carousel(),
                    _ if self.controller.navigator().current().kind == NavKind::Carousel => {
                        self.controller.navigator_mut().close_carousel()
                    }
                    _ => {}
                }
                info!("screen {}", state);
                self.status = format!("screen {}", state);
                return;
            }
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        let rows = height.saturating_sub(1).max(1) as usize;
        self.renderer = CellRenderer::new(width as usize, rows);
        self.camera.aspect = width as f32 / (rows * 2) as f32;
    }

    fn render(&mut self) -> io::Result<()> {
        let model = self.object.pose.model_matrix();

        // Clear renderer
        self.renderer.clear();

        self.renderer.render_mesh(
            &self.object.mesh,
            &model,
            &self.camera,
            self.controller.surface(),
            self.controller.mapper(),
        );
        self.controller.take_dirty();

        // Output to terminal
        let mut stdout = stdout();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Visor | FPS: {:.1} | {} | {} | Click=press Tab=screen WASD=rotate Q=quit",
                self.fps,
                self.controller.state(),
                self.status
            )),
            ResetColor,
            cursor::MoveTo(0, 1)
        )?;

        self.renderer.draw(&mut stdout)?;

        stdout.flush()?;
        Ok(())
    }
}

/// Host-side reaction to a press, the part a real app would own
fn follow_press(controller: &mut StateController, action: &RegionAction) {
    let next = match action {
        RegionAction::Start => ScreenState::Listening,
        RegionAction::Cancel | RegionAction::Confirm => ScreenState::Idle,
        RegionAction::CarouselAction(Side::Left) => ScreenState::Idle,
        RegionAction::CarouselAction(Side::Right) => {
            // "Close" already left the carousel; "Use" leaves it here
            controller.navigator_mut().close_carousel();
            ScreenState::Idle
        }
        _ => return,
    };
    controller.set_state(next);
    demo::populate(controller);
}

/// One-line description of an action for the log
pub fn describe_action(action: &Action) -> String {
    match action {
        Action::Variant { index } => format!("variant {}", index),
        Action::CarouselMoved { index } => format!("item {}", index),
        Action::Phase(value) => format!("phase {:.2}", value),
        Action::Panel { name, value } => match value {
            Some(value) => format!("{} {}", name, value),
            None => name.clone(),
        },
        other => format!("{:?}", other).to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visor_core::hit::Transport;
    use visor_core::SurfaceContext;

    #[test]
    fn test_use_press_leaves_carousel_entry() {
        let mut controller = StateController::new(SurfaceContext::default());
        controller
            .navigator_mut()
            .set_view(Some(Box::new(demo::LoggingView::default())));
        controller.navigator_mut().open_carousel();
        controller.set_state(ScreenState::Carousel);
        assert_eq!(controller.navigator().current().kind, NavKind::Carousel);

        follow_press(&mut controller, &RegionAction::CarouselAction(Side::Right));
        assert_eq!(controller.state(), ScreenState::Idle);
        assert_eq!(controller.navigator().current().kind, NavKind::Idle);
        assert_eq!(controller.navigator().stack().depth(), 1);
    }

    #[test]
    fn test_describe_action() {
        assert_eq!(describe_action(&Action::Variant { index: 3 }), "variant 3");
        assert_eq!(describe_action(&Action::Phase(0.5)), "phase 0.50");
        assert_eq!(
            describe_action(&Action::Transport(Transport::PlayPause)),
            "transport(playpause)"
        );
        assert_eq!(
            describe_action(&Action::Panel {
                name: "effects_option".into(),
                value: Some(2.0)
            }),
            "effects_option 2"
        );
    }
}
