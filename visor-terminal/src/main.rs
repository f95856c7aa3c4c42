/// Visor Terminal Demo - control surface on a display object
///
/// Renders the control surface onto a tilted display face and routes mouse
/// clicks back through it. Logs go to stderr; redirect them to a file to
/// keep the picture clean, e.g. `RUST_LOG=debug visor-terminal 2>visor.log`.
/// Controls:
///   - Click: press a control on the surface
///   - Tab: next screen
///   - WASD / Arrow Keys: Rotate the display
///   - E/R: Roll rotation
///   - Q/ESC: Quit
///
/// See `visor-terminal --help` for flags.
use clap::Parser;
use std::io;
use visor_core::{StateController, SurfaceCalibration, SurfaceContext};
use visor_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Allow the calibration screen (1-4 pick an edge, arrows nudge it,
    /// C prints the calibration line)
    #[arg(long)]
    calibrate: bool,

    /// Calibration line to start from, e.g.
    /// "uv_min=0.0000,0.0000 uv_max=1.0000,1.0000"
    #[arg(long, env = "VISOR_CALIBRATION")]
    calibration: Option<SurfaceCalibration>,
}

fn main() -> io::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let calibration = args.calibration.unwrap_or_default();
    log::info!("starting with calibration {}", calibration);

    let controller = StateController::new(SurfaceContext {
        calibration,
        calibration_enabled: args.calibrate,
        ..SurfaceContext::default()
    });

    let mut app = TerminalApp::new(controller)?;
    app.run()?;

    if let Some(line) = app.last_calibration() {
        println!("{}", line);
    }
    Ok(())
}
