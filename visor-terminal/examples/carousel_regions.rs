/// Prints the hit regions of the carousel screen without a terminal UI.
///
/// Useful for checking layout changes: every control that can be pressed
/// is listed with its rectangle, in dispatch order.
use visor_core::{ScreenState, StateController, SurfaceContext};
use visor_terminal::demo;

fn main() {
    env_logger::init();

    let mut controller = StateController::new(SurfaceContext::default());
    controller.set_state(ScreenState::Carousel);
    demo::populate(&mut controller);

    for index in 0..demo::carousel().items.len() {
        controller.set_carousel_index(index);
        println!("item {}:", index);
        for region in controller.regions() {
            println!("  {}", region);
        }
    }
}
