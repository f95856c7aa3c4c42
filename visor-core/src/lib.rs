//! Visor Core Library - control surface rendering and pointer routing
//!
//! This library draws a state-dependent control surface into a pixel
//! buffer that is textured onto a 3D display object, and maps pointer rays
//! hitting that object back onto the controls drawn there.

pub mod calibration;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod geometry;
pub mod hit;
pub mod mapper;
pub mod nav;
pub mod panel;
pub mod projection;
pub mod render;
pub mod scene;
pub mod state;
pub mod surface;
pub mod theme;

// Re-export commonly used types
pub use calibration::{CalibrationEdge, SurfaceCalibration};
pub use controller::{Action, ActionListener, Key, PointerOutcome, StateController, SurfaceContext};
pub use error::{Result, VisorError};
pub use geometry::{Mesh, MeshHit, Ray, Triangle, Vertex};
pub use hit::{dispatch, HitRegion, Rect, RegionAction};
pub use mapper::{CoordinateMapper, SurfacePoint};
pub use nav::{NavKind, NavOptions, NavStack, NavState, NavView, Navigator};
pub use panel::{ChoicePanel, Panel, PanelHandle};
pub use projection::{Camera, ProjectionMode, ScreenRect};
pub use scene::{DisplayMesh, DisplayObject, Pose};
pub use state::{Screen, ScreenState};
pub use surface::Surface;
