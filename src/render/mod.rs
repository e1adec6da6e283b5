pub mod camera;
pub mod mesh;
pub mod raster;
pub mod terminal;

pub use camera::{OrbitControls, PerspectiveCamera};
pub use raster::{FrameBuffer, Light, Sky};
pub use terminal::TerminalRenderer;
