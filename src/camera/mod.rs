mod cursor;
mod look;
mod plugin;

pub use cursor::*;
pub use look::*;
pub use plugin::CameraPlugin;
