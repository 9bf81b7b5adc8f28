mod plugin;
mod query;
mod tag;
mod world;

pub use plugin::CollisionPlugin;
pub use query::*;
pub use tag::*;
pub use world::*;
