pub mod components;
pub mod entity;
pub mod environment;
pub mod land;
pub mod picking;
pub mod world;

pub use land::*;
pub use world::*;
