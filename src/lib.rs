mod bounds;
mod branch;
mod bus_types;
mod compile;
mod error;
mod loadcase;
mod model;
mod network;
mod per_unit;
mod slack;

pub mod debug;

#[cfg(test)]
mod tests;

pub use bounds::*;
pub use branch::*;
pub use bus_types::*;
pub use compile::*;
pub use error::*;
pub use loadcase::*;
pub use model::*;
pub use network::*;
pub use per_unit::*;
pub use slack::*;
