//! Common data types shared by the loader, the engine and the writers.

mod depth_map;

pub use depth_map::*;
