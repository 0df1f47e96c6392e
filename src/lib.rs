pub mod backend;
pub mod component;
pub mod geometry;
pub mod logging;
pub mod pointer;
pub mod shaders;
