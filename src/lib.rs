pub mod cli;
pub mod engine;
pub mod geometry;
pub mod io;
pub mod replay;
