//! Run modes reachable from the command line

pub mod play;
pub mod train;
