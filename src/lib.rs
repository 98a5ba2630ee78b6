#![allow(clippy::needless_range_loop)]

pub mod indicators;
pub mod utilities;
