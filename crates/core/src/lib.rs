#![deny(warnings)]

pub mod config;
pub mod emotion;
pub mod features;
pub mod session;
pub mod streaming;
pub mod util;
