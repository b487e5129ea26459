#![forbid(unsafe_code)]

pub mod countdown;
pub mod input;
pub mod model;
pub mod time;

pub use time::Clock;
