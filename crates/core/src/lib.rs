#![forbid(unsafe_code)]

pub mod dashboard;
pub mod error;
pub mod model;
pub mod quiz;
pub mod report;
pub mod task;
pub mod time;

pub use error::Error;
pub use task::{Cancel, TaskSlot};
pub use time::Clock;
