//! Domain model for the geography quiz: feature catalog, geometries and the
//! quiz session state machine. No I/O happens in this crate.

#![forbid(unsafe_code)]

pub mod draw;
pub mod error;
pub mod model;
pub mod time;

pub use draw::FeatureDraw;
pub use error::Error;
pub use time::Clock;
