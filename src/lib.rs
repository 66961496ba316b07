#![deny(clippy::all)]

pub mod logging;
pub mod reader;
pub mod utils;

#[cfg(feature = "node")]
pub mod node;

#[cfg(test)]
pub(crate) mod testing;

pub use logging::init_logger;
pub use reader::*;

#[cfg(feature = "node")]
#[macro_use]
extern crate napi_derive;
