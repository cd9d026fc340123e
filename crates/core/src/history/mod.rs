#![forbid(unsafe_code)]

mod batch;
mod op;

pub use batch::*;
pub use op::*;
