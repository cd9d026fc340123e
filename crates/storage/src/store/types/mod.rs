#![forbid(unsafe_code)]

mod changelog;
mod containers;
mod items;

pub use changelog::*;
pub use containers::*;
pub use items::*;
