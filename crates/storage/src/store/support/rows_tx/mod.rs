#![forbid(unsafe_code)]

mod containers;
mod items;

pub(in crate::store) use containers::*;
pub(in crate::store) use items::*;
