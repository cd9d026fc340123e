#![forbid(unsafe_code)]

mod apply;
mod cursor;
mod entry;
mod list;
mod record;
mod replay;

pub(in crate::store) use record::ChangeRecorder;
