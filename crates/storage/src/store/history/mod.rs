#![forbid(unsafe_code)]

mod list;
mod rollback;
