#![forbid(unsafe_code)]

mod create;
mod delete;
mod progress;
mod read;
mod relocate;
mod reorder;
mod update;
