#![forbid(unsafe_code)]

pub(super) mod begin;
pub(super) mod counters;
pub(super) mod cycle;
pub(super) mod depth;
pub(super) mod history;
pub(super) mod ordering;
pub(super) mod patch;
pub(super) mod rows;
