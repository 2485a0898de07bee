#![forbid(unsafe_code)]

pub mod access;
pub mod audit;
pub mod ids;
pub mod model;
pub mod ordering;
pub mod policy;
pub mod tree;
pub mod view_state;
