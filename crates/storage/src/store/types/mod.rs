#![forbid(unsafe_code)]

mod history;
mod nodes;
mod progress;
mod view_state;

pub use history::*;
pub use nodes::*;
pub use progress::*;
pub use view_state::*;
