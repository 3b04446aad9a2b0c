mod message;

pub mod constants;
pub mod events;
pub mod routing;
pub mod types;

// used by the console message macros
pub use colored::Colorize;
