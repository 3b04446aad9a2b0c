pub mod commands;
pub mod listen;
pub mod logging;
pub mod process_command;
pub mod version_check;
