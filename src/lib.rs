pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod release;
pub mod scaffold;
pub mod sequence;
pub mod ui;
