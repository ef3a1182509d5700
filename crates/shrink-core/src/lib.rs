pub mod config;
pub mod logging;

pub mod compress;
pub mod pipeline;
pub mod scanner;
