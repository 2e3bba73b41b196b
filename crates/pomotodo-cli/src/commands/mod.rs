pub mod config;
pub mod countdown;
pub mod timer;
pub mod todo;
