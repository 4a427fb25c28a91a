pub mod config;

pub mod cli;
pub mod dispatcher;
pub mod effects;
pub mod events;
pub mod executor;
pub mod keys;
pub mod navigation;

pub use dispatcher::{Dispatcher, Flow};
