pub mod collections;
pub mod concurrent;
mod config;
mod config_option;

pub use self::{config::*, config_option::*};
