// Core conversion engine - independent of the CLI

pub mod core;
pub mod install;

pub use self::core::*;
