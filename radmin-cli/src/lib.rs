//! radmin CLI library

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::multiple_crate_versions)]

pub mod commands;

pub use commands::GenerateCommand;
