pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod git;
pub mod http;
pub mod package;
pub mod runtime;
pub mod sync;
