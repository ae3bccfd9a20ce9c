//! Main module for wiki translation functionality

pub mod ast;
pub mod config;
pub mod dialect;
pub mod error;
pub mod formats;
pub mod languages;
pub mod lexing;
pub mod parsing;
pub mod processor;
pub mod testing;
