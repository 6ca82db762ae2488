//! Frontend module - Lexer, Parser, grammar tracing

pub mod token;
pub mod lexer;
pub mod grammar;
pub mod parser;
