pub mod builtins;
pub mod cursor;
pub mod debug;
pub mod lexer;
pub mod literal_conversions;
pub mod parser;
pub mod runtime;
pub mod symbol_table;
