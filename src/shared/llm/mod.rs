//! Lenient parsing of semi-structured LLM output.

pub mod parser;

pub use parser::extract_json_object;
