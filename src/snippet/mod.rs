//! Bidirectional snippet codec.
//!
//! [`generate_snippet`] renders a [`Device`](crate::models::Device) as an
//! ESPHome YAML fragment and [`parse_snippet`] reads such a fragment back.
//! Both sides consult [`grammar`] so that everything written can be read.

pub mod error;
pub mod generator;
pub mod grammar;
pub mod lexer;
pub mod parser;

pub use error::{ImportWarning, SnippetError};
pub use generator::generate_snippet;
pub use parser::{parse_snippet, ImportedLayout};
