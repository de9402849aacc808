//! Format implementations
//!
//! This module contains all format implementations that convert between
//! record content (the tagdb AST) and various text representations.

pub mod ast;
pub mod html;
pub mod markdown;
pub mod text;

pub use ast::AstFormat;
pub use html::HtmlFormat;
pub use markdown::MarkdownFormat;
pub use text::TextFormat;
