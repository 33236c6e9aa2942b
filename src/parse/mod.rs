//! Input parsing: the tokenizer and the assumptions/facts file loader.

pub mod lexer;
pub mod loader;

pub use lexer::{tokenize, LexToken, SourceLocation, TokenKind};
pub use loader::{Loader, RelationHandler};
