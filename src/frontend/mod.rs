//! Front end: scanner, literal decoding, conditional-region bookkeeping and
//! the parser.

pub mod conditional;
pub mod lexer;
pub mod literals;
pub mod parser;
