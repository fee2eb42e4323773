use super::*;

mod cursor;
mod recovery;

pub(super) use recovery::{starts_member, starts_statement_or_declaration};
