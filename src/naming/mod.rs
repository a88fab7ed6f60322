//! Identifier sanitization
//!
//! Turns arbitrary column headers and table names into identifiers every
//! supported warehouse accepts.
//!
//! - [`prep_headers`] / [`prep_header_pairs`]: column names. Case is kept,
//!   illegal characters become `_`, collisions get numeric suffixes.
//! - [`clean_name`]: table names. Lower-cased, collapsed, keyword-guarded.

mod sanitize;

pub use sanitize::{clean_name, prep_header_pairs, prep_headers, sanitize_header, MAX_IDENT_LEN};

#[cfg(test)]
mod tests;
