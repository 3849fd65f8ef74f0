//! Tabular input: named numeric feature columns plus a categorical label.
//!
//! The preprocessing core only sees a [`Table`]; [`csv`] is one way to
//! build it.

pub mod csv;
mod table;

pub use self::csv::{read_csv, read_csv_from_reader};
pub use self::table::{Column, Table};
