//! External spreadsheet sink

pub mod sheets;

pub use sheets::{SheetsClient, SheetsError};
