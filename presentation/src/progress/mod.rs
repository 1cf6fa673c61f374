//! Live console output while a book is written

pub mod reporter;
