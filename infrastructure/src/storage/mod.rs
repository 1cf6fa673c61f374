//! Book persistence.

mod fs_book_store;

pub use fs_book_store::FsBookStore;
