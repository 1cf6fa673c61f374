//! Book structure: table of contents, file layout and compilation

pub mod compile;
pub mod layout;
pub mod toc;

pub use compile::{CompiledBook, CompiledChapter, compile_book, compile_chapter};
pub use layout::sanitize_title;
pub use toc::{Chapter, Section, SectionKey, SectionNumber, TableOfContents, WritingUnit};
