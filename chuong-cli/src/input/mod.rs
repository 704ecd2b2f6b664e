//! Input handling: file access and page selection

mod file_reader;
mod page_source;

pub use file_reader::FileReader;
pub use page_source::{PageRange, PageSource, EMPTY_PAGE_CHARS, FORM_FEED, MAX_EMPTY_RATIO};
