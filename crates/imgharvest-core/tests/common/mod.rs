pub mod reader_page;
