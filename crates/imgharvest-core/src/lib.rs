//! imgharvest: ordered image URL extraction from lazy-loading reader pages.

pub mod config;
pub mod logging;

pub mod collector;
pub mod comic;
pub mod decoder;
pub mod extract;
pub mod merge;
pub mod series;

pub use extract::ImageUrlExtractor;
