//! Comic issue records.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComicIssue {
    pub title: String,
    pub url: String,
}

/// An issue with its page images in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComicImages {
    pub issue: ComicIssue,
    pub image_urls: Vec<String>,
}
