//! Placeholder-aware collection of the images already rendered in the reader page.
//!
//! Each direct `<img>` child of the image container becomes one slot, in
//! document order. Placeholder slots are kept (as `None`) so the merger can
//! line lazy-loaded URLs up with the right positions.

use scraper::{ElementRef, Html};

use crate::config::ExtractConfig;

/// One image element found in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub src: Option<String>,
}

impl RenderedImage {
    /// True if the source is absent, empty, or contains any of the placeholder markers.
    pub fn is_placeholder(&self, markers: &[String]) -> bool {
        match &self.src {
            None => true,
            Some(src) => src.is_empty() || markers.iter().any(|m| src.contains(m.as_str())),
        }
    }

    /// The source when it is a real image, `None` for a placeholder slot.
    pub fn into_slot(self, markers: &[String]) -> Option<String> {
        if self.is_placeholder(markers) {
            None
        } else {
            self.src
        }
    }
}

/// Image elements that are direct children of the configured container(s), in document order.
///
/// An unparsable container selector yields no images.
pub fn rendered_images(document: &Html, cfg: &ExtractConfig) -> Vec<RenderedImage> {
    let container = match cfg.container() {
        Ok(sel) => sel,
        Err(e) => {
            tracing::warn!("{e}; no rendered images collected");
            return Vec::new();
        }
    };

    document
        .select(&container)
        .flat_map(|c| c.children().filter_map(ElementRef::wrap))
        .filter(|el| el.value().name().eq_ignore_ascii_case("img"))
        .map(|el| RenderedImage {
            src: el.value().attr("src").map(str::to_string),
        })
        .collect()
}

/// Placeholder-classified sources: one entry per rendered image, `None` for placeholders.
pub fn collect_rendered(document: &Html, cfg: &ExtractConfig) -> Vec<Option<String>> {
    let slots: Vec<Option<String>> = rendered_images(document, cfg)
        .into_iter()
        .map(|img| img.into_slot(&cfg.placeholder_markers))
        .collect();
    tracing::debug!(
        total = slots.len(),
        placeholders = slots.iter().filter(|s| s.is_none()).count(),
        "collected rendered images"
    );
    slots
}
