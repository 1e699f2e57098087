//! Full-size image overlay that can step through every image in the article.

use crate::document::Image;

/// The article's images and which one, if any, is shown.
pub struct Lightbox {
    images: Vec<Image>,
    current: Option<usize>,
}

impl Lightbox {
    /// A closed lightbox over `images`, in document order.
    #[must_use]
    pub fn new(images: Vec<Image>) -> Self {
        Self {
            images,
            current: None,
        }
    }

    /// Whether an image is being shown.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the article has no images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Shows the image at `index`; out-of-range indices leave the lightbox unchanged.
    pub fn open(&mut self, index: usize) -> bool {
        if index < self.images.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Hides the overlay.
    pub fn close(&mut self) {
        self.current = None;
    }

    /// Steps forward, wrapping from the last image to the first.
    pub fn show_next(&mut self) {
        if let Some(index) = self.current {
            self.current = Some((index + 1) % self.images.len());
        }
    }

    /// Steps back, wrapping from the first image to the last.
    pub fn show_prev(&mut self) {
        if let Some(index) = self.current {
            let len = self.images.len();
            self.current = Some((index + len - 1) % len);
        }
    }

    /// Index and image being shown.
    #[must_use]
    pub fn current(&self) -> Option<(usize, &Image)> {
        self.current.map(|i| (i, &self.images[i]))
    }
}

#[cfg(test)]
#[path = "tests/lightbox.rs"]
mod tests;
