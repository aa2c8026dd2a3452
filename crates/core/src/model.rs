//! The canonical slide model both renderers consume.
//!
//! Pure data: read accessors and a lossless serde round-trip, no behavior.
//! Produced once by the content processor, then shared read-only.

use crate::spec::{Footer, Theme};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The role of a slide within the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKind {
    /// Opening slide with brand name and subtitle.
    Cover,
    /// A regular content slide with title and bullets.
    Content,
    /// Closing slide recapping the deck.
    Conclusion,
    /// A slide dedicated to a single image.
    Image,
}

/// One slide of the deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    /// 0-based position, contiguous and matching the slide's index in the deck.
    pub index: usize,

    pub kind: SlideKind,

    pub title: String,

    /// Bullet texts, already clipped to the configured caps.
    #[serde(default)]
    pub bullets: Vec<String>,

    /// Image shown beside the bullets (or full-bleed on `Image` slides).
    #[serde(default)]
    pub image: Option<ImageAttachment>,

    /// Optional speaker notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Slide {
    /// Create a slide with no bullets, image, or notes.
    pub fn new(index: usize, kind: SlideKind, title: impl Into<String>) -> Self {
        Self {
            index,
            kind,
            title: title.into(),
            bullets: Vec::new(),
            image: None,
            notes: None,
        }
    }

    pub fn with_bullets(mut self, bullets: Vec<String>) -> Self {
        self.bullets = bullets;
        self
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// An image placed on a slide. The path is passed through untouched from the
/// specification; renderers decide how (and whether) to load the bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub path: PathBuf,
    #[serde(default)]
    pub alt: String,
}

/// A complete deck: ordered slides plus deck-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideModel {
    /// Deck title (the cover title).
    pub title: String,

    /// Language code the deck was generated for.
    pub language: String,

    pub theme: Theme,

    pub footer: Footer,

    /// Logo shown on every slide, when branding requests one.
    #[serde(default)]
    pub logo_path: Option<PathBuf>,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl SlideModel {
    /// Total number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Slides of the given kind, in deck order.
    pub fn slides_of_kind(&self, kind: SlideKind) -> impl Iterator<Item = &Slide> {
        self.slides.iter().filter(move |s| s.kind == kind)
    }

    /// Defense-in-depth check renderers run before writing anything.
    ///
    /// Content validation should have caught these already; a renderer must
    /// still refuse a structurally broken deck rather than skip or crash on a
    /// bad slide. The error names the offending slide index.
    pub fn ensure_renderable(&self) -> crate::Result<()> {
        use crate::Error;

        if self.slides.is_empty() {
            return Err(Error::render(0, "deck has no slides"));
        }
        if self.slides[0].kind != SlideKind::Cover {
            return Err(Error::render(0, "first slide is not the cover"));
        }
        let last = self.slides.len() - 1;
        if self.slides[last].kind != SlideKind::Conclusion {
            return Err(Error::render(last, "last slide is not the conclusion"));
        }
        for (position, slide) in self.slides.iter().enumerate() {
            if slide.index != position {
                return Err(Error::render(
                    position,
                    format!("slide index {} does not match position", slide.index),
                ));
            }
            if slide.title.trim().is_empty() {
                return Err(Error::render(position, "slide has an empty title"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> SlideModel {
        SlideModel {
            title: "Acme".to_string(),
            language: "en".to_string(),
            theme: Theme::default(),
            footer: Footer::default(),
            logo_path: None,
            slides: vec![
                Slide::new(0, SlideKind::Cover, "Acme"),
                Slide::new(1, SlideKind::Content, "Results")
                    .with_bullets(vec!["Revenue up".to_string()])
                    .with_image(ImageAttachment {
                        path: PathBuf::from("chart.png"),
                        alt: "Revenue chart".to_string(),
                    }),
                Slide::new(2, SlideKind::Conclusion, "Conclusions"),
            ],
        }
    }

    #[test]
    fn test_slides_of_kind() {
        let model = sample_model();
        assert_eq!(model.slides_of_kind(SlideKind::Content).count(), 1);
        assert_eq!(model.slides_of_kind(SlideKind::Image).count(), 0);
    }

    #[test]
    fn test_serde_round_trip_is_lossless() {
        let model = sample_model();
        let json = serde_json::to_string(&model).unwrap();
        let back: SlideModel = serde_json::from_str(&json).unwrap();

        assert_eq!(back.title, model.title);
        assert_eq!(back.len(), model.len());
        for (a, b) in back.slides.iter().zip(model.slides.iter()) {
            assert_eq!(a.index, b.index);
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.title, b.title);
            assert_eq!(a.bullets, b.bullets);
            assert_eq!(a.image.is_some(), b.image.is_some());
        }

        // Serializing again yields the identical document.
        assert_eq!(serde_json::to_string(&back).unwrap(), json);
    }

    #[test]
    fn test_slide_kind_serializes_snake_case() {
        let json = serde_json::to_string(&SlideKind::Conclusion).unwrap();
        assert_eq!(json, "\"conclusion\"");
    }

    #[test]
    fn test_ensure_renderable_accepts_well_formed_deck() {
        assert!(sample_model().ensure_renderable().is_ok());
    }

    #[test]
    fn test_ensure_renderable_names_offending_slide() {
        let mut model = sample_model();
        model.slides[1].title = String::new();

        let err = model.ensure_renderable().unwrap_err();
        match err {
            crate::Error::Render { slide, .. } => assert_eq!(slide, 1),
            other => panic!("expected Render, got {:?}", other),
        }
    }

    #[test]
    fn test_ensure_renderable_rejects_misplaced_cover() {
        let mut model = sample_model();
        model.slides[0].kind = SlideKind::Content;
        assert!(model.ensure_renderable().is_err());
    }
}
