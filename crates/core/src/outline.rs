//! Content processing: normalized fragments to a bounded slide sequence.
//!
//! The shipped [`ExtractiveOutliner`] is fully deterministic: sentence
//! splitting, word budgeting, paragraph-seeded segmentation, and sequential
//! image assignment all have reproducible outcomes for identical input.
//! Alternate strategies implement [`Outliner`] and are selected at
//! construction time.

use crate::model::{ImageAttachment, Slide, SlideKind, SlideModel};
use crate::normalize::{NormalizedFragment, SourceKind};
use crate::spec::Specification;
use crate::translate::Catalog;
use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Average words a content slide can carry; bounds the summarization budget
/// together with the specification's `summary_words`.
pub const WORDS_PER_SLIDE: usize = 80;

/// Maximum characters in a slide title before clipping.
pub const TITLE_CHARS_MAX: usize = 60;

/// Maximum characters in the cover subtitle.
pub const COVER_SUBTITLE_CHARS_MAX: usize = 150;

/// Matches one sentence including its terminator.
static SENTENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?…]+[.!?…]*").unwrap());

/// Capability interface for turning fragments into a deck.
pub trait Outliner {
    /// Produce a [`SlideModel`] honoring the specification's structural
    /// budgets. Auto-corrections (clips, deviations) are appended to
    /// `warnings`, never silently applied.
    fn outline(
        &self,
        fragments: &[NormalizedFragment],
        spec: &Specification,
        catalog: &Catalog,
        warnings: &mut Vec<String>,
    ) -> Result<SlideModel>;
}

/// A sentence with its cached word count.
#[derive(Debug, Clone)]
struct Sentence {
    text: String,
    words: usize,
}

fn split_sentences(paragraph: &str) -> Vec<Sentence> {
    SENTENCE_REGEX
        .find_iter(paragraph)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(|s| Sentence {
            text: s.to_string(),
            words: s.split_whitespace().count(),
        })
        .collect()
}

fn segment_words(segment: &[Sentence]) -> usize {
    segment.iter().map(|s| s.words).sum()
}

/// Clip text to `max_chars` characters, preferring a word boundary, with an
/// ellipsis marking the cut. Returns the (possibly unchanged) text and
/// whether clipping happened.
fn clip_chars(text: &str, max_chars: usize) -> (String, bool) {
    if text.chars().count() <= max_chars {
        return (text.to_string(), false);
    }

    let mut clipped: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    if let Some(pos) = clipped.rfind(' ') {
        // Only back up to the word boundary when it doesn't cost half the cap.
        if pos > max_chars / 2 {
            clipped.truncate(pos);
        }
    }
    (format!("{}…", clipped.trim_end()), true)
}

/// Strip the sentence terminator for use as a title.
fn strip_terminator(sentence: &str) -> &str {
    sentence.trim_end_matches(['.', '!', '?', '…'])
}

/// Deterministic extractive outliner (the default implementation).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveOutliner;

impl ExtractiveOutliner {
    pub fn new() -> Self {
        Self
    }

    /// Collect the corpus as paragraphs of sentences, in fragment order.
    fn collect_paragraphs(fragments: &[NormalizedFragment]) -> Vec<Vec<Sentence>> {
        let mut paragraphs = Vec::new();
        for fragment in fragments.iter().filter(|f| f.is_usable()) {
            for para in fragment.text.split("\n\n") {
                let sentences = split_sentences(para);
                if !sentences.is_empty() {
                    paragraphs.push(sentences);
                }
            }
        }
        paragraphs
    }

    /// Clip the corpus to the word budget at a sentence boundary.
    fn apply_budget(
        paragraphs: Vec<Vec<Sentence>>,
        budget: usize,
        warnings: &mut Vec<String>,
    ) -> Vec<Vec<Sentence>> {
        let total: usize = paragraphs.iter().map(|p| segment_words(p)).sum();
        if total <= budget {
            return paragraphs;
        }

        let mut kept = Vec::new();
        let mut used = 0usize;
        let mut taken_any = false;
        'outer: for paragraph in paragraphs {
            let mut current = Vec::new();
            for sentence in paragraph {
                if taken_any && used + sentence.words > budget {
                    if !current.is_empty() {
                        kept.push(current);
                    }
                    break 'outer;
                }
                used += sentence.words;
                taken_any = true;
                current.push(sentence);
            }
            if !current.is_empty() {
                kept.push(current);
            }
        }

        warnings.push(format!(
            "Corpus clipped from {} to {} words to fit the summary budget",
            total, used
        ));
        kept
    }

    /// Merge/split paragraph segments until their count matches `target`
    /// (or fewer when the content is too thin to split further).
    fn segment(mut segments: Vec<Vec<Sentence>>, target: usize) -> Vec<Vec<Sentence>> {
        // Too many: merge the adjacent pair with the smallest combined word
        // count, keeping contiguous sentences together.
        while segments.len() > target {
            let mut best = 0;
            let mut best_words = usize::MAX;
            for i in 0..segments.len() - 1 {
                let combined = segment_words(&segments[i]) + segment_words(&segments[i + 1]);
                if combined < best_words {
                    best_words = combined;
                    best = i;
                }
            }
            let tail = segments.remove(best + 1);
            segments[best].extend(tail);
        }

        // Too few: split the segment with the most sentences at its midpoint,
        // never mid-sentence.
        while segments.len() < target {
            let mut best: Option<usize> = None;
            let mut best_count = 1;
            for (i, segment) in segments.iter().enumerate() {
                if segment.len() > best_count {
                    best_count = segment.len();
                    best = Some(i);
                }
            }
            let Some(i) = best else {
                break; // Nothing left to split: thin content.
            };
            let mid = segments[i].len() / 2;
            let tail = segments[i].split_off(mid);
            segments.insert(i + 1, tail);
        }

        segments
    }

    /// Build a content slide from one segment.
    fn content_slide(
        segment: &[Sentence],
        section_num: usize,
        spec: &Specification,
        catalog: &Catalog,
        warnings: &mut Vec<String>,
    ) -> Result<Slide> {
        let title = match segment.first() {
            Some(first) => clip_chars(strip_terminator(&first.text), TITLE_CHARS_MAX).0,
            None => format!(
                "{} {}",
                catalog.text(spec.language(), "section")?,
                section_num
            ),
        };

        let max_bullets = spec.length_target().bullets_per_slide_max;
        let max_chars = spec.length_target().bullet_chars_max;

        let mut bullets = Vec::new();
        for sentence in segment.iter().take(max_bullets) {
            let (bullet, clipped) = clip_chars(&sentence.text, max_chars);
            if clipped {
                warnings.push(format!(
                    "Section {}: bullet clipped to {} characters",
                    section_num, max_chars
                ));
            }
            bullets.push(bullet);
        }

        let mut slide = Slide::new(0, SlideKind::Content, title).with_bullets(bullets);

        // Sentences beyond the bullet cap survive as speaker notes.
        if segment.len() > max_bullets {
            let overflow: Vec<&str> = segment[max_bullets..]
                .iter()
                .map(|s| s.text.as_str())
                .collect();
            warnings.push(format!(
                "Section {}: {} sentences beyond the bullet cap moved to speaker notes",
                section_num,
                overflow.len()
            ));
            slide = slide.with_notes(overflow.join(" "));
        }

        Ok(slide)
    }

    fn image_slide(
        image: &ImageAttachment,
        spec: &Specification,
        catalog: &Catalog,
    ) -> Result<Slide> {
        let title = if image.alt.trim().is_empty() {
            catalog.text(spec.language(), "image")?.to_string()
        } else {
            clip_chars(image.alt.trim(), TITLE_CHARS_MAX).0
        };
        Ok(Slide::new(0, SlideKind::Image, title).with_image(image.clone()))
    }
}

impl Outliner for ExtractiveOutliner {
    fn outline(
        &self,
        fragments: &[NormalizedFragment],
        spec: &Specification,
        catalog: &Catalog,
        warnings: &mut Vec<String>,
    ) -> Result<SlideModel> {
        catalog.ensure_language(spec.language())?;

        if fragments.is_empty() {
            return Err(Error::Input("no fragments to process".to_string()));
        }

        let images: Vec<ImageAttachment> = fragments
            .iter()
            .filter(|f| f.kind == SourceKind::Image)
            .filter_map(|f| {
                f.source.as_ref().map(|path| ImageAttachment {
                    path: path.clone(),
                    alt: f.text.clone(),
                })
            })
            .collect();

        let paragraphs = Self::collect_paragraphs(fragments);
        if paragraphs.is_empty() {
            return Err(Error::InsufficientContent(
                "inputs were supplied but normalized to an empty corpus".to_string(),
            ));
        }

        // Slots between cover and conclusion. Dedicated image slides are
        // charged against this budget; inline images are not.
        let slots = spec.slides_count() - 2;
        let topics_target = if spec.dedicated_image_slides() {
            slots.saturating_sub(images.len()).max(1)
        } else {
            slots
        };

        let budget = spec
            .length_target()
            .summary_words
            .min(topics_target * WORDS_PER_SLIDE);
        let paragraphs = Self::apply_budget(paragraphs, budget, warnings);

        let segments = Self::segment(paragraphs, topics_target);
        if segments.is_empty() {
            return Err(Error::Content(
                "segmentation produced no content topics".to_string(),
            ));
        }
        if segments.len() < topics_target {
            warnings.push(format!(
                "Thin content: {} content topics available for {} requested; deck shrinks accordingly",
                segments.len(),
                topics_target
            ));
        }

        // Content slides.
        let mut content_slides = Vec::with_capacity(segments.len());
        for (i, segment) in segments.iter().enumerate() {
            content_slides.push(Self::content_slide(segment, i + 1, spec, catalog, warnings)?);
        }

        // Image placement: inline (sequential, one per content slide, overflow
        // promoted) or every image on its own slide.
        let mut image_slides = Vec::new();
        if spec.dedicated_image_slides() {
            for image in &images {
                image_slides.push(Self::image_slide(image, spec, catalog)?);
            }
        } else {
            for (i, image) in images.iter().enumerate() {
                if let Some(slide) = content_slides.get_mut(i) {
                    slide.image = Some(image.clone());
                } else {
                    warnings.push(format!(
                        "No content slide left for image {}; promoted to a dedicated slide",
                        image.path.display()
                    ));
                    image_slides.push(Self::image_slide(image, spec, catalog)?);
                }
            }
        }

        // Cover: brand title plus the description as a clipped subtitle. The
        // subtitle is carried as a bullet, so the bullet character cap applies
        // alongside the subtitle's own limit.
        let deck_title = spec.user().display_name().to_string();
        let mut cover = Slide::new(0, SlideKind::Cover, deck_title.clone());
        let description = spec.input().description.trim();
        let bullet_cap = spec.length_target().bullet_chars_max;
        if !description.is_empty() {
            let (subtitle, _) = clip_chars(description, COVER_SUBTITLE_CHARS_MAX.min(bullet_cap));
            cover.bullets.push(subtitle);
        }

        // Conclusion: recap of content titles, stock bullets as fallback.
        // Recap entries are bullets too and stay within the character cap.
        let max_bullets = spec.length_target().bullets_per_slide_max;
        let mut recap: Vec<String> = content_slides
            .iter()
            .take(max_bullets)
            .map(|s| clip_chars(&s.title, bullet_cap).0)
            .collect();
        if recap.is_empty() {
            for key in ["summary_learnings", "immediate_actions", "responsible_deadlines"] {
                recap.push(catalog.text(spec.language(), key)?.to_string());
            }
        }
        let conclusion = Slide::new(
            0,
            SlideKind::Conclusion,
            catalog.text(spec.language(), "conclusions")?,
        )
        .with_bullets(recap);

        let mut slides = Vec::with_capacity(2 + content_slides.len() + image_slides.len());
        slides.push(cover);
        slides.extend(content_slides);
        slides.extend(image_slides);
        slides.push(conclusion);
        for (index, slide) in slides.iter_mut().enumerate() {
            slide.index = index;
        }

        if slides.len() != spec.slides_count() {
            warnings.push(format!(
                "Deck has {} slides instead of the requested {}",
                slides.len(),
                spec.slides_count()
            ));
        }

        Ok(SlideModel {
            title: deck_title,
            language: spec.language().to_string(),
            theme: spec.theme().clone(),
            footer: spec.footer().clone(),
            logo_path: spec.user().logo_path.clone(),
            slides,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::Unavailable;
    use crate::normalize::InputNormalizer;
    use crate::spec::SpecBuilder;

    /// A ~16-sentence article, enough for several content topics.
    const ARTICLE: &str = "Rust is a systems programming language focused on safety. \
        It achieves memory safety without garbage collection. \
        The ownership system tracks how values are used at compile time. \
        Borrowing allows temporary access without transferring ownership.\n\n\
        The compiler enforces these rules before the program ever runs. \
        Lifetimes describe how long references remain valid. \
        Most lifetime annotations are inferred automatically. \
        Explicit annotations are only needed in ambiguous cases.\n\n\
        Cargo is the build system and package manager. \
        Dependencies are declared in a manifest file. \
        The registry hosts tens of thousands of reusable crates. \
        Semantic versioning keeps upgrades predictable.\n\n\
        The community maintains extensive documentation. \
        The compiler error messages are famously helpful. \
        Many companies now run Rust in production. \
        Adoption continues to grow every year.";

    fn outline_from_description(description: &str, builder: SpecBuilder) -> (SlideModel, Vec<String>) {
        let spec = builder.description(description).build().unwrap();
        let normalizer = InputNormalizer::new(&Unavailable, &Unavailable);
        let catalog = Catalog::new();
        let mut warnings = Vec::new();
        let fragments = normalizer.normalize(&spec, &mut warnings).unwrap();
        let model = ExtractiveOutliner::new()
            .outline(&fragments, &spec, &catalog, &mut warnings)
            .unwrap();
        (model, warnings)
    }

    #[test]
    fn test_requested_slide_count_honored() {
        let (model, _) = outline_from_description(
            ARTICLE,
            SpecBuilder::new().language("es").slides_count(6).bullets_per_slide_max(5),
        );

        assert_eq!(model.len(), 6);
        assert_eq!(model.slides[0].kind, SlideKind::Cover);
        assert_eq!(model.slides[5].kind, SlideKind::Conclusion);
        for slide in model.slides_of_kind(SlideKind::Content) {
            assert!(slide.bullets.len() <= 5);
            assert!(!slide.title.is_empty());
        }
    }

    #[test]
    fn test_indexes_contiguous_and_match_position() {
        let (model, _) = outline_from_description(ARTICLE, SpecBuilder::new().slides_count(8));
        for (i, slide) in model.slides.iter().enumerate() {
            assert_eq!(slide.index, i);
        }
    }

    #[test]
    fn test_thin_content_shrinks_deck_with_warning() {
        let (model, warnings) = outline_from_description(
            "Only fifteen words of content exist here which is far too thin for ten slides.",
            SpecBuilder::new().slides_count(10),
        );

        assert!(model.len() < 10);
        assert_eq!(model.slides[0].kind, SlideKind::Cover);
        assert_eq!(model.slides.last().unwrap().kind, SlideKind::Conclusion);
        assert!(warnings.iter().any(|w| w.contains("Thin content")));
        assert!(warnings.iter().any(|w| w.contains("instead of the requested")));
    }

    #[test]
    fn test_bullets_clipped_to_char_cap() {
        let long_sentence = format!("This opening statement keeps going {}.", "and going ".repeat(30));
        let (model, warnings) = outline_from_description(
            &long_sentence,
            SpecBuilder::new().slides_count(3).bullet_chars_max(120),
        );

        let content = model.slides_of_kind(SlideKind::Content).next().unwrap();
        for bullet in &content.bullets {
            assert!(bullet.chars().count() <= 120);
        }
        assert!(warnings.iter().any(|w| w.contains("clipped")));
    }

    #[test]
    fn test_sentences_beyond_bullet_cap_become_notes() {
        let (model, warnings) = outline_from_description(
            ARTICLE,
            SpecBuilder::new().slides_count(3).bullets_per_slide_max(2),
        );

        let content = model.slides_of_kind(SlideKind::Content).next().unwrap();
        assert_eq!(content.bullets.len(), 2);
        assert!(content.notes.is_some());
        assert!(warnings.iter().any(|w| w.contains("speaker notes")));
    }

    #[test]
    fn test_images_assigned_sequentially_none_dropped() {
        let spec = SpecBuilder::new()
            .description(ARTICLE)
            .slides_count(6)
            .add_image("a.png", "completely unrelated alt text")
            .add_image("b.png", "equally unrelated alt text")
            .build()
            .unwrap();
        let normalizer = InputNormalizer::new(&Unavailable, &Unavailable);
        let catalog = Catalog::new();
        let mut warnings = Vec::new();
        let fragments = normalizer.normalize(&spec, &mut warnings).unwrap();
        let model = ExtractiveOutliner::new()
            .outline(&fragments, &spec, &catalog, &mut warnings)
            .unwrap();

        let attached: Vec<_> = model
            .slides
            .iter()
            .filter_map(|s| s.image.as_ref())
            .collect();
        assert_eq!(attached.len(), 2);
        assert_eq!(attached[0].path.to_str(), Some("a.png"));
        assert_eq!(attached[1].path.to_str(), Some("b.png"));
    }

    #[test]
    fn test_overflow_images_promoted_to_image_slides() {
        let spec = SpecBuilder::new()
            .description("One short sentence. Another short sentence.")
            .slides_count(3) // a single content slot
            .add_image("a.png", "first")
            .add_image("b.png", "second")
            .build()
            .unwrap();
        let normalizer = InputNormalizer::new(&Unavailable, &Unavailable);
        let catalog = Catalog::new();
        let mut warnings = Vec::new();
        let fragments = normalizer.normalize(&spec, &mut warnings).unwrap();
        let model = ExtractiveOutliner::new()
            .outline(&fragments, &spec, &catalog, &mut warnings)
            .unwrap();

        assert_eq!(model.slides_of_kind(SlideKind::Image).count(), 1);
        assert_eq!(
            model.slides.iter().filter(|s| s.image.is_some()).count(),
            2
        );
        assert!(warnings.iter().any(|w| w.contains("promoted")));
        // Conclusion stays last even with promoted slides.
        assert_eq!(model.slides.last().unwrap().kind, SlideKind::Conclusion);
    }

    #[test]
    fn test_dedicated_image_slides() {
        let spec = SpecBuilder::new()
            .description(ARTICLE)
            .slides_count(6)
            .dedicated_image_slides(true)
            .add_image("a.png", "Architecture diagram")
            .build()
            .unwrap();
        let normalizer = InputNormalizer::new(&Unavailable, &Unavailable);
        let catalog = Catalog::new();
        let mut warnings = Vec::new();
        let fragments = normalizer.normalize(&spec, &mut warnings).unwrap();
        let model = ExtractiveOutliner::new()
            .outline(&fragments, &spec, &catalog, &mut warnings)
            .unwrap();

        assert_eq!(model.len(), 6);
        let image_slide = model.slides_of_kind(SlideKind::Image).next().unwrap();
        assert_eq!(image_slide.title, "Architecture diagram");
        assert!(image_slide.image.is_some());
        assert_eq!(model.slides_of_kind(SlideKind::Content).count(), 3);
    }

    #[test]
    fn test_all_audio_unresolved_is_insufficient_content() {
        let spec = SpecBuilder::new().add_audio("only.wav").build().unwrap();
        let normalizer = InputNormalizer::new(&Unavailable, &Unavailable);
        let catalog = Catalog::new();
        let mut warnings = Vec::new();
        let fragments = normalizer.normalize(&spec, &mut warnings).unwrap();

        let err = ExtractiveOutliner::new()
            .outline(&fragments, &spec, &catalog, &mut warnings)
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientContent(_)));
    }

    #[test]
    fn test_unknown_language_fails_before_processing() {
        let spec = SpecBuilder::new()
            .language("fr")
            .description(ARTICLE)
            .build()
            .unwrap();
        let normalizer = InputNormalizer::new(&Unavailable, &Unavailable);
        let catalog = Catalog::new();
        let mut warnings = Vec::new();
        let fragments = normalizer.normalize(&spec, &mut warnings).unwrap();

        let err = ExtractiveOutliner::new()
            .outline(&fragments, &spec, &catalog, &mut warnings)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownLanguage(code) if code == "fr"));
    }

    #[test]
    fn test_conclusion_recaps_content_titles() {
        let (model, _) = outline_from_description(ARTICLE, SpecBuilder::new().slides_count(5));

        let titles: Vec<String> = model
            .slides_of_kind(SlideKind::Content)
            .map(|s| s.title.clone())
            .collect();
        let conclusion = model.slides.last().unwrap();
        assert_eq!(conclusion.title, "Conclusiones y próximos pasos");
        assert_eq!(conclusion.bullets, titles);
    }

    #[test]
    fn test_single_paragraph_splits_into_topics() {
        // One paragraph, six sentences; three content slots force two splits
        // at sentence midpoints.
        let text = "One fact here. Two facts now. Three facts total. \
            Four facts counted. Five facts known. Six facts listed.";
        let (model, _) = outline_from_description(text, SpecBuilder::new().slides_count(5));

        assert_eq!(model.len(), 5);
        assert_eq!(model.slides_of_kind(SlideKind::Content).count(), 3);
        for slide in model.slides_of_kind(SlideKind::Content) {
            assert!(!slide.bullets.is_empty());
        }
    }

    #[test]
    fn test_cover_subtitle_honors_bullet_cap() {
        let description = format!(
            "This single opening sentence {}finally ends here.",
            "keeps on going and going ".repeat(7)
        );
        let spec = SpecBuilder::new()
            .description(&description)
            .slides_count(3)
            .build()
            .unwrap();
        let normalizer = InputNormalizer::new(&Unavailable, &Unavailable);
        let catalog = Catalog::new();
        let mut warnings = Vec::new();
        let fragments = normalizer.normalize(&spec, &mut warnings).unwrap();
        let model = ExtractiveOutliner::new()
            .outline(&fragments, &spec, &catalog, &mut warnings)
            .unwrap();

        let cover = &model.slides[0];
        assert_eq!(cover.bullets.len(), 1);
        assert!(cover.bullets[0].chars().count() <= spec.length_target().bullet_chars_max);

        let (is_valid, findings) = crate::validate::validate_model(&model, &spec);
        assert!(is_valid);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_cover_carries_clipped_subtitle() {
        let (model, _) = outline_from_description(
            ARTICLE,
            SpecBuilder::new().brand_name("Ferrous Labs").slides_count(5),
        );

        let cover = &model.slides[0];
        assert_eq!(cover.title, "Ferrous Labs");
        assert_eq!(cover.bullets.len(), 1);
        assert!(cover.bullets[0].chars().count() <= COVER_SUBTITLE_CHARS_MAX);
    }

    #[test]
    fn test_outline_is_deterministic() {
        let run = || {
            let (model, warnings) =
                outline_from_description(ARTICLE, SpecBuilder::new().slides_count(7));
            (serde_json::to_string(&model).unwrap(), warnings)
        };
        let (a_model, a_warnings) = run();
        let (b_model, b_warnings) = run();
        assert_eq!(a_model, b_model);
        assert_eq!(a_warnings, b_warnings);
    }

    #[test]
    fn test_clip_chars_word_boundary() {
        let (clipped, was_clipped) = clip_chars("alpha beta gamma delta", 15);
        assert!(was_clipped);
        assert!(clipped.ends_with('…'));
        assert!(clipped.chars().count() <= 15);

        let (unchanged, was_clipped) = clip_chars("short", 15);
        assert!(!was_clipped);
        assert_eq!(unchanged, "short");
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("First one. Second one! Third one? Trailing");
        assert_eq!(sentences.len(), 4);
        assert_eq!(sentences[0].text, "First one.");
        assert_eq!(sentences[3].text, "Trailing");
    }
}
