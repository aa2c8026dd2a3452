//! Standalone content validation for slide models.
//!
//! Pure and idempotent: callers may validate a freshly generated model, an
//! externally constructed one, or the same model repeatedly with identical
//! results. Nothing here mutates the model or performs I/O beyond probing
//! image paths.

use crate::model::{SlideKind, SlideModel};
use crate::spec::Specification;

/// Check a slide model against the specification's structural rules.
///
/// Returns `(is_valid, findings)`. `is_valid` is false only for hard
/// structural violations (bullet overflow, empty titles, misplaced cover or
/// conclusion, broken indexing). The bullet caps bind on every slide kind.
/// Soft findings (a slide-count deviation in either direction or a missing
/// image file) are reported in the list but do not invalidate the model,
/// since generation already records them as accepted degradations.
pub fn validate_model(model: &SlideModel, spec: &Specification) -> (bool, Vec<String>) {
    let mut findings = Vec::new();
    let mut hard_violations = 0usize;

    let hard = |findings: &mut Vec<String>, count: &mut usize, msg: String| {
        findings.push(msg);
        *count += 1;
    };

    if model.is_empty() {
        return (false, vec!["deck has no slides".to_string()]);
    }

    if model.slides[0].kind != SlideKind::Cover {
        hard(
            &mut findings,
            &mut hard_violations,
            "first slide must be the cover".to_string(),
        );
    }
    if model.slides.last().map(|s| s.kind) != Some(SlideKind::Conclusion) {
        hard(
            &mut findings,
            &mut hard_violations,
            "last slide must be the conclusion".to_string(),
        );
    }

    let max_bullets = spec.length_target().bullets_per_slide_max;
    let max_chars = spec.length_target().bullet_chars_max;

    for (position, slide) in model.slides.iter().enumerate() {
        if slide.index != position {
            hard(
                &mut findings,
                &mut hard_violations,
                format!(
                    "slide at position {} carries index {}",
                    position, slide.index
                ),
            );
        }

        if slide.title.trim().is_empty() {
            hard(
                &mut findings,
                &mut hard_violations,
                format!("slide {} has an empty title", position),
            );
        }

        if slide.bullets.len() > max_bullets {
            hard(
                &mut findings,
                &mut hard_violations,
                format!(
                    "slide {} has {} bullets (max: {})",
                    position,
                    slide.bullets.len(),
                    max_bullets
                ),
            );
        }

        for (j, bullet) in slide.bullets.iter().enumerate() {
            if bullet.chars().count() > max_chars {
                hard(
                    &mut findings,
                    &mut hard_violations,
                    format!(
                        "slide {}, bullet {} is too long ({} chars, max: {})",
                        position,
                        j + 1,
                        bullet.chars().count(),
                        max_chars
                    ),
                );
            }
        }

        if let Some(image) = &slide.image {
            if !image.path.exists() {
                findings.push(format!(
                    "slide {}: image not found: {}",
                    position,
                    image.path.display()
                ));
            }
        }
    }

    if model.len() != spec.slides_count() {
        findings.push(format!(
            "deck has {} slides, specification requested {}",
            model.len(),
            spec.slides_count()
        ));
    }

    (hard_violations == 0, findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageAttachment, Slide, SlideModel};
    use crate::spec::{SpecBuilder, Specification};

    fn spec(slides: usize) -> Specification {
        SpecBuilder::new()
            .description("Some content.")
            .slides_count(slides)
            .build()
            .unwrap()
    }

    fn model_of(slides: Vec<Slide>) -> SlideModel {
        SlideModel {
            title: "Deck".to_string(),
            language: "en".to_string(),
            theme: Default::default(),
            footer: Default::default(),
            logo_path: None,
            slides,
        }
    }

    fn well_formed(n: usize) -> SlideModel {
        let mut slides = vec![Slide::new(0, SlideKind::Cover, "Deck")];
        for i in 1..n - 1 {
            slides.push(
                Slide::new(i, SlideKind::Content, format!("Topic {}", i))
                    .with_bullets(vec!["A point".to_string()]),
            );
        }
        slides.push(Slide::new(n - 1, SlideKind::Conclusion, "Wrap up"));
        model_of(slides)
    }

    #[test]
    fn test_well_formed_model_is_valid() {
        let (is_valid, findings) = validate_model(&well_formed(4), &spec(4));
        assert!(is_valid);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_empty_deck_is_invalid() {
        let (is_valid, findings) = validate_model(&model_of(vec![]), &spec(3));
        assert!(!is_valid);
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_misplaced_cover_and_conclusion() {
        let slides = vec![
            Slide::new(0, SlideKind::Content, "Not a cover"),
            Slide::new(1, SlideKind::Content, "Not a conclusion"),
        ];
        let (is_valid, findings) = validate_model(&model_of(slides), &spec(3));
        assert!(!is_valid);
        assert!(findings.iter().any(|f| f.contains("cover")));
        assert!(findings.iter().any(|f| f.contains("conclusion")));
    }

    #[test]
    fn test_bullet_overflow_is_hard_violation() {
        let mut model = well_formed(4);
        model.slides[1].bullets = (0..10).map(|i| format!("Bullet {}", i)).collect();

        let (is_valid, findings) = validate_model(&model, &spec(4));
        assert!(!is_valid);
        assert!(findings.iter().any(|f| f.contains("bullets (max: 6)")));
    }

    #[test]
    fn test_long_bullet_is_hard_violation() {
        let mut model = well_formed(4);
        model.slides[1].bullets = vec!["x".repeat(200)];

        let (is_valid, findings) = validate_model(&model, &spec(4));
        assert!(!is_valid);
        assert!(findings.iter().any(|f| f.contains("too long")));
    }

    #[test]
    fn test_empty_title_is_hard_violation() {
        let mut model = well_formed(4);
        model.slides[2].title = "   ".to_string();

        let (is_valid, findings) = validate_model(&model, &spec(4));
        assert!(!is_valid);
        assert!(findings.iter().any(|f| f.contains("empty title")));
    }

    #[test]
    fn test_broken_index_is_hard_violation() {
        let mut model = well_formed(4);
        model.slides[2].index = 7;

        let (is_valid, findings) = validate_model(&model, &spec(4));
        assert!(!is_valid);
        assert!(findings.iter().any(|f| f.contains("carries index 7")));
    }

    #[test]
    fn test_bullet_caps_apply_to_every_slide_kind() {
        // Conclusion with far too many bullets.
        let mut model = well_formed(4);
        let last = model.slides.len() - 1;
        model.slides[last].bullets = (0..100).map(|i| format!("Recap {}", i)).collect();

        let (is_valid, findings) = validate_model(&model, &spec(4));
        assert!(!is_valid);
        assert!(findings.iter().any(|f| f.contains("bullets (max: 6)")));

        // Cover with an overlong subtitle bullet.
        let mut model = well_formed(4);
        model.slides[0].bullets = vec!["x".repeat(200)];

        let (is_valid, findings) = validate_model(&model, &spec(4));
        assert!(!is_valid);
        assert!(findings.iter().any(|f| f.contains("too long")));
    }

    #[test]
    fn test_count_deviation_is_soft() {
        let (is_valid, findings) = validate_model(&well_formed(4), &spec(10));
        assert!(is_valid);
        assert!(findings.iter().any(|f| f.contains("requested 10")));
    }

    #[test]
    fn test_upward_count_deviation_is_soft() {
        let (is_valid, findings) = validate_model(&well_formed(5), &spec(3));
        assert!(is_valid);
        assert!(findings.iter().any(|f| f.contains("requested 3")));
    }

    #[test]
    fn test_missing_image_file_is_soft() {
        let mut model = well_formed(4);
        model.slides[1].image = Some(ImageAttachment {
            path: "/no/such/image.png".into(),
            alt: String::new(),
        });

        let (is_valid, findings) = validate_model(&model, &spec(4));
        assert!(is_valid);
        assert!(findings.iter().any(|f| f.contains("image not found")));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let mut model = well_formed(4);
        model.slides[1].bullets = (0..10).map(|i| format!("Bullet {}", i)).collect();
        let s = spec(4);

        let first = validate_model(&model, &s);
        let second = validate_model(&model, &s);
        assert_eq!(first, second);
    }
}
