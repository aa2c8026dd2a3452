//! Input normalization: raw heterogeneous inputs to uniform text fragments.
//!
//! Every input kind becomes zero or more [`NormalizedFragment`]s in a stable
//! order: description text first, then images (their alt text), then audio
//! transcripts. Image bytes are never touched here; audio is delegated to the
//! injected transcriber and degrades to an unresolved fragment on failure.

use crate::collab::{Expander, Transcriber};
use crate::spec::Specification;
use crate::{Error, Result};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to split text into paragraphs on blank lines.
static PARAGRAPH_SPLIT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Which input kind a fragment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Text,
    Audio,
    Image,
}

/// A uniform text fragment with provenance, produced transiently per run.
#[derive(Debug, Clone)]
pub struct NormalizedFragment {
    /// Normalized text content. Paragraphs are separated by blank lines.
    pub text: String,

    pub kind: SourceKind,

    /// Original file path for image and audio fragments.
    pub source: Option<PathBuf>,

    /// False when a collaborator could not produce the content
    /// (e.g. transcription unavailable). Downstream stages warn but continue.
    pub resolved: bool,
}

impl NormalizedFragment {
    fn text_fragment(text: String) -> Self {
        Self {
            text,
            kind: SourceKind::Text,
            source: None,
            resolved: true,
        }
    }

    /// True if this fragment contributes usable text to the corpus.
    pub fn is_usable(&self) -> bool {
        self.resolved && !self.text.trim().is_empty()
    }
}

/// Normalize a block of text: NFC, unified line endings, whitespace runs
/// collapsed, lines trimmed. Paragraph breaks (blank lines) are preserved;
/// single line breaks inside a paragraph are treated as soft wraps.
pub fn normalize_text(text: &str) -> String {
    let text: String = text.nfc().collect();
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    PARAGRAPH_SPLIT_REGEX
        .split(&text)
        .map(|para| para.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|para| !para.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Converts the specification's input bundle into normalized fragments.
pub struct InputNormalizer<'a> {
    transcriber: &'a dyn Transcriber,
    expander: &'a dyn Expander,
}

impl<'a> InputNormalizer<'a> {
    pub fn new(transcriber: &'a dyn Transcriber, expander: &'a dyn Expander) -> Self {
        Self {
            transcriber,
            expander,
        }
    }

    /// Produce fragments for every input, in stable order.
    ///
    /// Collaborator failures degrade: an unavailable expander falls back to
    /// the raw description, an unavailable transcriber emits an unresolved
    /// fragment. Both leave a warning. Only a completely empty input bundle
    /// is fatal (already rejected by the builder; re-checked here).
    pub fn normalize(
        &self,
        spec: &Specification,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<NormalizedFragment>> {
        let input = spec.input();
        if !input.has_content() {
            return Err(Error::Input(
                "specification has no description, images, or audio".to_string(),
            ));
        }

        let mut fragments = Vec::new();

        // 1. Description text, optionally expanded by the research collaborator.
        let description = input.description.trim();
        if !description.is_empty() {
            let text = if spec.enable_research() {
                match self
                    .expander
                    .expand(description, spec.length_target().summary_words)
                {
                    Ok(expanded) => expanded,
                    Err(e) => {
                        log::warn!("Expansion degraded: {}", e);
                        warnings.push(format!("{} (using raw description)", e));
                        description.to_string()
                    }
                }
            } else {
                description.to_string()
            };
            fragments.push(NormalizedFragment::text_fragment(normalize_text(&text)));
        }

        // 2. Images: alt text feeds summarization context; bytes stay untouched.
        for image in &input.images {
            fragments.push(NormalizedFragment {
                text: normalize_text(&image.alt),
                kind: SourceKind::Image,
                source: Some(image.path.clone()),
                resolved: true,
            });
        }

        // 3. Audio transcripts.
        for audio_path in &input.audio_paths {
            match self.transcriber.transcribe(audio_path) {
                Ok(transcript) => fragments.push(NormalizedFragment {
                    text: normalize_text(&transcript),
                    kind: SourceKind::Audio,
                    source: Some(audio_path.clone()),
                    resolved: true,
                }),
                Err(e) => {
                    log::warn!("Transcription degraded: {}", e);
                    warnings.push(format!("Unresolved audio {}: {}", audio_path.display(), e));
                    fragments.push(NormalizedFragment {
                        text: String::new(),
                        kind: SourceKind::Audio,
                        source: Some(audio_path.clone()),
                        resolved: false,
                    });
                }
            }
        }

        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{CollabError, Unavailable};
    use crate::spec::SpecBuilder;
    use std::path::Path;

    struct FixedTranscriber(&'static str);

    impl Transcriber for FixedTranscriber {
        fn transcribe(&self, _audio_path: &Path) -> std::result::Result<String, CollabError> {
            Ok(self.0.to_string())
        }
    }

    struct FixedExpander(&'static str);

    impl Expander for FixedExpander {
        fn expand(
            &self,
            _topic: &str,
            _target_words: usize,
        ) -> std::result::Result<String, CollabError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_normalize_text_collapses_whitespace() {
        assert_eq!(normalize_text("Hello    world"), "Hello world");
        assert_eq!(normalize_text("  padded  \t text "), "padded text");
    }

    #[test]
    fn test_normalize_text_preserves_paragraphs() {
        let input = "First paragraph\nstill first.\r\n\r\nSecond paragraph.";
        assert_eq!(
            normalize_text(input),
            "First paragraph still first.\n\nSecond paragraph."
        );
    }

    #[test]
    fn test_fragment_order_text_then_images_then_audio() {
        let spec = SpecBuilder::new()
            .description("Some description.")
            .add_image("a.png", "Alt A")
            .add_audio("talk.wav")
            .build()
            .unwrap();

        let transcriber = FixedTranscriber("Transcript text.");
        let normalizer = InputNormalizer::new(&transcriber, &Unavailable);
        let mut warnings = Vec::new();
        let fragments = normalizer.normalize(&spec, &mut warnings).unwrap();

        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0].kind, SourceKind::Text);
        assert_eq!(fragments[1].kind, SourceKind::Image);
        assert_eq!(fragments[2].kind, SourceKind::Audio);
        assert_eq!(fragments[2].text, "Transcript text.");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unresolved_audio_degrades_with_warning() {
        let spec = SpecBuilder::new()
            .description("Primary content sentence.")
            .add_audio("missing.wav")
            .build()
            .unwrap();

        let normalizer = InputNormalizer::new(&Unavailable, &Unavailable);
        let mut warnings = Vec::new();
        let fragments = normalizer.normalize(&spec, &mut warnings).unwrap();

        assert_eq!(fragments.len(), 2);
        let audio = &fragments[1];
        assert_eq!(audio.kind, SourceKind::Audio);
        assert!(!audio.resolved);
        assert!(!audio.is_usable());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("missing.wav"));
    }

    #[test]
    fn test_expander_failure_falls_back_to_raw_description() {
        let spec = SpecBuilder::new()
            .description("Short topic.")
            .enable_research(true)
            .build()
            .unwrap();

        let normalizer = InputNormalizer::new(&Unavailable, &Unavailable);
        let mut warnings = Vec::new();
        let fragments = normalizer.normalize(&spec, &mut warnings).unwrap();

        assert_eq!(fragments[0].text, "Short topic.");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_expander_used_when_research_enabled() {
        let spec = SpecBuilder::new()
            .description("Short topic.")
            .enable_research(true)
            .build()
            .unwrap();

        let expander = FixedExpander("An expanded treatment of the topic.");
        let normalizer = InputNormalizer::new(&Unavailable, &expander);
        let mut warnings = Vec::new();
        let fragments = normalizer.normalize(&spec, &mut warnings).unwrap();

        assert_eq!(fragments[0].text, "An expanded treatment of the topic.");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_image_fragment_keeps_path_provenance() {
        let spec = SpecBuilder::new()
            .add_image("figs/chart.png", "Quarterly revenue chart")
            .build()
            .unwrap();

        let normalizer = InputNormalizer::new(&Unavailable, &Unavailable);
        let mut warnings = Vec::new();
        let fragments = normalizer.normalize(&spec, &mut warnings).unwrap();

        assert_eq!(fragments[0].kind, SourceKind::Image);
        assert_eq!(
            fragments[0].source.as_deref(),
            Some(Path::new("figs/chart.png"))
        );
        assert_eq!(fragments[0].text, "Quarterly revenue chart");
    }
}
