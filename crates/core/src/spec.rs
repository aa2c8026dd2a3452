//! The declarative specification describing a desired deck.
//!
//! Construction is two-phase: a [`SpecBuilder`] accumulates fields (and is
//! the serde target for JSON specification documents), then `build()` runs
//! every cross-field check at once and returns an immutable [`Specification`].

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Upper bound on the requested slide count.
pub const SLIDES_MAX: usize = 100;

/// Minimum deck size: cover + at least one content slide + conclusion.
pub const SLIDES_MIN: usize = 3;

static HEX_COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

/// Presenter / brand identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub name: String,
    pub brand_name: String,
    /// Optional logo placed on every slide.
    pub logo_path: Option<PathBuf>,
}

impl Default for UserInfo {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            brand_name: "Company".to_string(),
            logo_path: None,
        }
    }
}

impl UserInfo {
    /// Name shown on the cover: brand name, falling back to the user name.
    pub fn display_name(&self) -> &str {
        if !self.brand_name.trim().is_empty() {
            &self.brand_name
        } else {
            &self.name
        }
    }
}

/// Footer configuration shared by every slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Footer {
    pub text: String,
    pub show_slide_numbers: bool,
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            text: "Confidential".to_string(),
            show_slide_numbers: true,
        }
    }
}

/// Visual theme: one font family and three hex colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub font_family: String,
    pub primary_color: String,
    pub accent_color: String,
    pub bg_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            primary_color: "#1F2D3D".to_string(),
            accent_color: "#2979FF".to_string(),
            bg_color: "#FFFFFF".to_string(),
        }
    }
}

/// A user-supplied image with alternative text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub path: PathBuf,
    #[serde(default)]
    pub alt: String,
}

/// Raw source material for the deck.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBundle {
    pub description: String,
    pub images: Vec<ImageRef>,
    pub audio_paths: Vec<PathBuf>,
}

impl InputBundle {
    /// True if any input kind carries content.
    pub fn has_content(&self) -> bool {
        !self.description.trim().is_empty()
            || !self.images.is_empty()
            || !self.audio_paths.is_empty()
    }
}

/// Length and structure budgets for the generated content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthTarget {
    /// Target word count for the summarized corpus.
    pub summary_words: usize,
    /// Maximum bullets on any single slide.
    pub bullets_per_slide_max: usize,
    /// Maximum characters per bullet before clipping.
    pub bullet_chars_max: usize,
}

impl Default for LengthTarget {
    fn default() -> Self {
        Self {
            summary_words: 500,
            bullets_per_slide_max: 6,
            bullet_chars_max: 120,
        }
    }
}

/// Validated, immutable description of the desired deck.
///
/// Only [`SpecBuilder::build`] constructs one; all access is read-only.
#[derive(Debug, Clone, Serialize)]
pub struct Specification {
    language: String,
    slides_count: usize,
    user: UserInfo,
    footer: Footer,
    theme: Theme,
    input: InputBundle,
    length_target: LengthTarget,
    output_dir: PathBuf,
    enable_research: bool,
    dedicated_image_slides: bool,
}

impl Specification {
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn slides_count(&self) -> usize {
        self.slides_count
    }

    pub fn user(&self) -> &UserInfo {
        &self.user
    }

    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn input(&self) -> &InputBundle {
        &self.input
    }

    pub fn length_target(&self) -> &LengthTarget {
        &self.length_target
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn enable_research(&self) -> bool {
        self.enable_research
    }

    pub fn dedicated_image_slides(&self) -> bool {
        self.dedicated_image_slides
    }
}

/// Mutable staging area for a [`Specification`].
///
/// Setters perform only syntactic normalization; cross-field invariants are
/// checked in `build()`, which reports every violation at once. Deserializes
/// from partial JSON documents, filling omitted fields with defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecBuilder {
    pub language: String,
    pub slides_count: usize,
    pub user: UserInfo,
    pub footer: Footer,
    pub theme: Theme,
    pub input: InputBundle,
    pub length_target: LengthTarget,
    pub output_dir: PathBuf,
    pub enable_research: bool,
    pub dedicated_image_slides: bool,
}

impl Default for SpecBuilder {
    fn default() -> Self {
        Self {
            language: "es".to_string(),
            slides_count: 10,
            user: UserInfo::default(),
            footer: Footer::default(),
            theme: Theme::default(),
            input: InputBundle::default(),
            length_target: LengthTarget::default(),
            output_dir: PathBuf::from("output"),
            enable_research: false,
            dedicated_image_slides: false,
        }
    }
}

impl SpecBuilder {
    /// Start from the default specification template.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language(mut self, code: impl Into<String>) -> Self {
        self.language = code.into().trim().to_lowercase();
        self
    }

    pub fn slides_count(mut self, count: usize) -> Self {
        self.slides_count = count;
        self
    }

    pub fn user_name(mut self, name: impl Into<String>) -> Self {
        self.user.name = name.into();
        self
    }

    pub fn brand_name(mut self, brand: impl Into<String>) -> Self {
        self.user.brand_name = brand.into();
        self
    }

    pub fn logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.user.logo_path = Some(path.into());
        self
    }

    pub fn footer(mut self, text: impl Into<String>, show_slide_numbers: bool) -> Self {
        self.footer.text = text.into();
        self.footer.show_slide_numbers = show_slide_numbers;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.input.description = text.into();
        self
    }

    pub fn add_image(mut self, path: impl Into<PathBuf>, alt: impl Into<String>) -> Self {
        self.input.images.push(ImageRef {
            path: path.into(),
            alt: alt.into(),
        });
        self
    }

    pub fn add_audio(mut self, path: impl Into<PathBuf>) -> Self {
        self.input.audio_paths.push(path.into());
        self
    }

    pub fn summary_words(mut self, words: usize) -> Self {
        self.length_target.summary_words = words;
        self
    }

    pub fn bullets_per_slide_max(mut self, max: usize) -> Self {
        self.length_target.bullets_per_slide_max = max;
        self
    }

    pub fn bullet_chars_max(mut self, max: usize) -> Self {
        self.length_target.bullet_chars_max = max;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn enable_research(mut self, enable: bool) -> Self {
        self.enable_research = enable;
        self
    }

    pub fn dedicated_image_slides(mut self, dedicated: bool) -> Self {
        self.dedicated_image_slides = dedicated;
        self
    }

    /// Validate every invariant and return the immutable specification.
    ///
    /// All violations are collected and reported together so a caller can fix
    /// a malformed document in one pass.
    pub fn build(self) -> Result<Specification> {
        let mut violations = Vec::new();

        if self.language.trim().is_empty() {
            violations.push("language must not be empty".to_string());
        }

        if self.slides_count < SLIDES_MIN {
            violations.push(format!(
                "slides_count must be at least {} (cover + content + conclusion), got {}",
                SLIDES_MIN, self.slides_count
            ));
        } else if self.slides_count > SLIDES_MAX {
            violations.push(format!(
                "slides_count must be at most {}, got {}",
                SLIDES_MAX, self.slides_count
            ));
        }

        if self.user.name.trim().is_empty() && self.user.brand_name.trim().is_empty() {
            violations.push("user must have a name or a brand_name".to_string());
        }

        if let Some(logo) = &self.user.logo_path {
            if !logo.exists() {
                violations.push(format!("logo file not found: {}", logo.display()));
            }
        }

        if self.theme.font_family.trim().is_empty() {
            violations.push("theme.font_family must not be empty".to_string());
        }
        for (field, value) in [
            ("theme.primary_color", &self.theme.primary_color),
            ("theme.accent_color", &self.theme.accent_color),
            ("theme.bg_color", &self.theme.bg_color),
        ] {
            if !HEX_COLOR_REGEX.is_match(value) {
                violations.push(format!(
                    "{} must be a #RRGGBB hex triplet, got '{}'",
                    field, value
                ));
            }
        }

        if !self.input.has_content() {
            violations.push(
                "input must have a description, images, or audio_paths".to_string(),
            );
        }

        if self.length_target.summary_words == 0 {
            violations.push("length_target.summary_words must be positive".to_string());
        }
        if self.length_target.bullets_per_slide_max == 0 {
            violations.push("length_target.bullets_per_slide_max must be positive".to_string());
        }
        if self.length_target.bullet_chars_max == 0 {
            violations.push("length_target.bullet_chars_max must be positive".to_string());
        }

        if !violations.is_empty() {
            return Err(Error::Validation(violations));
        }

        Ok(Specification {
            language: self.language.trim().to_lowercase(),
            slides_count: self.slides_count,
            user: self.user,
            footer: self.footer,
            theme: self.theme,
            input: self.input,
            length_target: self.length_target,
            output_dir: self.output_dir,
            enable_research: self.enable_research,
            dedicated_image_slides: self.dedicated_image_slides,
        })
    }
}
