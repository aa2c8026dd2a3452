//! Static HTML renderer backend.
//!
//! Produces a single self-contained document mirroring the PPTX output's
//! visual hierarchy: one styled `.slide` block per slide, theme-driven inline
//! CSS, footer with optional slide numbers, print and small-screen rules.

use deck_core::{Catalog, Result, Slide, SlideKind, SlideModel};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Escape text for HTML element and attribute content.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renderer mapping a [`SlideModel`] to a standalone HTML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render the deck to an HTML string.
    pub fn render(&self, model: &SlideModel, catalog: &Catalog) -> Result<String> {
        catalog.ensure_language(&model.language)?;
        model.ensure_renderable()?;

        let title_text = catalog.text(&model.language, "cover")?;
        let total = model.slides.len();
        log::debug!("rendering {} slides to HTML", total);

        let mut html = String::new();
        html.push_str("<!doctype html>\n");
        let _ = writeln!(html, "<html lang=\"{}\">", escape(&model.language));
        html.push_str("<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        let _ = writeln!(
            html,
            "<title>{} — {}</title>",
            escape(&model.title),
            escape(title_text)
        );
        html.push_str(&stylesheet(model));
        html.push_str("</head>\n<body>\n<div class=\"container\">\n");

        for slide in &model.slides {
            html.push_str(&self.slide_html(model, slide, total));
        }

        html.push_str("</div>\n</body>\n</html>\n");
        Ok(html)
    }

    /// Render to a file, writing a temporary sibling first and renaming only
    /// on full success so a failed run leaves no half-written artifact.
    pub fn render_to_file(
        &self,
        model: &SlideModel,
        catalog: &Catalog,
        path: &Path,
    ) -> Result<()> {
        let html = self.render(model, catalog)?;
        let tmp = path.with_extension("html.tmp");
        fs::write(&tmp, html.as_bytes())?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn slide_html(&self, model: &SlideModel, slide: &Slide, total: usize) -> String {
        let mut out = String::new();
        let class = match slide.kind {
            SlideKind::Cover => "slide cover-slide",
            SlideKind::Image => "slide image-slide",
            _ => "slide",
        };
        let _ = writeln!(out, "<div class=\"{}\">", class);

        if let Some(logo) = &model.logo_path {
            let _ = writeln!(
                out,
                "<img src=\"{}\" alt=\"{} Logo\" class=\"logo\">",
                escape(&logo.display().to_string()),
                escape(&model.title)
            );
        }

        let _ = writeln!(out, "<div class=\"title\">{}</div>", escape(&slide.title));

        match slide.kind {
            SlideKind::Cover => {
                // The single cover bullet is the subtitle line.
                if let Some(subtitle) = slide.bullets.first() {
                    let _ = writeln!(
                        out,
                        "<div class=\"subtitle\">{}</div>",
                        escape(subtitle)
                    );
                }
            }
            _ => {
                if !slide.bullets.is_empty() || slide.image.is_some() {
                    out.push_str("<div class=\"content\">\n");
                    if !slide.bullets.is_empty() {
                        out.push_str("<ul class=\"bullets\">\n");
                        for bullet in &slide.bullets {
                            let _ = writeln!(out, "<li>{}</li>", escape(bullet));
                        }
                        out.push_str("</ul>\n");
                    }
                    if let Some(image) = &slide.image {
                        let _ = writeln!(
                            out,
                            "<div class=\"image-container\">\n<img src=\"{}\" alt=\"{}\">\n</div>",
                            escape(&image.path.display().to_string()),
                            escape(&image.alt)
                        );
                    }
                    out.push_str("</div>\n");
                }
            }
        }

        let footer = if model.footer.show_slide_numbers {
            format!(
                "{} | {}/{}",
                escape(&model.footer.text),
                slide.index + 1,
                total
            )
        } else {
            escape(&model.footer.text)
        };
        let _ = writeln!(out, "<div class=\"footer\">{}</div>", footer);

        out.push_str("</div>\n");
        out
    }
}

/// Inline stylesheet derived from the deck theme.
fn stylesheet(model: &SlideModel) -> String {
    let theme = &model.theme;
    format!(
        r#"<style>
  * {{ margin: 0; padding: 0; box-sizing: border-box; }}

  body {{
    font-family: {font}, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
    color: {primary};
    background: {bg};
    line-height: 1.6;
  }}

  .container {{
    max-width: 1200px;
    margin: 0 auto;
    padding: 20px;
  }}

  .slide {{
    width: 100%;
    max-width: 960px;
    min-height: 540px;
    margin: 24px auto;
    padding: 40px;
    background: white;
    border: 1px solid #e0e0e0;
    border-radius: 8px;
    box-shadow: 0 2px 8px rgba(0,0,0,0.1);
    position: relative;
    page-break-after: always;
  }}

  .logo {{
    position: absolute;
    top: 16px;
    right: 40px;
    max-height: 40px;
    max-width: 150px;
  }}

  .title {{
    font-size: 28px;
    font-weight: 700;
    margin-bottom: 24px;
    color: {primary};
    padding-top: 8px;
  }}

  .subtitle {{
    font-size: 16px;
    color: {accent};
    margin-bottom: 16px;
    margin-top: -12px;
  }}

  .content {{
    display: flex;
    gap: 32px;
    margin-bottom: 40px;
  }}

  .bullets {{
    flex: 1;
    list-style-position: inside;
    padding-left: 0;
  }}

  .bullets li {{
    font-size: 18px;
    margin: 12px 0;
    padding-left: 8px;
    color: {primary};
  }}

  .image-container {{
    flex: 0 0 320px;
    text-align: center;
  }}

  .image-slide .image-container {{
    flex: 1;
  }}

  .image-container img {{
    max-width: 100%;
    height: auto;
    border-radius: 4px;
  }}

  .footer {{
    font-size: 11px;
    margin-top: 32px;
    padding-top: 16px;
    border-top: 1px solid #e0e0e0;
    color: {primary};
    opacity: 0.8;
  }}

  .cover-slide {{
    display: flex;
    flex-direction: column;
    justify-content: center;
    align-items: flex-start;
  }}

  .cover-slide .title {{
    font-size: 42px;
    margin-bottom: 16px;
  }}

  @media print {{
    .slide {{
      box-shadow: none;
      border: none;
      margin: 0;
      page-break-after: always;
    }}
  }}

  @media (max-width: 768px) {{
    .slide {{
      padding: 24px;
      min-height: auto;
    }}

    .content {{
      flex-direction: column;
    }}

    .image-container {{
      flex: 1;
    }}

    .title {{
      font-size: 24px;
    }}

    .cover-slide .title {{
      font-size: 32px;
    }}

    .bullets li {{
      font-size: 16px;
    }}
  }}
</style>
"#,
        font = theme.font_family,
        primary = theme.primary_color,
        accent = theme.accent_color,
        bg = theme.bg_color,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Error, Footer, ImageAttachment, Theme};

    fn sample_model() -> SlideModel {
        SlideModel {
            title: "Acme".to_string(),
            language: "es".to_string(),
            theme: Theme::default(),
            footer: Footer::default(),
            logo_path: None,
            slides: vec![
                Slide::new(0, SlideKind::Cover, "Acme")
                    .with_bullets(vec!["Resumen trimestral".to_string()]),
                Slide::new(1, SlideKind::Content, "Resultados")
                    .with_bullets(vec!["Ingresos al alza".to_string()]),
                Slide::new(2, SlideKind::Conclusion, "Conclusiones")
                    .with_bullets(vec!["Resultados".to_string()]),
            ],
        }
    }

    #[test]
    fn test_renders_one_block_per_slide() {
        let html = HtmlRenderer::new()
            .render(&sample_model(), &Catalog::new())
            .unwrap();
        assert_eq!(html.matches("<div class=\"slide").count(), 3);
        assert_eq!(html.matches("cover-slide").count() >= 1, true);
    }

    #[test]
    fn test_localized_document_title() {
        let html = HtmlRenderer::new()
            .render(&sample_model(), &Catalog::new())
            .unwrap();
        assert!(html.contains("<title>Acme — Portada</title>"));
        assert!(html.contains("<html lang=\"es\">"));
    }

    #[test]
    fn test_theme_flows_into_stylesheet() {
        let html = HtmlRenderer::new()
            .render(&sample_model(), &Catalog::new())
            .unwrap();
        assert!(html.contains("#1F2D3D"));
        assert!(html.contains("#2979FF"));
        assert!(html.contains("font-family: Inter"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut model = sample_model();
        model.slides[1].title = "Profit <&> Loss".to_string();
        let html = HtmlRenderer::new().render(&model, &Catalog::new()).unwrap();
        assert!(html.contains("Profit &lt;&amp;&gt; Loss"));
        assert!(!html.contains("Profit <&> Loss"));
    }

    #[test]
    fn test_footer_numbering() {
        let html = HtmlRenderer::new()
            .render(&sample_model(), &Catalog::new())
            .unwrap();
        assert!(html.contains("Confidential | 1/3"));
        assert!(html.contains("Confidential | 3/3"));

        let mut without = sample_model();
        without.footer.show_slide_numbers = false;
        let html = HtmlRenderer::new().render(&without, &Catalog::new()).unwrap();
        assert!(!html.contains("| 1/3"));
    }

    #[test]
    fn test_image_rendered_with_alt() {
        let mut model = sample_model();
        model.slides[1].image = Some(ImageAttachment {
            path: "figs/chart.png".into(),
            alt: "Revenue chart".to_string(),
        });
        let html = HtmlRenderer::new().render(&model, &Catalog::new()).unwrap();
        assert!(html.contains("src=\"figs/chart.png\""));
        assert!(html.contains("alt=\"Revenue chart\""));
    }

    #[test]
    fn test_logo_on_every_slide() {
        let mut model = sample_model();
        model.logo_path = Some("logo.png".into());
        let html = HtmlRenderer::new().render(&model, &Catalog::new()).unwrap();
        assert_eq!(html.matches("class=\"logo\"").count(), 3);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let model = sample_model();
        let catalog = Catalog::new();
        let renderer = HtmlRenderer::new();
        assert_eq!(
            renderer.render(&model, &catalog).unwrap(),
            renderer.render(&model, &catalog).unwrap()
        );
    }

    #[test]
    fn test_structural_violation_names_slide() {
        let mut model = sample_model();
        model.slides[1].title = String::new();

        let err = HtmlRenderer::new()
            .render(&model, &Catalog::new())
            .unwrap_err();
        match err {
            Error::Render { slide, .. } => assert_eq!(slide, 1),
            other => panic!("expected Render, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_language_fails_before_rendering() {
        let mut model = sample_model();
        model.language = "fr".to_string();
        let err = HtmlRenderer::new()
            .render(&model, &Catalog::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownLanguage(_)));
    }
}
