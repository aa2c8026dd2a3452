//! PPTX package writer.
//!
//! Builds a minimal valid OOXML presentation: content types, package and part
//! relationships, one slide master/layout/theme trio derived from the deck
//! theme, and one slide part per slide. Media bytes are embedded for images
//! that exist on disk; missing files degrade to a logged warning.
//!
//! Output is byte-deterministic: parts are written in a fixed order and every
//! ZIP entry carries a fixed timestamp.

use deck_core::{Catalog, Error, Result, Slide, SlideKind, SlideModel, Theme};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// 10 x 7.5 inch slide canvas, in EMU (914400 per inch).
const SLIDE_CX: i64 = 9_144_000;
const SLIDE_CY: i64 = 6_858_000;

/// Shape geometry as (x, y, cx, cy) in EMU. Derived from the drawing layout
/// the deck replicates: title band, left bullet column, right image column,
/// footer strip.
type Geom = (i64, i64, i64, i64);

const TITLE_GEOM: Geom = (457_200, 548_640, 8_229_600, 914_400);
const SUBTITLE_GEOM: Geom = (457_200, 1_828_800, 8_229_600, 914_400);
const BULLETS_GEOM: Geom = (457_200, 1_554_480, 4_754_880, 4_114_800);
const IMAGE_GEOM: Geom = (5_577_840, 1_554_480, 2_926_080, 2_194_560);
const IMAGE_SLIDE_GEOM: Geom = (1_828_800, 1_554_480, 5_486_400, 4_114_800);
const LOGO_GEOM: Geom = (7_772_400, 274_320, 1_371_600, 457_200);
const FOOTER_GEOM: Geom = (457_200, 6_217_920, 8_229_600, 274_320);

/// Font sizes in hundredths of a point.
const TITLE_SIZE: u32 = 2_800;
const SUBTITLE_SIZE: u32 = 1_600;
const BULLET_SIZE: u32 = 1_800;
const FOOTER_SIZE: u32 = 1_000;

fn xml_err(e: quick_xml::Error) -> Error {
    Error::Xml(e.to_string())
}

fn zip_err(e: zip::result::ZipError) -> Error {
    Error::Zip(e.to_string())
}

/// Hex color without the leading '#', uppercased for OOXML.
fn srgb(color: &str) -> String {
    color.trim_start_matches('#').to_uppercase()
}

/// Thin wrapper over the quick-xml event writer.
struct Xml {
    w: Writer<Vec<u8>>,
}

impl Xml {
    fn new() -> Result<Self> {
        let mut w = Writer::new(Vec::new());
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_err)?;
        Ok(Self { w })
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for &(k, v) in attrs {
            start.push_attribute((k, v));
        }
        self.w.write_event(Event::Start(start)).map_err(xml_err)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for &(k, v) in attrs {
            start.push_attribute((k, v));
        }
        self.w.write_event(Event::Empty(start)).map_err(xml_err)
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.w
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_err)
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.w
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_err)
    }

    fn finish(self) -> Vec<u8> {
        self.w.into_inner()
    }
}

/// One embedded media file.
struct MediaEntry {
    part_name: String,
    extension: String,
    bytes: Vec<u8>,
}

/// Registry of embedded images, deduplicated by source path.
#[derive(Default)]
struct MediaStore {
    entries: Vec<MediaEntry>,
    by_path: HashMap<PathBuf, usize>,
}

impl MediaStore {
    /// Load and register an image, returning its index. `None` when the file
    /// cannot be read; the caller skips the picture and the run continues.
    fn register(&mut self, path: &Path) -> Option<usize> {
        if let Some(&idx) = self.by_path.get(path) {
            return Some(idx);
        }
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Could not read image {}: {}", path.display(), e);
                return None;
            }
        };
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png")
            .to_lowercase();
        let idx = self.entries.len();
        self.entries.push(MediaEntry {
            part_name: format!("image{}.{}", idx + 1, extension),
            extension,
            bytes,
        });
        self.by_path.insert(path.to_path_buf(), idx);
        Some(idx)
    }
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// A text paragraph inside a shape.
struct Para<'a> {
    text: &'a str,
    size: u32,
    bold: bool,
    color: String,
    bullet: bool,
}

/// Renderer mapping a [`SlideModel`] to a PPTX package.
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxRenderer;

impl PptxRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render the deck to an in-memory PPTX package.
    pub fn render(&self, model: &SlideModel, catalog: &Catalog) -> Result<Vec<u8>> {
        catalog.ensure_language(&model.language)?;
        model.ensure_renderable()?;

        let mut media = MediaStore::default();
        let logo_idx = model.logo_path.as_deref().and_then(|p| media.register(p));
        let image_indices: Vec<Option<usize>> = model
            .slides
            .iter()
            .map(|slide| {
                slide
                    .image
                    .as_ref()
                    .and_then(|img| media.register(&img.path))
            })
            .collect();

        let options: FileOptions = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let part = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, bytes: &[u8]| -> Result<()> {
            zip.start_file(name, options).map_err(zip_err)?;
            zip.write_all(bytes)?;
            Ok(())
        };

        part(&mut zip, "[Content_Types].xml", &content_types(model, &media)?)?;
        part(&mut zip, "_rels/.rels", &root_rels()?)?;
        part(&mut zip, "ppt/presentation.xml", &presentation_xml(model)?)?;
        part(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            &presentation_rels(model)?,
        )?;
        part(
            &mut zip,
            "ppt/slideMasters/slideMaster1.xml",
            &slide_master_xml()?,
        )?;
        part(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &rels_xml(&[
                ("rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
                ("rId2", REL_THEME, "../theme/theme1.xml"),
            ])?,
        )?;
        part(
            &mut zip,
            "ppt/slideLayouts/slideLayout1.xml",
            &slide_layout_xml()?,
        )?;
        part(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &rels_xml(&[(
                "rId1",
                REL_SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml",
            )])?,
        )?;
        part(&mut zip, "ppt/theme/theme1.xml", &theme_xml(&model.theme))?;

        let total = model.slides.len();
        for (i, slide) in model.slides.iter().enumerate() {
            // rId1 is the layout; pictures follow in a fixed order.
            let mut rels: Vec<(String, &str, String)> = vec![(
                "rId1".to_string(),
                REL_SLIDE_LAYOUT,
                "../slideLayouts/slideLayout1.xml".to_string(),
            )];
            let mut next_rid = 2;

            let image_rid = image_indices[i].map(|idx| {
                let rid = format!("rId{}", next_rid);
                next_rid += 1;
                rels.push((
                    rid.clone(),
                    REL_IMAGE,
                    format!("../media/{}", media.entries[idx].part_name),
                ));
                rid
            });
            let logo_rid = logo_idx.map(|idx| {
                let rid = format!("rId{}", next_rid);
                rels.push((
                    rid.clone(),
                    REL_IMAGE,
                    format!("../media/{}", media.entries[idx].part_name),
                ));
                rid
            });

            let xml = slide_xml(model, slide, total, image_rid.as_deref(), logo_rid.as_deref())?;
            part(&mut zip, &format!("ppt/slides/slide{}.xml", i + 1), &xml)?;

            let rel_refs: Vec<(&str, &str, &str)> = rels
                .iter()
                .map(|(rid, ty, target)| (rid.as_str(), *ty, target.as_str()))
                .collect();
            part(
                &mut zip,
                &format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
                &rels_xml(&rel_refs)?,
            )?;
        }

        for entry in &media.entries {
            part(
                &mut zip,
                &format!("ppt/media/{}", entry.part_name),
                &entry.bytes,
            )?;
        }

        let cursor = zip.finish().map_err(zip_err)?;
        Ok(cursor.into_inner())
    }

    /// Render to a file, writing a temporary sibling first and renaming only
    /// on full success so a failed run leaves no half-written artifact.
    pub fn render_to_file(
        &self,
        model: &SlideModel,
        catalog: &Catalog,
        path: &Path,
    ) -> Result<()> {
        let bytes = self.render(model, catalog)?;
        let tmp = path.with_extension("pptx.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn content_types(model: &SlideModel, media: &MediaStore) -> Result<Vec<u8>> {
    let mut xml = Xml::new()?;
    xml.open("Types", &[("xmlns", NS_CT)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            (
                "ContentType",
                "application/vnd.openxmlformats-package.relationships+xml",
            ),
        ],
    )?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;

    let mut seen_exts: Vec<&str> = Vec::new();
    for entry in &media.entries {
        if !seen_exts.contains(&entry.extension.as_str()) {
            seen_exts.push(&entry.extension);
            xml.empty(
                "Default",
                &[
                    ("Extension", entry.extension.as_str()),
                    ("ContentType", content_type_for(&entry.extension)),
                ],
            )?;
        }
    }

    let overrides = [
        (
            "/ppt/presentation.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
        ),
        (
            "/ppt/slideMasters/slideMaster1.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml",
        ),
        (
            "/ppt/slideLayouts/slideLayout1.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml",
        ),
        (
            "/ppt/theme/theme1.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.theme+xml",
        ),
    ];
    for (part_name, content_type) in &overrides {
        xml.empty(
            "Override",
            &[
                ("PartName", part_name.as_str()),
                ("ContentType", content_type),
            ],
        )?;
    }
    for i in 0..model.slides.len() {
        let part_name = format!("/ppt/slides/slide{}.xml", i + 1);
        xml.empty(
            "Override",
            &[
                ("PartName", part_name.as_str()),
                (
                    "ContentType",
                    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml",
                ),
            ],
        )?;
    }

    xml.close("Types")?;
    Ok(xml.finish())
}

fn rels_xml(entries: &[(&str, &str, &str)]) -> Result<Vec<u8>> {
    let mut xml = Xml::new()?;
    xml.open("Relationships", &[("xmlns", NS_REL)])?;
    for &(id, rel_type, target) in entries {
        xml.empty(
            "Relationship",
            &[("Id", id), ("Type", rel_type), ("Target", target)],
        )?;
    }
    xml.close("Relationships")?;
    Ok(xml.finish())
}

fn root_rels() -> Result<Vec<u8>> {
    rels_xml(&[("rId1", REL_OFFICE_DOCUMENT, "ppt/presentation.xml")])
}

fn presentation_xml(model: &SlideModel) -> Result<Vec<u8>> {
    let mut xml = Xml::new()?;
    xml.open(
        "p:presentation",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;

    xml.open("p:sldMasterIdLst", &[])?;
    xml.empty(
        "p:sldMasterId",
        &[("id", "2147483648"), ("r:id", "rId1")],
    )?;
    xml.close("p:sldMasterIdLst")?;

    xml.open("p:sldIdLst", &[])?;
    for i in 0..model.slides.len() {
        let id = (256 + i).to_string();
        let rid = format!("rId{}", i + 2);
        xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rid.as_str())])?;
    }
    xml.close("p:sldIdLst")?;

    let cx = SLIDE_CX.to_string();
    let cy = SLIDE_CY.to_string();
    xml.empty("p:sldSz", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.empty("p:notesSz", &[("cx", cy.as_str()), ("cy", cx.as_str())])?;

    xml.close("p:presentation")?;
    Ok(xml.finish())
}

fn presentation_rels(model: &SlideModel) -> Result<Vec<u8>> {
    let mut entries: Vec<(String, &str, String)> = vec![(
        "rId1".to_string(),
        REL_SLIDE_MASTER,
        "slideMasters/slideMaster1.xml".to_string(),
    )];
    for i in 0..model.slides.len() {
        entries.push((
            format!("rId{}", i + 2),
            REL_SLIDE,
            format!("slides/slide{}.xml", i + 1),
        ));
    }
    let refs: Vec<(&str, &str, &str)> = entries
        .iter()
        .map(|(rid, ty, target)| (rid.as_str(), *ty, target.as_str()))
        .collect();
    rels_xml(&refs)
}

/// Empty shape tree shared by the master and layout parts.
fn empty_sp_tree(xml: &mut Xml) -> Result<()> {
    xml.open("p:spTree", &[])?;
    xml.open("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.close("p:nvGrpSpPr")?;
    xml.empty("p:grpSpPr", &[])?;
    xml.close("p:spTree")?;
    Ok(())
}

fn slide_master_xml() -> Result<Vec<u8>> {
    let mut xml = Xml::new()?;
    xml.open(
        "p:sldMaster",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    xml.open("p:cSld", &[])?;
    xml.open("p:bg", &[])?;
    xml.open("p:bgPr", &[])?;
    xml.open("a:solidFill", &[])?;
    xml.empty("a:schemeClr", &[("val", "bg1")])?;
    xml.close("a:solidFill")?;
    xml.empty("a:effectLst", &[])?;
    xml.close("p:bgPr")?;
    xml.close("p:bg")?;
    empty_sp_tree(&mut xml)?;
    xml.close("p:cSld")?;
    xml.empty(
        "p:clrMap",
        &[
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ],
    )?;
    xml.open("p:sldLayoutIdLst", &[])?;
    xml.empty(
        "p:sldLayoutId",
        &[("id", "2147483649"), ("r:id", "rId1")],
    )?;
    xml.close("p:sldLayoutIdLst")?;
    xml.close("p:sldMaster")?;
    Ok(xml.finish())
}

fn slide_layout_xml() -> Result<Vec<u8>> {
    let mut xml = Xml::new()?;
    xml.open(
        "p:sldLayout",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("type", "blank"),
        ],
    )?;
    xml.open("p:cSld", &[])?;
    empty_sp_tree(&mut xml)?;
    xml.close("p:cSld")?;
    xml.open("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.close("p:clrMapOvr")?;
    xml.close("p:sldLayout")?;
    Ok(xml.finish())
}

/// Theme part carrying the deck's color scheme and font family.
fn theme_xml(theme: &Theme) -> Vec<u8> {
    let font = quick_xml::escape::escape(&theme.font_family);
    let dk = srgb(&theme.primary_color);
    let lt = srgb(&theme.bg_color);
    let accent = srgb(&theme.accent_color);

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<a:theme xmlns:a="{ns}" name="Deck"><a:themeElements>"#,
            r#"<a:clrScheme name="Deck">"#,
            r#"<a:dk1><a:srgbClr val="{dk}"/></a:dk1>"#,
            r#"<a:lt1><a:srgbClr val="{lt}"/></a:lt1>"#,
            r#"<a:dk2><a:srgbClr val="{dk}"/></a:dk2>"#,
            r#"<a:lt2><a:srgbClr val="{lt}"/></a:lt2>"#,
            r#"<a:accent1><a:srgbClr val="{accent}"/></a:accent1>"#,
            r#"<a:accent2><a:srgbClr val="{accent}"/></a:accent2>"#,
            r#"<a:accent3><a:srgbClr val="{accent}"/></a:accent3>"#,
            r#"<a:accent4><a:srgbClr val="{accent}"/></a:accent4>"#,
            r#"<a:accent5><a:srgbClr val="{accent}"/></a:accent5>"#,
            r#"<a:accent6><a:srgbClr val="{accent}"/></a:accent6>"#,
            r#"<a:hlink><a:srgbClr val="{accent}"/></a:hlink>"#,
            r#"<a:folHlink><a:srgbClr val="{accent}"/></a:folHlink>"#,
            r#"</a:clrScheme>"#,
            r#"<a:fontScheme name="Deck">"#,
            r#"<a:majorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
            r#"<a:minorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
            r#"</a:fontScheme>"#,
            r#"<a:fmtScheme name="Deck">"#,
            r#"<a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst>"#,
            r#"<a:lnStyleLst><a:ln><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst>"#,
            r#"<a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst>"#,
            r#"<a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst>"#,
            r#"</a:fmtScheme>"#,
            r#"</a:themeElements></a:theme>"#,
        ),
        ns = NS_A,
        dk = dk,
        lt = lt,
        accent = accent,
        font = font,
    )
    .into_bytes()
}

fn write_geom(xml: &mut Xml, geom: Geom) -> Result<()> {
    let (x, y, cx, cy) = geom;
    let (x, y, cx, cy) = (x.to_string(), y.to_string(), cx.to_string(), cy.to_string());
    xml.open("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    xml.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.close("a:xfrm")?;
    xml.open("a:prstGeom", &[("prst", "rect")])?;
    xml.empty("a:avLst", &[])?;
    xml.close("a:prstGeom")?;
    Ok(())
}

fn write_text_shape(
    xml: &mut Xml,
    id: usize,
    name: &str,
    geom: Geom,
    language: &str,
    font: &str,
    paras: &[Para<'_>],
) -> Result<()> {
    let id = id.to_string();

    xml.open("p:sp", &[])?;
    xml.open("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", id.as_str()), ("name", name)])?;
    xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
    xml.empty("p:nvPr", &[])?;
    xml.close("p:nvSpPr")?;

    xml.open("p:spPr", &[])?;
    write_geom(xml, geom)?;
    xml.close("p:spPr")?;

    xml.open("p:txBody", &[])?;
    xml.empty("a:bodyPr", &[("wrap", "square")])?;
    xml.empty("a:lstStyle", &[])?;
    for para in paras {
        xml.open("a:p", &[])?;
        if para.bullet {
            xml.open("a:pPr", &[])?;
            xml.empty("a:buChar", &[("char", "\u{2022}")])?;
            xml.close("a:pPr")?;
        }
        xml.open("a:r", &[])?;
        let size = para.size.to_string();
        let mut rpr: Vec<(&str, &str)> =
            vec![("lang", language), ("sz", size.as_str()), ("dirty", "0")];
        if para.bold {
            rpr.push(("b", "1"));
        }
        xml.open("a:rPr", &rpr)?;
        xml.open("a:solidFill", &[])?;
        xml.empty("a:srgbClr", &[("val", para.color.as_str())])?;
        xml.close("a:solidFill")?;
        xml.empty("a:latin", &[("typeface", font)])?;
        xml.close("a:rPr")?;
        xml.open("a:t", &[])?;
        xml.text(para.text)?;
        xml.close("a:t")?;
        xml.close("a:r")?;
        xml.close("a:p")?;
    }
    xml.close("p:txBody")?;
    xml.close("p:sp")?;
    Ok(())
}

fn write_picture(
    xml: &mut Xml,
    id: usize,
    name: &str,
    alt: &str,
    rid: &str,
    geom: Geom,
) -> Result<()> {
    let id = id.to_string();

    xml.open("p:pic", &[])?;
    xml.open("p:nvPicPr", &[])?;
    xml.empty(
        "p:cNvPr",
        &[("id", id.as_str()), ("name", name), ("descr", alt)],
    )?;
    xml.open("p:cNvPicPr", &[])?;
    xml.empty("a:picLocks", &[("noChangeAspect", "1")])?;
    xml.close("p:cNvPicPr")?;
    xml.empty("p:nvPr", &[])?;
    xml.close("p:nvPicPr")?;
    xml.open("p:blipFill", &[])?;
    xml.empty("a:blip", &[("r:embed", rid)])?;
    xml.open("a:stretch", &[])?;
    xml.empty("a:fillRect", &[])?;
    xml.close("a:stretch")?;
    xml.close("p:blipFill")?;
    xml.open("p:spPr", &[])?;
    write_geom(xml, geom)?;
    xml.close("p:spPr")?;
    xml.close("p:pic")?;
    Ok(())
}

fn slide_xml(
    model: &SlideModel,
    slide: &Slide,
    total: usize,
    image_rid: Option<&str>,
    logo_rid: Option<&str>,
) -> Result<Vec<u8>> {
    let theme = &model.theme;
    let primary = srgb(&theme.primary_color);
    let accent = srgb(&theme.accent_color);
    let bg = srgb(&theme.bg_color);
    let font = theme.font_family.as_str();
    let language = model.language.as_str();

    let mut xml = Xml::new()?;
    xml.open(
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    xml.open("p:cSld", &[])?;

    xml.open("p:bg", &[])?;
    xml.open("p:bgPr", &[])?;
    xml.open("a:solidFill", &[])?;
    xml.empty("a:srgbClr", &[("val", bg.as_str())])?;
    xml.close("a:solidFill")?;
    xml.empty("a:effectLst", &[])?;
    xml.close("p:bgPr")?;
    xml.close("p:bg")?;

    xml.open("p:spTree", &[])?;
    xml.open("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.close("p:nvGrpSpPr")?;
    xml.empty("p:grpSpPr", &[])?;

    let mut next_id = 2usize;

    // Title band.
    write_text_shape(
        &mut xml,
        next_id,
        "Title",
        TITLE_GEOM,
        language,
        font,
        &[Para {
            text: &slide.title,
            size: TITLE_SIZE,
            bold: true,
            color: primary.clone(),
            bullet: false,
        }],
    )?;
    next_id += 1;

    match slide.kind {
        SlideKind::Cover => {
            // The single cover bullet is the subtitle line.
            if let Some(subtitle) = slide.bullets.first() {
                write_text_shape(
                    &mut xml,
                    next_id,
                    "Subtitle",
                    SUBTITLE_GEOM,
                    language,
                    font,
                    &[Para {
                        text: subtitle,
                        size: SUBTITLE_SIZE,
                        bold: false,
                        color: accent.clone(),
                        bullet: false,
                    }],
                )?;
                next_id += 1;
            }
        }
        SlideKind::Content | SlideKind::Conclusion => {
            if !slide.bullets.is_empty() {
                let paras: Vec<Para<'_>> = slide
                    .bullets
                    .iter()
                    .map(|bullet| Para {
                        text: bullet,
                        size: BULLET_SIZE,
                        bold: false,
                        color: primary.clone(),
                        bullet: true,
                    })
                    .collect();
                write_text_shape(
                    &mut xml,
                    next_id,
                    "Bullets",
                    BULLETS_GEOM,
                    language,
                    font,
                    &paras,
                )?;
                next_id += 1;
            }
        }
        SlideKind::Image => {}
    }

    if let (Some(rid), Some(image)) = (image_rid, slide.image.as_ref()) {
        let geom = if slide.kind == SlideKind::Image {
            IMAGE_SLIDE_GEOM
        } else {
            IMAGE_GEOM
        };
        write_picture(&mut xml, next_id, "Picture", &image.alt, rid, geom)?;
        next_id += 1;
    }

    if let Some(rid) = logo_rid {
        write_picture(&mut xml, next_id, "Logo", "logo", rid, LOGO_GEOM)?;
        next_id += 1;
    }

    // Footer strip, optionally with the slide number.
    let footer_text = if model.footer.show_slide_numbers {
        format!("{}  |  {}/{}", model.footer.text, slide.index + 1, total)
    } else {
        model.footer.text.clone()
    };
    write_text_shape(
        &mut xml,
        next_id,
        "Footer",
        FOOTER_GEOM,
        language,
        font,
        &[Para {
            text: &footer_text,
            size: FOOTER_SIZE,
            bold: false,
            color: primary,
            bullet: false,
        }],
    )?;

    xml.close("p:spTree")?;
    xml.close("p:cSld")?;
    xml.open("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.close("p:clrMapOvr")?;
    xml.close("p:sld")?;
    Ok(xml.finish())
}
