//! PPTX renderer: writes a [`DocumentOutline`] as an Office Open XML package.
//!
//! The package holds one master, one blank layout and one theme. Every slide
//! draws its own text boxes so the output does not depend on placeholder
//! inheritance.

use crate::theme::Theme;
use crate::xml::XmlBuilder;
use deck_core::{DocumentOutline, Error, Result, SlideKind, SlideRecord};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// 16:9 slide size in EMU.
const SLIDE_CX: i64 = 12_192_000;
const SLIDE_CY: i64 = 6_858_000;
const EMU_PER_INCH: i64 = 914_400;

/// Where the optional picture goes on a content slide.
const IMAGE_BOX: Rect = Rect {
    x: 7_315_200,
    y: 1_600_200,
    cx: 4_343_400,
    cy: 4_572_000,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
}

impl Rect {
    /// Largest rectangle with the given aspect ratio centered inside `self`.
    fn fit(&self, width: u32, height: u32) -> Rect {
        if width == 0 || height == 0 {
            return *self;
        }
        let (w, h) = (i64::from(width), i64::from(height));
        let (cx, cy) = if self.cx * h <= self.cy * w {
            (self.cx, self.cx * h / w)
        } else {
            (self.cy * w / h, self.cy)
        };
        Rect {
            x: self.x + (self.cx - cx) / 2,
            y: self.y + (self.cy - cy) / 2,
            cx,
            cy,
        }
    }
}

/// Supported embedded image types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageKind {
    Png,
    Jpeg,
    Gif,
}

impl ImageKind {
    fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF8") {
            Some(Self::Gif)
        } else {
            None
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }
}

/// Read pixel dimensions from a PNG, GIF or baseline/progressive JPEG header.
fn image_dimensions(kind: ImageKind, bytes: &[u8]) -> Option<(u32, u32)> {
    let be16 = |i: usize| bytes.get(i..i + 2).map(|b| u32::from(u16::from_be_bytes([b[0], b[1]])));
    let le16 = |i: usize| bytes.get(i..i + 2).map(|b| u32::from(u16::from_le_bytes([b[0], b[1]])));
    let be32 = |i: usize| bytes.get(i..i + 4).map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]));

    match kind {
        ImageKind::Png => Some((be32(16)?, be32(20)?)),
        ImageKind::Gif => Some((le16(6)?, le16(8)?)),
        ImageKind::Jpeg => {
            let mut i = 2;
            while i + 9 < bytes.len() {
                if bytes[i] != 0xFF {
                    i += 1;
                    continue;
                }
                let marker = bytes[i + 1];
                // SOF0..SOF15 except DHT (C4), JPG (C8) and DAC (CC)
                if (0xC0..=0xCF).contains(&marker) && ![0xC4, 0xC8, 0xCC].contains(&marker) {
                    return Some((be16(i + 7)?, be16(i + 5)?));
                }
                i += 2 + be16(i + 2)? as usize;
            }
            None
        }
    }
}

/// An image that made it into the package.
struct Media {
    kind: ImageKind,
    bytes: Vec<u8>,
    size: Option<(u32, u32)>,
}

/// Renders outlines to `.pptx`.
#[derive(Debug, Clone, Default)]
pub struct PptxWriter {
    theme: Theme,
}

impl PptxWriter {
    /// Create a writer with the default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Render to a file.
    pub fn save(&self, outline: &DocumentOutline, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write(outline, BufWriter::new(file))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Render into any seekable writer.
    pub fn write<W: Write + Seek>(&self, outline: &DocumentOutline, writer: W) -> Result<()> {
        let media: Vec<Option<Media>> = outline.slides.iter().map(load_media).collect();
        // slide 1 is the title slide
        let slide_count = outline.slides.len() + 1;

        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut add = |name: &str, bytes: &[u8]| -> Result<()> {
            zip.start_file(name, options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{name}': {e}")))?;
            zip.write_all(bytes)?;
            Ok(())
        };

        add("[Content_Types].xml", &self.content_types(slide_count, &media)?)?;
        add("_rels/.rels", &root_rels()?)?;
        add("docProps/core.xml", &core_props(outline)?)?;
        add("docProps/app.xml", &app_props(slide_count)?)?;
        add("ppt/presentation.xml", &presentation_xml(slide_count)?)?;
        add("ppt/_rels/presentation.xml.rels", &presentation_rels(slide_count)?)?;
        add("ppt/slideMasters/slideMaster1.xml", &self.master_xml()?)?;
        add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &rels(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("rId2", "theme", "../theme/theme1.xml"),
            ])?,
        )?;
        add("ppt/slideLayouts/slideLayout1.xml", &layout_xml()?)?;
        add(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")])?,
        )?;
        add("ppt/theme/theme1.xml", self.theme_xml().as_bytes())?;

        add("ppt/slides/slide1.xml", &self.title_slide_xml(outline)?)?;
        add("ppt/slides/_rels/slide1.xml.rels", &slide_rels(None)?)?;

        for (idx, (slide, media)) in outline.slides.iter().zip(&media).enumerate() {
            let number = idx + 2;
            let image_target = media
                .as_ref()
                .map(|m| format!("../media/image{number}.{}", m.kind.extension()));

            let xml = match slide.kind {
                SlideKind::SectionDivider | SlideKind::Title => self.divider_slide_xml(slide)?,
                SlideKind::Content => self.content_slide_xml(slide, media.as_ref())?,
            };
            add(&format!("ppt/slides/slide{number}.xml"), &xml)?;
            add(
                &format!("ppt/slides/_rels/slide{number}.xml.rels"),
                &slide_rels(image_target.as_deref())?,
            )?;
            if let Some(m) = media {
                add(
                    &format!("ppt/media/image{number}.{}", m.kind.extension()),
                    &m.bytes,
                )?;
            }
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {e}")))?;
        Ok(())
    }

    fn content_types(&self, slide_count: usize, media: &[Option<Media>]) -> Result<Vec<u8>> {
        let mut xml = XmlBuilder::new()?;
        xml.open(
            "Types",
            &[("xmlns", "http://schemas.openxmlformats.org/package/2006/content-types")],
        )?;
        xml.empty(
            "Default",
            &[
                ("Extension", "rels"),
                ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
            ],
        )?;
        xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

        let mut kinds: Vec<ImageKind> = media.iter().flatten().map(|m| m.kind).collect();
        kinds.sort_by_key(|k| k.extension());
        kinds.dedup();
        for kind in kinds {
            xml.empty(
                "Default",
                &[("Extension", kind.extension()), ("ContentType", kind.content_type())],
            )?;
        }

        let pml = "application/vnd.openxmlformats-officedocument.presentationml";
        let overrides = [
            ("/ppt/presentation.xml", format!("{pml}.presentation.main+xml")),
            ("/ppt/slideMasters/slideMaster1.xml", format!("{pml}.slideMaster+xml")),
            ("/ppt/slideLayouts/slideLayout1.xml", format!("{pml}.slideLayout+xml")),
            (
                "/ppt/theme/theme1.xml",
                "application/vnd.openxmlformats-officedocument.theme+xml".to_string(),
            ),
            (
                "/docProps/core.xml",
                "application/vnd.openxmlformats-package.core-properties+xml".to_string(),
            ),
            (
                "/docProps/app.xml",
                "application/vnd.openxmlformats-officedocument.extended-properties+xml".to_string(),
            ),
        ];
        for (part, content_type) in &overrides {
            xml.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
        }

        let slide_type = format!("{pml}.slide+xml");
        for n in 1..=slide_count {
            let part = format!("/ppt/slides/slide{n}.xml");
            xml.empty("Override", &[("PartName", &part), ("ContentType", &slide_type)])?;
        }

        xml.close("Types")?;
        Ok(xml.finish())
    }

    fn master_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlBuilder::new()?;
        xml.open("p:sldMaster", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
        xml.open("p:cSld", &[])?;
        self.background(&mut xml, &self.theme.background)?;
        xml.open("p:spTree", &[])?;
        group_header(&mut xml)?;
        xml.close("p:spTree")?.close("p:cSld")?;
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
        xml.open("p:sldLayoutIdLst", &[])?
            .empty("p:sldLayoutId", &[("id", "2147483649"), ("r:id", "rId1")])?
            .close("p:sldLayoutIdLst")?;
        xml.close("p:sldMaster")?;
        Ok(xml.finish())
    }

    fn theme_xml(&self) -> String {
        let t = &self.theme;
        let title_font = quick_xml::escape::escape(t.title_font.as_str());
        let body_font = quick_xml::escape::escape(t.body_font.as_str());
        let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
        let line = r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#;
        let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="{NS_A}" name="{name}"><a:themeElements><a:clrScheme name="{name}"><a:dk1><a:srgbClr val="{text}"/></a:dk1><a:lt1><a:srgbClr val="{bg}"/></a:lt1><a:dk2><a:srgbClr val="{title}"/></a:dk2><a:lt2><a:srgbClr val="F2F2F2"/></a:lt2><a:accent1><a:srgbClr val="{accent}"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="{name}"><a:majorFont><a:latin typeface="{title_font}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="{body_font}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="{name}"><a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst><a:lnStyleLst>{line}{line}{line}</a:lnStyleLst><a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst><a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#,
            name = quick_xml::escape::escape(t.name.as_str()),
            text = t.text_color,
            bg = t.background,
            title = t.title_color,
            accent = t.accent,
        )
    }

    fn title_slide_xml(&self, outline: &DocumentOutline) -> Result<Vec<u8>> {
        let t = &self.theme;
        let mut xml = slide_start(self, &t.background)?;

        let band = Rect {
            x: 0,
            y: 3_657_600,
            cx: SLIDE_CX,
            cy: 45_720,
        };
        filled_rect(&mut xml, 2, "Accent", band, &t.accent)?;

        let title_box = Rect {
            x: 914_400,
            y: 1_828_800,
            cx: SLIDE_CX - 2 * 914_400,
            cy: 1_645_920,
        };
        let para = Paragraph::new(&outline.title, 4400, &t.title_color, &t.title_font)
            .bold()
            .centered();
        text_box(&mut xml, 3, "Title", title_box, "b", &[para])?;

        let subtitle_box = Rect {
            x: 914_400,
            y: 3_840_480,
            cx: SLIDE_CX - 2 * 914_400,
            cy: 1_097_280,
        };
        let para = Paragraph::new(&outline.subtitle, 2400, &t.text_color, &t.body_font).centered();
        text_box(&mut xml, 4, "Subtitle", subtitle_box, "t", &[para])?;

        slide_end(xml)
    }

    fn divider_slide_xml(&self, slide: &SlideRecord) -> Result<Vec<u8>> {
        let t = &self.theme;
        let mut xml = slide_start(self, &t.accent)?;

        let title_box = Rect {
            x: 914_400,
            y: 2_286_000,
            cx: SLIDE_CX - 2 * 914_400,
            cy: 2_286_000,
        };
        let para = Paragraph::new(&slide.title, 4000, &t.background, &t.title_font)
            .bold()
            .centered();
        text_box(&mut xml, 2, "Section Title", title_box, "ctr", &[para])?;

        slide_end(xml)
    }

    fn content_slide_xml(&self, slide: &SlideRecord, media: Option<&Media>) -> Result<Vec<u8>> {
        let t = &self.theme;
        let mut xml = slide_start(self, &t.background)?;
        let margin = EMU_PER_INCH / 2 + 228_600;

        let bar = Rect {
            x: EMU_PER_INCH / 2,
            y: EMU_PER_INCH / 2,
            cx: 91_440,
            cy: 914_400,
        };
        filled_rect(&mut xml, 2, "Accent", bar, &t.accent)?;

        let title_box = Rect {
            x: margin,
            y: EMU_PER_INCH / 2,
            cx: SLIDE_CX - margin - EMU_PER_INCH / 2,
            cy: 914_400,
        };
        let para = Paragraph::new(&slide.title, 3200, &t.title_color, &t.title_font).bold();
        text_box(&mut xml, 3, "Title", title_box, "ctr", &[para])?;

        let body_width = if media.is_some() {
            IMAGE_BOX.x - margin - 228_600
        } else {
            SLIDE_CX - margin - EMU_PER_INCH / 2
        };
        let body_box = Rect {
            x: margin,
            y: IMAGE_BOX.y,
            cx: body_width,
            cy: IMAGE_BOX.cy,
        };
        let size = bullet_font_size(slide, media.is_some());
        let paras: Vec<Paragraph> = slide
            .bullets
            .iter()
            .map(|b| Paragraph::new(b, size, &t.text_color, &t.body_font).bulleted(&t.accent))
            .collect();
        text_box(&mut xml, 4, "Content", body_box, "t", &paras)?;

        if let Some(m) = media {
            let frame = match m.size {
                Some((w, h)) => IMAGE_BOX.fit(w, h),
                None => IMAGE_BOX,
            };
            picture(&mut xml, 5, "Picture", frame, "rId2")?;
        }

        slide_end(xml)
    }

    fn background(&self, xml: &mut XmlBuilder, color: &str) -> Result<()> {
        xml.open("p:bg", &[])?.open("p:bgPr", &[])?;
        solid_fill(xml, color)?;
        xml.empty("a:effectLst", &[])?;
        xml.close("p:bgPr")?.close("p:bg")?;
        Ok(())
    }
}

/// Pick a bullet size that keeps dense slides readable.
fn bullet_font_size(slide: &SlideRecord, narrow: bool) -> u32 {
    let chars: usize = slide.bullets.iter().map(|b| b.chars().count()).sum();
    let budget = if narrow { 400 } else { 650 };
    if slide.bullets.len() > 5 || chars > budget {
        1600
    } else if slide.bullets.len() > 4 || chars > budget * 3 / 4 {
        1800
    } else {
        2000
    }
}

fn load_media(slide: &SlideRecord) -> Option<Media> {
    let path = slide.image.as_ref()?;
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Skipping image {} for '{}': {}", path.display(), slide.title, e);
            return None;
        }
    };
    let Some(kind) = ImageKind::from_magic(&bytes) else {
        warn!("Skipping image {}: unsupported format", path.display());
        return None;
    };
    let size = image_dimensions(kind, &bytes);
    Some(Media { kind, bytes, size })
}

/// One paragraph of a text box.
struct Paragraph<'a> {
    text: &'a str,
    size: u32,
    color: &'a str,
    font: &'a str,
    bold: bool,
    centered: bool,
    bullet: Option<&'a str>,
}

impl<'a> Paragraph<'a> {
    fn new(text: &'a str, size: u32, color: &'a str, font: &'a str) -> Self {
        Self {
            text,
            size,
            color,
            font,
            bold: false,
            centered: false,
            bullet: None,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    fn bulleted(mut self, color: &'a str) -> Self {
        self.bullet = Some(color);
        self
    }

    fn write(&self, xml: &mut XmlBuilder) -> Result<()> {
        xml.open("a:p", &[])?;

        let mut ppr: Vec<(&str, &str)> = Vec::new();
        if self.centered {
            ppr.push(("algn", "ctr"));
        }
        if let Some(color) = self.bullet {
            ppr.extend([("marL", "342900"), ("indent", "-342900")]);
            xml.open("a:pPr", &ppr)?;
            xml.open("a:spcBef", &[])?
                .empty("a:spcPts", &[("val", "600")])?
                .close("a:spcBef")?;
            xml.open("a:buClr", &[])?
                .empty("a:srgbClr", &[("val", color)])?
                .close("a:buClr")?;
            xml.empty("a:buFont", &[("typeface", "Arial")])?;
            xml.empty("a:buChar", &[("char", "\u{2022}")])?;
            xml.close("a:pPr")?;
        } else if !ppr.is_empty() {
            xml.empty("a:pPr", &ppr)?;
        }

        let size = self.size.to_string();
        let mut rpr = vec![("lang", "en-US"), ("sz", size.as_str()), ("dirty", "0")];
        if self.bold {
            rpr.push(("b", "1"));
        }
        xml.open("a:r", &[])?.open("a:rPr", &rpr)?;
        solid_fill(xml, self.color)?;
        xml.empty("a:latin", &[("typeface", self.font)])?;
        xml.close("a:rPr")?;
        xml.leaf("a:t", &[], self.text)?;
        xml.close("a:r")?;

        xml.close("a:p")?;
        Ok(())
    }
}

fn slide_start(writer: &PptxWriter, background: &str) -> Result<XmlBuilder> {
    let mut xml = XmlBuilder::new()?;
    xml.open("p:sld", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
    xml.open("p:cSld", &[])?;
    writer.background(&mut xml, background)?;
    xml.open("p:spTree", &[])?;
    group_header(&mut xml)?;
    Ok(xml)
}

fn slide_end(mut xml: XmlBuilder) -> Result<Vec<u8>> {
    xml.close("p:spTree")?.close("p:cSld")?;
    xml.open("p:clrMapOvr", &[])?
        .empty("a:masterClrMapping", &[])?
        .close("p:clrMapOvr")?;
    xml.close("p:sld")?;
    Ok(xml.finish())
}

fn group_header(xml: &mut XmlBuilder) -> Result<()> {
    xml.open("p:nvGrpSpPr", &[])?
        .empty("p:cNvPr", &[("id", "1"), ("name", "")])?
        .empty("p:cNvGrpSpPr", &[])?
        .empty("p:nvPr", &[])?
        .close("p:nvGrpSpPr")?;
    xml.open("p:grpSpPr", &[])?.open("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?
        .empty("a:ext", &[("cx", "0"), ("cy", "0")])?
        .empty("a:chOff", &[("x", "0"), ("y", "0")])?
        .empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    xml.close("a:xfrm")?.close("p:grpSpPr")?;
    Ok(())
}

fn solid_fill(xml: &mut XmlBuilder, color: &str) -> Result<()> {
    xml.open("a:solidFill", &[])?
        .empty("a:srgbClr", &[("val", color)])?
        .close("a:solidFill")?;
    Ok(())
}

fn transform(xml: &mut XmlBuilder, rect: Rect) -> Result<()> {
    let (x, y, cx, cy) = (
        rect.x.to_string(),
        rect.y.to_string(),
        rect.cx.to_string(),
        rect.cy.to_string(),
    );
    xml.open("a:xfrm", &[])?
        .empty("a:off", &[("x", &x), ("y", &y)])?
        .empty("a:ext", &[("cx", &cx), ("cy", &cy)])?
        .close("a:xfrm")?;
    xml.open("a:prstGeom", &[("prst", "rect")])?
        .empty("a:avLst", &[])?
        .close("a:prstGeom")?;
    Ok(())
}

fn text_box(
    xml: &mut XmlBuilder,
    id: u32,
    name: &str,
    rect: Rect,
    anchor: &str,
    paragraphs: &[Paragraph<'_>],
) -> Result<()> {
    let id = id.to_string();
    xml.open("p:sp", &[])?;
    xml.open("p:nvSpPr", &[])?
        .empty("p:cNvPr", &[("id", &id), ("name", name)])?
        .empty("p:cNvSpPr", &[("txBox", "1")])?
        .empty("p:nvPr", &[])?
        .close("p:nvSpPr")?;
    xml.open("p:spPr", &[])?;
    transform(xml, rect)?;
    xml.empty("a:noFill", &[])?.close("p:spPr")?;

    xml.open("p:txBody", &[])?;
    xml.open("a:bodyPr", &[("wrap", "square"), ("rtlCol", "0"), ("anchor", anchor)])?
        .empty("a:normAutofit", &[])?
        .close("a:bodyPr")?;
    xml.empty("a:lstStyle", &[])?;
    if paragraphs.is_empty() {
        xml.empty("a:p", &[])?;
    }
    for paragraph in paragraphs {
        paragraph.write(xml)?;
    }
    xml.close("p:txBody")?;
    xml.close("p:sp")?;
    Ok(())
}

fn filled_rect(xml: &mut XmlBuilder, id: u32, name: &str, rect: Rect, color: &str) -> Result<()> {
    let id = id.to_string();
    xml.open("p:sp", &[])?;
    xml.open("p:nvSpPr", &[])?
        .empty("p:cNvPr", &[("id", &id), ("name", name)])?
        .empty("p:cNvSpPr", &[])?
        .empty("p:nvPr", &[])?
        .close("p:nvSpPr")?;
    xml.open("p:spPr", &[])?;
    transform(xml, rect)?;
    solid_fill(xml, color)?;
    xml.open("a:ln", &[])?.empty("a:noFill", &[])?.close("a:ln")?;
    xml.close("p:spPr")?;
    xml.close("p:sp")?;
    Ok(())
}

fn picture(xml: &mut XmlBuilder, id: u32, name: &str, rect: Rect, rel_id: &str) -> Result<()> {
    let id = id.to_string();
    xml.open("p:pic", &[])?;
    xml.open("p:nvPicPr", &[])?
        .empty("p:cNvPr", &[("id", &id), ("name", name)])?
        .open("p:cNvPicPr", &[])?
        .empty("a:picLocks", &[("noChangeAspect", "1")])?
        .close("p:cNvPicPr")?
        .empty("p:nvPr", &[])?
        .close("p:nvPicPr")?;
    xml.open("p:blipFill", &[])?
        .empty("a:blip", &[("r:embed", rel_id)])?
        .open("a:stretch", &[])?
        .empty("a:fillRect", &[])?
        .close("a:stretch")?
        .close("p:blipFill")?;
    xml.open("p:spPr", &[])?;
    transform(xml, rect)?;
    xml.close("p:spPr")?;
    xml.close("p:pic")?;
    Ok(())
}

fn rels(entries: &[(&str, &str, &str)]) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open("Relationships", &[("xmlns", NS_RELS)])?;
    for (id, kind, target) in entries {
        let rel_type = if kind.starts_with("http") {
            kind.to_string()
        } else {
            format!("{REL_BASE}/{kind}")
        };
        xml.empty(
            "Relationship",
            &[("Id", id), ("Type", &rel_type), ("Target", target)],
        )?;
    }
    xml.close("Relationships")?;
    Ok(xml.finish())
}

fn root_rels() -> Result<Vec<u8>> {
    rels(&[
        ("rId1", "officeDocument", "ppt/presentation.xml"),
        (
            "rId2",
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            "docProps/core.xml",
        ),
        ("rId3", "extended-properties", "docProps/app.xml"),
    ])
}

fn slide_rels(image_target: Option<&str>) -> Result<Vec<u8>> {
    let mut entries = vec![("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")];
    if let Some(target) = image_target {
        entries.push(("rId2", "image", target));
    }
    rels(&entries)
}

fn presentation_rels(slide_count: usize) -> Result<Vec<u8>> {
    let targets: Vec<(String, String)> = (1..=slide_count)
        .map(|n| (format!("rId{}", n + 2), format!("slides/slide{n}.xml")))
        .collect();

    let mut entries = vec![
        ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
        ("rId2", "theme", "theme/theme1.xml"),
    ];
    entries.extend(targets.iter().map(|(id, target)| (id.as_str(), "slide", target.as_str())));
    rels(&entries)
}

fn presentation_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open(
        "p:presentation",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("saveSubsetFonts", "1"),
        ],
    )?;
    xml.open("p:sldMasterIdLst", &[])?
        .empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?
        .close("p:sldMasterIdLst")?;

    xml.open("p:sldIdLst", &[])?;
    for n in 1..=slide_count {
        let id = (255 + n).to_string();
        let rel = format!("rId{}", n + 2);
        xml.empty("p:sldId", &[("id", &id), ("r:id", &rel)])?;
    }
    xml.close("p:sldIdLst")?;

    let (cx, cy) = (SLIDE_CX.to_string(), SLIDE_CY.to_string());
    xml.empty("p:sldSz", &[("cx", &cx), ("cy", &cy)])?;
    xml.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;
    xml.close("p:presentation")?;
    Ok(xml.finish())
}

fn layout_xml() -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open(
        "p:sldLayout",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("type", "blank"),
            ("preserve", "1"),
        ],
    )?;
    xml.open("p:cSld", &[("name", "Blank")])?.open("p:spTree", &[])?;
    group_header(&mut xml)?;
    xml.close("p:spTree")?.close("p:cSld")?;
    xml.open("p:clrMapOvr", &[])?
        .empty("a:masterClrMapping", &[])?
        .close("p:clrMapOvr")?;
    xml.close("p:sldLayout")?;
    Ok(xml.finish())
}

fn core_props(outline: &DocumentOutline) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.leaf("dc:title", &[], &outline.title)?;
    xml.leaf("dc:subject", &[], &outline.subtitle)?;
    xml.leaf("dc:creator", &[], "deck-gen")?;
    xml.close("cp:coreProperties")?;
    Ok(xml.finish())
}

fn app_props(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open(
        "Properties",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        )],
    )?;
    xml.leaf("Application", &[], "deck-gen")?;
    xml.leaf("Slides", &[], &slide_count.to_string())?;
    xml.close("Properties")?;
    Ok(xml.finish())
}
