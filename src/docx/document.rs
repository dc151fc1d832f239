//! An opened DOCX package with its WordprocessingML parts parsed.

use super::content_types::{image_content_type, ContentTypes, CONTENT_TYPES_PART, FOOTER_CONTENT_TYPE};
use super::package::Package;
use super::relationships::{rel_type, rels_path_for, resolve_target, Relationships};
use super::wml::R_NS;
use super::xml::Element;
use crate::error::{Error, Result};
use std::path::Path;

const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";
const DEFAULT_CORE_PART: &str = "docProps/core.xml";

/// A parsed XML part and its name in the package.
#[derive(Debug, Clone)]
struct XmlPart {
    name: String,
    root: Element,
}

impl XmlPart {
    fn load(package: &Package, name: String) -> Result<Option<Self>> {
        match package.part(&name) {
            Some(bytes) => Ok(Some(Self {
                root: Element::parse(bytes)?,
                name,
            })),
            None => Ok(None),
        }
    }

    fn store(&self, package: &mut Package) -> Result<()> {
        package.set_part(self.name.clone(), self.root.to_xml()?);
        Ok(())
    }
}

/// Package resources shared by parts that embed media or reference new parts.
#[derive(Debug, Clone)]
pub struct Media {
    package: Package,
    content_types: ContentTypes,
    rels: Relationships,
    document_part: String,
    next_drawing_id: u32,
}

impl Media {
    /// Add an image part and return the relationship id referencing it.
    pub fn add_image(&mut self, data: Vec<u8>, extension: &str) -> String {
        let extension = extension.to_ascii_lowercase();
        let name = self.free_part_name("media/image", &extension);
        self.content_types
            .ensure_default(&extension, image_content_type(&extension));
        let id = self.add_related_part(name, data, rel_type::IMAGE);
        log::debug!("Embedded image as {}", id);
        id
    }

    /// Reserve a drawing object id unique within the document.
    pub fn next_drawing_id(&mut self) -> u32 {
        let id = self.next_drawing_id;
        self.next_drawing_id += 1;
        id
    }

    fn part_dir(&self) -> &str {
        self.document_part
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("")
    }

    /// First unused `<dir>/<stem>N.<ext>` part name, relative to the document part.
    fn free_part_name(&self, stem: &str, extension: &str) -> String {
        let dir = self.part_dir();
        let mut n = 1;
        loop {
            let relative = format!("{}{}.{}", stem, n, extension);
            let full = if dir.is_empty() {
                relative.clone()
            } else {
                format!("{}/{}", dir, relative)
            };
            if !self.package.contains(&full) {
                return relative;
            }
            n += 1;
        }
    }

    fn add_related_part(&mut self, relative: String, data: Vec<u8>, kind: &str) -> String {
        let full = resolve_target(&self.document_part, &relative);
        self.package.set_part(full, data);
        self.rels.add(kind, &relative)
    }
}

/// A DOCX document opened for in-place modification.
#[derive(Debug, Clone)]
pub struct Document {
    main: XmlPart,
    styles: Option<XmlPart>,
    footnotes: Option<XmlPart>,
    settings: Option<XmlPart>,
    core: Option<XmlPart>,
    media: Media,
}

impl Document {
    /// Open a DOCX file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Open a DOCX held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    /// Parse the WordprocessingML parts of a package.
    pub fn from_package(package: Package) -> Result<Self> {
        let content_types = package
            .part(CONTENT_TYPES_PART)
            .ok_or_else(|| Error::InvalidDocument("missing [Content_Types].xml".to_string()))
            .and_then(ContentTypes::parse)?;

        let package_rels = match package.part(&rels_path_for("")) {
            Some(bytes) => Relationships::parse(bytes)?,
            None => Relationships::new(),
        };

        let document_part = package_rels
            .target_by_type(rel_type::OFFICE_DOCUMENT)
            .map(|target| resolve_target("", target))
            .unwrap_or_else(|| DEFAULT_DOCUMENT_PART.to_string());

        let main = XmlPart::load(&package, document_part.clone())?.ok_or_else(|| {
            Error::InvalidDocument(format!("missing main document part {}", document_part))
        })?;

        let rels = match package.part(&rels_path_for(&document_part)) {
            Some(bytes) => Relationships::parse(bytes)?,
            None => Relationships::new(),
        };

        let related = |kind: &str| -> Result<Option<XmlPart>> {
            match rels.target_by_type(kind) {
                Some(target) => XmlPart::load(&package, resolve_target(&document_part, target)),
                None => Ok(None),
            }
        };
        let styles = related(rel_type::STYLES)?;
        let footnotes = related(rel_type::FOOTNOTES)?;
        let settings = related(rel_type::SETTINGS)?;

        let core_part = package_rels
            .target_by_type(rel_type::CORE_PROPERTIES)
            .map(|target| resolve_target("", target))
            .unwrap_or_else(|| DEFAULT_CORE_PART.to_string());
        let core = XmlPart::load(&package, core_part)?;

        let next_drawing_id = main
            .root
            .descendants("wp:docPr")
            .iter()
            .filter_map(|e| e.attr("id").and_then(|id| id.parse::<u32>().ok()))
            .max()
            .unwrap_or(0)
            + 1;

        log::debug!(
            "Opened document part {} (styles: {}, footnotes: {}, settings: {})",
            document_part,
            styles.is_some(),
            footnotes.is_some(),
            settings.is_some()
        );

        Ok(Self {
            main,
            styles,
            footnotes,
            settings,
            core,
            media: Media {
                package,
                content_types,
                rels,
                document_part,
                next_drawing_id,
            },
        })
    }

    /// Root element of the main document part (`w:document`).
    pub fn document(&self) -> &Element {
        &self.main.root
    }

    pub fn document_mut(&mut self) -> &mut Element {
        &mut self.main.root
    }

    /// The `w:body` element.
    pub fn body(&self) -> Result<&Element> {
        self.main
            .root
            .child("w:body")
            .ok_or_else(|| Error::InvalidDocument("document has no body".to_string()))
    }

    pub fn body_mut(&mut self) -> Result<&mut Element> {
        self.main
            .root
            .child_mut("w:body")
            .ok_or_else(|| Error::InvalidDocument("document has no body".to_string()))
    }

    /// The document body together with the media store, for embedding images
    /// while walking paragraphs.
    pub fn body_and_media(&mut self) -> Result<(&mut Element, &mut Media)> {
        let body = self
            .main
            .root
            .child_mut("w:body")
            .ok_or_else(|| Error::InvalidDocument("document has no body".to_string()))?;
        Ok((body, &mut self.media))
    }

    /// Root of the styles part (`w:styles`).
    pub fn styles_mut(&mut self) -> Option<&mut Element> {
        self.styles.as_mut().map(|p| &mut p.root)
    }

    pub fn styles(&self) -> Option<&Element> {
        self.styles.as_ref().map(|p| &p.root)
    }

    /// Root of the footnotes part (`w:footnotes`).
    pub fn footnotes_mut(&mut self) -> Option<&mut Element> {
        self.footnotes.as_mut().map(|p| &mut p.root)
    }

    /// Root of the settings part (`w:settings`).
    pub fn settings_mut(&mut self) -> Option<&mut Element> {
        self.settings.as_mut().map(|p| &mut p.root)
    }

    /// Root of the core properties part (`cp:coreProperties`).
    pub fn core_properties_mut(&mut self) -> Option<&mut Element> {
        self.core.as_mut().map(|p| &mut p.root)
    }

    /// Media store of the document.
    pub fn media_mut(&mut self) -> &mut Media {
        &mut self.media
    }

    /// Add a footer part and return the relationship id referencing it.
    pub fn add_footer(&mut self, footer: &Element) -> Result<String> {
        let data = footer.to_xml()?;
        let relative = self.media.free_part_name("footer", "xml");
        let full = resolve_target(&self.media.document_part, &relative);
        self.media
            .content_types
            .ensure_override(&full, FOOTER_CONTENT_TYPE);
        self.ensure_namespace("r", R_NS);
        Ok(self.media.add_related_part(relative, data, rel_type::FOOTER))
    }

    /// Declare a namespace prefix on the document root when missing.
    pub fn ensure_namespace(&mut self, prefix: &str, uri: &str) {
        let key = format!("xmlns:{}", prefix);
        if self.main.root.attr(&key).is_none() {
            self.main.root.set_attr(key, uri);
        }
    }

    fn flush(&mut self) -> Result<()> {
        let media = &mut self.media;
        self.main.store(&mut media.package)?;
        for part in [&self.styles, &self.footnotes, &self.settings, &self.core]
            .into_iter()
            .flatten()
        {
            part.store(&mut media.package)?;
        }
        let rels_part = rels_path_for(&media.document_part);
        media.package.set_part(rels_part, media.rels.to_xml()?);
        media
            .package
            .set_part(CONTENT_TYPES_PART, media.content_types.to_xml()?);
        Ok(())
    }

    /// Serialize the document to DOCX bytes.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.flush()?;
        self.media.package.to_bytes()
    }

    /// Save the document to `path` atomically.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.flush()?;
        self.media.package.save(path)
    }
}
