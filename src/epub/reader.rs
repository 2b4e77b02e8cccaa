use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Error, Result};
use crate::images::normalize_image_ref;
use crate::util::{percent_decode, resolve_relative_path, strip_bom, strip_fragment};

const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Descriptive metadata from the package document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpubMetadata {
    pub title: String,
    pub authors: Vec<String>,
    pub language: Option<String>,
}

/// One spine `itemref`, resolved against the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineEntry {
    pub idref: String,
    /// Archive path, resolved against the package document and percent-decoded.
    pub path: String,
    pub media_type: String,
    pub linear: bool,
    /// Manifest href as written, used when the decoded path is not in the archive.
    href: String,
}

/// One manifest `item`, in package document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: String,
    /// Archive path, resolved against the package document and percent-decoded.
    pub path: String,
    pub media_type: String,
    href: String,
}

/// Read access to an EPUB archive: package metadata, reading order and
/// the raw bytes of each spine document.
///
/// # Example
///
/// ```no_run
/// use yomiage::EpubReader;
///
/// let mut epub = EpubReader::open("book.epub")?;
/// println!("{}: {} documents", epub.metadata().title, epub.spine().len());
/// let first = epub.read_document(0)?;
/// # Ok::<(), yomiage::Error>(())
/// ```
pub struct EpubReader<R: Read + Seek> {
    archive: ZipArchive<R>,
    opf_path: String,
    metadata: EpubMetadata,
    spine: Vec<SpineEntry>,
    manifest: Vec<ManifestEntry>,
    cover_href: Option<String>,
}

impl EpubReader<File> {
    /// Open an EPUB file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(file)
    }
}

impl EpubReader<Cursor<Vec<u8>>> {
    /// Read an EPUB held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::new(Cursor::new(data))
    }
}

impl<R: Read + Seek> EpubReader<R> {
    /// Read the container and package document from any [`Read`] + [`Seek`] source.
    pub fn new(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let opf_path = find_opf_path(&mut archive)?;
        let opf_content = read_archive_file(&mut archive, &opf_path)?;
        let opf = parse_opf(&opf_content)?;

        let mut spine = Vec::with_capacity(opf.spine.len());
        for (idref, linear) in opf.spine {
            let Some(item) = opf.manifest.get(&idref) else {
                warn!(idref = %idref, "spine itemref not in manifest, skipping");
                continue;
            };
            let href = strip_fragment(&item.href);
            spine.push(SpineEntry {
                path: resolve_relative_path(&opf_path, &percent_decode(href)),
                href: resolve_relative_path(&opf_path, href),
                idref,
                media_type: item.media_type.clone(),
                linear,
            });
        }

        let manifest: Vec<ManifestEntry> = opf
            .manifest_order
            .iter()
            .filter_map(|id| {
                let item = opf.manifest.get(id)?;
                let href = strip_fragment(&item.href);
                Some(ManifestEntry {
                    id: id.clone(),
                    path: resolve_relative_path(&opf_path, &percent_decode(href)),
                    href: resolve_relative_path(&opf_path, href),
                    media_type: item.media_type.clone(),
                })
            })
            .collect();

        let cover_href = opf
            .cover_id
            .as_ref()
            .and_then(|id| opf.manifest.get(id))
            .map(|item| resolve_relative_path(&opf_path, &percent_decode(&item.href)));

        if opf.metadata.title.is_empty() {
            warn!(opf = %opf_path, "package document has no title");
        }
        debug!(
            opf = %opf_path,
            documents = spine.len(),
            cover = cover_href.as_deref().unwrap_or("-"),
            "package document read"
        );

        Ok(Self {
            archive,
            opf_path,
            metadata: opf.metadata,
            spine,
            manifest,
            cover_href,
        })
    }

    pub fn metadata(&self) -> &EpubMetadata {
        &self.metadata
    }

    /// Spine documents in reading order.
    pub fn spine(&self) -> &[SpineEntry] {
        &self.spine
    }

    /// Archive path of the package document.
    pub fn opf_path(&self) -> &str {
        &self.opf_path
    }

    /// Archive path of the cover image declared by the package document.
    pub fn cover_href(&self) -> Option<&str> {
        self.cover_href.as_deref()
    }

    /// Raw bytes of the spine document at `index`.
    pub fn read_document(&mut self, index: usize) -> Result<Vec<u8>> {
        let entry = self
            .spine
            .get(index)
            .ok_or_else(|| Error::MissingDocument(format!("spine index {index}")))?;

        read_with_fallback(&mut self.archive, &entry.path, &entry.href)
    }

    /// Every manifest item, in package document order.
    pub fn manifest(&self) -> &[ManifestEntry] {
        &self.manifest
    }

    /// Archive path of the first manifest item whose file name is `name`.
    ///
    /// `name` is a base file name as stored in [`Book::images`](crate::Book).
    pub fn image_path(&self, name: &str) -> Option<&str> {
        find_by_name(&self.manifest, name).map(|entry| entry.path.as_str())
    }

    /// Raw bytes of the image a book refers to by base file name.
    pub fn read_image(&mut self, name: &str) -> Result<Vec<u8>> {
        let entry = find_by_name(&self.manifest, name)
            .ok_or_else(|| Error::MissingDocument(format!("no manifest item named {name}")))?;
        read_with_fallback(&mut self.archive, &entry.path, &entry.href)
    }

    /// Raw bytes of any file in the archive.
    pub fn read_asset(&mut self, path: &str) -> Result<Vec<u8>> {
        read_archive_file_bytes(&mut self.archive, path)
    }
}

fn find_by_name<'a>(manifest: &'a [ManifestEntry], name: &str) -> Option<&'a ManifestEntry> {
    manifest
        .iter()
        .find(|entry| normalize_image_ref(&entry.path).as_deref() == Some(name))
}

impl<R: Read + Seek> std::fmt::Debug for EpubReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EpubReader")
            .field("opf_path", &self.opf_path)
            .field("metadata", &self.metadata)
            .field("spine", &self.spine.len())
            .field("manifest", &self.manifest.len())
            .finish()
    }
}

fn find_opf_path<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String> {
    let container = match read_archive_file(archive, CONTAINER_PATH) {
        Err(Error::MissingDocument(_)) => {
            return Err(Error::InvalidEpub(format!("missing {CONTAINER_PATH}")));
        }
        other => other?,
    };

    let mut reader = Reader::from_str(&container);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Empty(e) | Event::Start(e) if local_name(e.name().as_ref()) == b"rootfile" => {
                if let Some(path) = attribute(&e, b"full-path")? {
                    return Ok(path);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(Error::InvalidEpub(
        "no rootfile found in container.xml".into(),
    ))
}

struct OpfItem {
    href: String,
    media_type: String,
}

/// Everything the reader needs from the package document.
#[derive(Default)]
struct OpfData {
    metadata: EpubMetadata,
    manifest: HashMap<String, OpfItem>,
    manifest_order: Vec<String>,
    /// `(idref, linear)` in spine order
    spine: Vec<(String, bool)>,
    cover_id: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum MetadataField {
    Title,
    Creator,
    Language,
}

#[derive(Default)]
struct OpfParser {
    data: OpfData,
    in_metadata: bool,
    field: Option<MetadataField>,
    text: String,
    /// EPUB2 `<meta name="cover" content="id"/>`
    meta_cover_id: Option<String>,
    /// EPUB3 `<item properties="cover-image"/>`
    property_cover_id: Option<String>,
}

impl OpfParser {
    fn open(&mut self, e: &BytesStart<'_>, has_content: bool) -> Result<()> {
        let name = e.name();
        match local_name(name.as_ref()) {
            b"metadata" if has_content => self.in_metadata = true,
            b"title" if self.in_metadata && has_content => self.begin(MetadataField::Title),
            b"creator" if self.in_metadata && has_content => self.begin(MetadataField::Creator),
            b"language" if self.in_metadata && has_content => self.begin(MetadataField::Language),
            b"item" => {
                let id = attribute(e, b"id")?.unwrap_or_default();
                let href = attribute(e, b"href")?.unwrap_or_default();
                if id.is_empty() || href.is_empty() {
                    return Ok(());
                }
                if attribute(e, b"properties")?
                    .is_some_and(|props| props.split_ascii_whitespace().any(|p| p == "cover-image"))
                {
                    self.property_cover_id = Some(id.clone());
                }
                let media_type = attribute(e, b"media-type")?.unwrap_or_default();
                if self
                    .data
                    .manifest
                    .insert(id.clone(), OpfItem { href, media_type })
                    .is_none()
                {
                    self.data.manifest_order.push(id);
                }
            }
            b"itemref" => {
                if let Some(idref) = attribute(e, b"idref")? {
                    let linear = attribute(e, b"linear")?.is_none_or(|v| v.trim() != "no");
                    self.data.spine.push((idref, linear));
                }
            }
            b"meta" => {
                if attribute(e, b"name")?.as_deref() == Some("cover")
                    && let Some(id) = attribute(e, b"content")?.filter(|id| !id.is_empty())
                {
                    self.meta_cover_id = Some(id);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn begin(&mut self, field: MetadataField) {
        self.field = Some(field);
        self.text.clear();
    }

    fn close(&mut self, local: &[u8]) {
        if local == b"metadata" {
            self.in_metadata = false;
        }

        let Some(field) = self.field.take() else {
            return;
        };
        let value = self.text.trim().to_string();
        self.text.clear();
        if value.is_empty() {
            return;
        }

        let metadata = &mut self.data.metadata;
        match field {
            MetadataField::Title if metadata.title.is_empty() => metadata.title = value,
            MetadataField::Creator => metadata.authors.push(value),
            MetadataField::Language if metadata.language.is_none() => {
                metadata.language = Some(value)
            }
            _ => {}
        }
    }

    fn finish(mut self) -> OpfData {
        // EPUB3 cover-image property wins over the EPUB2 meta
        self.data.cover_id = self.property_cover_id.or(self.meta_cover_id);
        self.data
    }
}

fn parse_opf(content: &str) -> Result<OpfData> {
    // Text is trimmed per field; trimming events would eat spaces around entities.
    let mut reader = Reader::from_str(content);

    let mut parser = OpfParser::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => parser.open(&e, true)?,
            Event::Empty(e) => parser.open(&e, false)?,
            Event::Text(e) => {
                if parser.field.is_some() {
                    parser.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::CData(e) => {
                if parser.field.is_some() {
                    parser.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::GeneralRef(e) => {
                if parser.field.is_some() {
                    if let Some(c) = e.resolve_char_ref().ok().flatten() {
                        parser.text.push(c);
                    } else {
                        parser.text.push_str(resolve_entity(&e));
                    }
                }
            }
            Event::End(e) => parser.close(local_name(e.name().as_ref())),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(parser.finish())
}

fn resolve_entity(name: &[u8]) -> &'static str {
    match name {
        b"apos" => "'",
        b"quot" => "\"",
        b"lt" => "<",
        b"gt" => ">",
        b"amp" => "&",
        _ => "",
    }
}

/// Value of the attribute whose local name is `key`.
fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        if local_name(attr.key.as_ref()) == key {
            return Ok(Some(String::from_utf8(attr.value.to_vec())?));
        }
    }
    Ok(None)
}

/// Read `path`, then the undecoded `href` if the two differ.
fn read_with_fallback<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    href: &str,
) -> Result<Vec<u8>> {
    match read_archive_file_bytes(archive, path) {
        Err(Error::MissingDocument(_)) if href != path => read_archive_file_bytes(archive, href),
        result => result,
    }
}

fn read_archive_file<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let bytes = read_archive_file_bytes(archive, path)?;
    Ok(String::from_utf8(strip_bom(&bytes).to_vec())?)
}

fn read_archive_file_bytes<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<Vec<u8>> {
    match read_entry(archive, path) {
        Err(ZipError::FileNotFound) => {}
        result => return Ok(result?),
    }

    // Some archives store entries percent-encoded and reference them decoded,
    // or the other way round.
    let decoded = percent_decode(path);
    if decoded != path {
        match read_entry(archive, &decoded) {
            Err(ZipError::FileNotFound) => {}
            result => return Ok(result?),
        }
    }

    Err(Error::MissingDocument(path.to_string()))
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> std::result::Result<Vec<u8>, ZipError> {
    let mut file = archive.by_name(path)?;
    let mut contents = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// Extract local name from potentially namespaced XML name
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}
