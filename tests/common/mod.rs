//! In-memory EPUB fixtures.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Minimal EPUB 3 builder: one OPF at `OEBPS/content.opf`, documents under
/// `OEBPS/xhtml/`.
pub struct EpubFixture {
    title: String,
    creators: Vec<String>,
    documents: Vec<(String, String)>,
    extra_manifest: Vec<String>,
    assets: Vec<(String, Vec<u8>)>,
    extra_spine: Vec<String>,
    cover_meta: Option<String>,
}

impl EpubFixture {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            creators: Vec::new(),
            documents: Vec::new(),
            extra_manifest: Vec::new(),
            assets: Vec::new(),
            extra_spine: Vec::new(),
            cover_meta: None,
        }
    }

    pub fn creator(mut self, name: &str) -> Self {
        self.creators.push(name.to_string());
        self
    }

    /// Add a spine document whose `<body>` contains `body`.
    pub fn document(self, name: &str, body: &str) -> Self {
        self.body_with_attrs(name, "", body)
    }

    pub fn body_with_attrs(mut self, name: &str, attrs: &str, body: &str) -> Self {
        let xhtml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="ja">
<head><title>{name}</title></head>
<body{attrs}>
{body}
</body>
</html>"#
        );
        self.documents.push((name.to_string(), xhtml));
        self
    }

    /// Manifest an image and declare it as the cover.
    pub fn cover(mut self, href: &str) -> Self {
        self.extra_manifest.push(format!(
            r#"<item id="cover-img" href="{href}" media-type="image/jpeg" properties="cover-image"/>"#
        ));
        self.cover_meta = Some("cover-img".to_string());
        self
    }

    /// Manifest and store an image at `OEBPS/{href}`.
    pub fn image(mut self, href: &str, data: &[u8]) -> Self {
        let id = format!("asset{}", self.assets.len());
        self.extra_manifest.push(format!(
            r#"<item id="{id}" href="{href}" media-type="image/jpeg"/>"#
        ));
        self.assets.push((href.to_string(), data.to_vec()));
        self
    }

    /// Spine itemref pointing at nothing in the manifest.
    pub fn dangling_itemref(mut self, idref: &str) -> Self {
        self.extra_spine.push(format!(r#"<itemref idref="{idref}"/>"#));
        self
    }

    fn opf(&self) -> String {
        let mut manifest = String::new();
        let mut spine = String::new();
        for (i, (name, _)) in self.documents.iter().enumerate() {
            manifest.push_str(&format!(
                r#"<item id="doc{i}" href="xhtml/{name}" media-type="application/xhtml+xml"/>"#
            ));
            spine.push_str(&format!(r#"<itemref idref="doc{i}"/>"#));
        }
        for item in &self.extra_manifest {
            manifest.push_str(item);
        }
        for itemref in &self.extra_spine {
            spine.push_str(itemref);
        }

        let creators: String = self
            .creators
            .iter()
            .map(|c| format!("<dc:creator>{c}</dc:creator>"))
            .collect();
        let cover_meta = self
            .cover_meta
            .as_ref()
            .map(|id| format!(r#"<meta name="cover" content="{id}"/>"#))
            .unwrap_or_default();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:uuid:00000000-0000-0000-0000-000000000000</dc:identifier>
    <dc:title>{title}</dc:title>
    {creators}
    <dc:language>ja</dc:language>
    {cover_meta}
  </metadata>
  <manifest>{manifest}</manifest>
  <spine>{spine}</spine>
</package>"#,
            title = self.title,
        )
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        let deflated =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file("mimetype", stored).unwrap();
        zip.write_all(b"application/epub+zip").unwrap();

        zip.start_file("META-INF/container.xml", deflated).unwrap();
        zip.write_all(
            br#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#,
        )
        .unwrap();

        zip.start_file("OEBPS/content.opf", deflated).unwrap();
        zip.write_all(self.opf().as_bytes()).unwrap();

        for (name, xhtml) in &self.documents {
            zip.start_file(format!("OEBPS/xhtml/{name}"), deflated)
                .unwrap();
            zip.write_all(xhtml.as_bytes()).unwrap();
        }

        for (href, data) in &self.assets {
            zip.start_file(format!("OEBPS/{href}"), stored).unwrap();
            zip.write_all(data).unwrap();
        }

        zip.finish().unwrap().into_inner()
    }
}
