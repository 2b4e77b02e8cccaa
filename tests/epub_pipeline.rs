mod common;

use std::io::Write;

use common::EpubFixture;
use tempfile::NamedTempFile;
use yomiage::{
    Analyzer, EpubReader, Error, ExtractOptions, ScriptAnalyzer, Section, annotate, convert_epub,
    read_book,
};

fn convert(fixture: &EpubFixture) -> yomiage::Result<yomiage::Book> {
    let mut epub = EpubReader::from_bytes(fixture.build())?;
    convert_epub(&mut epub, &ExtractOptions::default())
}

fn texts(section: &[Section]) -> Vec<&str> {
    section
        .iter()
        .filter_map(|s| s.as_text().map(|t| t.text.as_str()))
        .collect()
}

#[test]
fn test_reader_metadata_and_spine() {
    let fixture = EpubFixture::new("坊っちゃん")
        .creator("夏目 漱石")
        .document("p-001.xhtml", "<p>一。</p>")
        .document("p-002.xhtml", "<p>二。</p>");
    let epub = EpubReader::from_bytes(fixture.build()).unwrap();

    assert_eq!(epub.opf_path(), "OEBPS/content.opf");
    assert_eq!(epub.metadata().title, "坊っちゃん");
    assert_eq!(epub.metadata().authors, vec!["夏目 漱石"]);
    assert_eq!(epub.metadata().language.as_deref(), Some("ja"));

    let paths: Vec<_> = epub.spine().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["OEBPS/xhtml/p-001.xhtml", "OEBPS/xhtml/p-002.xhtml"]);
    assert!(epub.spine().iter().all(|e| e.linear));
}

#[test]
fn test_sentences_with_quotes_and_ruby() {
    let fixture = EpubFixture::new("テスト").document(
        "p-001.xhtml",
        "<p>あ。「い。」う。</p>\n<p><ruby>漢<rt>かん</rt></ruby>字を読む</p>",
    );
    let book = convert(&fixture).unwrap();

    assert_eq!(book.chapters.len(), 1);
    assert_eq!(
        texts(&book.chapters[0].sections),
        vec!["あ。", "「い。」う。", "漢字を読む"]
    );
}

#[test]
fn test_image_only_document_folds_into_next_chapter() {
    let fixture = EpubFixture::new("テスト")
        .document("p-cover.xhtml", r#"<div><img src="../image/cover.jpg" alt=""/></div>"#)
        .document("p-001.xhtml", "<p>第一章。</p>")
        .document("p-002.xhtml", "<p>第二章。</p>");
    let book = convert(&fixture).unwrap();

    assert_eq!(book.chapters.len(), 2);
    let first = &book.chapters[0].sections;
    assert_eq!(first[0].image_ref(), Some("cover.jpg"));
    assert_eq!(texts(first), vec!["第一章。"]);
    assert_eq!(texts(&book.chapters[1].sections), vec!["第二章。"]);
}

#[test]
fn test_trailing_image_document_folds_into_last_chapter() {
    let fixture = EpubFixture::new("テスト")
        .document("p-001.xhtml", "<p>本文。</p>")
        .document(
            "p-002.xhtml",
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><image xlink:href="../image/cover.jpg"/></svg>"#,
        );
    let book = convert(&fixture).unwrap();

    assert_eq!(book.chapters.len(), 1);
    let sections = &book.chapters[0].sections;
    assert_eq!(texts(sections), vec!["本文。"]);
    assert_eq!(sections.last().and_then(Section::image_ref), Some("cover.jpg"));
    assert_eq!(book.images, vec!["cover.jpg"]);
    assert_eq!(book.cover_image.as_deref(), Some("cover.jpg"));
}

#[test]
fn test_repeated_image_registered_once() {
    let fixture = EpubFixture::new("テスト")
        .document("p-001.xhtml", r#"<p>一。</p><img src="../image/map.png"/>"#)
        .document("p-002.xhtml", r#"<p>二。</p><img src="../image/map.png#top"/>"#);
    let book = convert(&fixture).unwrap();

    assert_eq!(book.images, vec!["map.png"]);
    let image_sections = book
        .chapters
        .iter()
        .flat_map(|c| &c.sections)
        .filter(|s| s.is_image())
        .count();
    assert_eq!(image_sections, 2);
}

#[test]
fn test_excluded_bodies_are_skipped() {
    let fixture = EpubFixture::new("テスト")
        .document("p-001.xhtml", "<p>本文。</p>")
        .body_with_attrs(
            "p-colophon.xhtml",
            r#" class="p-colophon vrtl""#,
            "<p>奥付。</p>",
        )
        .body_with_attrs("p-caution.xhtml", r#" class="p-caution""#, "<p>注意。</p>");
    let book = convert(&fixture).unwrap();

    let all: Vec<_> = book.text_sections().map(|t| t.text.as_str()).collect();
    assert_eq!(all, vec!["本文。"]);
    assert!(book.chapters.iter().all(|c| !c.is_empty()));
}

#[test]
fn test_custom_excluded_class() {
    let fixture = EpubFixture::new("テスト")
        .body_with_attrs("p-toc.xhtml", r#" class="p-toc""#, "<p>目次。</p>")
        .document("p-001.xhtml", "<p>本文。</p>");
    let mut epub = EpubReader::from_bytes(fixture.build()).unwrap();
    let options = ExtractOptions::default().with_excluded_body_class("p-toc");
    let book = convert_epub(&mut epub, &options).unwrap();

    let all: Vec<_> = book.text_sections().map(|t| t.text.as_str()).collect();
    assert_eq!(all, vec!["本文。"]);
}

#[test]
fn test_declared_cover_preferred() {
    let fixture = EpubFixture::new("テスト")
        .cover("image/front.jpg")
        .document(
            "p-001.xhtml",
            r#"<img src="../image/cover-old.jpg"/><img src="../image/front.jpg"/><p>本文。</p>"#,
        );
    let book = convert(&fixture).unwrap();

    assert_eq!(book.images, vec!["cover-old.jpg", "front.jpg"]);
    assert_eq!(book.cover_image.as_deref(), Some("front.jpg"));
}

#[test]
fn test_read_images_named_by_book() {
    let fixture = EpubFixture::new("テスト")
        .image("image/cover.jpg", b"\xFF\xD8cover")
        .image("image/p-001.jpg", b"\xFF\xD8page")
        .document(
            "p-001.xhtml",
            r#"<img src="../image/cover.jpg"/><p>本文。</p><img src="../image/p-001.jpg"/>"#,
        );
    let mut epub = EpubReader::from_bytes(fixture.build()).unwrap();
    let book = convert_epub(&mut epub, &ExtractOptions::default()).unwrap();

    assert_eq!(book.images, vec!["cover.jpg", "p-001.jpg"]);
    assert_eq!(epub.image_path("cover.jpg"), Some("OEBPS/image/cover.jpg"));

    let stored: Vec<Vec<u8>> = book
        .images
        .iter()
        .map(|name| epub.read_image(name).unwrap())
        .collect();
    assert_eq!(stored[0], b"\xFF\xD8cover");
    assert_eq!(stored[1], b"\xFF\xD8page");

    let direct = epub.read_asset("OEBPS/image/p-001.jpg").unwrap();
    assert_eq!(direct, stored[1]);
}

#[test]
fn test_read_image_not_in_manifest() {
    let fixture = EpubFixture::new("テスト").document("p-001.xhtml", "<p>本文。</p>");
    let mut epub = EpubReader::from_bytes(fixture.build()).unwrap();

    assert_eq!(epub.image_path("missing.png"), None);
    assert!(matches!(epub.read_image("missing.png"), Err(Error::MissingDocument(_))));
    assert!(matches!(
        epub.read_asset("OEBPS/image/missing.png"),
        Err(Error::MissingDocument(_))
    ));
    assert_eq!(epub.manifest().len(), 1);
}

#[test]
fn test_dangling_itemref_is_skipped() {
    let fixture = EpubFixture::new("テスト")
        .document("p-001.xhtml", "<p>本文。</p>")
        .dangling_itemref("missing");
    let epub = EpubReader::from_bytes(fixture.build()).unwrap();
    assert_eq!(epub.spine().len(), 1);
}

#[test]
fn test_book_without_text_is_empty() {
    let fixture = EpubFixture::new("テスト").document("p-001.xhtml", "<div>   </div>");
    assert!(matches!(convert(&fixture), Err(Error::EmptyBook)));
}

#[test]
fn test_not_an_epub() {
    let result = EpubReader::from_bytes(b"not a zip".to_vec());
    assert!(matches!(result, Err(Error::Zip(_))));
}

#[test]
fn test_missing_container() {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file("mimetype", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"application/epub+zip").unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    let result = EpubReader::from_bytes(bytes);
    assert!(matches!(result, Err(Error::InvalidEpub(_))));
}

#[test]
fn test_read_document_out_of_range() {
    let fixture = EpubFixture::new("テスト").document("p-001.xhtml", "<p>本文。</p>");
    let mut epub = EpubReader::from_bytes(fixture.build()).unwrap();
    assert!(epub.read_document(0).is_ok());
    assert!(matches!(epub.read_document(1), Err(Error::MissingDocument(_))));
}

#[test]
fn test_read_book_from_path() {
    let fixture = EpubFixture::new("ファイル").document("p-001.xhtml", "<p>一。二。</p>");
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&fixture.build()).unwrap();
    file.flush().unwrap();

    let book = read_book(file.path(), &ExtractOptions::default()).unwrap();
    assert_eq!(book.title, "ファイル");
    assert_eq!(texts(&book.chapters[0].sections), vec!["一。", "二。"]);
}

#[test]
fn test_annotate_after_convert() {
    let fixture = EpubFixture::new("テスト")
        .document("p-001.xhtml", r#"<img src="a.png"/><p>猫がいる。</p>"#);
    let mut book = convert(&fixture).unwrap();

    let count = annotate(&mut book, &ScriptAnalyzer::new()).unwrap();
    assert_eq!(count, 1);

    let sections = &book.chapters[0].sections;
    assert!(sections[0].is_image());
    let tokens: Vec<_> = sections[1]
        .as_text()
        .unwrap()
        .tokens
        .iter()
        .map(|t| t.surface.as_str())
        .collect();
    assert_eq!(tokens, vec!["猫", "がいる", "。"]);
}

#[test]
fn test_boxed_analyzer() {
    let fixture = EpubFixture::new("テスト").document("p-001.xhtml", "<p>あ。</p>");
    let mut book = convert(&fixture).unwrap();

    let analyzer: Box<dyn Analyzer> = Box::new(ScriptAnalyzer::new());
    annotate(&mut book, &analyzer).unwrap();
    assert_eq!(book.text_sections().next().unwrap().tokens.len(), 2);
}

#[cfg(feature = "cli")]
#[test]
fn test_json_shape() {
    let fixture = EpubFixture::new("テスト")
        .creator("作者")
        .document("p-001.xhtml", r#"<img src="../image/cover.jpg"/><p>あ。</p>"#);
    let book = convert(&fixture).unwrap();

    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(json["title"], "テスト");
    assert_eq!(json["authors"][0], "作者");
    assert_eq!(json["coverImage"], "cover.jpg");
    assert_eq!(json["images"][0], "cover.jpg");

    let sections = &json["chapters"][0]["sections"];
    assert_eq!(sections[0]["kind"], "image");
    assert_eq!(sections[0]["imageRef"], "cover.jpg");
    assert_eq!(sections[1]["kind"], "text");
    assert_eq!(sections[1]["text"], "あ。");

    let back: yomiage::Book = serde_json::from_value(json).unwrap();
    assert_eq!(back, book);
}
