//! yomiage - Japanese EPUB to sentence JSON

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use yomiage::{
    Book, EpubReader, ExtractOptions, ScriptAnalyzer, SentenceRules, annotate, convert_epub,
};

#[derive(Parser)]
#[command(name = "yomiage")]
#[command(version, about = "Split Japanese EPUB books into sentences", long_about = None)]
#[command(after_help = "EXAMPLES:
    yomiage book.epub book.json          Write chapters and sentences as JSON
    yomiage -i book.epub                 Show a summary of the extracted book
    yomiage --quote '『』' book.epub      Also treat 『』 as quotation marks")]
struct Cli {
    /// Input EPUB file
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output JSON file (stdout if omitted)
    #[arg(value_name = "OUTPUT")]
    output: Option<String>,

    /// Show a summary instead of writing JSON
    #[arg(short, long)]
    info: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log each spine document
    #[arg(short, long)]
    verbose: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Skip token annotation
    #[arg(long)]
    no_tokenize: bool,

    /// Additional body class to skip (repeatable)
    #[arg(long = "exclude-class", value_name = "CLASS", env = "YOMIAGE_EXCLUDE_CLASS", value_delimiter = ',')]
    exclude_classes: Vec<String>,

    /// Additional element treated as a paragraph (repeatable)
    #[arg(long = "paragraph-tag", value_name = "TAG", env = "YOMIAGE_PARAGRAPH_TAG", value_delimiter = ',')]
    paragraph_tags: Vec<String>,

    /// Additional sentence-terminal character, e.g. ！ (repeatable)
    #[arg(long = "terminal", value_name = "CHAR")]
    terminals: Vec<char>,

    /// Additional opening/closing quotation pair, e.g. 『』 (repeatable)
    #[arg(long = "quote", value_name = "PAIR", value_parser = parse_quote_pair)]
    quotes: Vec<(char, char)>,
}

impl Cli {
    fn extract_options(&self) -> ExtractOptions {
        let mut rules = SentenceRules::default();
        for &terminal in &self.terminals {
            rules = rules.with_terminal(terminal);
        }
        for &(open, close) in &self.quotes {
            rules = rules.with_quote_pair(open, close);
        }

        let mut options = ExtractOptions::default().with_sentence_rules(rules);
        for class in &self.exclude_classes {
            options = options.with_excluded_body_class(class);
        }
        for tag in &self.paragraph_tags {
            options = options.with_paragraph_tag(tag);
        }
        options
    }

    fn default_filter(&self) -> &'static str {
        if self.quiet {
            "yomiage=warn"
        } else if self.verbose {
            "yomiage=debug"
        } else {
            "yomiage=info"
        }
    }
}

fn parse_quote_pair(s: &str) -> Result<(char, char), String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(open), Some(close), None) => Ok((open, close)),
        _ => Err(format!("expected two characters, got {s:?}")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.default_filter().into()),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> yomiage::Result<()> {
    let mut epub = EpubReader::open(&cli.input)?;
    let mut book = convert_epub(&mut epub, &cli.extract_options())?;

    if cli.info {
        show_info(&cli.input, &book);
        return Ok(());
    }

    if !cli.no_tokenize {
        annotate(&mut book, &ScriptAnalyzer::new())?;
    }

    match &cli.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            write_json(&mut out, &book, cli.pretty)?;
            out.flush()?;
        }
        None => {
            let mut out = io::stdout().lock();
            write_json(&mut out, &book, cli.pretty)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_json<W: Write>(out: W, book: &Book, pretty: bool) -> yomiage::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(out, book)?;
    } else {
        serde_json::to_writer(out, book)?;
    }
    Ok(())
}

fn show_info(path: &str, book: &Book) {
    println!("File: {path}");
    println!("Title: {}", book.title);
    if !book.authors.is_empty() {
        println!("Authors: {}", book.authors.join(", "));
    }
    if let Some(ref language) = book.language {
        println!("Language: {language}");
    }
    println!("Chapters: {}", book.chapters.len());
    println!("Sections: {}", book.section_count());
    println!("Sentences: {}", book.text_sections().count());
    println!("Images: {}", book.images.len());
    if let Some(ref cover) = book.cover_image {
        println!("Cover: {cover}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quote_pair() {
        assert_eq!(parse_quote_pair("『』"), Ok(('『', '』')));
        assert!(parse_quote_pair("「").is_err());
        assert!(parse_quote_pair("「」」").is_err());
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::try_parse_from([
            "yomiage",
            "book.epub",
            "--exclude-class",
            "p-toc",
            "--terminal",
            "！",
            "--quote",
            "『』",
        ])
        .unwrap();

        let options = cli.extract_options();
        assert!(options.excluded_body_classes.contains(&"p-toc".to_string()));
        assert!(options.excluded_body_classes.contains(&"p-colophon".to_string()));
        assert_eq!(options.sentence_rules.terminals, vec!['。', '！']);
        assert_eq!(options.sentence_rules.open_quotes, vec!['「', '『']);
        assert_eq!(cli.default_filter(), "yomiage=info");
    }
}
