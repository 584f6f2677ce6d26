use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use strata::{HighlightConfig, Language, MarkupFormat, SyntectEngine, highlight_document};
use tracing_subscriber::EnvFilter;

/// Strata syntax highlighter - line-by-line HTML output
#[derive(Debug, Parser)]
#[command(name = "strata", version)]
struct Args {
    /// File to highlight, or '-' for stdin
    input: Option<PathBuf>,

    /// Language to highlight (e.g. html, rust, python)
    ///
    /// If omitted, the language is detected from the file extension or a
    /// shebang line
    #[arg(short, long)]
    lang: Option<String>,

    /// Emit inline styles from this theme instead of class names
    #[arg(long, conflicts_with = "class_prefix")]
    theme: Option<String>,

    /// Prefix every generated class name
    #[arg(long)]
    class_prefix: Option<String>,

    /// Highlight <script> and <style> regions with the outer grammar
    #[arg(long)]
    no_embedded: bool,

    /// Skip highlighting for documents longer than this many lines
    #[arg(long, default_value_t = 20_000)]
    max_lines: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let (content, path) = read_input(args.input.as_deref())?;
    let language = resolve_language(args.lang.as_deref(), path, &content)?;

    let format = markup_format(args.theme, args.class_prefix);
    let engine = SyntectEngine::with_format(format).with_context(|| {
        format!(
            "available themes: {}",
            SyntectEngine::theme_names().join(", ")
        )
    })?;

    let config = HighlightConfig {
        max_lines: Some(args.max_lines),
        embedded_languages: args.no_embedded.then_some(false),
        ..Default::default()
    };
    tracing::debug!(%language, ?config, "highlighting");

    let lines = highlight_document(&engine, language, &content, &config);

    let mut out = io::stdout().lock();
    writeln!(out, "<pre><code class=\"language-{}\">", language.name())?;
    for line in &lines {
        writeln!(out, "{}", line.markup)?;
    }
    writeln!(out, "</code></pre>")?;
    Ok(())
}

fn markup_format(theme: Option<String>, class_prefix: Option<String>) -> MarkupFormat {
    match (theme, class_prefix) {
        (Some(theme), _) => MarkupFormat::InlineStyles(theme),
        (None, Some(prefix)) => MarkupFormat::ClassNamesWithPrefix(prefix),
        (None, None) => MarkupFormat::ClassNames,
    }
}

fn read_input(input: Option<&Path>) -> Result<(String, Option<&Path>)> {
    match input {
        None => read_stdin().map(|content| (content, None)),
        Some(path) if path.as_os_str() == "-" => read_stdin().map(|content| (content, None)),
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read file '{}'", path.display()))?;
            Ok((content, Some(path)))
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    Ok(buffer)
}

/// Pick the language from `--lang`, then the file extension, then a shebang.
fn resolve_language(lang: Option<&str>, path: Option<&Path>, content: &str) -> Result<Language> {
    if let Some(lang) = lang {
        return Ok(lang.parse::<Language>()?);
    }
    if let Some(language) = path.and_then(|path| Language::from_path(path)) {
        return Ok(language);
    }
    if let Some(language) = content.lines().next().and_then(Language::from_shebang) {
        return Ok(language);
    }

    match path {
        Some(path) => bail!(
            "could not detect language from filename: {}. Use --lang to specify.",
            path.display()
        ),
        None => bail!("could not detect language. Use --lang to specify."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_explicit_language_wins() {
        let language = resolve_language(Some("js"), Some(Path::new("page.html")), "").unwrap();
        assert_eq!(language, Language::JavaScript);
    }

    #[test]
    fn test_unknown_explicit_language() {
        let err = resolve_language(Some("klingon"), None, "").unwrap_err();
        assert_eq!(err.to_string(), "unknown language: klingon");
    }

    #[test]
    fn test_language_from_extension() {
        let language = resolve_language(None, Some(Path::new("src/lib.rs")), "").unwrap();
        assert_eq!(language, Language::Rust);
    }

    #[test]
    fn test_language_from_shebang() {
        let script = indoc! {"
            #!/usr/bin/env python3
            print('hi')
        "};
        let language = resolve_language(None, Some(Path::new("tool")), script).unwrap();
        assert_eq!(language, Language::Python);
    }

    #[test]
    fn test_undetectable_language() {
        let err = resolve_language(None, Some(Path::new("README")), "hello").unwrap_err();
        assert!(err.to_string().contains("README"));
        assert!(resolve_language(None, None, "hello").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["strata", "--lang", "html", "--no-embedded", "index.html"]);
        assert_eq!(args.lang.as_deref(), Some("html"));
        assert!(args.no_embedded);
        assert_eq!(args.input, Some(PathBuf::from("index.html")));
        assert_eq!(args.max_lines, 20_000);

        let both = ["strata", "--theme", "x", "--class-prefix", "hl-"];
        assert!(Args::try_parse_from(both).is_err());
    }

    #[test]
    fn test_markup_format() {
        assert_eq!(markup_format(None, None), MarkupFormat::ClassNames);
        assert_eq!(
            markup_format(None, Some("hl-".to_string())),
            MarkupFormat::ClassNamesWithPrefix("hl-".to_string())
        );
        assert_eq!(
            markup_format(Some("base16-ocean.dark".to_string()), None),
            MarkupFormat::InlineStyles("base16-ocean.dark".to_string())
        );
    }
}
