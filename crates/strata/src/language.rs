//! The closed set of grammars a session can switch between.
//!
//! Grammars are identified by [`Language`] rather than bare strings, so the
//! detector and the engine boundary are total functions over a known set.
//! [`Language::Unset`] is the explicit "no grammar" variant: a session whose
//! initial language is unset never highlights anything.
//!
//! [`EmbeddedLanguage`] covers the sub-languages that can appear inside an
//! HTML document between an opening and a closing tag.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// A grammar known to the highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    /// No grammar. Chunks are passed through unhighlighted.
    #[default]
    Unset,
    Html,
    JavaScript,
    Css,
    Rust,
    Python,
    Java,
    C,
    Cpp,
    Go,
    Json,
    Markdown,
    Shell,
    Xml,
    Yaml,
    Sql,
    Ruby,
    Php,
    Diff,
}

impl Language {
    /// Every language except [`Language::Unset`].
    pub const ALL: [Language; 18] = [
        Language::Html,
        Language::JavaScript,
        Language::Css,
        Language::Rust,
        Language::Python,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::Go,
        Language::Json,
        Language::Markdown,
        Language::Shell,
        Language::Xml,
        Language::Yaml,
        Language::Sql,
        Language::Ruby,
        Language::Php,
        Language::Diff,
    ];

    /// Canonical lowercase identifier. Empty for [`Language::Unset`].
    pub fn name(self) -> &'static str {
        match self {
            Language::Unset => "",
            Language::Html => "html",
            Language::JavaScript => "javascript",
            Language::Css => "css",
            Language::Rust => "rust",
            Language::Python => "python",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Go => "go",
            Language::Json => "json",
            Language::Markdown => "markdown",
            Language::Shell => "bash",
            Language::Xml => "xml",
            Language::Yaml => "yaml",
            Language::Sql => "sql",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Diff => "diff",
        }
    }

    /// Returns true for [`Language::Unset`].
    pub fn is_unset(self) -> bool {
        self == Language::Unset
    }

    /// Whether documents of this language may embed `<script>` and `<style>`
    /// regions that should be highlighted with their own grammar.
    pub fn supports_embedded(self) -> bool {
        matches!(self, Language::Html)
    }

    /// File extension used to look the grammar up in a TextMate syntax set.
    pub fn syntax_token(self) -> Option<&'static str> {
        let token = match self {
            Language::Unset => return None,
            Language::Html => "html",
            Language::JavaScript => "js",
            Language::Css => "css",
            Language::Rust => "rs",
            Language::Python => "py",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Go => "go",
            Language::Json => "json",
            Language::Markdown => "md",
            Language::Shell => "sh",
            Language::Xml => "xml",
            Language::Yaml => "yaml",
            Language::Sql => "sql",
            Language::Ruby => "rb",
            Language::Php => "php",
            Language::Diff => "diff",
        };
        Some(token)
    }

    /// Detect a language from a file path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Language> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        let language = match ext.as_str() {
            "html" | "htm" | "xhtml" => Language::Html,
            "js" | "mjs" | "cjs" | "jsx" => Language::JavaScript,
            "css" => Language::Css,
            "rs" => Language::Rust,
            "py" | "pyw" => Language::Python,
            "java" => Language::Java,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Language::Cpp,
            "go" => Language::Go,
            "json" => Language::Json,
            "md" | "markdown" => Language::Markdown,
            "sh" | "bash" | "zsh" => Language::Shell,
            "xml" | "xsl" | "xslt" | "svg" => Language::Xml,
            "yaml" | "yml" => Language::Yaml,
            "sql" => Language::Sql,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            "diff" | "patch" => Language::Diff,
            _ => return None,
        };
        Some(language)
    }

    /// Map a MIME type, as reported by a code-review host, to a language.
    ///
    /// Parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime_type(mime: &str) -> Option<Language> {
        let essence = mime.split(';').next()?.trim().to_ascii_lowercase();
        let language = match essence.as_str() {
            "text/html" | "application/xhtml+xml" => Language::Html,
            "text/javascript" | "application/javascript" | "application/x-javascript" => {
                Language::JavaScript
            }
            "text/css" => Language::Css,
            "text/x-rustsrc" | "text/rust" => Language::Rust,
            "text/x-python" | "text/x-python3" => Language::Python,
            "text/x-java" | "text/x-java-source" => Language::Java,
            "text/x-csrc" | "text/x-chdr" => Language::C,
            "text/x-c++src" | "text/x-c++hdr" => Language::Cpp,
            "text/x-go" => Language::Go,
            "application/json" => Language::Json,
            "text/x-markdown" | "text/markdown" => Language::Markdown,
            "text/x-sh" | "application/x-sh" => Language::Shell,
            "application/xml" | "text/xml" => Language::Xml,
            "text/x-yaml" | "application/yaml" => Language::Yaml,
            "text/x-sql" => Language::Sql,
            "text/x-ruby" => Language::Ruby,
            "application/x-httpd-php" | "text/x-php" => Language::Php,
            "text/x-diff" | "text/x-patch" => Language::Diff,
            _ => return None,
        };
        Some(language)
    }

    /// Detect a language from a `#!` interpreter line.
    pub fn from_shebang(first_line: &str) -> Option<Language> {
        let shebang = first_line.strip_prefix("#!")?.trim();

        if shebang.contains("python") {
            Some(Language::Python)
        } else if shebang.contains("node") {
            Some(Language::JavaScript)
        } else if shebang.contains("ruby") {
            Some(Language::Ruby)
        } else if shebang.contains("php") {
            Some(Language::Php)
        } else if shebang.contains("bash")
            || shebang.contains("zsh")
            || shebang.ends_with("/sh")
        {
            Some(Language::Shell)
        } else {
            None
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Unset => f.write_str("<unset>"),
            other => f.write_str(other.name()),
        }
    }
}

/// Error returned when parsing a language name that is not in the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let language = match normalized.as_str() {
            "html" | "htm" | "xhtml" => Language::Html,
            "javascript" | "js" | "jsx" | "mjs" | "cjs" | "node" => Language::JavaScript,
            "css" => Language::Css,
            "rust" | "rs" => Language::Rust,
            "python" | "py" | "py3" | "python3" => Language::Python,
            "java" => Language::Java,
            "c" | "h" => Language::C,
            "cpp" | "c++" | "cxx" | "hpp" => Language::Cpp,
            "go" | "golang" => Language::Go,
            "json" | "jsonc" => Language::Json,
            "markdown" | "md" => Language::Markdown,
            "bash" | "sh" | "shell" | "zsh" => Language::Shell,
            "xml" | "xsl" | "xslt" | "svg" => Language::Xml,
            "yaml" | "yml" => Language::Yaml,
            "sql" | "mysql" | "postgresql" | "postgres" | "sqlite" => Language::Sql,
            "ruby" | "rb" => Language::Ruby,
            "php" => Language::Php,
            "diff" | "patch" => Language::Diff,
            _ => return Err(UnknownLanguage(s.to_string())),
        };
        Ok(language)
    }
}

/// A sub-language embedded in an HTML document between tag delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbeddedLanguage {
    /// `<script>` ... `</script>`, highlighted as JavaScript.
    Script,
    /// `<style>` ... `</style>`, highlighted as CSS.
    Style,
}

impl EmbeddedLanguage {
    /// Detection order.
    pub const ALL: [EmbeddedLanguage; 2] = [EmbeddedLanguage::Script, EmbeddedLanguage::Style];

    /// Prefix that opens the region. Attributes may follow, so the closing `>`
    /// is not part of it.
    pub fn opening(self) -> &'static str {
        match self {
            EmbeddedLanguage::Script => "<script",
            EmbeddedLanguage::Style => "<style",
        }
    }

    /// Prefix that closes the region.
    pub fn closing(self) -> &'static str {
        match self {
            EmbeddedLanguage::Script => "</script",
            EmbeddedLanguage::Style => "</style",
        }
    }

    /// Grammar used inside the region.
    pub fn language(self) -> Language {
        match self {
            EmbeddedLanguage::Script => Language::JavaScript,
            EmbeddedLanguage::Style => Language::Css,
        }
    }
}
