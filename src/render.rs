/*!
 * HTML render backend.
 *
 * Thin collaborator around `pandoc`: writes the embedded ebook template into
 * the work dir, converts the merged markdown to standalone HTML and injects
 * the generated table of contents right after `<body>`. No pipeline
 * invariants live here; everything interesting happened before this stage.
 */

use anyhow::{anyhow, Context, Result};
use log::info;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::file_utils::FileManager;
use crate::pipeline::toc::TocEntry;

/// Rendered output file name inside the work dir
pub const HTML_FILE: &str = "book.html";

const TEMPLATE_FILE: &str = "template.html";

// Pandoc template: $title$ and $body$ are pandoc placeholders
const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>$title$</title>
    <style>
        body {
            font-family: Georgia, "Noto Serif", serif;
            line-height: 1.8;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            background-color: #fefefe;
            color: #333;
        }

        h1, h2, h3, h4, h5, h6 {
            color: #2c3e50;
            margin-top: 2em;
            margin-bottom: 1em;
        }

        h1 { font-size: 2.2em; border-bottom: 3px solid #3498db; padding-bottom: 10px; }
        h2 { font-size: 1.8em; border-bottom: 2px solid #3498db; padding-bottom: 8px; }
        h3 { font-size: 1.5em; }

        p { margin: 1em 0; text-align: justify; }

        img {
            max-width: 100%;
            height: auto;
            display: block;
            margin: 20px auto;
            border-radius: 8px;
            box-shadow: 0 4px 8px rgba(0,0,0,0.1);
        }

        blockquote {
            border-left: 4px solid #3498db;
            margin: 1em 0;
            padding: 0.5em 1em;
            background-color: #f8f9fa;
            font-style: italic;
        }

        hr {
            border: none;
            border-top: 2px solid #eee;
            margin: 3em 0;
        }

        nav.table-of-contents {
            background-color: #f8f9fa;
            border: 2px solid #e9ecef;
            border-radius: 10px;
            padding: 20px;
            margin: 30px 0;
        }

        nav.table-of-contents ul { list-style: none; padding-left: 1em; }
        nav.table-of-contents a { text-decoration: none; color: #007bff; }
        nav.table-of-contents a:hover { text-decoration: underline; }

        @media (max-width: 600px) {
            body { padding: 10px; font-size: 16px; }
            h1 { font-size: 1.8em; }
            h2 { font-size: 1.5em; }
        }

        @media (prefers-color-scheme: dark) {
            body { background-color: #1a1a1a; color: #e0e0e0; }
            h1, h2, h3, h4, h5, h6 { color: #4fc3f7; }
            blockquote { background-color: #2d2d2d; border-left-color: #4fc3f7; }
            nav.table-of-contents { background-color: #2d2d2d; border-color: #444; }
        }
    </style>
</head>
<body>
$body$
</body>
</html>
"#;

/// Renders the merged markdown into a styled standalone HTML file
pub struct HtmlRenderer {
    work_dir: PathBuf,
}

impl HtmlRenderer {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// Convert `markdown_file` to `book.html`, injecting the ToC nav
    pub async fn render(
        &self,
        markdown_file: &Path,
        title: &str,
        toc: &[TocEntry],
    ) -> Result<PathBuf> {
        let template_path = self.work_dir.join(TEMPLATE_FILE);
        FileManager::write_to_file(&template_path, DEFAULT_TEMPLATE)?;

        let html_path = self.work_dir.join(HTML_FILE);
        let output = Command::new("pandoc")
            .arg("-f")
            .arg("markdown")
            .arg("-t")
            .arg("html")
            .arg("--standalone")
            .arg("--template")
            .arg(&template_path)
            .arg("--metadata")
            .arg(format!("title={}", title))
            .arg(markdown_file)
            .arg("-o")
            .arg(&html_path)
            .output()
            .await
            .context("Failed to run pandoc for HTML rendering")?;

        if !output.status.success() {
            return Err(anyhow!(
                "pandoc failed to render HTML: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        if !toc.is_empty() {
            let html = FileManager::read_to_string(&html_path)?;
            let with_nav = inject_toc(&html, toc);
            FileManager::write_to_file(&html_path, &with_nav)?;
        }

        info!("Rendered HTML ebook: {}", html_path.display());
        Ok(html_path)
    }
}

/// Build the `<nav>` ToC and insert it right after the opening `<body>` tag.
/// Documents without a body tag get the nav prepended instead.
pub fn inject_toc(html: &str, entries: &[TocEntry]) -> String {
    let nav = toc_nav(entries);

    match html.find("<body>") {
        Some(pos) => {
            let insert_at = pos + "<body>".len();
            format!("{}\n{}{}", &html[..insert_at], nav, &html[insert_at..])
        }
        None => format!("{}{}", nav, html),
    }
}

// Nested list mirroring the heading levels
fn toc_nav(entries: &[TocEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut nav = String::from("<nav class=\"table-of-contents\">\n<h2>Contents</h2>\n<ul>\n");
    let mut current_level = entries[0].level;

    for entry in entries {
        if entry.level > current_level {
            for _ in current_level..entry.level {
                nav.push_str("<ul>\n");
            }
        } else if entry.level < current_level {
            for _ in entry.level..current_level {
                nav.push_str("</ul>\n");
            }
        }
        nav.push_str(&format!(
            "<li><a href=\"#{}\">{}</a></li>\n",
            entry.anchor_id, entry.title
        ));
        current_level = entry.level;
    }

    for _ in entries[0].level.min(current_level)..current_level {
        nav.push_str("</ul>\n");
    }

    nav.push_str("</ul>\n</nav>\n");
    nav
}
