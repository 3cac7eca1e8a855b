/*!
 * Table-of-contents builder.
 *
 * Scans the merged markdown for ATX headings, assigns each a deterministic
 * anchor id derived from its title, and emits both the augmented document
 * (headings carry pandoc-style `{#id}` attributes) and the flat ToC entry
 * list used by the HTML renderer.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*?)\s*$").expect("heading regex is valid"));

/// One entry of the table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level, 1 to 6, exactly as authored
    pub level: u8,
    /// Heading text, unmodified
    pub title: String,
    /// Deterministic anchor id
    pub anchor_id: String,
}

/// Builds anchors and the ToC entry list from merged markdown
pub struct TocBuilder;

impl TocBuilder {
    /// Scan the document and return it with heading anchors attached,
    /// plus the entries in document order.
    ///
    /// Anchor ids depend only on the heading titles and their order of first
    /// occurrence, so regenerating over identical content yields identical
    /// anchors. Duplicate titles get `-2`, `-3` suffixes.
    pub fn build(markdown: &str) -> (String, Vec<TocEntry>) {
        let mut entries = Vec::new();
        let mut slug_counts: HashMap<String, u32> = HashMap::new();
        let mut output_lines = Vec::new();
        let mut in_fence = false;

        for line in markdown.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                in_fence = !in_fence;
                output_lines.push(line.to_string());
                continue;
            }

            if !in_fence {
                if let Some(caps) = HEADING_RE.captures(line) {
                    let level = caps[1].len() as u8;
                    let title = caps[2].to_string();

                    let base = slugify(&title);
                    let count = slug_counts.entry(base.clone()).or_insert(0);
                    *count += 1;
                    let anchor_id = if *count == 1 {
                        base
                    } else {
                        format!("{}-{}", base, count)
                    };

                    output_lines.push(format!(
                        "{} {} {{#{}}}",
                        &caps[1], title, anchor_id
                    ));
                    entries.push(TocEntry {
                        level,
                        title,
                        anchor_id,
                    });
                    continue;
                }
            }

            output_lines.push(line.to_string());
        }

        let mut output = output_lines.join("\n");
        if markdown.ends_with('\n') {
            output.push('\n');
        }

        (output, entries)
    }
}

/// Lowercased title with alphanumerics kept (CJK included), whitespace runs
/// turned into single hyphens and everything else dropped. An empty result
/// falls back to `section`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() {
            pending_hyphen = true;
        }
        // Punctuation is dropped without becoming a hyphen
    }

    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}
