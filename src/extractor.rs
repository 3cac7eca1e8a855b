/*!
 * Unit extractor: splits a source document into ordered translatable units.
 *
 * The production backend shells out to the same tools the rest of the
 * toolchain assumes: `pandoc` converts DOCX/EPUB to PDF and page HTML to
 * markdown, `pdftohtml -split` cuts the PDF into one HTML file per page.
 * Extraction is all-or-none: pages are staged in `pages.partial/` and the
 * directory is renamed to `pages/` only when every page converted, so a
 * resumed run can trust an existing `pages/` directory completely.
 */

use async_trait::async_trait;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::document::Unit;
use crate::errors::ExtractionError;
use crate::file_utils::{DocumentType, FileManager};

/// Directory of committed page files inside the work dir
pub const PAGES_DIR: &str = "pages";
/// Staging directory used while extraction is in flight
pub const PAGES_STAGING_DIR: &str = "pages.partial";
/// Directory of extracted images inside the work dir
pub const ASSETS_DIR: &str = "assets";

static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("image regex is valid"));

/// One extracted page before it becomes a unit
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// Page markdown
    pub markdown: String,
    /// Asset file names referenced by this page
    pub assets: BTreeSet<String>,
}

/// Seam between the extractor and the conversion toolchain.
///
/// `extract` writes image files into `assets_dir` (content-hashed names,
/// never mutated afterwards) and returns the page markdown in reading order.
/// It may use `staging_dir` for intermediate files.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    async fn extract(
        &self,
        source: &Path,
        staging_dir: &Path,
        assets_dir: &Path,
    ) -> Result<Vec<ExtractedPage>, ExtractionError>;
}

/// Splits a document into units and manages the pages directory lifecycle
pub struct UnitExtractor<B: ExtractionBackend> {
    backend: B,
}

impl<B: ExtractionBackend> UnitExtractor<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Extract the source into `<work_dir>/pages/`, or reuse an existing
    /// pages directory with the expected page count.
    ///
    /// Returns the units in ascending index order, dense from 1.
    pub async fn extract_or_reuse(
        &self,
        source: &Path,
        work_dir: &Path,
        expected_pages: Option<u32>,
    ) -> Result<Vec<Unit>, ExtractionError> {
        if !source.is_file() {
            return Err(ExtractionError::MissingSource(source.to_path_buf()));
        }
        if FileManager::detect_document_type(source) == DocumentType::Unknown {
            return Err(ExtractionError::UnsupportedFormat(source.to_path_buf()));
        }

        let pages_dir = work_dir.join(PAGES_DIR);
        if pages_dir.is_dir() {
            let units = load_units(&pages_dir)?;
            if let Some(expected) = expected_pages {
                if units.len() as u32 == expected {
                    info!("Reusing {} extracted pages", units.len());
                    return Ok(units);
                }
                debug!(
                    "Existing pages directory has {} pages, expected {}, re-extracting",
                    units.len(),
                    expected
                );
            } else if !units.is_empty() {
                info!("Reusing {} extracted pages", units.len());
                return Ok(units);
            }
            std::fs::remove_dir_all(&pages_dir)?;
        }

        let staging_dir = work_dir.join(PAGES_STAGING_DIR);
        if staging_dir.exists() {
            // Leftover from an interrupted extraction
            std::fs::remove_dir_all(&staging_dir)?;
        }
        std::fs::create_dir_all(&staging_dir)?;

        let assets_dir = work_dir.join(ASSETS_DIR);
        std::fs::create_dir_all(&assets_dir)?;

        let pages = self.backend.extract(source, &staging_dir, &assets_dir).await?;

        let mut units = Vec::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            let index = (i + 1) as u32;
            let mut unit = Unit::new(index, page.markdown.clone());
            unit.assets = page.assets.clone();
            std::fs::write(staging_dir.join(unit.page_file_name()), &unit.source_text)?;
            units.push(unit);
        }

        // Commit point: pages appear all at once or not at all
        std::fs::rename(&staging_dir, &pages_dir)?;
        info!("Extracted {} pages from {}", units.len(), source.display());

        Ok(units)
    }
}

/// Load units back from a committed pages directory
pub fn load_units(pages_dir: &Path) -> Result<Vec<Unit>, ExtractionError> {
    let mut files = FileManager::find_files(pages_dir, "md")
        .map_err(|e| ExtractionError::ToolFailed {
            tool: "walkdir".to_string(),
            file: pages_dir.to_path_buf(),
            message: e.to_string(),
        })?;
    files.sort();

    let mut units = Vec::with_capacity(files.len());
    for (i, file) in files.iter().enumerate() {
        let index = (i + 1) as u32;
        let text = std::fs::read_to_string(file)?;
        let mut unit = Unit::new(index, text);
        unit.assets = referenced_assets(&unit.source_text);
        units.push(unit);
    }
    Ok(units)
}

fn referenced_assets(markdown: &str) -> BTreeSet<String> {
    IMAGE_RE
        .captures_iter(markdown)
        .filter_map(|caps| {
            Path::new(&caps[2])
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
        })
        .collect()
}

/// Production backend shelling out to pandoc and pdftohtml
pub struct PandocBackend;

impl PandocBackend {
    async fn run_tool(
        tool: &str,
        args: &[&str],
        file: &Path,
    ) -> Result<(), ExtractionError> {
        debug!("Running {} {:?}", tool, args);
        let output = Command::new(tool)
            .args(args)
            .output()
            .await
            .map_err(|e| ExtractionError::ToolFailed {
                tool: tool.to_string(),
                file: file.to_path_buf(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ExtractionError::ToolFailed {
                tool: tool.to_string(),
                file: file.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    /// Convert DOCX/EPUB to PDF; a PDF input is used as-is
    async fn ensure_pdf(
        source: &Path,
        staging_dir: &Path,
    ) -> Result<PathBuf, ExtractionError> {
        if FileManager::detect_document_type(source) == DocumentType::Pdf {
            return Ok(source.to_path_buf());
        }

        let pdf = staging_dir.join("converted.pdf");
        Self::run_tool(
            "pandoc",
            &[
                &source.to_string_lossy(),
                "-o",
                &pdf.to_string_lossy(),
            ],
            source,
        )
        .await?;
        Ok(pdf)
    }

    /// Move extracted images into the assets dir under content-hashed names.
    /// Returns the original-name to hashed-name mapping.
    fn organize_images(
        html_dir: &Path,
        assets_dir: &Path,
    ) -> Result<HashMap<String, String>, ExtractionError> {
        let mut renames = HashMap::new();
        let image_exts = ["png", "jpg", "jpeg", "gif"];

        for entry in std::fs::read_dir(html_dir)? {
            let entry = entry?;
            let path = entry.path();
            let is_image = path
                .extension()
                .map(|e| image_exts.contains(&e.to_string_lossy().to_lowercase().as_str()))
                .unwrap_or(false);
            if !path.is_file() || !is_image {
                continue;
            }

            let hash = FileManager::hash_file_short(&path).map_err(|e| {
                ExtractionError::ToolFailed {
                    tool: "sha256".to_string(),
                    file: path.clone(),
                    message: e.to_string(),
                }
            })?;
            let ext = path.extension().unwrap_or_default().to_string_lossy().to_lowercase();
            let hashed_name = format!("img-{}.{}", hash, ext);
            let target = assets_dir.join(&hashed_name);
            if !target.exists() {
                std::fs::rename(&path, &target)?;
            } else {
                std::fs::remove_file(&path)?;
            }

            let original = entry.file_name().to_string_lossy().to_string();
            renames.insert(original, hashed_name);
        }

        debug!("Organized {} images", renames.len());
        Ok(renames)
    }

    // Point image references at the hashed asset names
    fn rewrite_image_references(
        markdown: &str,
        renames: &HashMap<String, String>,
    ) -> (String, BTreeSet<String>) {
        let mut assets = BTreeSet::new();
        let rewritten = IMAGE_RE
            .replace_all(markdown, |caps: &regex::Captures| {
                let alt = &caps[1];
                let name = Path::new(&caps[2])
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                match renames.get(&name) {
                    Some(hashed) => {
                        assets.insert(hashed.clone());
                        format!("![{}]({})", alt, hashed)
                    }
                    None => caps[0].to_string(),
                }
            })
            .to_string();
        (rewritten, assets)
    }
}

#[async_trait]
impl ExtractionBackend for PandocBackend {
    async fn extract(
        &self,
        source: &Path,
        staging_dir: &Path,
        assets_dir: &Path,
    ) -> Result<Vec<ExtractedPage>, ExtractionError> {
        let pdf = Self::ensure_pdf(source, staging_dir).await?;

        let html_dir = staging_dir.join("html");
        std::fs::create_dir_all(&html_dir)?;
        let page_prefix = html_dir.join("page");
        Self::run_tool(
            "pdftohtml",
            &[
                "-split",
                &pdf.to_string_lossy(),
                &page_prefix.to_string_lossy(),
            ],
            &pdf,
        )
        .await?;

        let renames = Self::organize_images(&html_dir, assets_dir)?;

        let mut html_files = FileManager::find_files(&html_dir, "html").map_err(|e| {
            ExtractionError::ToolFailed {
                tool: "walkdir".to_string(),
                file: html_dir.clone(),
                message: e.to_string(),
            }
        })?;
        html_files.sort();

        let mut pages = Vec::with_capacity(html_files.len());
        for html_file in &html_files {
            let md_file = html_file.with_extension("md");
            Self::run_tool(
                "pandoc",
                &[
                    "-f",
                    "html",
                    "-t",
                    "markdown",
                    &html_file.to_string_lossy(),
                    "-o",
                    &md_file.to_string_lossy(),
                ],
                html_file,
            )
            .await?;

            let raw = std::fs::read_to_string(&md_file)?;
            let (markdown, assets) = Self::rewrite_image_references(&raw, &renames);
            pages.push(ExtractedPage { markdown, assets });
        }

        Ok(pages)
    }
}

/// Test backend feeding pages from memory
pub struct FixtureBackend {
    pages: Vec<String>,
}

impl FixtureBackend {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl ExtractionBackend for FixtureBackend {
    async fn extract(
        &self,
        _source: &Path,
        _staging_dir: &Path,
        _assets_dir: &Path,
    ) -> Result<Vec<ExtractedPage>, ExtractionError> {
        Ok(self
            .pages
            .iter()
            .map(|p| ExtractedPage {
                markdown: p.clone(),
                assets: BTreeSet::new(),
            })
            .collect())
    }
}
