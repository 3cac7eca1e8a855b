/*!
 * Unit tests for the table-of-contents builder
 */

use bookwai::pipeline::toc::slugify;
use bookwai::pipeline::TocBuilder;

#[test]
fn test_build_withRepeatedTitle_shouldAnchorByFirstOccurrence() {
    let md = "# Introduction\n\nbody\n\n## Detail\n\n# Introduction\n";
    let (_, entries) = TocBuilder::build(md);

    assert_eq!(entries[0].anchor_id, "introduction");
    assert_eq!(entries[1].anchor_id, "detail");
    assert_eq!(entries[2].anchor_id, "introduction-2");
}

#[test]
fn test_build_shouldPreserveHeadingLevelsAndTitles() {
    let md = "# One\n\n### Deep Heading\n";
    let (_, entries) = TocBuilder::build(md);

    assert_eq!(entries[0].level, 1);
    assert_eq!(entries[1].level, 3);
    assert_eq!(entries[1].title, "Deep Heading");
}

#[test]
fn test_build_shouldNotTouchNonHeadingLines() {
    let md = "# Title\n\nA paragraph with # hash inside.\n";
    let (augmented, _) = TocBuilder::build(md);
    assert!(augmented.contains("A paragraph with # hash inside."));
}

#[test]
fn test_build_insideFencedCode_shouldIgnoreHeadings() {
    let md = "```sh\n# comment, not a heading\n```\n\n## Real\n";
    let (_, entries) = TocBuilder::build(md);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Real");
}

#[test]
fn test_slugify_shouldLowercaseAndHyphenate() {
    assert_eq!(slugify("Hello World"), "hello-world");
    assert_eq!(slugify("  Spaced   Out  "), "spaced-out");
    assert_eq!(slugify("Don't Stop"), "dont-stop");
}

#[test]
fn test_slugify_withCjkTitle_shouldKeepCharacters() {
    assert_eq!(slugify("第一章"), "第一章");
}

#[test]
fn test_slugify_withOnlyPunctuation_shouldFallBackToSection() {
    assert_eq!(slugify("!!!"), "section");
}

#[test]
fn test_build_emptySlugCollisions_shouldStillDisambiguate() {
    let md = "# ???\n\n# !!!\n";
    let (_, entries) = TocBuilder::build(md);
    assert_eq!(entries[0].anchor_id, "section");
    assert_eq!(entries[1].anchor_id, "section-2");
}
