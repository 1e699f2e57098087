use super::{slugify, Block, DocumentBuilder, Heading, HeadingLevel, Inline, Video};
use crate::error::Error;

#[test]
fn test_slugify_matches_authored_slugs() {
    let cases = [
        (
            "EL CANON Y LA TÉCNICA IMITATIVA",
            "el-canon-y-la-técnica-imitativa",
        ),
        (
            "1. DEFINICIÓN Y PRINCIPIOS FUNDAMENTALES DEL CANON",
            "1-definición-y-principios-fundamentales-del-canon",
        ),
        (
            "2. PRINCIPIOS PARA LA CONSTRUCCIÓN DEL ANTECEDENTE (DUX)",
            "2-principios-para-la-construcción-del-antecedente-dux",
        ),
        (
            "4. LA CONCLUSIÓN DEL CANON: LA CADENCIA",
            "4-la-conclusión-del-canon-la-cadencia",
        ),
        (
            "Audiciones Esenciales (Vídeos)",
            "audiciones-esenciales-vídeos",
        ),
        ("Recursos Online", "recursos-online"),
    ];

    for (text, expected) in cases {
        assert_eq!(slugify(text), expected, "slug for {text:?}");
    }
}

#[test]
fn test_slugify_collapses_separators() {
    assert_eq!(slugify("  a -- b__c  "), "a-b-c");
    assert_eq!(slugify("!!!"), "");
}

#[test]
fn test_builder_assigns_order_and_unique_slugs() {
    let mut builder = DocumentBuilder::new();
    builder.title("Guide", None).unwrap();
    builder.section("Intro", None).unwrap();
    builder.sub_heading("Notes", None).unwrap();
    builder.section("Details", None).unwrap();
    builder.sub_heading("Notes", None).unwrap();
    let doc = builder.build().unwrap();

    let headings = doc.headings();
    let ids: Vec<&str> = headings.iter().map(|h| h.id.as_str()).collect();
    let orders: Vec<usize> = headings.iter().map(|h| h.order).collect();

    assert_eq!(ids, ["guide", "intro", "notes", "details", "notes-2"]);
    assert_eq!(orders, [0, 1, 2, 3, 4]);
    assert_eq!(headings[2].level, HeadingLevel::H3);
}

#[test]
fn test_explicit_duplicate_slug_is_rejected() {
    let mut builder = DocumentBuilder::new();
    builder.title("Guide", Some("same")).unwrap();
    let result = builder.section("Other", Some("same"));
    assert!(matches!(result, Err(Error::DuplicateSlug(slug)) if slug == "same"));
}

#[test]
fn test_block_before_section_is_rejected() {
    let mut builder = DocumentBuilder::new();
    builder.title("Guide", None).unwrap();
    let result = builder.block(Block::Paragraph(vec![Inline::plain("stray")]));
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[test]
fn test_build_without_title_fails() {
    let mut builder = DocumentBuilder::new();
    assert!(matches!(builder.build(), Err(Error::MissingTitle)));
}

#[test]
fn test_validate_detects_hand_built_duplicates() {
    let mut builder = DocumentBuilder::new();
    builder.title("Guide", None).unwrap();
    builder.section("Intro", None).unwrap();
    let mut doc = builder.build().unwrap();

    doc.sections[0].blocks.push(Block::SubHeading(Heading {
        id: "intro".to_string(),
        level: HeadingLevel::H3,
        text: "Intro again".to_string(),
        order: 2,
    }));

    assert!(matches!(doc.validate(), Err(Error::DuplicateSlug(_))));
}

#[test]
fn test_images_are_collected_in_document_order() {
    let mut builder = DocumentBuilder::new();
    builder.title("Guide", None).unwrap();
    builder.section("One", None).unwrap();
    builder
        .block(Block::Image(super::Image {
            path: "a.png".to_string(),
            alt: "first".to_string(),
        }))
        .unwrap();
    builder.section("Two", None).unwrap();
    builder
        .block(Block::Image(super::Image {
            path: "b.png".to_string(),
            alt: "second".to_string(),
        }))
        .unwrap();
    let doc = builder.build().unwrap();

    let alts: Vec<&str> = doc.images().iter().map(|i| i.alt.as_str()).collect();
    assert_eq!(alts, ["first", "second"]);
}

#[test]
fn test_parse_markup_splits_strong_runs() {
    let runs = Inline::parse_markup("<strong>Al Unísono:</strong> nota por nota");
    assert_eq!(
        runs,
        vec![
            Inline::strong("Al Unísono:"),
            Inline::plain(" nota por nota")
        ]
    );

    let runs = Inline::parse_markup("a **b** c");
    assert_eq!(
        runs,
        vec![Inline::plain("a "), Inline::strong("b"), Inline::plain(" c")]
    );
}

#[test]
fn test_parse_markup_keeps_unbalanced_markers() {
    let runs = Inline::parse_markup("2 ** 3 is eight");
    assert_eq!(runs, vec![Inline::plain("2 ** 3 is eight")]);
}

#[test]
fn test_video_embed_url() {
    let embedded = Video {
        id: "Y9OUfBDIGhw".to_string(),
        title: "Arte de la Fuga".to_string(),
        start: Some(2677),
        external_url: None,
    };
    assert_eq!(
        embedded.embed_url().as_deref(),
        Some("https://www.youtube.com/embed/Y9OUfBDIGhw?start=2677")
    );

    let restricted = Video {
        external_url: Some("https://youtu.be/15ezpwCHtJs".to_string()),
        ..embedded
    };
    assert_eq!(restricted.embed_url(), None);
}
