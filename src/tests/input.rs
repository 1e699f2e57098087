use super::{format_for, load_document};
use crate::error::Error;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

#[test]
fn test_format_is_chosen_by_suffix() {
    assert_eq!(format_for(Path::new("a.json")).unwrap().name(), "json");
    assert_eq!(format_for(Path::new("a.MD")).unwrap().name(), "markdown");
    assert_eq!(
        format_for(Path::new("notes.markdown")).unwrap().name(),
        "markdown"
    );
    assert!(matches!(
        format_for(Path::new("a.txt")),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn test_load_markdown_from_disk() {
    let mut file = Builder::new().suffix(".md").tempfile().unwrap();
    writeln!(file, "# Title\n\n## Part\n\nBody text.").unwrap();

    let doc = load_document(file.path()).unwrap();
    assert_eq!(doc.title.text, "Title");
    assert_eq!(doc.sections[0].heading.id, "part");
}

#[test]
fn test_missing_file_is_io_error() {
    let result = load_document(Path::new("/definitely/not/here.json"));
    assert!(matches!(result, Err(Error::Io(_))));
}
