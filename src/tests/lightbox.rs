use super::Lightbox;
use crate::document::Image;

fn images(n: usize) -> Vec<Image> {
    (0..n)
        .map(|i| Image {
            path: format!("img_{i}.png"),
            alt: format!("Figure {i}"),
        })
        .collect()
}

#[test]
fn test_cycling_wraps_both_ways() {
    let mut lightbox = Lightbox::new(images(3));
    assert!(lightbox.open(2));

    lightbox.show_next();
    assert_eq!(lightbox.current().map(|(i, _)| i), Some(0));

    lightbox.show_prev();
    assert_eq!(lightbox.current().map(|(i, _)| i), Some(2));
    assert_eq!(lightbox.current().unwrap().1.alt, "Figure 2");
}

#[test]
fn test_navigation_is_ignored_when_closed() {
    let mut lightbox = Lightbox::new(images(2));
    lightbox.show_next();
    lightbox.show_prev();
    assert!(!lightbox.is_open());

    lightbox.open(0);
    lightbox.close();
    lightbox.show_next();
    assert!(lightbox.current().is_none());
}

#[test]
fn test_open_rejects_out_of_range() {
    let mut lightbox = Lightbox::new(Vec::new());
    assert!(!lightbox.open(0));
    assert!(!lightbox.is_open());
}
