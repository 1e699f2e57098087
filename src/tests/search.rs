use super::{highlight, Fragment, MatchLocation, SearchEngine, TextNode};

fn engine(texts: &[&str]) -> SearchEngine {
    SearchEngine::new(texts.iter().map(|t| TextNode::new(*t)).collect(), 3)
}

fn node_strings(engine: &SearchEngine) -> Vec<Vec<(String, bool)>> {
    engine
        .nodes()
        .iter()
        .map(|n| {
            n.fragments()
                .iter()
                .map(|f| (f.text.clone(), f.is_match))
                .collect()
        })
        .collect()
}

#[test]
fn test_highlight_is_case_insensitive_and_ordered() {
    let fragments = highlight("El Canon y la canción", "can");
    assert_eq!(
        fragments,
        vec![
            Fragment::plain("El "),
            Fragment::mark("Can"),
            Fragment::plain("on y la "),
            Fragment::mark("can"),
            Fragment::plain("ción"),
        ]
    );
}

#[test]
fn test_highlight_exact_substring_only() {
    // "canción" does not contain "canon", so only the capitalised word matches.
    let fragments = highlight("El Canon y la canción", "canon");
    assert_eq!(
        fragments,
        vec![
            Fragment::plain("El "),
            Fragment::mark("Canon"),
            Fragment::plain(" y la canción"),
        ]
    );
}

#[test]
fn test_highlight_matches_do_not_overlap() {
    let fragments = highlight("aaaa", "aa");
    assert_eq!(fragments, vec![Fragment::mark("aa"), Fragment::mark("aa")]);

    let fragments = highlight("aaa", "aa");
    assert_eq!(fragments, vec![Fragment::mark("aa"), Fragment::plain("a")]);
}

#[test]
fn test_highlight_preserves_accented_case() {
    let fragments = highlight("TÉCNICA y técnica", "técnica");
    assert_eq!(
        fragments,
        vec![
            Fragment::mark("TÉCNICA"),
            Fragment::plain(" y "),
            Fragment::mark("técnica"),
        ]
    );
}

#[test]
fn test_highlight_is_idempotent() {
    let text = "Dux y comes: el dux guía al comes.";
    assert_eq!(highlight(text, "dux"), highlight(text, "dux"));
    let joined: String = highlight(text, "comes")
        .iter()
        .map(|f| f.text.as_str())
        .collect();
    assert_eq!(joined, text);
}

#[test]
fn test_n_matches_yield_interleaved_fragments() {
    let mut engine = engine(&["ab canon cd canon ef canon"]);
    assert_eq!(engine.search("canon"), 3);

    let fragments = engine.nodes()[0].fragments();
    assert_eq!(fragments.len(), 6);
    assert_eq!(fragments.iter().filter(|f| f.is_match).count(), 3);
}

#[test]
fn test_short_queries_clear_and_do_not_highlight() {
    let mut engine = engine(&["El Canon y la canción"]);
    assert_eq!(engine.search("canon"), 1);
    assert!(engine.nodes()[0].has_marks());

    assert_eq!(engine.search("ca"), 0);
    assert_eq!(
        engine.nodes()[0].fragments(),
        [Fragment::plain("El Canon y la canción")]
    );

    assert_eq!(engine.search("  "), 0);
    assert!(!engine.nodes()[0].has_marks());
}

#[test]
fn test_query_is_trimmed() {
    let mut engine = engine(&["El Canon y la canción"]);
    assert_eq!(engine.search("  can  "), 2);
    assert_eq!(engine.query(), "can");
}

#[test]
fn test_clearing_restores_original_structure() {
    let texts = [
        "La imitación estricta no suele mantenerse hasta la última nota.",
        "Canon a la Quinta",
        "   ",
        "",
        "canon canon canon",
    ];
    let mut engine = engine(&texts);
    let baseline = node_strings(&engine);

    for query in ["can", "cano", "canon", "la", "nota", "a la", "xyz", "CANON"] {
        engine.search(query);
    }
    engine.clear();

    assert_eq!(node_strings(&engine), baseline);
    for (node, text) in engine.nodes().iter().zip(texts) {
        assert_eq!(node.text(), text);
        assert!(node.fragments().len() <= 1);
    }
}

#[test]
fn test_repeated_search_never_double_wraps() {
    let mut engine = engine(&["canon canon"]);
    for _ in 0..5 {
        assert_eq!(engine.search("canon"), 2);
    }
    assert_eq!(
        engine.nodes()[0].fragments(),
        [
            Fragment::mark("canon"),
            Fragment::plain(" "),
            Fragment::mark("canon"),
        ]
    );
}

#[test]
fn test_marks_are_never_rescanned() {
    let mut node = TextNode::new("canon");
    assert_eq!(node.wrap("canon"), 1);
    // Wrapping again must not find the text already inside the mark.
    assert_eq!(node.wrap("canon"), 0);
    assert_eq!(node.fragments(), [Fragment::mark("canon")]);
}

#[test]
fn test_whitespace_nodes_are_skipped() {
    let mut engine = engine(&["   ", "dux"]);
    assert_eq!(engine.search("dux"), 1);
    assert_eq!(engine.nodes()[0].fragments(), [Fragment::plain("   ")]);
}

#[test]
fn test_empty_engine_is_a_no_op() {
    let mut engine = SearchEngine::new(Vec::new(), 3);
    assert_eq!(engine.search("canon"), 0);
    assert_eq!(engine.next_match(), None);
}

#[test]
fn test_matches_are_in_reading_order_and_cycle() {
    let mut engine = engine(&["dux one", "no match", "two dux dux"]);
    assert_eq!(engine.search("dux"), 3);

    let expected = [
        MatchLocation {
            node: 0,
            char_start: 0,
        },
        MatchLocation {
            node: 2,
            char_start: 4,
        },
        MatchLocation {
            node: 2,
            char_start: 8,
        },
    ];
    assert_eq!(engine.matches(), expected);

    assert_eq!(engine.next_match(), Some(expected[0]));
    assert_eq!(engine.next_match(), Some(expected[1]));
    assert_eq!(engine.next_match(), Some(expected[2]));
    assert_eq!(engine.next_match(), Some(expected[0]));
    assert_eq!(engine.prev_match(), Some(expected[2]));

    engine.search("one");
    assert_eq!(engine.current_match(), None);
}

#[test]
fn test_slice_clips_fragments() {
    let mut node = TextNode::new("El Canon y la canción");
    node.wrap("can");

    assert_eq!(
        node.slice(1, 6),
        vec![
            Fragment::plain("l "),
            Fragment::mark("Can"),
        ]
    );
    assert_eq!(
        node.slice(14, 21),
        vec![Fragment::mark("can"), Fragment::plain("ción")]
    );
}

#[test]
fn test_word_final_sigma_matches_itself() {
    let mut engine = engine(&["ΟΔΟΣ ΚΑΙ ΔΡΟΜΟΣ"]);
    assert_eq!(engine.search("ΟΔΟΣ"), 1);
    assert_eq!(engine.search("ΔΡΟΜΟΣ"), 1);
    assert_eq!(highlight("ΟΔΟΣ", "ΟΔΟΣ"), [Fragment::mark("ΟΔΟΣ")]);
}
