use footquill::footnote::{build_index, FootnoteEntry, FootnoteIndex};

#[test]
fn test_two_numeric_footnotes() {
    let index = build_index("A[^1] B[^2]\n\n[^1]: first\n[^2]: second");

    assert_eq!(index.len(), 2);
    assert_eq!(index.get("1").unwrap().definition, "first");
    assert_eq!(index.get("2").unwrap().references, vec!["[^2]"]);
}

#[test]
fn test_parse_numeric_footnotes() {
    let markdown = "
This is a test[^1] with multiple footnotes[^2].

[^1]: First footnote definition.
[^2]: Second footnote definition.
      ";

    let index = build_index(markdown);

    assert_eq!(index.len(), 2);
    assert_eq!(
        index.get("1"),
        Some(&FootnoteEntry {
            label: "1".to_string(),
            references: vec!["[^1]".to_string()],
            definition: "First footnote definition.".to_string(),
        })
    );
    assert_eq!(
        index.get("2").unwrap().definition,
        "Second footnote definition."
    );
}

#[test]
fn test_custom_label_referenced_twice() {
    let index = build_index("Watch[^video] and again[^video].\n\n[^video]: def");
    let entry = index.get("video").unwrap();

    assert_eq!(entry.references.len(), 2);
    assert_eq!(entry.definition, "def");
}

#[test]
fn test_reference_without_definition() {
    let index = build_index("\nThis is a test[^1] with no definition.\n\nSome other content.\n");

    assert_eq!(index.len(), 1);
    let entry = index.get("1").unwrap();
    assert_eq!(entry.references, vec!["[^1]"]);
    assert_eq!(entry.definition, "");
    assert!(entry.is_orphaned_reference());
}

#[test]
fn test_definition_without_references_is_recorded() {
    let index = build_index("\nThis is a test without any references.\n\n[^1]: Orphaned definition.\n");

    assert_eq!(index.len(), 1);
    let entry = index.get("1").unwrap();
    assert!(entry.references.is_empty());
    assert_eq!(entry.definition, "Orphaned definition.");
    assert!(entry.is_unused_definition());
}

#[test]
fn test_definition_on_last_line_without_newline() {
    let index = build_index("Body[^end]\n\n[^end]: the very last words");
    assert_eq!(index.get("end").unwrap().definition, "the very last words");
}

#[test]
fn test_labels_are_case_sensitive() {
    let index = build_index("[^Note] [^note]");
    assert_eq!(index.len(), 2);
    assert!(index.contains("Note"));
    assert!(index.contains("note"));
}

#[test]
fn test_malformed_markers_are_ignored() {
    let index = build_index("A test[^1] with malformed[^].\n\n[^1]: Valid footnote.\n[^]: Malformed footnote.\n");
    assert_eq!(index.labels().collect::<Vec<_>>(), vec!["1"]);
    assert_eq!(index.get("1").unwrap().definition, "Valid footnote.");
}

#[test]
fn test_unterminated_marker_is_not_a_footnote() {
    let index = build_index("Broken [^1 marker\n");
    assert!(index.is_empty());
}

#[test]
fn test_reference_count_matches_occurrences() {
    let text = "a[^x] b[^x] c[^y] d[^x]\n\n[^x]: ex\n[^y]: why";
    let index = build_index(text);

    for entry in index.iter() {
        let marker = format!("[^{}]", entry.label);
        let occurrences = text.matches(&marker).count() - 1; // minus the definition
        assert_eq!(entry.references.len(), occurrences, "label {}", entry.label);
    }
}

#[test]
fn test_build_is_idempotent() {
    let text = "One[^1], two[^two].\n\n[^1]: a\n[^two]: b\n[^3]: c";
    assert_eq!(FootnoteIndex::build(text), FootnoteIndex::build(text));
}

#[test]
fn test_index_serializes_as_a_label_map() {
    let index = build_index("A[^1]\n\n[^1]: one");
    let json = serde_json::to_value(&index).unwrap();

    assert_eq!(json["1"]["label"], "1");
    assert_eq!(json["1"]["references"][0], "[^1]");
    assert_eq!(json["1"]["definition"], "one");
}
