use codiner_tags::parser::preprocess::Preprocessed;
use codiner_tags::{
    parse, parse_attributes, parse_with, preprocess, resolve_status, segment, tags_named,
    ContentPiece, TagPiece, TagRegistry, TagStatus,
};

// ── helpers ───────────────────────────────────────────────────────────────────

fn md(text: &str) -> ContentPiece {
    ContentPiece::Markdown { text: text.to_string() }
}

fn tag_at(pieces: &[ContentPiece], index: usize) -> &TagPiece {
    pieces[index].as_tag().expect("expected a tag piece")
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[test]
fn builtin_registry_is_deduplicated() {
    let registry = TagRegistry::builtin();
    assert_eq!(registry.len(), 25);
    assert_eq!(registry.names().filter(|n| *n == "codiner-write").count(), 1);
}

#[test]
fn builtin_registry_keeps_source_order() {
    let names: Vec<&str> = TagRegistry::builtin().names().collect();
    assert_eq!(names[0], "think");
    assert_eq!(names[1], "codiner-write");
    assert_eq!(names.last(), Some(&"codiner-status"));
}

#[test]
fn custom_registry_drops_repeats_and_empty_names() {
    let registry = TagRegistry::new(["a-tag", "", "b-tag", "a-tag"]).unwrap();
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a-tag", "b-tag"]);
    assert!(registry.contains("b-tag"));
    assert!(!registry.contains(""));
}

#[test]
fn empty_registry_yields_only_markdown() {
    let registry = TagRegistry::new(Vec::<String>::new()).unwrap();
    assert!(registry.is_empty());
    let text = r#"<codiner-write path="a">x</codiner-write>"#;
    assert_eq!(parse_with(&registry, text), vec![md(text)]);
}

#[test]
fn custom_registry_recognises_its_names() {
    let registry = TagRegistry::new(["foo-bar"]).unwrap();
    let pieces = parse_with(&registry, "<foo-bar>x</foo-bar>");
    assert_eq!(tag_at(&pieces, 0).tag_name, "foo-bar");
}

// ── No tags ───────────────────────────────────────────────────────────────────

#[test]
fn text_without_tags_is_one_markdown_piece() {
    let text = "# Plan\n\n- step one\n- step two with `x < y` and a <b>bold</b> tag\n";
    assert_eq!(parse(text), vec![md(text)]);
}

#[test]
fn empty_text_yields_no_pieces() {
    assert!(parse("").is_empty());
}

#[test]
fn unknown_tag_passes_through_verbatim() {
    assert_eq!(parse("<foo-bar>x</foo-bar>"), vec![md("<foo-bar>x</foo-bar>")]);
}

#[test]
fn tag_names_are_case_sensitive() {
    let text = r#"<Codiner-write path="a">x</Codiner-write>"#;
    assert_eq!(parse(text), vec![md(text)]);
}

#[test]
fn orphan_closer_stays_markdown() {
    assert_eq!(parse("</think> after"), vec![md("</think> after")]);
}

#[test]
fn closer_before_opener_stays_markdown() {
    let text = "</think><think>x";
    assert_eq!(parse(text), vec![md(text)]);
}

// ── Well-formed tags ──────────────────────────────────────────────────────────

#[test]
fn single_well_formed_tag() {
    let pieces = parse(r#"<codiner-write path="a.ts">hello</codiner-write>"#);
    assert_eq!(pieces.len(), 1);
    let tag = tag_at(&pieces, 0);
    assert_eq!(tag.tag_name, "codiner-write");
    assert_eq!(tag.attributes.len(), 1);
    assert_eq!(tag.attributes["path"], "a.ts");
    assert_eq!(tag.inner_content, "hello");
    assert_eq!(tag.start_offset, 0);
    assert!(!tag.in_progress);
}

#[test]
fn markdown_around_tags_is_kept_in_order() {
    let text = "Before\n<think>plan</think>\nmiddle <codiner-read path=\"x\"></codiner-read> end";
    let pieces = parse(text);
    assert_eq!(pieces.len(), 5);
    assert_eq!(pieces[0], md("Before\n"));
    assert_eq!(tag_at(&pieces, 1).tag_name, "think");
    assert_eq!(pieces[2], md("\nmiddle "));
    assert_eq!(tag_at(&pieces, 3).inner_content, "");
    assert_eq!(pieces[4], md(" end"));
}

#[test]
fn tag_content_spans_lines() {
    let text = "<codiner-write path=\"src/lib.rs\" description=\"entry\">\nfn main() {}\n</codiner-write>";
    let pieces = parse(text);
    let tag = tag_at(&pieces, 0);
    assert_eq!(tag.inner_content, "\nfn main() {}\n");
    assert_eq!(tag.attr("description"), "entry");
}

#[test]
fn tag_without_attributes() {
    let pieces = parse("<think>hmm</think>");
    assert!(tag_at(&pieces, 0).attributes.is_empty());
}

#[test]
fn other_tags_inside_content_stay_literal() {
    let text = r#"<codiner-write path="a">x <think>y</think> z</codiner-write>"#;
    let pieces = parse(text);
    assert_eq!(pieces.len(), 1);
    assert_eq!(tag_at(&pieces, 0).inner_content, "x <think>y</think> z");
}

#[test]
fn longer_name_is_not_claimed_by_its_prefix() {
    let text = "<codiner-web-search-result>r</codiner-web-search-result><codiner-web-search>q</codiner-web-search>";
    let pieces = parse(text);
    assert_eq!(pieces.len(), 2);
    assert_eq!(tag_at(&pieces, 0).tag_name, "codiner-web-search-result");
    assert_eq!(tag_at(&pieces, 1).tag_name, "codiner-web-search");
    assert!(pieces.iter().filter_map(ContentPiece::as_tag).all(|t| !t.in_progress));
}

#[test]
fn same_name_nesting_pairs_with_first_closer() {
    let pieces = parse("<think>a<think>b</think>c</think>");
    assert_eq!(pieces.len(), 2);
    assert_eq!(tag_at(&pieces, 0).inner_content, "a<think>b");
    assert_eq!(pieces[1], md("c</think>"));
}

#[test]
fn start_offsets_are_byte_offsets() {
    let pieces = parse("héllo <think>ü</think>");
    assert_eq!(pieces[0], md("héllo "));
    assert_eq!(tag_at(&pieces, 1).start_offset, 7);
    assert_eq!(tag_at(&pieces, 1).inner_content, "ü");
}

// ── Unfinished tags ───────────────────────────────────────────────────────────

#[test]
fn truncated_trailing_tag_is_in_progress() {
    let pieces = parse(r#"Some text <codiner-read path="x">partial"#);
    assert_eq!(pieces.len(), 2);
    assert_eq!(pieces[0], md("Some text "));
    let tag = tag_at(&pieces, 1);
    assert_eq!(tag.tag_name, "codiner-read");
    assert_eq!(tag.attributes["path"], "x");
    assert_eq!(tag.inner_content, "partial");
    assert_eq!(tag.start_offset, 10);
    assert!(tag.in_progress);
}

#[test]
fn only_trailing_opener_is_in_progress() {
    let pieces = parse(r#"<codiner-read path="a">1</codiner-read><codiner-read path="b">2"#);
    assert_eq!(pieces.len(), 2);
    assert!(!tag_at(&pieces, 0).in_progress);
    assert_eq!(tag_at(&pieces, 0).attr("path"), "a");
    assert!(tag_at(&pieces, 1).in_progress);
    assert_eq!(tag_at(&pieces, 1).attr("path"), "b");
    assert_eq!(tag_at(&pieces, 1).inner_content, "2");
}

#[test]
fn opener_with_empty_body_is_in_progress() {
    let pieces = parse("Reading <codiner-read path=\"x\">");
    let tag = tag_at(&pieces, 1);
    assert!(tag.in_progress);
    assert_eq!(tag.inner_content, "");
}

#[test]
fn truncated_opening_tag_stays_markdown() {
    let text = r#"Hi <codiner-write path="src/ma"#;
    assert_eq!(parse(text), vec![md(text)]);
}

#[test]
fn partial_closer_becomes_content() {
    let pieces = parse("<think>almost</thi");
    let tag = tag_at(&pieces, 0);
    assert!(tag.in_progress);
    assert_eq!(tag.inner_content, "almost</thi");
}

#[test]
fn unfinished_tag_inside_unfinished_tag_stays_nested() {
    let pieces = parse(r#"<think>a <codiner-write path="p">b"#);
    assert_eq!(pieces.len(), 1);
    let tag = tag_at(&pieces, 0);
    assert_eq!(tag.tag_name, "think");
    assert!(tag.in_progress);
    assert_eq!(tag.inner_content, r#"a <codiner-write path="p">b</codiner-write>"#);
}

#[test]
fn tag_closed_by_appended_closer_is_in_progress() {
    let pieces = parse("</think><think>x<think>y");
    assert_eq!(pieces[0], md("</think>"));
    let tag = tag_at(&pieces, 1);
    assert_eq!(tag.inner_content, "x<think>y");
    assert!(tag.in_progress);
}

#[test]
fn literal_opener_in_content_does_not_reopen_later_tag() {
    let text = r#"<codiner-write path="p.md">Wrap reasoning in <think> tags.</codiner-write> Now: <think>real</think>"#;
    let pieces = parse(text);
    assert_eq!(pieces.len(), 3);
    let write = tag_at(&pieces, 0);
    assert_eq!(write.inner_content, "Wrap reasoning in <think> tags.");
    assert!(!write.in_progress);
    assert_eq!(pieces[1], md(" Now: "));
    let think = tag_at(&pieces, 2);
    assert_eq!(think.inner_content, "real");
    assert!(!think.in_progress);
    assert_eq!(think.status(false), TagStatus::Finished);
}

#[test]
fn unpaired_appended_closers_never_reach_markdown() {
    let inputs = [
        r#"<codiner-write path="p.md">Wrap reasoning in <think> tags.</codiner-write> Now: <think>real</think>"#,
        "<codiner-read path=\"a\">see <think></codiner-read> tail",
        "<think>a<think>b</think>c",
    ];
    for text in inputs {
        let pieces = parse(text);
        let mut markdown_len = 0;
        for piece in &pieces {
            if let ContentPiece::Markdown { text: md_text } = piece {
                assert!(text.contains(md_text.as_str()), "{md_text:?} not in {text:?}");
                markdown_len += md_text.len();
            }
        }
        assert!(markdown_len <= text.len());
        let last = pieces.last().unwrap();
        if let ContentPiece::Markdown { text: md_text } = last {
            assert!(text.ends_with(md_text.as_str()), "{md_text:?} does not end {text:?}");
        }
    }
}

#[test]
fn growing_text_never_reopens_closed_tags() {
    let full = "Intro <think>plan it</think> then\n<codiner-write path=\"a.ts\">code();</codiner-write>\n\
                and <codiner-read path=\"b\">x</codiner-read> — done ✓";
    let final_pieces = parse(full);
    assert!(final_pieces.iter().filter_map(ContentPiece::as_tag).all(|t| !t.in_progress));

    let boundaries = full.char_indices().map(|(i, _)| i).chain(std::iter::once(full.len()));
    for end in boundaries {
        let prefix = &full[..end];
        for tag in parse(prefix).iter().filter_map(ContentPiece::as_tag) {
            if tag.in_progress {
                continue;
            }
            let later = final_pieces
                .iter()
                .filter_map(ContentPiece::as_tag)
                .find(|t| t.start_offset == tag.start_offset && t.tag_name == tag.tag_name)
                .expect("closed tag survives growth");
            assert!(!later.in_progress, "prefix {prefix:?} closed {}", tag.tag_name);
        }
    }
}

#[test]
fn reparsing_is_deterministic() {
    let text = r#"a <codiner-delete path="x"></codiner-delete> b <think>c"#;
    assert_eq!(parse(text), parse(text));
}

// ── preprocess / segment ──────────────────────────────────────────────────────

#[test]
fn preprocess_leaves_balanced_text_alone() {
    let text = "<think>x</think>";
    let Preprocessed { processed_text, in_progress } = preprocess(text, TagRegistry::builtin());
    assert_eq!(processed_text, text);
    assert!(in_progress.is_empty());
}

#[test]
fn preprocess_appends_one_closer_per_unclosed_opener() {
    let text = "<think>a</think><think>b<think>c";
    let Preprocessed { processed_text, in_progress } = preprocess(text, TagRegistry::builtin());
    assert_eq!(processed_text, format!("{text}</think></think>"));
    assert_eq!(in_progress.offsets("think").collect::<Vec<_>>(), vec![16, 24]);
    assert!(!in_progress.contains("think", 0));
}

#[test]
fn segment_uses_in_progress_offsets() {
    let registry = TagRegistry::builtin();
    let pre = preprocess("x <codiner-grep pattern=\"fn\">", registry);
    let pieces = segment(&pre.processed_text, registry, &pre.in_progress);
    assert_eq!(pieces[0], md("x "));
    assert!(tag_at(&pieces, 1).in_progress);
    assert_eq!(tag_at(&pieces, 1).attr("pattern"), "fn");
}

// ── Attributes ────────────────────────────────────────────────────────────────

#[test]
fn attributes_parse_multiple_pairs() {
    let attrs = parse_attributes(r#" path="a.ts"  description="Add a thing""#);
    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs["path"], "a.ts");
    assert_eq!(attrs["description"], "Add a thing");
}

#[test]
fn attributes_last_duplicate_wins() {
    let attrs = parse_attributes(r#"path="a" path="b""#);
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs["path"], "b");
}

#[test]
fn attributes_skip_malformed_fragments() {
    let attrs = parse_attributes(r#"broken single='x' bare=y ok="1" dangling=""#);
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs["ok"], "1");
}

#[test]
fn attributes_need_whitespace_between_pairs() {
    let attrs = parse_attributes(r#"a="1"b="2" c="3""#);
    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs["a"], "1");
    assert_eq!(attrs["c"], "3");
    assert!(!attrs.contains_key("b"));
}

#[test]
fn attributes_allow_hyphenated_keys_and_empty_values() {
    let attrs = parse_attributes(r#"old-path="" new_path="b""#);
    assert_eq!(attrs["old-path"], "");
    assert_eq!(attrs["new_path"], "b");
}

#[test]
fn missing_attribute_reads_as_empty() {
    let pieces = parse("<codiner-delete></codiner-delete>");
    assert_eq!(tag_at(&pieces, 0).attr("path"), "");
}

// ── Status ────────────────────────────────────────────────────────────────────

#[test]
fn status_resolution_table() {
    assert_eq!(resolve_status(true, true), TagStatus::Pending);
    assert_eq!(resolve_status(true, false), TagStatus::Aborted);
    assert_eq!(resolve_status(false, true), TagStatus::Finished);
    assert_eq!(resolve_status(false, false), TagStatus::Finished);
}

#[test]
fn piece_status_follows_stream_state() {
    let pieces = parse("intro <think>still going");
    assert_eq!(pieces[0].status(true), None);
    assert_eq!(pieces[1].status(true), Some(TagStatus::Pending));
    assert_eq!(pieces[1].status(false), Some(TagStatus::Aborted));
}

#[test]
fn status_labels() {
    assert_eq!(TagStatus::Finished.label(), "finished");
    assert_eq!(TagStatus::Pending.label(), "pending");
    assert_eq!(TagStatus::Aborted.label(), "aborted");
}

// ── Queries ───────────────────────────────────────────────────────────────────

#[test]
fn tags_named_filters_by_name() {
    let pieces = parse(
        r#"<codiner-write path="a">1</codiner-write><think>t</think><codiner-write path="b">2</codiner-write>"#,
    );
    let paths: Vec<&str> = tags_named(&pieces, "codiner-write").map(|t| t.attr("path")).collect();
    assert_eq!(paths, vec!["a", "b"]);
    assert_eq!(tags_named(&pieces, "codiner-read").count(), 0);
}
