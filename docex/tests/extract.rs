use std::io::Write;

use docex::{Document, Tags, examples};

fn sources(text: &str) -> Vec<&str> {
    examples(text).map(|e| e.source).collect()
}

#[test]
fn go_tag_is_stripped() {
    let text = "```go\npackage main\nfunc main(){}\n```";
    assert_eq!(sources(text), vec!["package main\nfunc main(){}"]);
}

#[test]
fn untagged_block_qualifies() {
    let text = "```\npackage main\n\nfunc main() {}\n```";
    assert_eq!(sources(text), vec!["package main\n\nfunc main() {}"]);
}

#[test]
fn prose_and_other_code_never_qualify() {
    let text = "Intro text\n\n```\nsome shell output\n```\n\n```go\npackage lib\n```\n\n```python\nprint('package main')\n```\n";
    assert!(sources(text).is_empty());
}

#[test]
fn only_the_go_tag_is_recognized() {
    // "golang" loses its leading "go", leaving "lang" in front of the marker.
    let text = "```golang\npackage main\n```\n```rust\npackage main\n```";
    assert!(sources(text).is_empty());
}

#[test]
fn ordinals_count_only_runnable_examples() {
    let text = "```\nnot code\n```\n```go\npackage main\n```\ntext\n```sh\n$ go run .\n```\n```go\npackage main // two\n```";
    let found: Vec<_> = examples(text).map(|e| (e.ordinal, e.source)).collect();
    assert_eq!(
        found,
        vec![(1, "package main"), (2, "package main // two")]
    );
}

#[test]
fn document_without_fences_is_one_fragment() {
    assert!(sources("# Title\n\nJust words.\n").is_empty());
    assert_eq!(sources("  package main\n"), vec!["package main"]);
}

#[test]
fn empty_document_has_no_examples() {
    assert_eq!(examples("").count(), 0);
}

#[test]
fn span_and_line_locate_the_source() {
    let text = "# Demo\n\nSome text.\n\n```go\npackage main\n\nfunc main() {}\n```\n\n```go\n\n  package main\n```\n";
    let found: Vec<_> = examples(text).collect();
    assert_eq!(found.len(), 2);

    assert_eq!(&text[found[0].span.clone()], found[0].source);
    assert_eq!(found[0].line, 6);

    assert_eq!(&text[found[1].span.clone()], "package main");
    assert_eq!(found[1].line, 13);
}

#[test]
fn iteration_is_lazy_and_ordered() {
    let text = "```go\npackage main // a\n```\n```go\npackage main // b\n```\n";
    let mut iter = examples(text);
    assert_eq!(iter.next().map(|e| e.ordinal), Some(1));
    assert_eq!(iter.next().map(|e| e.source), Some("package main // b"));
    assert!(iter.next().is_none());
}

#[test]
fn numbered_lines_are_right_aligned() {
    let text = "```go\npackage main\n\nfunc main() {}\n```";
    let example = examples(text).next().unwrap();
    assert_eq!(
        example.numbered(),
        "  1: package main\n  2: \n  3: func main() {}"
    );
}

#[test]
fn numbering_widens_past_three_digits() {
    let numbered = docex::example::numbered("x\n".repeat(1000).trim_end());
    let last = numbered.lines().last().unwrap();
    assert_eq!(last, "1000: x");
}

#[test]
fn document_read_from_disk() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("README.md");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "```go\npackage main\nfunc main(){{}}\n```\n").unwrap();

    let document = Document::read(&path).unwrap();
    assert_eq!(document.name, path.display().to_string());
    assert_eq!(document.examples().count(), 1);
}

#[test]
fn document_read_missing_file_fails() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    assert!(Document::read(dir.path().join("missing.md")).is_err());
}

#[test]
fn tag_comment_above_fence_is_parsed() {
    let text = "Run it:\n\n<!-- {\"os\": [\"linux\", \"darwin\"], \"args\": [\"-v\", \"world\"]} -->\n```go\npackage main\n```\n";
    let found: Vec<_> = examples(text).collect();
    assert_eq!(found.len(), 1);

    let tags = &found[0].tags;
    assert_eq!(tags.args, vec!["-v", "world"]);
    assert!(tags.allows_os("linux"));
    assert!(tags.allows_os("darwin"));
    assert!(!tags.allows_os("windows"));
}

#[test]
fn single_os_string_is_accepted() {
    let text = "<!-- {\"os\": \"windows\"} -->\n```go\npackage main\n```\n";
    let example = examples(text).next().unwrap();
    assert!(example.tags.allows_os("windows"));
    assert!(!example.tags.allows_os("linux"));
    assert!(example.tags.args.is_empty());
}

#[test]
fn tag_comment_must_touch_the_fence() {
    let text = "<!-- {\"os\": \"windows\"} -->\nSome words in between.\n```go\npackage main\n```\n";
    let example = examples(text).next().unwrap();
    assert_eq!(example.tags, Tags::default());
    assert!(example.tags.allows_os("linux"));
}

#[test]
fn tags_apply_only_to_the_next_example() {
    let text = "<!-- {\"args\": [\"a\"]} -->\n```go\npackage main\n```\n\n```go\npackage main\n```\n";
    let found: Vec<_> = examples(text).collect();
    assert_eq!(found[0].tags.args, vec!["a"]);
    assert_eq!(found[1].tags, Tags::default());
}

#[test]
fn malformed_tags_are_ignored() {
    let text = "<!-- {\"args\": not-json} -->\n```go\npackage main\n```\n";
    let example = examples(text).next().unwrap();
    assert_eq!(example.tags, Tags::default());

    let plain = "<!-- just a note -->\n```go\npackage main\n```\n";
    assert_eq!(examples(plain).next().unwrap().tags, Tags::default());
}

#[test]
fn unknown_tag_keys_are_ignored() {
    let tags = Tags::parse(r#"{"output": "hello\n", "args": ["x"]}"#).unwrap();
    assert_eq!(tags.args, vec!["x"]);
    assert_eq!(tags.os, None);
}
