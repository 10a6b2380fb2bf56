use std::fs;
use tempfile::TempDir;

use raglab_core::chunker::{chunk_document, split_with_overlap, ChunkingConfig};
use raglab_core::document::DocumentProcessor;
use raglab_core::error::Error;
use raglab_core::template::PromptTemplate;
use raglab_core::types::Document;

fn reassemble(spans: &[(usize, String)], overlap: usize) -> String {
    let mut out = String::new();
    for (i, (_, text)) in spans.iter().enumerate() {
        if i == 0 {
            out.push_str(text);
        } else {
            out.extend(text.chars().skip(overlap));
        }
    }
    out
}

#[test]
fn chunks_reconstruct_original_text() {
    let text = "The quick brown fox jumps over the lazy dog, again and again and again.";
    for (size, overlap) in [(10, 0), (10, 3), (16, 8), (7, 6)] {
        let spans = split_with_overlap(text, size, overlap).expect("split");
        assert!(spans.iter().all(|(_, t)| t.chars().count() <= size));
        assert_eq!(reassemble(&spans, overlap), text, "size={size} overlap={overlap}");
    }
}

#[test]
fn short_text_yields_one_whole_chunk() {
    let spans = split_with_overlap("tiny", 100, 20).expect("split");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0], (0, "tiny".to_string()));
}

#[test]
fn empty_text_yields_no_chunks() {
    let spans = split_with_overlap("", 100, 20).expect("split");
    assert!(spans.is_empty());
}

#[test]
fn overlap_not_smaller_than_size_is_rejected() {
    let err = split_with_overlap("whatever", 100, 100).expect_err("must fail");
    assert!(matches!(err, Error::InvalidConfig(_)), "got {err}");
    let err = split_with_overlap("whatever", 100, 150).expect_err("must fail");
    assert!(matches!(err, Error::InvalidConfig(_)), "got {err}");
    assert!(ChunkingConfig::new(0, 0).is_err());
}

#[test]
fn spans_step_by_fixed_stride() {
    let text = "abcdefghijklmnopqrstuvwxyz";
    let spans = split_with_overlap(text, 10, 4).expect("split");
    for pair in spans.windows(2) {
        assert_eq!(pair[1].0 - pair[0].0, 6, "stride is chunk_size - chunk_overlap");
    }
}

#[test]
fn multibyte_text_is_split_on_char_boundaries() {
    let text = "héllo wörld ünïcode désu";
    let spans = split_with_overlap(text, 5, 2).expect("split");
    assert_eq!(reassemble(&spans, 2), text);
}

#[test]
fn chunk_document_assigns_ids_and_counts() {
    let doc = Document {
        doc_id: "notes".to_string(),
        source: "notes.txt".to_string(),
        content: "abcdefghij".to_string(),
    };
    let chunks = chunk_document(&doc, ChunkingConfig::new(4, 1).expect("cfg")).expect("chunk");
    assert_eq!(chunks.len(), 3, "spans start at 0, 3, 6");
    assert_eq!(chunks[0].id, "notes:0");
    assert_eq!(chunks[2].id, "notes:2");
    for (i, c) in chunks.iter().enumerate() {
        assert_eq!(c.chunk_index, i);
        assert_eq!(c.total_chunks, 3);
        assert_eq!(c.length, c.text.chars().count());
    }
}

#[test]
fn template_substitutes_every_placeholder() {
    let template = PromptTemplate::new(
        "Answer {question} using {context}. Repeat: {question}",
        &["context", "question"],
    );
    let rendered = template
        .format(&[("context", "the docs"), ("question", "what is RAG?")])
        .expect("format");
    assert!(!rendered.contains("{context}"));
    assert!(!rendered.contains("{question}"));
    assert_eq!(rendered, "Answer what is RAG? using the docs. Repeat: what is RAG?");
}

#[test]
fn template_fails_on_missing_variable() {
    let template = PromptTemplate::new("{context}\n{question}", &["context", "question"]);
    let err = template.format(&[("context", "only this")]).expect_err("must fail");
    match err {
        Error::MissingVariable(name) => assert_eq!(name, "question"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "Short text").expect("write");

    let processor = DocumentProcessor::new();
    let chunks = processor.process_directory(dir).expect("process");

    assert_eq!(chunks.len(), 1, "one small file becomes one chunk");
    assert_eq!(chunks[0].text, "Short text");
    assert_eq!(chunks[0].doc_id, "a");
}

#[test]
fn process_directory_preserves_document_order() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    fs::write(dir.join("b.txt"), "bravo").expect("write");
    fs::write(dir.join("a.txt"), "alpha").expect("write");

    let processor = DocumentProcessor::new();
    let chunks = processor.process_directory(dir).expect("process");

    let doc_ids: Vec<&str> = chunks.iter().map(|c| c.doc_id.as_str()).collect();
    assert_eq!(doc_ids, vec!["a", "b"], "files are processed in sorted order");
}
