//! # Chunker Tests
//!
//! Cover the segmentation guarantees: bounded chunk sizes, full coverage of
//! the input, overlap seeding, and the sentence-level fallback for
//! paragraphs larger than a whole chunk.

use paraflow::{chunk_text, ChunkerError};

#[test]
fn short_document_yields_a_single_chunk() {
    let text = "A short paragraph.\n\nAnd another one.";
    let chunks = chunk_text(text, 4000, 200).unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].index, 0);
    assert_eq!(chunks[0].total_chunks, 1);
    assert_eq!(chunks[0].text, "A short paragraph.\n\nAnd another one.");
}

#[test]
fn whitespace_only_input_yields_no_chunks() {
    assert!(chunk_text("", 4000, 200).unwrap().is_empty());
    assert!(chunk_text("  \n\n \t \n\n ", 4000, 200).unwrap().is_empty());
}

#[test]
fn overlap_must_be_smaller_than_chunk_size() {
    let err = chunk_text("some text", 100, 100).unwrap_err();
    assert!(matches!(
        err,
        ChunkerError::InvalidConfig {
            max_chunk_size: 100,
            overlap_size: 100,
        }
    ));
    assert!(chunk_text("some text", 100, 200).is_err());
}

#[test]
fn paragraphs_are_packed_up_to_the_size_limit() {
    // Three paragraphs of 40 chars each; limit 100 fits two per chunk
    // (40 + 2 + 40 = 82), the third spills over.
    let para = "x".repeat(40);
    let text = format!("{para}\n\n{para}\n\n{para}");
    let chunks = chunk_text(&text, 100, 0).unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, format!("{para}\n\n{para}"));
    assert_eq!(chunks[1].text, para);
    assert!(chunks.iter().all(|c| c.total_chunks == 2));
}

#[test]
fn every_character_of_the_input_is_covered() {
    let text = "First sentence here. Second sentence follows. Third one too.\n\n\
                Another paragraph with more words in it. It keeps going for a while. \
                And ends here.\n\nA final short paragraph.";
    let chunks = chunk_text(text, 80, 20).unwrap();

    assert!(chunks.len() > 1);
    let combined: String = chunks.iter().map(|c| c.text.as_str()).collect();
    for word in text.split_whitespace() {
        assert!(
            combined.contains(word),
            "word '{word}' missing from chunk output"
        );
    }
}

#[test]
fn consecutive_chunks_share_trailing_context() {
    let text = "Alpha beta gamma delta. Epsilon zeta eta theta. \
                Iota kappa lambda mu. Nu xi omicron pi. Rho sigma tau upsilon.";
    let chunks = chunk_text(text, 60, 25).unwrap();

    assert!(chunks.len() > 1);
    for pair in chunks.windows(2) {
        let prev = &pair[0].text;
        let next = &pair[1].text;
        // The next chunk starts with a whole trailing sentence of the
        // previous one.
        let overlap_sentence = next.split(". ").next().unwrap();
        assert!(
            prev.contains(overlap_sentence.trim_end_matches('.')),
            "chunk {} does not begin with context from chunk {}",
            pair[1].index,
            pair[0].index
        );
    }
}

#[test]
fn oversized_paragraph_falls_back_to_sentence_splitting() {
    // One paragraph, no blank lines, longer than the chunk limit.
    let sentences: Vec<String> = (0..12)
        .map(|i| format!("This is sentence number {i} with padding words."))
        .collect();
    let text = sentences.concat();
    assert!(text.len() > 100);

    let chunks = chunk_text(&text, 100, 0).unwrap();
    assert!(chunks.len() > 1);
    for chunk in &chunks {
        // Sentence fallback keeps chunks within the limit.
        assert!(chunk.text.chars().count() <= 100);
    }
}

#[test]
fn trailing_text_without_punctuation_is_not_dropped() {
    let long_head = "A sentence that ends properly. ".repeat(10);
    let text = format!("{long_head}a trailing fragment with no terminator");
    let chunks = chunk_text(&text, 120, 0).unwrap();

    let combined: String = chunks.iter().map(|c| c.text.as_str()).collect();
    assert!(combined.contains("a trailing fragment with no terminator"));
}

#[test]
fn indexes_and_offsets_are_ordered() {
    let para = "Words repeated a few times here. ".repeat(8);
    let text = format!("{para}\n\n{para}\n\n{para}");
    let chunks = chunk_text(&text, 150, 30).unwrap();

    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index, i);
        assert!(chunk.end_offset > chunk.start_offset);
    }
    for pair in chunks.windows(2) {
        assert!(pair[1].start_offset >= pair[0].start_offset);
    }
}
