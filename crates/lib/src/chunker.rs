//! Splits a document into bounded, overlapping chunks.
//!
//! Paragraphs (`\n\n`-separated) are the primary unit: they are packed into
//! chunks up to a maximum character count. A paragraph that is itself larger
//! than the maximum is split further on sentence boundaries. Consecutive
//! chunks share a trailing-text overlap so the rewriting step sees enough
//! context to keep transitions coherent.

use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkerError {
    #[error(
        "overlap_size ({overlap_size}) must be smaller than max_chunk_size ({max_chunk_size})"
    )]
    InvalidConfig {
        max_chunk_size: usize,
        overlap_size: usize,
    },
}

/// A contiguous piece of the source document, with enough positional
/// metadata to reassemble the chunks in order later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position of this chunk in the document.
    pub index: usize,
    /// Total number of chunks the document was split into.
    pub total_chunks: usize,
    /// Approximate character offset of this chunk's content in the source.
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
}

/// Splits `text` into chunks of at most `max_chunk_size` characters, where
/// each chunk after the first begins with up to `overlap_size` characters of
/// trailing context from its predecessor.
///
/// Whitespace-only input yields zero chunks. Every non-whitespace character
/// of the input appears in at least one chunk.
pub fn chunk_text(
    text: &str,
    max_chunk_size: usize,
    overlap_size: usize,
) -> Result<Vec<Chunk>, ChunkerError> {
    if overlap_size >= max_chunk_size {
        return Err(ChunkerError::InvalidConfig {
            max_chunk_size,
            overlap_size,
        });
    }

    let mut builder = ChunkBuilder::new(max_chunk_size, overlap_size);
    let paragraph_re = Regex::new(r"\n\n+").unwrap();

    for paragraph in paragraph_re.split(text) {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        if char_len(paragraph) > max_chunk_size {
            // Oversized paragraph: fall back to sentence units, joined
            // without separators since the sentence split keeps terminal
            // punctuation attached.
            for sentence in split_sentences(paragraph) {
                builder.push(sentence, "");
            }
        } else {
            builder.push(paragraph, "\n\n");
        }
    }

    Ok(builder.finish())
}

/// Splits on sentence-ending punctuation, keeping the punctuation with the
/// sentence. Trailing text without a terminator is returned as a final unit
/// so no characters are dropped.
fn split_sentences(text: &str) -> Vec<&str> {
    let sentence_re = Regex::new(r"[^.!?]+[.!?]+").unwrap();
    let mut sentences = Vec::new();
    let mut consumed = 0;
    for m in sentence_re.find_iter(text) {
        sentences.push(m.as_str());
        consumed = m.end();
    }
    let remainder = text[consumed..].trim();
    if !remainder.is_empty() {
        sentences.push(remainder);
    }
    sentences
}

struct ChunkBuilder {
    max_chunk_size: usize,
    overlap_size: usize,
    chunks: Vec<Chunk>,
    current: String,
    current_start: usize,
}

impl ChunkBuilder {
    fn new(max_chunk_size: usize, overlap_size: usize) -> Self {
        Self {
            max_chunk_size,
            overlap_size,
            chunks: Vec::new(),
            current: String::new(),
            current_start: 0,
        }
    }

    /// Appends one unit (paragraph or sentence) to the buffer, emitting the
    /// buffered chunk first when the unit would not fit.
    fn push(&mut self, unit: &str, joiner: &str) {
        let unit_len = char_len(unit);
        let current_len = char_len(&self.current);
        let joined_len = if self.current.is_empty() {
            unit_len
        } else {
            current_len + char_len(joiner) + unit_len
        };

        if joined_len > self.max_chunk_size && !self.current.is_empty() {
            self.emit();
            // Seed the next chunk with trailing context from the one just
            // emitted, then append the new unit after it.
            let emitted = self.chunks.last().map(|c| c.text.clone()).unwrap_or_default();
            let overlap = last_sentences(&emitted, self.overlap_size);
            self.current_start = self
                .chunks
                .last()
                .map(|c| c.end_offset.saturating_sub(char_len(&overlap)))
                .unwrap_or(0);
            self.current = overlap;
            if !self.current.is_empty() {
                self.current.push_str(joiner);
            }
            self.current.push_str(unit);
        } else if self.current.is_empty() {
            self.current.push_str(unit);
        } else {
            self.current.push_str(joiner);
            self.current.push_str(unit);
        }
    }

    fn emit(&mut self) {
        let text = std::mem::take(&mut self.current);
        let len = char_len(&text);
        self.chunks.push(Chunk {
            index: self.chunks.len(),
            total_chunks: 0,
            start_offset: self.current_start,
            end_offset: self.current_start + len,
            text,
        });
    }

    fn finish(mut self) -> Vec<Chunk> {
        if !self.current.trim().is_empty() {
            self.emit();
        }
        let total = self.chunks.len();
        for chunk in &mut self.chunks {
            chunk.total_chunks = total;
        }
        self.chunks
    }
}

/// Returns the longest suffix of `text` made of whole sentences that fits in
/// `max_len` characters. Falls back to a raw character tail when even the
/// last sentence is too long.
fn last_sentences(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let sentences = split_sentences(text);
    let mut taken: Vec<&str> = Vec::new();
    let mut len = 0;
    for sentence in sentences.iter().rev() {
        let sentence_len = char_len(sentence);
        if len + sentence_len > max_len {
            break;
        }
        taken.push(sentence);
        len += sentence_len;
    }
    if taken.is_empty() {
        return tail_chars(text, max_len).trim_start().to_string();
    }
    taken.reverse();
    taken.concat().trim().to_string()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The last `n` characters of `s`, counted in chars so multi-byte input is
/// never sliced mid-codepoint.
fn tail_chars(s: &str, n: usize) -> &str {
    let total = char_len(s);
    if total <= n {
        return s;
    }
    let skip = total - n;
    let (idx, _) = s.char_indices().nth(skip).unwrap_or((s.len(), ' '));
    &s[idx..]
}
