//! Reassembles rewritten chunks into a single document.
//!
//! Because consecutive chunks were given overlapping context, a rewritten
//! chunk may begin by restating the tail of its predecessor. Reconstruction
//! strips that duplication on a best-effort basis: only an exact prefix
//! match against the predecessor's trailing sentences is removed, so a
//! paraphrased (non-verbatim) overlap passes through untouched.

use crate::rewriter::RewrittenChunk;
use regex::Regex;

/// How many trailing sentence fragments of the previous chunk are tried as
/// a duplicated prefix of the next one.
const OVERLAP_SENTENCES: usize = 3;

/// Joins rewritten chunks in index order, deduplicating verbatim overlap and
/// separating chunks with blank lines.
pub fn reconstruct_document(chunks: &[RewrittenChunk]) -> String {
    let mut ordered: Vec<&RewrittenChunk> = chunks.iter().collect();
    ordered.sort_by_key(|c| c.index);

    let mut out = String::new();
    let mut previous: Option<&str> = None;
    for chunk in ordered {
        match previous {
            None => out.push_str(&chunk.rewritten_text),
            // Only the immediately preceding chunk can have seeded overlap
            // into this one, so its text alone is the dedup source.
            Some(prev) => {
                let deduped = remove_overlap(prev, &chunk.rewritten_text);
                if !out.ends_with("\n\n") {
                    out.push_str("\n\n");
                }
                out.push_str(deduped);
            }
        }
        previous = Some(&chunk.rewritten_text);
    }
    out.trim().to_string()
}

/// Strips from `current` the longest prefix that exactly matches a trailing
/// sentence run of `previous`. Returns `current` unchanged when no candidate
/// matches; a rewritten (non-verbatim) overlap is deliberately left alone.
fn remove_overlap<'a>(previous: &str, current: &'a str) -> &'a str {
    let splitter = Regex::new(r"[.!?]+").unwrap();
    // Byte offsets where each sentence of `previous` begins.
    let mut sentence_starts = vec![0];
    for boundary in splitter.find_iter(previous) {
        sentence_starts.push(boundary.end());
    }
    let candidates: Vec<&str> = sentence_starts
        .into_iter()
        .map(|start| previous[start..].trim())
        .filter(|tail| !tail.is_empty())
        .collect();
    let skip = candidates.len().saturating_sub(OVERLAP_SENTENCES);

    // Candidates run longest-first, so the largest verbatim repetition wins.
    let trimmed = current.trim_start();
    for needle in &candidates[skip..] {
        if let Some(rest) = trimmed.strip_prefix(needle) {
            let rest = rest.trim_start_matches(|c: char| ".!?".contains(c));
            return rest.trim_start();
        }
    }
    current
}
