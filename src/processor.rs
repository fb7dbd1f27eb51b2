//! Response processing: sentence segmentation and cross-request dedup.
//!
//! The generation service returns whole scripts with one sentence per block,
//! blocks separated by a triple newline. This module splits a returned
//! script into segments, fingerprints each one, and drops every segment
//! whose fingerprint was already emitted earlier in the session. The
//! surviving segments are rejoined into the final script text.
//!
//! The seen-fingerprint index is session state owned by the caller and
//! passed in explicitly, so processing stays a pure-ish, testable function
//! of (response, index).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::language::Language;

/// Delimiter between sentence blocks in script text, both in the model's
/// output contract and in reassembled results.
pub const SEGMENT_DELIMITER: &str = "\n\n\n";

/// One script record as returned by the generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptRecord {
    pub title: String,
    pub author: String,
    pub category: String,
    pub script: String,
}

/// A finished generation result. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    /// Opaque unique identifier.
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    /// Deduplicated script text, segments joined by [`SEGMENT_DELIMITER`].
    /// May be empty when every segment was a duplicate.
    pub script: String,
    pub created_at: DateTime<Utc>,
}

/// Session-lifetime index of normalized sentence fingerprints.
///
/// Grows monotonically; a fingerprint, once recorded, suppresses that
/// sentence in every later result of the session.
#[derive(Debug, Default)]
pub struct SeenSentences {
    fingerprints: HashSet<String>,
}

impl SeenSentences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.fingerprints.contains(fingerprint)
    }

    /// Record a fingerprint. Returns `true` if it was not seen before.
    pub fn insert(&mut self, fingerprint: String) -> bool {
        self.fingerprints.insert(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }
}

/// Turns raw service responses into deduplicated [`GenerationResult`]s.
#[derive(Debug, Clone, Copy)]
pub struct ResponseProcessor {
    language: Language,
}

impl ResponseProcessor {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Compute the normalized fingerprint of a segment.
    ///
    /// Trims surrounding whitespace, lowercases, strips every character the
    /// target language does not retain, and collapses whitespace runs to a
    /// single space. Fingerprints are used only for equality comparison and
    /// are never displayed.
    pub fn fingerprint(&self, segment: &str) -> String {
        let kept: String = segment
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| self.language.retains(*c) || c.is_whitespace())
            .collect();
        kept.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Process a batch of returned script records against the session index.
    ///
    /// Every record yields a [`GenerationResult`], even when all of its
    /// segments were duplicates (the script is then empty — callers render
    /// that case, it is not an error).
    pub fn process(
        &self,
        records: Vec<ScriptRecord>,
        seen: &mut SeenSentences,
    ) -> Vec<GenerationResult> {
        records
            .into_iter()
            .map(|record| {
                let script = self.dedup_script(&record.script, seen);
                GenerationResult {
                    id: uuid::Uuid::new_v4().to_string(),
                    title: record.title,
                    author: record.author,
                    category: record.category,
                    script,
                    created_at: Utc::now(),
                }
            })
            .collect()
    }

    /// Dedup a single script: split, filter against `seen`, rejoin.
    ///
    /// Surviving segments keep their original (trimmed, non-normalized)
    /// text and their relative order.
    fn dedup_script(&self, script: &str, seen: &mut SeenSentences) -> String {
        let mut survivors: Vec<&str> = Vec::new();

        for segment in split_segments(script) {
            let trimmed = segment.trim();
            let fingerprint = self.fingerprint(trimmed);
            if fingerprint.is_empty() {
                // Blank or punctuation-only block: not emitted, not recorded.
                continue;
            }
            if seen.insert(fingerprint) {
                survivors.push(trimmed);
            }
        }

        survivors.join(SEGMENT_DELIMITER)
    }
}

/// Split script text on runs of 3 or more newline characters.
///
/// Runs of one or two newlines stay inside a segment (the model is allowed
/// soft line breaks within a sentence block).
fn split_segments(script: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let bytes = script.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\n' {
            let run_start = i;
            while i < bytes.len() && bytes[i] == b'\n' {
                i += 1;
            }
            if i - run_start >= 3 {
                segments.push(&script[start..run_start]);
                start = i;
            }
        } else {
            i += 1;
        }
    }

    segments.push(&script[start..]);
    segments
}
