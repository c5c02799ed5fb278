// src/lexer/segment.rs
// Memoized search for a segmentation of a whitespace-free chunk.

use std::sync::RwLock;

use hashbrown::HashMap;

use super::{
    classify::classify_token,
    tokens::{KeywordSet, Token},
};

/// `None` means the chunk has no segmentation under the keyword set.
pub type Segmentation = Option<Vec<Token>>;

/// Read-through cache of chunk segmentations.
///
/// A cache is only ever used with one keyword set (the owning
/// [`Tokenizer`](super::lines::Tokenizer) holds both), so the chunk text alone
/// is a sufficient key. Concurrent misses on the same chunk may both compute;
/// the results are identical and the second insert is a no-op.
#[derive(Debug, Default)]
pub struct SegmentCache {
    entries: RwLock<HashMap<String, Segmentation>>,
}

impl SegmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, chunk: &str) -> Option<Segmentation> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(chunk).cloned()
    }

    fn insert(&self, chunk: &str, seg: &Segmentation) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.entry_ref(chunk).or_insert_with(|| seg.clone());
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split `chunk` into tokens that each classify on their own.
///
/// The whole chunk is tried first; after that split points are scanned from
/// the longest prefix down to a single character, and the first split whose
/// suffix also segments wins.
pub fn segment_word(chunk: &str, keywords: &KeywordSet, cache: &SegmentCache) -> Segmentation {
    if let Some(hit) = cache.get(chunk) {
        return hit;
    }
    let seg = segment_uncached(chunk, keywords, cache);
    cache.insert(chunk, &seg);
    seg
}

fn segment_uncached(chunk: &str, keywords: &KeywordSet, cache: &SegmentCache) -> Segmentation {
    if let Some(tok) = classify_token(chunk, keywords) {
        return Some(vec![tok]);
    }
    // every char boundary strictly inside the chunk
    let bounds: Vec<usize> = chunk.char_indices().skip(1).map(|(i, _)| i).collect();
    for &i in bounds.iter().rev() {
        let Some(left) = classify_token(&chunk[..i], keywords) else {
            continue;
        };
        if let Some(right) = segment_word(&chunk[i..], keywords, cache) {
            let mut out = Vec::with_capacity(right.len() + 1);
            out.push(left);
            out.extend(right);
            return Some(out);
        }
    }
    None
}
