//! Ratcliff/Obershelp sequence similarity.
//!
//! `sequence_ratio` finds the longest common block, recurses on the text to
//! its left and right, and scores `2*M / (len(a) + len(b))` where `M` is the
//! total length of all matched blocks. Lengths are counted in `char`s.
//!
//! Block selection follows the classic matcher exactly, including the
//! "popular element" heuristic: when the second sequence has 200 or more
//! elements, any element occurring more than `len/100 + 1` times is not
//! indexed (it can still be absorbed when a block is extended).

use std::collections::HashMap;

const AUTOJUNK_MIN_LEN: usize = 200;

/// Symmetric similarity in `[0, 1]` after lowercasing and trimming both
/// inputs. Two empty strings are identical (1.0).
///
/// The underlying block search breaks ties by position, so the raw ratio can
/// differ with argument order (`tide`/`diet`). The larger of the two
/// directions is returned.
pub fn score(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    let forward = sequence_ratio(&a, &b);
    if a == b {
        return forward;
    }
    forward.max(sequence_ratio(&b, &a))
}

/// Directional matcher ratio over the raw inputs (no normalization).
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = SequenceMatcher::new(&a, &b).matched_len();
    2.0 * matched as f64 / total as f64
}

/// A single matched block: `a[a_start..a_start+len] == b[b_start..b_start+len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

struct SequenceMatcher<'s> {
    a: &'s [char],
    b: &'s [char],
    /// Positions of each indexed element of `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'s> SequenceMatcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &ch) in b.iter().enumerate() {
            b2j.entry(ch).or_default().push(j);
        }
        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }
        Self { a, b, b2j }
    }

    /// Longest block inside `a[alo..ahi]` x `b[blo..bhi]`; earliest in `a`,
    /// then earliest in `b`, wins ties. May return a zero-length block.
    fn longest_block(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (a, b) = (self.a, self.b);
        let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0usize);

        // j2len[j] = length of the match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_len {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_len = k;
                    }
                }
            }
            j2len = next;
        }

        // Unindexed (popular) elements can still join a block at its edges.
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && a[best_i + best_len] == b[best_j + best_len]
        {
            best_len += 1;
        }

        Block {
            a_start: best_i,
            b_start: best_j,
            len: best_len,
        }
    }

    fn matching_blocks(&self) -> Vec<Block> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.longest_block(alo, ahi, blo, bhi);
            if block.len == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.len);
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
            blocks.push(block);
        }
        blocks.sort_by_key(|b| (b.a_start, b.b_start));
        blocks
    }

    fn matched_len(&self) -> usize {
        self.matching_blocks().iter().map(|b| b.len).sum()
    }
}

/// Matched blocks between `a` and `b` in `a` order (no normalization).
pub fn matching_blocks(a: &str, b: &str) -> Vec<Block> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    SequenceMatcher::new(&a, &b).matching_blocks()
}
