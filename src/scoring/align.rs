//! Character-sequence alignment via longest matching blocks.
//!
//! Decomposes a (reference, hypothesis) pair into Replace/Delete/Insert/Equal
//! spans by recursively finding the longest common block, the same
//! decomposition the original evaluation used. This is not minimum edit
//! distance; see `scoring::cer` for how the spans are costed.

use std::collections::HashMap;

/// A maximal run of identical characters: `a[a_start..]` == `b[b_start..]`
/// for `size` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Replace,
    Delete,
    Insert,
    Equal,
}

/// One edit operation covering `a[a_start..a_end]` and `b[b_start..b_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub a_start: usize,
    pub a_end: usize,
    pub b_start: usize,
    pub b_end: usize,
}

/// Index of each character's positions in `b`, ascending.
fn index_b(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &ch) in b.iter().enumerate() {
        b2j.entry(ch).or_default().push(j);
    }
    b2j
}

/// Finds the longest block of characters common to `a[alo..ahi]` and
/// `b[blo..bhi]`. Ties resolve to the earliest block in `a`, then in `b`
/// (strict `>` update during the scan).
fn longest_block(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> Block {
    let mut best = Block { a_start: alo, b_start: blo, size: 0 };
    // j2len[j] = length of the longest run ending at a[i], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, &ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(&ch) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let run = if j == 0 {
                    1
                } else {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                };
                new_j2len.insert(j, run);
                if run > best.size {
                    best = Block {
                        a_start: i + 1 - run,
                        b_start: j + 1 - run,
                        size: run,
                    };
                }
            }
        }
        j2len = new_j2len;
    }

    best
}

/// All matching blocks between `a` and `b` in ascending order, adjacent
/// blocks coalesced, terminated by a zero-size sentinel at the end of both
/// sequences.
pub fn matching_blocks(a: &[char], b: &[char]) -> Vec<Block> {
    let b2j = index_b(b);
    let mut queue = vec![(0, a.len(), 0, b.len())];
    let mut found: Vec<Block> = Vec::new();

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let block = longest_block(a, &b2j, alo, ahi, blo, bhi);
        if block.size > 0 {
            if alo < block.a_start && blo < block.b_start {
                queue.push((alo, block.a_start, blo, block.b_start));
            }
            if block.a_start + block.size < ahi && block.b_start + block.size < bhi {
                queue.push((block.a_start + block.size, ahi, block.b_start + block.size, bhi));
            }
            found.push(block);
        }
    }

    found.sort_by_key(|m| (m.a_start, m.b_start));

    // Coalesce blocks that abut in both sequences
    let mut blocks: Vec<Block> = Vec::with_capacity(found.len() + 1);
    let mut current = Block { a_start: 0, b_start: 0, size: 0 };
    for m in found {
        if current.size > 0
            && current.a_start + current.size == m.a_start
            && current.b_start + current.size == m.b_start
        {
            current.size += m.size;
        } else {
            if current.size > 0 {
                blocks.push(current);
            }
            current = m;
        }
    }
    if current.size > 0 {
        blocks.push(current);
    }
    blocks.push(Block { a_start: a.len(), b_start: b.len(), size: 0 });
    blocks
}

/// Edit operations transforming `a` into `b`, derived from the matching
/// blocks. Equal spans cover the blocks; the gaps between them become
/// Replace (both sides non-empty), Delete (gap only in `a`), or Insert
/// (gap only in `b`).
pub fn opcodes(a: &[char], b: &[char]) -> Vec<Opcode> {
    let mut ops = Vec::new();
    let mut i = 0;
    let mut j = 0;

    for block in matching_blocks(a, b) {
        let tag = match (i < block.a_start, j < block.b_start) {
            (true, true) => Some(OpTag::Replace),
            (true, false) => Some(OpTag::Delete),
            (false, true) => Some(OpTag::Insert),
            (false, false) => None,
        };
        if let Some(tag) = tag {
            ops.push(Opcode {
                tag,
                a_start: i,
                a_end: block.a_start,
                b_start: j,
                b_end: block.b_start,
            });
        }
        i = block.a_start + block.size;
        j = block.b_start + block.size;
        if block.size > 0 {
            ops.push(Opcode {
                tag: OpTag::Equal,
                a_start: block.a_start,
                a_end: i,
                b_start: block.b_start,
                b_end: j,
            });
        }
    }

    ops
}
