//! Sequence-matching similarity for fuzzy name lookups.
//!
//! The score is the Ratcliff/Obershelp ratio `2·M / T`, where `M` is the number
//! of characters covered by recursively matched common blocks and `T` the total
//! length of both strings. Both inputs are normalized first so that case and
//! punctuation differences do not dominate the score.

/// Lowercases and collapses every run of non-alphanumeric characters into a
/// single space. Strings made only of punctuation fall back to their trimmed
/// lowercase form so they can still match themselves.
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;

    for c in s.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }

    if out.is_empty() {
        s.trim().to_lowercase()
    } else {
        out
    }
}

/// Similarity in `[0, 1]`; `1.0` means identical after normalization.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

/// Sum of the lengths of the matching blocks found by repeatedly taking the
/// longest common block and recursing on both sides of it.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, k) = longest_common_block(a, b, (a_lo, a_hi), (b_lo, b_hi));
        if k == 0 {
            continue;
        }

        matched += k;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + k < a_hi && j + k < b_hi {
            pending.push((i + k, a_hi, j + k, b_hi));
        }
    }

    matched
}

/// Longest common contiguous block of `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
/// Returns `(start_in_a, start_in_b, length)`; earliest block wins ties.
fn longest_common_block(
    a: &[char],
    b: &[char],
    (a_lo, a_hi): (usize, usize),
    (b_lo, b_hi): (usize, usize),
) -> (usize, usize, usize) {
    let width = b_hi - b_lo;
    // Two rows of the common-suffix table; column 0 stays zero.
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];
    let (mut best_i, mut best_j, mut best_k) = (a_lo, b_lo, 0);

    for i in a_lo..a_hi {
        for j in b_lo..b_hi {
            let col = j - b_lo + 1;
            curr[col] = if a[i] == b[j] { prev[col - 1] + 1 } else { 0 };
            if curr[col] > best_k {
                best_k = curr[col];
                best_i = i + 1 - best_k;
                best_j = j + 1 - best_k;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (best_i, best_j, best_k)
}
