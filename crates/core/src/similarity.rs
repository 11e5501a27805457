//! The pairwise pass is O(n²) in files and O(L₁·L₂) per pair, so it is gated by a
//! corpus-size cap and a length prefilter: `lev(a, b) >= |len(a) - len(b)|`, hence a
//! pair whose `shorter / longer` ratio is already below the threshold cannot qualify.

use tracing::{debug, warn};

use crate::types::{ScanOptions, ScriptFile, SimilarPair};

pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let (longer, shorter) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if longer.is_empty() {
        return 1.0;
    }
    let distance = levenshtein(longer, shorter);
    1.0 - (distance as f64 / longer.len() as f64)
}

/// `1 - lev(longer, shorter) / len(longer)`; two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Returns `None` when the corpus exceeds `options.max_similarity_files`.
pub(crate) fn find_similar_pairs(
    files: &[ScriptFile],
    options: &ScanOptions,
) -> Option<Vec<SimilarPair>> {
    if files.len() > options.max_similarity_files {
        warn!(
            files = files.len(),
            cap = options.max_similarity_files,
            "skipping pairwise similarity: corpus exceeds the configured cap"
        );
        return None;
    }

    let threshold = options.similarity_threshold;
    let chars: Vec<Vec<char>> = files
        .iter()
        .map(|f| f.cleaned_content.chars().collect())
        .collect();

    let mut compared: u64 = 0;
    let mut pruned: u64 = 0;
    let mut out = Vec::new();

    for i in 0..files.len() {
        for j in (i + 1)..files.len() {
            let (a, b) = (&files[i], &files[j]);
            if a.content_hash == b.content_hash {
                continue;
            }

            if a.cleaned_content == b.cleaned_content {
                out.push(SimilarPair {
                    a: a.to_duplicate_file(),
                    b: b.to_duplicate_file(),
                    ratio: 1.0,
                    cleaned_identical: true,
                });
                continue;
            }

            let (len_a, len_b) = (chars[i].len(), chars[j].len());
            let longer = len_a.max(len_b);
            let shorter = len_a.min(len_b);
            if (shorter as f64) < threshold * longer as f64 {
                pruned += 1;
                continue;
            }

            compared += 1;
            let ratio = ratio_chars(&chars[i], &chars[j]);
            if ratio >= threshold {
                out.push(SimilarPair {
                    a: a.to_duplicate_file(),
                    b: b.to_duplicate_file(),
                    ratio,
                    cleaned_identical: false,
                });
            }
        }
    }

    debug!(compared, pruned, found = out.len(), "pairwise similarity done");
    Some(out)
}
