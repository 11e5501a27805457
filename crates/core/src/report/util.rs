use std::cmp::Ordering;

use crate::types::{ExactDuplicateGroup, FunctionalDuplicateGroup, SimilarPair};

pub(super) fn sort_exact_groups_for_report(groups: &mut [ExactDuplicateGroup]) {
    groups.sort_by(|a, b| {
        b.files
            .len()
            .cmp(&a.files.len())
            .then_with(|| b.size.cmp(&a.size))
            .then_with(|| a.content_hash.cmp(&b.content_hash))
    });
}

pub(super) fn sort_similar_pairs_for_report(pairs: &mut [SimilarPair]) {
    pairs.sort_by(|a, b| {
        b.ratio
            .partial_cmp(&a.ratio)
            .unwrap_or(Ordering::Equal)
            .then_with(|| (a.a.repo_id, &a.a.path).cmp(&(b.a.repo_id, &b.a.path)))
            .then_with(|| (a.b.repo_id, &a.b.path).cmp(&(b.b.repo_id, &b.b.path)))
    });
}

pub(super) fn sort_functional_groups_for_report(groups: &mut [FunctionalDuplicateGroup]) {
    groups.sort_by(|a, b| {
        b.files
            .len()
            .cmp(&a.files.len())
            .then_with(|| a.signature.cmp(&b.signature))
    });
}
