use std::collections::{BTreeMap, BTreeSet};

use crate::naming::normalize_basename;
use crate::types::{ExactDuplicateGroup, FunctionalDuplicateGroup, ScriptFile};

pub(super) fn exact_duplicate_groups(files: &[ScriptFile]) -> Vec<ExactDuplicateGroup> {
    let mut by_hash: BTreeMap<u128, Vec<&ScriptFile>> = BTreeMap::new();
    for file in files {
        by_hash.entry(file.content_hash).or_default().push(file);
    }

    by_hash
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(content_hash, members)| ExactDuplicateGroup {
            content_hash,
            size: members[0].size,
            files: members.iter().map(|f| f.to_duplicate_file()).collect(),
        })
        .collect()
}

pub(super) fn name_collision_buckets<'a>(
    files: &'a [ScriptFile],
    service_prefixes: &[String],
) -> Vec<(String, Vec<&'a ScriptFile>)> {
    let mut by_name: BTreeMap<String, Vec<&ScriptFile>> = BTreeMap::new();
    for file in files {
        by_name
            .entry(normalize_basename(&file.basename, service_prefixes))
            .or_default()
            .push(file);
    }

    by_name
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .collect()
}

/// Same non-empty signature key, at least two distinct content hashes.
pub(super) fn functional_duplicate_groups(files: &[ScriptFile]) -> Vec<FunctionalDuplicateGroup> {
    let mut by_signature: BTreeMap<&str, Vec<&ScriptFile>> = BTreeMap::new();
    for file in files.iter().filter(|f| !f.signature.is_empty()) {
        by_signature
            .entry(file.signature.as_str())
            .or_default()
            .push(file);
    }

    by_signature
        .into_iter()
        .filter(|(_, members)| {
            members
                .iter()
                .map(|f| f.content_hash)
                .collect::<BTreeSet<_>>()
                .len()
                > 1
        })
        .map(|(signature, members)| FunctionalDuplicateGroup {
            signature: signature.to_string(),
            files: members.iter().map(|f| f.to_duplicate_file()).collect(),
        })
        .collect()
}
