use std::collections::HashSet;

/// Merges two history line sequences into one deduplicated sequence.
///
/// Local ordering is the primary ordering: every local line keeps its
/// position, and remote-only lines are appended after all local lines in
/// their original remote order. A line present in both inputs keeps its
/// earliest (local) position. Duplicates within a single input collapse to
/// the first occurrence.
pub fn merge_histories(local: &[String], remote: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(local.len() + remote.len());
    let mut merged = Vec::with_capacity(local.len() + remote.len());

    for line in local.iter().chain(remote.iter()) {
        if seen.insert(line.as_str()) {
            merged.push(line.clone());
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lines(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_disjoint_inputs_concatenate_in_order() {
        let local = lines(&["ls -la", "cd /tmp"]);
        let remote = lines(&["git status", "cargo build"]);

        let merged = merge_histories(&local, &remote);

        assert_eq!(
            merged,
            lines(&["ls -la", "cd /tmp", "git status", "cargo build"])
        );
        assert_eq!(merged.len(), local.len() + remote.len());
    }

    #[test]
    fn test_overlapping_line_keeps_local_position() {
        let local = lines(&["ls -la", "cd /tmp"]);
        let remote = lines(&["cd /tmp", "rm -rf /tmp/x"]);

        let merged = merge_histories(&local, &remote);

        assert_eq!(merged, lines(&["ls -la", "cd /tmp", "rm -rf /tmp/x"]));
    }

    #[test]
    fn test_every_line_appears_exactly_once() {
        let local = lines(&["a", "b", "c"]);
        let remote = lines(&["c", "b", "d"]);

        let merged = merge_histories(&local, &remote);

        for line in &merged {
            assert_eq!(merged.iter().filter(|l| *l == line).count(), 1);
        }
        assert_eq!(merged, lines(&["a", "b", "c", "d"]));
    }

    #[rstest]
    #[case::empty_local(&[], &["a", "b", "a", "c"], &["a", "b", "c"])]
    #[case::empty_remote(&["x", "x", "y"], &[], &["x", "y"])]
    #[case::both_empty(&[], &[], &[])]
    #[case::within_input_duplicates(&["a", "b", "a"], &["b", "c", "c"], &["a", "b", "c"])]
    fn test_edge_cases(
        #[case] local: &[&str],
        #[case] remote: &[&str],
        #[case] expected: &[&str],
    ) {
        assert_eq!(
            merge_histories(&lines(local), &lines(remote)),
            lines(expected)
        );
    }
}
