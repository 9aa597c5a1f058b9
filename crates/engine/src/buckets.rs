use indexmap::IndexMap;

use crate::document::format_number;
use crate::model::{Annotation, PairingOutput, ScannedEntry};

/// Opposite-signed occurrences of one (absolute amount, partition) key,
/// each side in scan order.
#[derive(Debug, Default)]
struct Bucket {
    non_negative: Vec<u32>,
    negative: Vec<u32>,
}

/// Bucket key: stringified absolute amount with the partition key appended
/// verbatim, no separator.
fn bucket_key(entry: &ScannedEntry) -> String {
    format!("{}{}", format_number(entry.value.abs()), entry.partition)
}

/// Group entries by bucket key in scan order, then pair non-negative against
/// negative occurrences positionally (first against first, second against
/// second). Buckets take match indices in insertion order; a bucket that
/// yields no pair still consumes its index, so written indices may have gaps.
pub fn pair_entries(entries: &[ScannedEntry]) -> PairingOutput {
    let mut buckets: IndexMap<String, Bucket> = IndexMap::new();
    for entry in entries {
        let bucket = buckets.entry(bucket_key(entry)).or_default();
        if entry.value < 0.0 {
            bucket.negative.push(entry.row);
        } else {
            bucket.non_negative.push(entry.row);
        }
    }

    let mut annotations = Vec::with_capacity(entries.len());
    let mut pair_count = 0;
    for (index, bucket) in buckets.values().enumerate() {
        let match_index = index as u32;
        let depth = bucket.non_negative.len().max(bucket.negative.len());
        for position in 0..depth {
            match (bucket.non_negative.get(position), bucket.negative.get(position)) {
                (Some(&plus_row), Some(&minus_row)) => {
                    annotations.push(Annotation { row: plus_row, match_index: Some(match_index) });
                    annotations.push(Annotation { row: minus_row, match_index: Some(match_index) });
                    pair_count += 1;
                }
                (Some(&row), None) | (None, Some(&row)) => {
                    annotations.push(Annotation { row, match_index: None });
                }
                (None, None) => {}
            }
        }
    }

    let unmatched_count = annotations.iter().filter(|a| a.match_index.is_none()).count();
    PairingOutput {
        bucket_count: buckets.len(),
        pair_count,
        unmatched_count,
        annotations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(row: u32, value: f64) -> ScannedEntry {
        ScannedEntry { row, value, partition: String::new() }
    }

    fn part(row: u32, value: f64, partition: &str) -> ScannedEntry {
        ScannedEntry { row, value, partition: partition.into() }
    }

    fn index_of(out: &PairingOutput, row: u32) -> Option<u32> {
        out.annotations
            .iter()
            .find(|a| a.row == row)
            .unwrap_or_else(|| panic!("row {row} missing from annotations"))
            .match_index
    }

    #[test]
    fn fifo_pairing_within_bucket() {
        // First 10 pairs with the first -10; the second 10 and the 5 stay open.
        let out = pair_entries(&[entry(2, 10.0), entry(3, -10.0), entry(4, 10.0), entry(5, 5.0)]);
        assert_eq!(index_of(&out, 2), Some(0));
        assert_eq!(index_of(&out, 3), Some(0));
        assert_eq!(index_of(&out, 4), None);
        assert_eq!(index_of(&out, 5), None);
        assert_eq!(out.bucket_count, 2);
        assert_eq!(out.pair_count, 1);
        assert_eq!(out.unmatched_count, 2);
    }

    #[test]
    fn every_entry_annotated_exactly_once() {
        let out = pair_entries(&[entry(2, 10.0), entry(3, -10.0), entry(4, 10.0), entry(5, 5.0)]);
        let mut rows: Vec<u32> = out.annotations.iter().map(|a| a.row).collect();
        rows.sort_unstable();
        assert_eq!(rows, vec![2, 3, 4, 5]);
    }

    #[test]
    fn partitions_keep_buckets_apart() {
        // The lone -10 sits in partition B; the 10s in partition A cannot reach it.
        let out = pair_entries(&[
            part(2, 10.0, "A"),
            part(3, -10.0, "B"),
            part(4, 10.0, "A"),
            part(5, 5.0, "A"),
        ]);
        assert_eq!(out.bucket_count, 3);
        assert_eq!(out.pair_count, 0);
        assert_eq!(out.unmatched_count, 4);
        assert!(out.annotations.iter().all(|a| a.match_index.is_none()));
    }

    #[test]
    fn pair_count_is_min_of_side_lengths() {
        let out = pair_entries(&[
            entry(2, 4.0),
            entry(3, 4.0),
            entry(4, 4.0),
            entry(5, -4.0),
            entry(6, -4.0),
        ]);
        assert_eq!(out.pair_count, 2);
        assert_eq!(out.unmatched_count, 1);
        // Positional: row 2 with row 5, row 3 with row 6.
        assert_eq!(index_of(&out, 2), index_of(&out, 5));
        assert_eq!(index_of(&out, 3), index_of(&out, 6));
        assert_eq!(index_of(&out, 4), None);
    }

    #[test]
    fn zero_never_pairs() {
        // Zero is non-negative and -0.0 is not < 0, so a zero bucket has no
        // negative side to pair against.
        let out = pair_entries(&[entry(2, 0.0), entry(3, -0.0)]);
        assert_eq!(out.bucket_count, 1);
        assert_eq!(out.pair_count, 0);
        assert_eq!(out.unmatched_count, 2);
    }

    #[test]
    fn match_indices_follow_bucket_insertion_order() {
        // "5" is seen first and takes index 0 even though "3" sorts lower.
        let out = pair_entries(&[entry(2, 5.0), entry(3, 3.0), entry(4, -5.0), entry(5, -3.0)]);
        assert_eq!(index_of(&out, 2), Some(0));
        assert_eq!(index_of(&out, 4), Some(0));
        assert_eq!(index_of(&out, 3), Some(1));
        assert_eq!(index_of(&out, 5), Some(1));
    }

    #[test]
    fn pairless_bucket_still_consumes_its_index() {
        let out = pair_entries(&[entry(2, 7.0), entry(3, 3.0), entry(4, -3.0)]);
        assert_eq!(index_of(&out, 2), None);
        assert_eq!(index_of(&out, 3), Some(1));
        assert_eq!(index_of(&out, 4), Some(1));
    }

    #[test]
    fn reversing_scan_order_changes_partners_not_count() {
        let forward = pair_entries(&[entry(2, 10.0), entry(3, 10.0), entry(4, -10.0)]);
        assert_eq!(forward.pair_count, 1);
        assert_eq!(index_of(&forward, 2), Some(0));
        assert_eq!(index_of(&forward, 3), None);

        let reversed = pair_entries(&[entry(4, -10.0), entry(3, 10.0), entry(2, 10.0)]);
        assert_eq!(reversed.pair_count, 1);
        assert_eq!(index_of(&reversed, 3), Some(0));
        assert_eq!(index_of(&reversed, 2), None);
    }

    #[test]
    fn equality_is_exact() {
        let out = pair_entries(&[entry(2, 10.5), entry(3, -10.55)]);
        assert_eq!(out.bucket_count, 2);
        assert_eq!(out.pair_count, 0);
    }

    #[test]
    fn integral_amounts_bucket_without_decimal_suffix() {
        // 10.0 stringifies as "10", so an integral float and a whole amount share a bucket.
        let out = pair_entries(&[entry(2, 10.0), entry(3, -10.0)]);
        assert_eq!(out.bucket_count, 1);
        assert_eq!(out.pair_count, 1);
    }

    #[test]
    fn concatenated_keys_can_collide_across_partitions() {
        // abs 1 + partition "0" and abs 10 + empty partition both key as "10".
        let out = pair_entries(&[part(2, 1.0, "0"), part(3, -10.0, "")]);
        assert_eq!(out.bucket_count, 1);
        assert_eq!(out.pair_count, 1);
    }

    #[test]
    fn empty_input_produces_empty_output() {
        let out = pair_entries(&[]);
        assert!(out.annotations.is_empty());
        assert_eq!(out.bucket_count, 0);
        assert_eq!(out.pair_count, 0);
        assert_eq!(out.unmatched_count, 0);
    }
}
