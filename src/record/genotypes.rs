//! Extraction of the `GT` sub-field straight from the unsplit sample columns.
//!
//! Where `GT` sits in FORMAT is decided once per call; every sample is then
//! scanned with the cheapest loop for that layout, slicing the genotype out of
//! the input string without building per-sample substrings.

use indexmap::IndexMap;

const TAB: u8 = b'\t';
const COLON: u8 = b':';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GtLayout {
    /// FORMAT is exactly `GT`.
    Only,
    /// `GT` leads, other keys follow.
    First,
    /// `GT` is preceded by this many keys.
    Nth(usize),
}

impl GtLayout {
    fn of(format: &str) -> Option<Self> {
        if format == "GT" {
            return Some(GtLayout::Only);
        }
        match format.split(':').position(|key| key == "GT")? {
            0 => Some(GtLayout::First),
            n => Some(GtLayout::Nth(n)),
        }
    }
}

/// Index of the first byte at or after `from` matching `stop`, else `bytes.len()`.
#[inline]
fn find(bytes: &[u8], from: usize, stop: impl Fn(u8) -> bool) -> usize {
    let from = from.min(bytes.len());
    bytes[from..]
        .iter()
        .position(|&b| stop(b))
        .map_or(bytes.len(), |offset| from + offset)
}

/// Calls `emit(sample_index, start, end)` with the byte range of each genotype.
///
/// Samples past the end of `rest` get an empty range for the first two
/// layouts and no call at all when `GT` is further back, matching a plain
/// split on tab then colon.
fn scan(format: &str, rest: &str, n_samples: usize, mut emit: impl FnMut(usize, usize, usize)) {
    let layout = match GtLayout::of(format) {
        Some(layout) => layout,
        None => return,
    };
    let bytes = rest.as_bytes();
    let mut pos = 0;
    for idx in 0..n_samples {
        let start = pos.min(bytes.len());
        match layout {
            GtLayout::Only => {
                let end = find(bytes, start, |b| b == TAB);
                emit(idx, start, end);
                pos = end + 1;
            }
            GtLayout::First => {
                let end = find(bytes, start, |b| b == COLON || b == TAB);
                emit(idx, start, end);
                pos = find(bytes, end, |b| b == TAB) + 1;
            }
            GtLayout::Nth(ordinal) => {
                let tab = find(bytes, start, |b| b == TAB);
                let mut colons = 0;
                let mut field_start = start;
                for j in start..=tab {
                    if j == tab || bytes[j] == COLON {
                        if colons == ordinal {
                            emit(idx, field_start, j);
                            break;
                        }
                        colons += 1;
                        field_start = j + 1;
                    }
                }
                pos = tab + 1;
            }
        }
    }
}

/// Maps each sample name to its raw genotype string, e.g. `"0|1"` or `"./."`.
///
/// `rest` holds the tab-separated sample columns that follow FORMAT. An
/// absent `GT` key yields an empty map, as does a sample with fewer
/// sub-fields than the position of `GT` (for that sample only).
pub fn parse_genotypes_only<'s, 'r>(
    format: &str,
    rest: &'r str,
    samples: &'s [String],
) -> IndexMap<&'s str, &'r str> {
    let mut genotypes = IndexMap::with_capacity(samples.len());
    scan(format, rest, samples.len(), |idx, start, end| {
        genotypes.insert(samples[idx].as_str(), &rest[start..end]);
    });
    genotypes
}

/// Same dispatch as [`parse_genotypes_only`], but hands `callback` the
/// sample string and the byte range of each genotype instead of collecting
/// them. Useful when genotypes only need to be counted or compared.
pub fn process_genotypes(
    format: &str,
    rest: &str,
    n_samples: usize,
    mut callback: impl FnMut(&str, usize, usize),
) {
    scan(format, rest, n_samples, |_, start, end| callback(rest, start, end));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::record::VcfParser;
    use proptest::prelude::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("S{}", i)).collect()
    }

    fn naive<'s, 'r>(format: &str, rest: &'r str, samples: &'s [String]) -> IndexMap<&'s str, &'r str> {
        let mut genotypes = IndexMap::new();
        let ordinal = match format.split(':').position(|key| key == "GT") {
            Some(ordinal) => ordinal,
            None => return genotypes,
        };
        let mut chunks = rest.split('\t');
        for sample in samples {
            let chunk = chunks.next().unwrap_or("");
            if let Some(gt) = chunk.split(':').nth(ordinal) {
                genotypes.insert(sample.as_str(), gt);
            }
        }
        genotypes
    }

    #[test]
    fn test_layout() {
        assert_eq!(GtLayout::of("GT"), Some(GtLayout::Only));
        assert_eq!(GtLayout::of("GT:GQ:DP"), Some(GtLayout::First));
        assert_eq!(GtLayout::of("DP:GQ:GT"), Some(GtLayout::Nth(2)));
        assert_eq!(GtLayout::of("DP:GQ"), None);
        assert_eq!(GtLayout::of("GTX:DP"), None);
        assert_eq!(GtLayout::of(""), None);
    }

    #[test]
    fn test_gt_only() {
        let samples = names(3);
        let genotypes = parse_genotypes_only("GT", "0/0\t1|1\t./.", &samples);
        assert_eq!(genotypes.len(), 3);
        assert_eq!(genotypes["S0"], "0/0");
        assert_eq!(genotypes["S1"], "1|1");
        assert_eq!(genotypes["S2"], "./.");
    }

    #[test]
    fn test_gt_first() {
        let samples = names(3);
        let rest = "0|0:48:1:51,51\t1|0:48:8:51,51\t1/1:43:5:.,.";
        let genotypes = parse_genotypes_only("GT:GQ:DP:HQ", rest, &samples);
        assert_eq!(
            genotypes.into_iter().collect::<Vec<_>>(),
            vec![("S0", "0|0"), ("S1", "1|0"), ("S2", "1/1")]
        );
    }

    #[test]
    fn test_gt_nth() {
        let samples = vec!["sample".to_owned()];
        let genotypes = parse_genotypes_only("DP:GQ:GT", "23:99:0/1", &samples);
        assert_eq!(genotypes["sample"], "0/1");
    }

    #[test]
    fn test_short_sample() {
        let samples = names(2);
        let genotypes = parse_genotypes_only("DP:GQ:GT", "23:99\t12:40:1/1", &samples);
        assert!(!genotypes.contains_key("S0"));
        assert_eq!(genotypes["S1"], "1/1");
    }

    #[test]
    fn test_absent_gt() {
        let samples = names(2);
        assert!(parse_genotypes_only("DP:GQ", "1:2\t3:4", &samples).is_empty());
        assert!(parse_genotypes_only("", "", &samples).is_empty());
    }

    #[test]
    fn test_more_names_than_columns() {
        let samples = names(3);
        let genotypes = parse_genotypes_only("GT:DP", "0/1:3", &samples);
        assert_eq!(genotypes, naive("GT:DP", "0/1:3", &samples));
        assert_eq!(genotypes["S1"], "");
        assert_eq!(genotypes["S2"], "");
    }

    #[test]
    fn test_process_genotypes() {
        let mut hom_alt = 0;
        process_genotypes("GT:GQ", "0/0:1\t1/1:2\t1/1:3", 3, |s, start, end| {
            if &s[start..end] == "1/1" {
                hom_alt += 1;
            }
        });
        assert_eq!(hom_alt, 2);

        let mut calls = 0;
        process_genotypes("DP", "1\t2", 2, |_, _, _| calls += 1);
        assert_eq!(calls, 0);
    }

    fn genotype() -> impl Strategy<Value = String> {
        (
            prop::collection::vec(
                prop_oneof![Just(".".to_owned()), (0u8..4).prop_map(|a| a.to_string())],
                1..5,
            ),
            prop::bool::ANY,
        )
            .prop_map(|(alleles, phased)| alleles.join(if phased { "|" } else { "/" }))
    }

    /// FORMAT, sample columns and sample count with `GT` at an arbitrary position.
    fn sample_columns() -> impl Strategy<Value = (String, String, usize)> {
        (1usize..6, 1usize..8).prop_flat_map(|(n_keys, n_samples)| {
            (
                0..n_keys,
                prop::collection::vec(
                    (
                        genotype(),
                        prop::collection::vec("[0-9.,]{0,4}", n_keys - 1),
                    ),
                    n_samples,
                ),
            )
                .prop_map(move |(gt_index, samples)| {
                    let mut keys = ["DP", "GQ", "AD", "PL", "HQ"][..n_keys - 1].to_vec();
                    keys.insert(gt_index, "GT");
                    let rest = samples
                        .into_iter()
                        .map(|(gt, mut others)| {
                            others.insert(gt_index, gt);
                            others.join(":")
                        })
                        .collect::<Vec<_>>()
                        .join("\t");
                    (keys.join(":"), rest, n_samples)
                })
        })
    }

    proptest! {
        #[test]
        fn prop_matches_naive_split((format, rest, n) in sample_columns(), extra in 0usize..3) {
            let samples = names(n + extra);
            let fast = parse_genotypes_only(&format, &rest, &samples);
            prop_assert_eq!(&fast, &naive(&format, &rest, &samples));

            let mut via_callback = Vec::new();
            process_genotypes(&format, &rest, samples.len(), |s, start, end| {
                via_callback.push(s[start..end].to_owned());
            });
            prop_assert_eq!(via_callback, fast.values().map(|gt| gt.to_string()).collect::<Vec<_>>());
        }

        #[test]
        fn prop_record_accessors_repeatable((format, rest, n) in sample_columns(), extra in 0usize..3) {
            let samples = names(n + extra);
            let header = format!(
                "##fileformat=VCFv4.3\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t{}\n",
                samples.join("\t")
            );
            let parser = VcfParser::new(&header).unwrap();
            let record = parser
                .parse_line(&format!("1\t100\t.\tA\tG\t.\tPASS\t.\t{}\t{}", format, rest))
                .unwrap();

            let genotypes = record.genotypes();
            prop_assert_eq!(&genotypes, &record.genotypes());
            prop_assert_eq!(&genotypes, &parse_genotypes_only(&format, &rest, &samples));
            let decoded = record.samples();
            prop_assert_eq!(decoded.len(), samples.len());
            prop_assert_eq!(&decoded, &record.samples());
        }
    }
}
