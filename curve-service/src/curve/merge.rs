use std::{cmp::Ordering, iter::FusedIterator, iter::Peekable};

use super::CurveSample;

/// Two-pointer merge of the general and peak curves.
///
/// Both inputs must already be sorted ascending by timestamp; the merge does
/// not sort. Output is ascending with distinct timestamps: on equal
/// timestamps the peak sample is emitted and both sides advance. Once one
/// side is exhausted the other is drained as is.
///
/// The merge is lazy, so it can sit on top of cursors as well as vectors.
pub struct OrderedMerge<G, P>
where
    G: Iterator<Item = CurveSample>,
    P: Iterator<Item = CurveSample>,
{
    general: Peekable<G>,
    peak: Peekable<P>,
}

impl<G, P> OrderedMerge<G, P>
where
    G: Iterator<Item = CurveSample>,
    P: Iterator<Item = CurveSample>,
{
    pub fn new<GI, PI>(general: GI, peak: PI) -> Self
    where
        GI: IntoIterator<IntoIter = G>,
        PI: IntoIterator<IntoIter = P>,
    {
        Self {
            general: general.into_iter().peekable(),
            peak: peak.into_iter().peekable(),
        }
    }
}

impl<G, P> Iterator for OrderedMerge<G, P>
where
    G: Iterator<Item = CurveSample>,
    P: Iterator<Item = CurveSample>,
{
    type Item = CurveSample;

    fn next(&mut self) -> Option<CurveSample> {
        let order = match (self.general.peek(), self.peak.peek()) {
            (Some(g), Some(p)) => g.ts.cmp(&p.ts),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => return None,
        };

        match order {
            Ordering::Less => self.general.next(),
            Ordering::Greater => self.peak.next(),
            Ordering::Equal => {
                self.general.next();
                self.peak.next()
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (g_lo, g_hi) = self.general.size_hint();
        let (p_lo, p_hi) = self.peak.size_hint();
        let hi = match (g_hi, p_hi) {
            (Some(g), Some(p)) => g.checked_add(p),
            _ => None,
        };
        (g_lo.max(p_lo), hi)
    }
}

impl<G, P> FusedIterator for OrderedMerge<G, P>
where
    G: Iterator<Item = CurveSample>,
    P: Iterator<Item = CurveSample>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Duration, OffsetDateTime};

    fn at(secs: i64, value: f64) -> CurveSample {
        CurveSample::new(OffsetDateTime::UNIX_EPOCH + Duration::seconds(secs), value)
    }

    fn merge(general: Vec<CurveSample>, peak: Vec<CurveSample>) -> Vec<CurveSample> {
        OrderedMerge::new(general, peak).collect()
    }

    fn secs(samples: &[CurveSample]) -> Vec<i64> {
        samples.iter().map(|s| s.ts.unix_timestamp()).collect()
    }

    #[test]
    fn peak_wins_on_equal_timestamps() {
        assert_eq!(merge(vec![at(100, 1.0)], vec![at(100, 2.0)]), vec![at(100, 2.0)]);
    }

    #[test]
    fn empty_peak_drains_general_unchanged() {
        let general = vec![at(1, 1.0), at(3, 1.0)];
        assert_eq!(merge(general.clone(), vec![]), general);
    }

    #[test]
    fn empty_general_drains_peak_unchanged() {
        let peak = vec![at(2, 5.0), at(4, 6.0)];
        assert_eq!(merge(vec![], peak.clone()), peak);
    }

    #[test]
    fn both_empty_yields_nothing() {
        assert!(merge(vec![], vec![]).is_empty());
    }

    #[test]
    fn interleaved_inputs_come_out_ordered() {
        let out = merge(
            vec![at(1, 1.0), at(4, 1.0), at(6, 1.0)],
            vec![at(2, 2.0), at(3, 2.0), at(7, 2.0), at(9, 2.0)],
        );
        assert_eq!(secs(&out), vec![1, 2, 3, 4, 6, 7, 9]);
    }

    #[test]
    fn overlapping_inputs_collapse_common_timestamps() {
        let general = vec![at(1, 1.0), at(2, 1.0), at(3, 1.0), at(5, 1.0), at(8, 1.0)];
        let peak = vec![at(2, 9.0), at(3, 9.0), at(4, 9.0), at(8, 9.0)];
        let common = 3;

        let out = merge(general.clone(), peak.clone());

        assert_eq!(out.len(), general.len() + peak.len() - common);
        assert!(out.windows(2).all(|w| w[0].ts < w[1].ts));
        assert_eq!(secs(&out), vec![1, 2, 3, 4, 5, 8]);
        let values: Vec<f64> = out.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, 9.0, 9.0, 9.0, 1.0, 9.0]);
    }

    #[test]
    fn zero_valued_samples_are_not_treated_as_end_of_input() {
        let out = merge(vec![at(1, 0.0), at(2, 0.0)], vec![at(3, 0.0)]);
        assert_eq!(secs(&out), vec![1, 2, 3]);
    }

    #[test]
    fn merge_is_lazy() {
        let general = (0..).map(|i| at(i * 2, 1.0));
        let peak = vec![at(3, 2.0)];
        let first: Vec<CurveSample> = OrderedMerge::new(general, peak).take(4).collect();
        assert_eq!(secs(&first), vec![0, 2, 3, 4]);
    }

    mod properties {
        use std::collections::BTreeSet;

        use proptest::prelude::*;

        use super::*;
        use crate::curve::{normalize, Unit};

        const GENERAL_VALUE: f64 = 1.0;

        fn peak_value(ts: i64) -> f64 {
            2.0 + ts as f64
        }

        /// Sorted, distinct timestamps; two draws from the same small range
        /// overlap by a random amount.
        fn timestamps() -> impl Strategy<Value = BTreeSet<i64>> {
            proptest::collection::btree_set(0i64..200, 0..60)
        }

        fn curve(ts: &BTreeSet<i64>, value: impl Fn(i64) -> f64) -> Vec<CurveSample> {
            ts.iter().map(|&t| at(t, value(t))).collect()
        }

        proptest! {
            #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

            #[test]
            fn merged_length_drops_exactly_the_shared_timestamps(g in timestamps(), p in timestamps()) {
                let common = g.intersection(&p).count();
                let out = merge(curve(&g, |_| GENERAL_VALUE), curve(&p, peak_value));
                prop_assert_eq!(out.len(), g.len() + p.len() - common);
            }

            #[test]
            fn merged_output_is_strictly_increasing(g in timestamps(), p in timestamps()) {
                let out = merge(curve(&g, |_| GENERAL_VALUE), curve(&p, peak_value));
                prop_assert!(out.windows(2).all(|w| w[0].ts < w[1].ts));

                let expected: Vec<i64> = g.union(&p).copied().collect();
                prop_assert_eq!(secs(&out), expected);
            }

            #[test]
            fn shared_timestamps_carry_the_peak_value(g in timestamps(), p in timestamps()) {
                let out = merge(curve(&g, |_| GENERAL_VALUE), curve(&p, peak_value));
                for sample in &out {
                    let t = sample.ts.unix_timestamp();
                    if p.contains(&t) {
                        prop_assert_eq!(sample.value, peak_value(t));
                    } else {
                        prop_assert_eq!(sample.value, GENERAL_VALUE);
                    }
                }
            }

            #[test]
            fn normalized_merge_is_reproducible(g in timestamps(), p in timestamps()) {
                let build = || -> Vec<_> {
                    merge(curve(&g, |_| GENERAL_VALUE), curve(&p, peak_value))
                        .iter()
                        .map(|s| normalize(s, Unit::Kilowatt))
                        .collect()
                };
                prop_assert_eq!(build(), build());
            }
        }
    }
}
