//! Bin registry: which bins staff identified and how the sorter's last and
//! exception bins follow from them.

use std::collections::BTreeMap;

use serde::Serialize;
use sortmatrix_core::MIN_BINS;

use crate::error::CompileError;

/// Records contributed to each identified bin.
#[derive(Debug, Clone, Default)]
pub struct BinRegistry {
    counts: BTreeMap<u32, usize>,
}

/// Derived bin layout of the sorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BinLayout {
    pub highest: u32,
    /// Last physical sort bin.
    pub last: u32,
    /// Catch-all bin for unmatched items.
    pub exception: u32,
}

impl BinRegistry {
    pub fn record(&mut self, bin: u32) {
        *self.counts.entry(bin).or_insert(0) += 1;
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn highest(&self) -> Option<u32> {
        self.counts.keys().next_back().copied()
    }

    pub fn counts(&self) -> &BTreeMap<u32, usize> {
        &self.counts
    }

    /// Bins between 1 and the highest that no record names.
    pub fn gaps(&self) -> Vec<u32> {
        let Some(highest) = self.highest() else {
            return Vec::new();
        };
        (1..highest)
            .filter(|b| !self.counts.contains_key(b))
            .collect()
    }

    /// Compute the layout. With no bin count an even highest bin is the last
    /// sort bin and the next one is the exception bin; an odd highest bin is
    /// itself the exception bin.
    pub fn layout(&self, bin_count: Option<u32>) -> Result<BinLayout, CompileError> {
        let found = self.distinct();
        let highest = match self.highest() {
            Some(h) if found >= MIN_BINS => h,
            _ => {
                return Err(CompileError::TooFewBins {
                    found,
                    min: MIN_BINS,
                });
            }
        };

        if let Some(bin_count) = bin_count {
            if bin_count < highest {
                return Err(CompileError::BinCountTooSmall { bin_count, highest });
            }
            return Ok(BinLayout {
                highest,
                last: bin_count - 1,
                exception: bin_count,
            });
        }

        Ok(if highest % 2 == 0 {
            BinLayout {
                highest,
                last: highest,
                exception: highest + 1,
            }
        } else {
            BinLayout {
                highest,
                last: highest - 1,
                exception: highest,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(bins: &[u32]) -> BinRegistry {
        let mut reg = BinRegistry::default();
        for b in bins {
            reg.record(*b);
        }
        reg
    }

    #[test]
    fn odd_highest_is_exception() {
        let layout = registry(&[1, 2, 3]).layout(None).unwrap();
        assert_eq!(
            layout,
            BinLayout {
                highest: 3,
                last: 2,
                exception: 3
            }
        );
    }

    #[test]
    fn even_highest_is_last() {
        let layout = registry(&[1, 2, 3, 4]).layout(None).unwrap();
        assert_eq!(layout.highest, 4);
        assert_eq!(layout.last, 4);
        assert_eq!(layout.exception, 5);
    }

    #[test]
    fn too_few_bins() {
        let err = registry(&[1, 2, 2, 1]).layout(None).unwrap_err();
        assert!(matches!(err, CompileError::TooFewBins { found: 2, min: 3 }));
        assert!(matches!(
            BinRegistry::default().layout(None),
            Err(CompileError::TooFewBins { found: 0, .. })
        ));
    }

    #[test]
    fn explicit_bin_count() {
        let layout = registry(&[1, 2, 4]).layout(Some(7)).unwrap();
        assert_eq!(layout.last, 6);
        assert_eq!(layout.exception, 7);
        assert!(matches!(
            registry(&[1, 2, 9]).layout(Some(7)),
            Err(CompileError::BinCountTooSmall { bin_count: 7, highest: 9 })
        ));
    }

    #[test]
    fn gaps_are_listed() {
        assert_eq!(registry(&[1, 3, 6]).gaps(), vec![2, 4, 5]);
        assert!(registry(&[1, 2, 3]).gaps().is_empty());
    }
}
