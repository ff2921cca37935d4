//! Sparse encoder: splits runs into singleton and range lists per width
//! class and delta-encodes them; plus the inverse decode into a dense array.

use crate::core::errors::TableError;
use crate::core::width::{ByClass, CODEPOINT_COUNT, MAX_CODEPOINT, SENTINEL, WidthClass};
use crate::encoders::scanner::Run;
use serde::Serialize;

/// Absolute singleton codepoints and inclusive `(start, end)` ranges for one class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct AbsoluteList {
    codepoints: Vec<u32>,
    ranges: Vec<(u32, u32)>,
}

/// Delta-encoded singleton and range lists for one width class.
///
/// - `codepoints[0]` is absolute, each later entry is the gap from the
///   previous codepoint.
/// - each range is `[start - previous_end, end - start]`; the first start is
///   absolute. The second field is the inclusive span, one less than the
///   run length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeltaList {
    pub codepoints: Vec<u32>,
    pub ranges: Vec<[u32; 2]>,
}

impl DeltaList {
    fn from_absolute(list: AbsoluteList) -> Self {
        let mut previous = 0;
        let codepoints = list
            .codepoints
            .into_iter()
            .map(|cp| {
                let delta = cp - previous;
                previous = cp;
                delta
            })
            .collect();

        let mut previous_end = 0;
        let ranges = list
            .ranges
            .into_iter()
            .map(|(start, end)| {
                let delta = [start - previous_end, end - start];
                previous_end = end;
                delta
            })
            .collect();

        Self { codepoints, ranges }
    }

    /// Decodes the singleton list by cumulative summation.
    pub fn absolute_codepoints(&self) -> Vec<u32> {
        self.codepoints
            .iter()
            .scan(0u32, |current, &delta| {
                *current += delta;
                Some(*current)
            })
            .collect()
    }

    /// Decodes the range list into inclusive `(start, end)` pairs.
    pub fn absolute_ranges(&self) -> Vec<(u32, u32)> {
        self.ranges
            .iter()
            .scan(0u32, |current, &[delta_start, span]| {
                let start = *current + delta_start;
                let end = start + span;
                *current = end;
                Some((start, end))
            })
            .collect()
    }

    /// Number of codepoints covered by both lists.
    pub fn covered(&self) -> usize {
        self.codepoints.len()
            + self
                .ranges
                .iter()
                .map(|&[_, span]| span as usize + 1)
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty() && self.ranges.is_empty()
    }
}

/// Accumulates closed runs and produces the six delta-encoded lists.
#[derive(Debug, Default)]
pub struct SparseEncoder {
    lists: ByClass<AbsoluteList>,
    /// Highest codepoint recorded per class, singletons and ranges alike
    last_end: ByClass<Option<u32>>,
}

impl SparseEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a closed run. Invalid runs are checked for bounds and dropped.
    ///
    /// Runs of one class must arrive in ascending order without overlap.
    pub fn push(&mut self, run: Run) -> Result<(), TableError> {
        if run.start > run.end {
            return Err(TableError::invalid_run(run.start, run.end, "start is after end"));
        }
        if run.end > MAX_CODEPOINT {
            return Err(TableError::invalid_run(
                run.start,
                run.end,
                "ends past the codepoint space",
            ));
        }
        let Some(class) = run.class else {
            return Ok(());
        };

        if let Some(previous) = self.last_end[class].filter(|&end| run.start <= end) {
            return Err(TableError::invalid_run(
                run.start,
                run.end,
                format!(
                    "starts at or before U+{:06X}, the end of the previous width-{} run",
                    previous,
                    class.as_u8()
                ),
            ));
        }
        self.last_end[class] = Some(run.end);

        let list = &mut self.lists[class];
        if run.is_singleton() {
            list.codepoints.push(run.start);
        } else {
            list.ranges.push((run.start, run.end));
        }
        Ok(())
    }

    pub fn finish(self) -> SparseTables {
        SparseTables {
            lists: self.lists.map(DeltaList::from_absolute),
        }
    }
}

/// Delta-encoded lists for every width class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseTables {
    lists: ByClass<DeltaList>,
}

impl SparseTables {
    pub fn get(&self, class: WidthClass) -> &DeltaList {
        &self.lists[class]
    }

    pub fn iter(&self) -> impl Iterator<Item = (WidthClass, &DeltaList)> {
        self.lists.iter()
    }

    /// Rebuilds the per-codepoint width array the lists were encoded from.
    pub fn to_dense(&self) -> DenseWidths {
        let mut dense = DenseWidths::new();
        for (class, list) in self.iter() {
            for cp in list.absolute_codepoints() {
                dense.set(cp, class);
            }
            for (start, end) in list.absolute_ranges() {
                dense.set_range(start, end, class);
            }
        }
        dense
    }
}

/// Per-codepoint width bytes for the whole codepoint space.
pub struct DenseWidths {
    widths: Box<[u8]>,
}

impl DenseWidths {
    /// A sentinel-filled array.
    pub fn new() -> Self {
        Self {
            widths: vec![SENTINEL; CODEPOINT_COUNT].into_boxed_slice(),
        }
    }

    /// Width byte of `codepoint`; sentinel beyond the codepoint space.
    pub fn get(&self, codepoint: u32) -> u8 {
        self.widths
            .get(codepoint as usize)
            .copied()
            .unwrap_or(SENTINEL)
    }

    pub fn set(&mut self, codepoint: u32, class: WidthClass) {
        self.widths[codepoint as usize] = class.as_u8();
    }

    pub fn set_range(&mut self, start: u32, end: u32, class: WidthClass) {
        self.widths[start as usize..=end as usize].fill(class.as_u8());
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.widths
    }
}

impl Default for DenseWidths {
    fn default() -> Self {
        Self::new()
    }
}
