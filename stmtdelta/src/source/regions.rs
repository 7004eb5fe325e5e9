//! Included-file detection from preprocessor line markers.
//!
//! Preprocessed C carries GCC-style markers (`# 12 "foo.h" 1`) or `#line`
//! directives naming the file the following lines came from. Any text whose
//! presumed file is not the main file belongs to an included file and must
//! not be edited.

use crate::constants::line_marker_re;
use std::ops::Range;

/// Byte ranges of the program text that came from included files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludedRegions {
    ranges: Vec<Range<usize>>,
}

impl IncludedRegions {
    /// Build from explicit, sorted, non-overlapping ranges.
    #[must_use]
    pub fn from_ranges(ranges: Vec<Range<usize>>) -> Self {
        debug_assert!(ranges.windows(2).all(|w| w[0].end <= w[1].start));
        Self { ranges }
    }

    /// Scan `text` for line markers.
    ///
    /// `main_file` names the translation unit; when `None`, the file named by
    /// the first marker is taken as the main file. Text without markers has no
    /// included regions.
    #[must_use]
    pub fn scan(text: &str, main_file: Option<&str>) -> Self {
        let re = line_marker_re();
        let mut main = main_file.map(str::to_owned);
        let mut ranges: Vec<Range<usize>> = Vec::new();
        let mut open_start: Option<usize> = None;
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();

            let Some(caps) = re.captures(line) else {
                continue;
            };
            let file = &caps["file"];
            let main_name = main.get_or_insert_with(|| file.to_owned());
            let included = !same_file(file, main_name);

            match (open_start, included) {
                (None, true) => open_start = Some(line_start),
                (Some(start), false) => {
                    ranges.push(start..line_start);
                    open_start = None;
                }
                _ => {}
            }
        }

        if let Some(start) = open_start {
            ranges.push(start..text.len());
        }

        Self { ranges }
    }

    /// Whether the byte at `offset` lies in an included region.
    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        let idx = self.ranges.partition_point(|range| range.end <= offset);
        self.ranges
            .get(idx)
            .is_some_and(|range| range.start <= offset)
    }

    /// Whether no included regions were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The included ranges in source order.
    #[must_use]
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }
}

/// Compare marker file names, tolerating a directory prefix on either side.
fn same_file(marker: &str, main: &str) -> bool {
    if marker == main {
        return true;
    }
    let tail_matches = |long: &str, short: &str| {
        long.strip_suffix(short)
            .is_some_and(|prefix| prefix.ends_with('/') || prefix.ends_with('\\'))
    };
    tail_matches(marker, main) || tail_matches(main, marker)
}
