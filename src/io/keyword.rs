//! Keyword-delimited section scanning.
//!
//! A `.mail` file is a sequence of blocks, each opened by a line containing a
//! start keyword (`COOR_3D`, `QUAD4`, ...) and closed by a line containing the
//! end keyword (`FINSF`). [`extract_between`] yields the lines of such a block
//! lazily, one line at a time, without any lookahead.
//!
//! # Example
//!
//! ```
//! use mailmesh::io::keyword::{extract_between, SectionMode};
//! use mailmesh::io::TextSource;
//!
//! let source = TextSource::new("COOR_3D\n N1 0.0 0.0 0.0\nFINSF\n");
//! let lines: Vec<String> = extract_between(&source, "COOR_3D", "FINSF", SectionMode::FirstSection)
//!     .unwrap()
//!     .map(|line| line.unwrap().text)
//!     .collect();
//! assert_eq!(lines, vec!["N1 0.0 0.0 0.0"]);
//! ```

use std::io::BufRead;

use super::source::LineSource;
use crate::error::Result;

/// How many start/end pairs a single scan captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionMode {
    /// Capture the lines between the first start marker and the next end
    /// marker, then stop reading.
    #[default]
    FirstSection,
    /// Re-arm after every end marker and capture each start/end pair of the
    /// source.
    EverySection,
}

/// One captured line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLine {
    /// 1-based line number in the source.
    pub number: usize,
    /// The line with surrounding whitespace removed.
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Seeking,
    Capturing,
    Done,
}

/// Lazy iterator over the lines of a keyword-delimited section.
///
/// Owns the reader it scans; the underlying file is closed when the iterator
/// is dropped.
pub struct SectionLines<'a> {
    reader: Box<dyn BufRead + 'a>,
    start: String,
    end: String,
    mode: SectionMode,
    state: ScanState,
    line_number: usize,
    buf: Vec<u8>,
}

impl<'a> SectionLines<'a> {
    fn new(reader: Box<dyn BufRead + 'a>, start: &str, end: &str, mode: SectionMode) -> Self {
        Self {
            reader,
            start: start.to_string(),
            end: end.to_string(),
            mode,
            state: ScanState::Seeking,
            line_number: 0,
            buf: Vec::new(),
        }
    }

    /// Read the next raw line, or `None` at end of input.
    fn next_raw(&mut self) -> Option<std::io::Result<String>> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                let mut line = String::from_utf8_lossy(&self.buf).into_owned();
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Some(Ok(line))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl Iterator for SectionLines<'_> {
    type Item = Result<SectionLine>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.state != ScanState::Done {
            let line = match self.next_raw()? {
                Ok(line) => line,
                Err(e) => {
                    self.state = ScanState::Done;
                    return Some(Err(e.into()));
                }
            };

            match self.state {
                ScanState::Seeking => {
                    if line.contains(&self.start) {
                        self.state = ScanState::Capturing;
                    }
                }
                ScanState::Capturing => {
                    if line.contains(&self.start) {
                        // Header lines are never data.
                        continue;
                    }
                    if line.contains(&self.end) {
                        self.state = match self.mode {
                            SectionMode::FirstSection => ScanState::Done,
                            SectionMode::EverySection => ScanState::Seeking,
                        };
                        continue;
                    }
                    return Some(Ok(SectionLine {
                        number: self.line_number,
                        text: line.trim().to_string(),
                    }));
                }
                ScanState::Done => {}
            }
        }
        None
    }
}

/// Scan `source` from its first line and yield the trimmed lines between the
/// first line containing `start` and the next line containing `end`.
///
/// An absent start marker gives an empty sequence. A missing end marker after
/// the start yields every remaining line. With [`SectionMode::EverySection`]
/// later start/end pairs are captured as well.
pub fn extract_between<'a, S: LineSource + ?Sized>(
    source: &'a S,
    start: &str,
    end: &str,
    mode: SectionMode,
) -> Result<SectionLines<'a>> {
    let reader = source.open()?;
    Ok(SectionLines::new(reader, start, end, mode))
}

/// Return every trimmed line of `source` that contains one of `markers`, in
/// file order, paired with the index of the first marker it contains.
pub fn marked_lines<S, M>(source: &S, markers: &[M]) -> Result<Vec<(usize, String)>>
where
    S: LineSource + ?Sized,
    M: AsRef<str>,
{
    let mut reader = source.open()?;
    let mut buf = Vec::new();
    let mut found = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(index) = markers.iter().position(|m| line.contains(m.as_ref())) {
            found.push((index, line.trim().to_string()));
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::source::TextSource;

    fn capture(text: &str, start: &str, end: &str, mode: SectionMode) -> Vec<String> {
        let source = TextSource::new(text);
        extract_between(&source, start, end, mode)
            .unwrap()
            .map(|l| l.unwrap().text)
            .collect()
    }

    #[test]
    fn test_basic_section() {
        let text = "TITRE\nCOOR_3D\n  N1 0 0 0  \n N2 1 0 0\nFINSF\nQUAD4\n M1 N1 N2 N3 N4\nFINSF\n";
        assert_eq!(
            capture(text, "COOR_3D", "FINSF", SectionMode::FirstSection),
            vec!["N1 0 0 0", "N2 1 0 0"]
        );
        assert_eq!(
            capture(text, "QUAD4", "FINSF", SectionMode::FirstSection),
            vec!["M1 N1 N2 N3 N4"]
        );
    }

    #[test]
    fn test_missing_start_is_empty() {
        let text = "COOR_3D\nN1 0 0 0\nFINSF\n";
        assert!(capture(text, "TRIA3", "FINSF", SectionMode::FirstSection).is_empty());
    }

    #[test]
    fn test_missing_end_yields_rest() {
        let text = "SEG2\nM1 N1 N2\nM2 N2 N3\n";
        assert_eq!(
            capture(text, "SEG2", "FINSF", SectionMode::FirstSection),
            vec!["M1 N1 N2", "M2 N2 N3"]
        );
    }

    #[test]
    fn test_only_first_section_by_default() {
        let text = "SEG2\nM1 N1 N2\nFINSF\nSEG2\nM2 N2 N3\nFINSF\n";
        assert_eq!(
            capture(text, "SEG2", "FINSF", SectionMode::FirstSection),
            vec!["M1 N1 N2"]
        );
        assert_eq!(
            capture(text, "SEG2", "FINSF", SectionMode::EverySection),
            vec!["M1 N1 N2", "M2 N2 N3"]
        );
    }

    #[test]
    fn test_line_numbers_and_crlf() {
        let source = TextSource::new("header\r\nTRIA3\r\n M1 N1 N2 N3 \r\nFINSF\r\n");
        let lines: Vec<SectionLine> = extract_between(&source, "TRIA3", "FINSF", SectionMode::FirstSection)
            .unwrap()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(
            lines,
            vec![SectionLine {
                number: 3,
                text: "M1 N1 N2 N3".to_string()
            }]
        );
    }

    #[test]
    fn test_case_sensitive() {
        let text = "coor_3d\nN1 0 0 0\nFINSF\n";
        assert!(capture(text, "COOR_3D", "FINSF", SectionMode::FirstSection).is_empty());
    }

    #[test]
    fn test_repeated_start_line_skipped() {
        let text = "QUAD4\nQUAD4\nM1 N1 N2 N3 N4\nFINSF\n";
        assert_eq!(
            capture(text, "QUAD4", "FINSF", SectionMode::FirstSection),
            vec!["M1 N1 N2 N3 N4"]
        );
    }

    #[test]
    fn test_each_call_rescans() {
        let source = TextSource::new("COOR_3D\nN1 0 0 0\nFINSF\n");
        for _ in 0..3 {
            let count = extract_between(&source, "COOR_3D", "FINSF", SectionMode::FirstSection)
                .unwrap()
                .count();
            assert_eq!(count, 1);
        }
    }

    #[test]
    fn test_marked_lines() {
        let source = TextSource::new("GROUP_MA NOM=TOP\n M1\nFINSF\n GROUP_MA NOM=BOTTOM \n M2\nFINSF\n");
        assert_eq!(
            marked_lines(&source, &["GROUP_MA"]).unwrap(),
            vec![(0, "GROUP_MA NOM=TOP".to_string()), (0, "GROUP_MA NOM=BOTTOM".to_string())]
        );
    }

    #[test]
    fn test_marked_lines_keeps_file_order_across_markers() {
        let source = TextSource::new("GROUP_NO NOM=A\n N1\nFINSF\nGROUP_MA NOM=B\n M1\nFINSF\n");
        assert_eq!(
            marked_lines(&source, &["GROUP_MA", "GROUP_NO"]).unwrap(),
            vec![(1, "GROUP_NO NOM=A".to_string()), (0, "GROUP_MA NOM=B".to_string())]
        );
    }
}
