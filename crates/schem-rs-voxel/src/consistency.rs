//! Line-by-line comparison of an original semantic record against one
//! reconstructed from a dense grid.

use std::fmt;

/// One line that did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineDiff {
    Mismatch {
        line: usize,
        original: String,
        reconstructed: String,
    },
    /// The original has a line the reconstruction lacks.
    MissingReconstructed { line: usize, original: String },
    /// The reconstruction has a line the original lacks.
    MissingOriginal { line: usize, reconstructed: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub matched: usize,
    pub original_lines: usize,
    pub reconstructed_lines: usize,
    pub diffs: Vec<LineDiff>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.diffs.is_empty()
    }

    pub fn mismatched(&self) -> usize {
        self.diffs
            .iter()
            .filter(|d| matches!(d, LineDiff::Mismatch { .. }))
            .count()
    }
}

/// Compare positionally; line numbers in the report are 1-based.
pub fn compare<A, B>(original: &[A], reconstructed: &[B]) -> ConsistencyReport
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut report = ConsistencyReport {
        original_lines: original.len(),
        reconstructed_lines: reconstructed.len(),
        ..Default::default()
    };
    for i in 0..original.len().max(reconstructed.len()) {
        let line = i + 1;
        match (original.get(i), reconstructed.get(i)) {
            (Some(a), Some(b)) if a.as_ref() == b.as_ref() => report.matched += 1,
            (Some(a), Some(b)) => report.diffs.push(LineDiff::Mismatch {
                line,
                original: a.as_ref().to_string(),
                reconstructed: b.as_ref().to_string(),
            }),
            (Some(a), None) => report.diffs.push(LineDiff::MissingReconstructed {
                line,
                original: a.as_ref().to_string(),
            }),
            (None, Some(b)) => report.diffs.push(LineDiff::MissingOriginal {
                line,
                reconstructed: b.as_ref().to_string(),
            }),
            (None, None) => {}
        }
    }
    report
}

impl fmt::Display for LineDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineDiff::Mismatch {
                line,
                original,
                reconstructed,
            } => write!(f, "line {line}: original {original} != reconstructed {reconstructed}"),
            LineDiff::MissingReconstructed { line, original } => {
                write!(f, "line {line}: original {original} has no reconstructed line")
            }
            LineDiff::MissingOriginal {
                line,
                reconstructed,
            } => write!(f, "line {line}: reconstructed {reconstructed} has no original line"),
        }
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "original lines: {}, reconstructed lines: {}, matched: {}, mismatched: {}",
            self.original_lines,
            self.reconstructed_lines,
            self.matched,
            self.mismatched()
        )?;
        if self.is_consistent() {
            writeln!(f, "consistent")?;
        }
        for diff in &self.diffs {
            writeln!(f, "{diff}")?;
        }
        Ok(())
    }
}
