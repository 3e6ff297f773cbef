//! Plain-text rendering of a [`ResultView`] for terminals.

use std::fmt;

use super::{DiffLine, ErrorPanel, PopulatedView, ResultRow, ResultView, RowBody};

const INDENT: &str = "    ";

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultView::Empty => Ok(()),
            ResultView::Error(panel) => write!(f, "{panel}"),
            ResultView::Populated(view) => write!(f, "{view}"),
        }
    }
}

impl fmt::Display for ErrorPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", Self::TITLE)?;
        writeln!(f, "{}", Self::HINT)
    }
}

impl fmt::Display for PopulatedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = &self.header;
        write!(f, "{}  {}", header.file, header.elapsed)?;
        if header.late {
            write!(f, "  [late]")?;
        }
        write!(f, "  [{}]", header.status)?;
        if let Some(grade) = &header.grade {
            write!(f, "  [grade {grade}]")?;
        }
        writeln!(
            f,
            "  passed {}/{}",
            header.tally.passed, header.tally.total
        )?;

        for row in &self.rows {
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ResultRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}", self.name)?;
        if let Some(time) = &self.time {
            write!(f, "  {time}")?;
        }
        writeln!(f, "  [{}]", self.status)?;

        match &self.body {
            RowBody::InProgress => writeln!(f, "{INDENT}... running"),
            RowBody::Output(output) => {
                for line in output.lines() {
                    writeln!(f, "{INDENT}{line}")?;
                }
                Ok(())
            }
            RowBody::Diff(spoiler) if !spoiler.is_revealed() => {
                writeln!(f, "{INDENT}> output differs from expected (hidden)")
            }
            RowBody::Diff(spoiler) => {
                for line in spoiler.lines() {
                    match line {
                        DiffLine::Same(text) => writeln!(f, "{INDENT}  {text}")?,
                        DiffLine::Expected(text) => writeln!(f, "{INDENT}- {text}")?,
                        DiffLine::Actual(text) => writeln!(f, "{INDENT}+ {text}")?,
                    }
                }
                Ok(())
            }
        }
    }
}
