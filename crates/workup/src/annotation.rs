//! Extraction of the text enclosed in parentheses, e.g. the `+15.99` of
//! `M(+15.99)`.
//!
//! Lines are split on every `(` and `)`. Numbering the resulting fields from
//! one, fields 2, 4, 6... are kept as long as they are not the final field:
//! that keeps whatever sits between an opening and a closing bracket and
//! drops residues as well as an unterminated trailing group.

use std::io::{BufRead, Write};

use serde::Serialize;

use crate::Error;

fn is_bracket(c: char) -> bool {
    c == '(' || c == ')'
}

/// Iterate over the enclosed groups of a single line
pub fn groups(line: &str) -> impl Iterator<Item = &str> {
    let fields = match line.is_empty() {
        true => Vec::new(),
        false => line.split(is_bracket).collect::<Vec<_>>(),
    };
    let last = fields.len().saturating_sub(1);
    fields
        .into_iter()
        .enumerate()
        .filter(move |(ix, _)| ix % 2 == 1 && *ix < last)
        .map(|(_, field)| field)
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StripSummary {
    pub lines: usize,
    pub groups: usize,
}

/// Write every enclosed group of every input line to `wtr`, one per line.
/// Groups of a CRLF line are written with CRLF.
pub fn strip<R: BufRead, W: Write>(rdr: R, mut wtr: W) -> Result<StripSummary, Error> {
    let mut summary = StripSummary::default();
    crate::for_each_line(rdr, |line, terminator| {
        summary.lines += 1;
        let terminator = match terminator {
            "" => "\n",
            t => t,
        };
        for group in groups(line) {
            wtr.write_all(group.as_bytes())?;
            wtr.write_all(terminator.as_bytes())?;
            summary.groups += 1;
        }
        Ok(())
    })?;
    wtr.flush()?;
    Ok(summary)
}
