use serde::Serialize;

use crate::config::ErrorMode;
use crate::encoder::Encoder;
use crate::error::{AssembleError, LineError};

/// One non-blank source line, split into mnemonic and operand text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub number: usize,
    pub raw: &'a str,
    pub mnemonic: &'a str,
    pub operands: &'a str,
}

/// Cut a line at the first `;` or `//`.
pub fn strip_comment(line: &str) -> &str {
    let cut = [line.find(';'), line.find("//")].into_iter().flatten().min();
    match cut {
        Some(p) => &line[..p],
        None => line,
    }
}

/// Strip comments and whitespace, then split on the first whitespace run.
/// `None` for lines that hold nothing to assemble.
pub fn split_line(number: usize, raw: &str) -> Option<SourceLine<'_>> {
    let s = strip_comment(raw).trim();
    if s.is_empty() {
        return None;
    }
    let (mnemonic, operands) = match s.split_once(char::is_whitespace) {
        Some((m, rest)) => (m, rest.trim_start()),
        None => (s, ""),
    };
    Some(SourceLine { number, raw, mnemonic, operands })
}

/// Every assemblable line of `text`, numbered from 1.
pub fn lines(text: &str) -> impl Iterator<Item = SourceLine<'_>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| split_line(i + 1, raw))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assembled {
    pub line: usize,
    pub source: String,
    pub word: u32,
}

/// Encoded words in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Program {
    pub items: Vec<Assembled>,
}

impl Program {
    pub fn words(&self) -> impl Iterator<Item = u32> + '_ {
        self.items.iter().map(|a| a.word)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Assemble a whole text. No partial program is returned on failure: in
/// `FailFast` mode the first bad line stops the run, in `Collect` mode every
/// bad line is reported.
pub fn assemble_source<E: Encoder>(
    text: &str,
    enc: &E,
    mode: ErrorMode,
) -> Result<Program, AssembleError> {
    let mut program = Program::default();
    let mut errors = Vec::new();
    for line in lines(text) {
        match enc.encode(line.mnemonic, line.operands) {
            Ok(word) => {
                tracing::debug!(
                    line = line.number,
                    word = format_args!("{word:#010x}"),
                    "encoded {}",
                    line.raw.trim()
                );
                program.items.push(Assembled {
                    line: line.number,
                    source: line.raw.to_string(),
                    word,
                });
            }
            Err(source) => {
                let err = LineError { line: line.number, text: line.raw.to_string(), source };
                tracing::debug!(%err, "line failed");
                errors.push(err);
                if mode == ErrorMode::FailFast {
                    break;
                }
            }
        }
    }
    if errors.is_empty() {
        Ok(program)
    } else {
        Err(AssembleError { errors })
    }
}
