use crate::error;
use crate::lang::{parse_str, Error, Label, Statement, StatementKind, MAX_LABEL};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// A stored statement and the label it lives at.
#[derive(Debug, Clone)]
pub struct Line {
    label: Label,
    user: bool,
    statement: Rc<Statement>,
}

impl Line {
    pub fn label(&self) -> Label {
        self.label
    }

    /// Auto-numbered lines from a file load are not jump targets.
    pub fn is_user_labeled(&self) -> bool {
        self.user
    }

    pub fn statement(&self) -> &Rc<Statement> {
        &self.statement
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.label, self.statement)
    }
}

/// What a store mutation did, by slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Added(usize),
    Updated(usize),
    Removed(usize),
    Unchanged,
}

/// ## Program store
///
/// Lines ordered by label. Slot order is execution order.

#[derive(Debug, Default, Clone)]
pub struct Program {
    lines: Vec<Line>,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn lines(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    pub fn index_of(&self, label: Label) -> Option<usize> {
        self.lines.binary_search_by_key(&label, |l| l.label).ok()
    }

    /// Slot index for a GOTO or GOSUB to `label`.
    pub fn target(&self, label: i16) -> Option<usize> {
        if label < 1 {
            return None;
        }
        let index = self.index_of(label as Label)?;
        if self.lines[index].user {
            Some(index)
        } else {
            None
        }
    }

    /// Applies a labeled line typed by the user. A bare label deletes.
    pub fn enter(&mut self, statement: Statement) -> Edit {
        let label = match statement.label {
            Some(label) => label,
            None => return Edit::Unchanged,
        };
        if statement.kind == StatementKind::Newline {
            self.remove(label)
        } else {
            self.insert(label, statement, true)
        }
    }

    pub fn insert(&mut self, label: Label, statement: Statement, user: bool) -> Edit {
        let line = Line {
            label,
            user,
            statement: Rc::new(statement.with_label(Some(label))),
        };
        match self.lines.binary_search_by_key(&label, |l| l.label) {
            Ok(index) => {
                if !user && self.lines[index].user {
                    tracing::warn!(label, "auto-numbered line collides with a user label, dropped");
                    return Edit::Unchanged;
                }
                self.lines[index] = line;
                Edit::Updated(index)
            }
            Err(index) => {
                self.lines.insert(index, line);
                Edit::Added(index)
            }
        }
    }

    pub fn remove(&mut self, label: Label) -> Edit {
        match self.index_of(label) {
            Some(index) => {
                self.lines.remove(index);
                Edit::Removed(index)
            }
            None => Edit::Unchanged,
        }
    }

    /// Builds a program from file text. Unlabeled lines are numbered
    /// from the previous label plus one. Blank lines are skipped and the
    /// first syntax error aborts the load.
    pub fn load(source: &str) -> Result<Program> {
        let mut program = Program::new();
        let mut prev: u32 = 0;
        for text in source.lines() {
            let next = (prev + 1).min(MAX_LABEL as u32) as Label;
            let statement =
                parse_str(text).map_err(|e| e.in_label(leading_label(text).unwrap_or(next)))?;
            match statement.label {
                Some(label) => {
                    prev = label as u32;
                    program.enter(statement);
                }
                None => {
                    if statement.kind == StatementKind::Newline {
                        continue;
                    }
                    if prev >= MAX_LABEL as u32 {
                        return Err(error!(InvalidLabel, next; "no label left after {}", prev));
                    }
                    prev += 1;
                    program.insert(prev as Label, statement, false);
                }
            }
        }
        tracing::debug!(lines = program.len(), "program loaded");
        Ok(program)
    }
}

/// The number a line starts with, when it is a usable label.
fn leading_label(text: &str) -> Option<Label> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<Label>() {
        Ok(label) if label >= 1 && label <= MAX_LABEL => Some(label),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    fn labels(p: &Program) -> Vec<(Label, bool)> {
        p.lines().map(|l| (l.label(), l.is_user_labeled())).collect()
    }

    #[test]
    fn test_enter_orders_by_label() {
        let mut p = Program::new();
        assert_eq!(p.enter(parse_str("20 END").unwrap()), Edit::Added(0));
        assert_eq!(p.enter(parse_str("10 PRINT 1").unwrap()), Edit::Added(0));
        assert_eq!(p.enter(parse_str("15 PRINT 2").unwrap()), Edit::Added(1));
        assert_eq!(p.enter(parse_str("15 PRINT 3").unwrap()), Edit::Updated(1));
        assert_eq!(p.enter(parse_str("10").unwrap()), Edit::Removed(0));
        assert_eq!(p.enter(parse_str("99").unwrap()), Edit::Unchanged);
        assert_eq!(labels(&p), [(15, true), (20, true)]);
        assert_eq!(p.get(0).unwrap().to_string(), "15 PRINT 3");
    }

    #[test]
    fn test_load_auto_numbers() {
        let p = Program::load("PRINT 1\n10 PRINT 2\nPRINT 3\n\nEND\n").unwrap();
        assert_eq!(labels(&p), [(1, false), (10, true), (11, false), (12, false)]);
        assert_eq!(p.target(10), Some(1));
        assert_eq!(p.target(11), None);
        assert_eq!(p.target(0), None);
        assert_eq!(p.target(-10), None);
        assert_eq!(p.get(2).unwrap().statement().label, Some(11));
    }

    #[test]
    fn test_user_label_overwrites_auto_slot() {
        let p = Program::load("10 PRINT 1\nPRINT 2\n11 PRINT 3\n").unwrap();
        assert_eq!(labels(&p), [(10, true), (11, true)]);
        assert_eq!(p.get(1).unwrap().to_string(), "11 PRINT 3");
    }

    #[test]
    fn test_auto_slot_does_not_overwrite_user_label() {
        let p = Program::load("11 PRINT 3\n10 PRINT 1\nPRINT 2\n").unwrap();
        assert_eq!(labels(&p), [(10, true), (11, true)]);
        assert_eq!(p.get(1).unwrap().to_string(), "11 PRINT 3");
    }

    #[test]
    fn test_load_aborts_on_syntax_error() {
        let e = Program::load("10 PRINT 1\nLET X\n30 END\n").unwrap_err();
        assert_eq!(e.code(), ErrorCode::UnexpectedToken);
        assert_eq!(e.label(), Some(11));
        let e = Program::load("10 PRINT 1\n20 PRINT \"OOPS\n").unwrap_err();
        assert_eq!(e.code(), ErrorCode::UnmatchedQuotation);
        assert_eq!(e.label(), Some(20));
    }

    #[test]
    fn test_load_runs_out_of_labels() {
        let e = Program::load("32767 PRINT 1\nPRINT 2\n").unwrap_err();
        assert_eq!(e.code(), ErrorCode::InvalidLabel);
    }
}
