use super::{Edit, Evaluator, Memory, Program, Stack};
use crate::error;
use crate::lang::{
    lex, parse_expression_list, parse_str, Error, ErrorCode, Label, Statement, StatementKind,
    Token,
};
use std::collections::VecDeque;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

pub const INPUT_PROMPT: &str = "? ";

/// What the runtime needs from its driver next.
#[derive(Debug, PartialEq)]
pub enum Event {
    Stopped,
    Running,
    Print(String),
    List(String),
    Input(String),
    Error(Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Stopped,
    Running,
    Input,
}

/// Where a RETURN resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Line(usize),
    Direct,
}

enum Flow {
    Next,
    Jump(usize),
    End,
    Run,
    Wait,
}

/// ## Execution environment
///
/// Owns the program store, memory, call stack and input queue. Drive it
/// with `enter` and `execute`; nothing here blocks on I/O.
pub struct Runtime {
    program: Program,
    memory: Memory,
    evaluator: Evaluator,
    calls: Stack<Frame>,
    inputs: VecDeque<i16>,
    input_progress: usize,
    cursor: usize,
    direct: Option<Rc<Statement>>,
    state: State,
    events: VecDeque<Event>,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::with_evaluator(Evaluator::default())
    }
}

impl Runtime {
    pub fn new() -> Runtime {
        Runtime::default()
    }

    pub fn with_evaluator(evaluator: Evaluator) -> Runtime {
        Runtime {
            program: Program::new(),
            memory: Memory::new(),
            evaluator,
            calls: Stack::new("TOO MANY NESTED GOSUBS", ErrorCode::ReturnWithoutGosub),
            inputs: VecDeque::new(),
            input_progress: 0,
            cursor: 0,
            direct: None,
            state: State::Stopped,
            events: VecDeque::new(),
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Slot index of the statement about to execute.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    pub fn call_depth(&self) -> usize {
        self.calls.len()
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn is_waiting_for_input(&self) -> bool {
        self.state == State::Input
    }

    /// Running or suspended in INPUT.
    pub fn is_active(&self) -> bool {
        self.state != State::Stopped
    }

    pub fn next_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// Accepts one line from the driver. Answers a pending INPUT, edits
    /// the program for labeled lines, or queues a direct statement.
    /// Returns false if the line was rejected.
    pub fn enter(&mut self, s: &str) -> bool {
        if self.state == State::Input {
            self.answer(s);
            return true;
        }
        match self.parse(s) {
            Some(statement) => self.accept(statement).is_some(),
            None => false,
        }
    }

    /// Parses one typed line, reporting a syntax error as an event.
    pub fn parse(&mut self, s: &str) -> Option<Statement> {
        match parse_str(s) {
            Ok(statement) => Some(statement),
            Err(error) => {
                self.report(error);
                None
            }
        }
    }

    pub fn report(&mut self, error: Error) {
        self.events.push_back(Event::Error(error));
    }

    /// Stores a labeled line or queues a direct statement. A direct
    /// statement is refused while anything is still running.
    pub fn accept(&mut self, statement: Statement) -> Option<Edit> {
        if statement.label.is_some() {
            return Some(self.edit(statement));
        }
        if statement.kind != StatementKind::Newline {
            if self.is_active() {
                self.report(error!(IllegalDirect; "{}", statement));
                return None;
            }
            self.direct = Some(Rc::new(statement));
            self.state = State::Running;
        }
        Some(Edit::Unchanged)
    }

    /// Inserts, replaces or deletes a labeled line. The cursor keeps
    /// designating the same statement and a RETURN still resumes after
    /// its GOSUB.
    pub fn edit(&mut self, statement: Statement) -> Edit {
        let edit = self.program.enter(statement);
        self.cursor = shift(self.cursor, edit);
        for frame in self.calls.iter_mut() {
            if let Frame::Line(resume) = frame {
                *resume = match edit {
                    Edit::Added(i) if i < *resume => *resume + 1,
                    Edit::Removed(i) if i < *resume => *resume - 1,
                    _ => *resume,
                };
            }
        }
        tracing::debug!(?edit, "program edited");
        edit
    }

    /// Replaces the program with file text. Stops anything running.
    pub fn load(&mut self, source: &str) -> Result<()> {
        let program = Program::load(source)?;
        self.program = program;
        self.reset();
        self.direct = None;
        self.cursor = 0;
        self.state = State::Stopped;
        Ok(())
    }

    /// Starts program mode from the first slot with fresh memory.
    pub fn run(&mut self) {
        self.reset();
        self.direct = None;
        self.cursor = 0;
        self.state = if self.program.is_empty() {
            State::Stopped
        } else {
            State::Running
        };
        tracing::debug!(lines = self.program.len(), "run");
    }

    pub fn interrupt(&mut self) {
        if self.state != State::Stopped {
            let label = self.current_label();
            self.fail(error!(Break).in_label(label));
        }
    }

    pub fn execute(&mut self, cycles: usize) -> Event {
        let mut cycles = cycles;
        loop {
            if let Some(event) = self.events.pop_front() {
                return event;
            }
            match self.state {
                State::Stopped => return Event::Stopped,
                State::Input => return Event::Input(INPUT_PROMPT.to_string()),
                State::Running => {
                    if cycles == 0 {
                        return Event::Running;
                    }
                    cycles -= 1;
                    self.step();
                }
            }
        }
    }

    /// Executes exactly one statement.
    pub fn step(&mut self) {
        if self.state != State::Running {
            return;
        }
        let statement = match self.current() {
            Some(statement) => statement,
            None => {
                let label = self.program.lines().last().map(|l| l.label());
                return self.fail(error!(MissingEnd).in_label(label));
            }
        };
        tracing::trace!(label = ?statement.label, "{}", statement);
        match self.statement(&statement) {
            Ok(flow) => self.advance(flow, statement.label),
            Err(error) => self.fail(error.in_label(statement.label)),
        }
    }

    pub fn current_label(&self) -> Option<Label> {
        match &self.direct {
            Some(_) => None,
            None => self.program.get(self.cursor).map(|l| l.label()),
        }
    }

    fn current(&self) -> Option<Rc<Statement>> {
        match &self.direct {
            Some(statement) => Some(statement.clone()),
            None => self
                .program
                .get(self.cursor)
                .map(|l| l.statement().clone()),
        }
    }

    fn advance(&mut self, flow: Flow, label: Option<Label>) {
        match flow {
            Flow::Next => {
                if self.direct.take().is_some() {
                    self.state = State::Stopped;
                    return;
                }
                self.cursor += 1;
            }
            Flow::Jump(index) => {
                self.direct = None;
                self.cursor = index;
            }
            Flow::End => {
                self.direct = None;
                self.state = State::Stopped;
                return;
            }
            Flow::Run => return self.run(),
            Flow::Wait => {
                self.state = State::Input;
                return;
            }
        }
        if self.cursor >= self.program.len() {
            self.fail(error!(MissingEnd).in_label(label));
        }
    }

    fn fail(&mut self, error: Error) {
        tracing::debug!(%error, "run aborted");
        self.events.push_back(Event::Error(error));
        self.direct = None;
        self.input_progress = 0;
        self.state = State::Stopped;
    }

    fn reset(&mut self) {
        self.memory.clear();
        self.calls.clear();
        self.inputs.clear();
        self.input_progress = 0;
    }

    fn statement(&mut self, s: &Statement) -> Result<Flow> {
        use StatementKind::*;
        match s.kind {
            Let => match s.args.as_slice() {
                [var, expr] => {
                    let value = self.evaluator.evaluate(expr, &self.memory)?;
                    self.memory.store(variable(var)?, value)?;
                    Ok(Flow::Next)
                }
                _ => Err(malformed(s)),
            },
            Print => {
                let mut line = String::new();
                for arg in &s.args {
                    match arg {
                        Token::QuotedString(text) => line.push_str(text),
                        expr => {
                            let value = self.evaluator.evaluate(expr, &self.memory)?;
                            line.push_str(&value.to_string());
                        }
                    }
                }
                line.push('\n');
                self.events.push_back(Event::Print(line));
                Ok(Flow::Next)
            }
            Input => self.input(s),
            If => match s.args.as_slice() {
                [lhs, Token::Operator(op), rhs, Token::Statement(then)] => {
                    let lhs = self.evaluator.evaluate(lhs, &self.memory)?;
                    let rhs = self.evaluator.evaluate(rhs, &self.memory)?;
                    if op.compare(lhs, rhs) {
                        self.statement(then)
                    } else {
                        Ok(Flow::Next)
                    }
                }
                _ => Err(malformed(s)),
            },
            Goto => Ok(Flow::Jump(self.target(s)?)),
            Gosub => {
                let index = self.target(s)?;
                let frame = match self.direct {
                    Some(_) => Frame::Direct,
                    None => Frame::Line(self.cursor + 1),
                };
                self.calls.push(frame)?;
                Ok(Flow::Jump(index))
            }
            Return => match self.calls.pop()? {
                Frame::Line(resume) => Ok(Flow::Jump(resume)),
                Frame::Direct => Ok(Flow::End),
            },
            Clear => {
                self.reset();
                self.program.clear();
                Ok(Flow::End)
            }
            List => {
                for line in self.program.lines() {
                    self.events.push_back(Event::List(line.to_string()));
                }
                Ok(Flow::Next)
            }
            Run => Ok(Flow::Run),
            End => Ok(Flow::End),
            Rem | Newline => Ok(Flow::Next),
        }
    }

    fn input(&mut self, s: &Statement) -> Result<Flow> {
        while let Some(var) = s.args.get(self.input_progress) {
            let value = match self.inputs.pop_front() {
                Some(value) => value,
                None => return Ok(Flow::Wait),
            };
            self.memory.store(variable(var)?, value)?;
            self.input_progress += 1;
        }
        self.input_progress = 0;
        Ok(Flow::Next)
    }

    fn answer(&mut self, s: &str) {
        match self.parse_input(s) {
            Ok(values) => {
                self.inputs.extend(values);
                self.state = State::Running;
            }
            Err(error) => {
                let label = self.current_label();
                self.fail(error.in_label(label));
            }
        }
    }

    fn parse_input(&mut self, s: &str) -> Result<Vec<i16>> {
        let exprs = match lex(s).and_then(|tokens| parse_expression_list(&tokens)) {
            Ok(exprs) => exprs,
            Err(e) => {
                tracing::debug!(error = %e, "rejected input");
                return Err(error!(MalformedInput; "{}", s.trim()));
            }
        };
        let mut values = Vec::with_capacity(exprs.len());
        for expr in &exprs {
            values.push(self.evaluator.evaluate(expr, &self.memory)?);
        }
        Ok(values)
    }

    fn target(&mut self, s: &Statement) -> Result<usize> {
        let label = match s.args.as_slice() {
            [expr] => self.evaluator.evaluate(expr, &self.memory)?,
            _ => return Err(malformed(s)),
        };
        self.program
            .target(label)
            .ok_or_else(|| error!(UndefinedLabel; "{}", label))
    }
}

fn shift(index: usize, edit: Edit) -> usize {
    match edit {
        Edit::Added(i) if i <= index => index + 1,
        Edit::Removed(i) if i <= index => index.saturating_sub(1),
        _ => index,
    }
}

fn variable(token: &Token) -> Result<char> {
    token
        .variable()
        .ok_or_else(|| error!(InvalidVariable; "{}", token))
}

fn malformed(s: &Statement) -> Error {
    error!(InternalError; "malformed {} statement", s.kind)
}
