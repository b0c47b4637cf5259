use super::{Message, Viewer};
use crate::error;
use crate::lang::{Label, Statement};
use crate::mach::{Edit, Event, Runtime, INPUT_PROMPT};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Goal {
    Once,
    Depth(usize),
    Line(usize),
    Breakpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Paused,
    Running { goal: Goal, force: bool },
}

/// ## Stepping debugger
///
/// Wraps a `Runtime` and runs it one statement at a time between
/// commands. The program store, cursor and breakpoints are mirrored to
/// a `Viewer`.
///
/// While paused the cursor never rests on a `REM` line. Commands only
/// queue work; `execute` performs it and returns the same events as
/// `Runtime::execute`. `Event::Stopped` means paused or finished, tell
/// them apart with `is_active`.
pub struct Debugger<V: Viewer> {
    runtime: Runtime,
    viewer: V,
    breakpoints: BTreeSet<Label>,
    mode: Mode,
    active: bool,
}

impl<V: Viewer> Debugger<V> {
    pub fn new(runtime: Runtime, viewer: V) -> Debugger<V> {
        Debugger {
            runtime,
            viewer,
            breakpoints: BTreeSet::new(),
            mode: Mode::Paused,
            active: false,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    pub fn cursor(&self) -> usize {
        self.runtime.cursor()
    }

    pub fn breakpoints(&self) -> &BTreeSet<Label> {
        &self.breakpoints
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Waiting for a step or run command.
    pub fn is_paused(&self) -> bool {
        self.active && self.mode == Mode::Paused && !self.runtime.is_waiting_for_input()
    }

    /// Begins a session on the first statement with fresh memory.
    /// Returns false when there is nothing to debug.
    pub fn start(&mut self) -> bool {
        self.runtime.run();
        if !self.runtime.is_running() {
            return false;
        }
        self.active = true;
        self.mode = Mode::Paused;
        tracing::info!(lines = self.runtime.program().len(), "debug session started");
        self.skip_comments();
        match self.viewer.connect() {
            Ok(_) => self.send_all(self.full_state()),
            Err(error) => tracing::warn!(%error, "viewer unavailable"),
        }
        true
    }

    /// Aborts the session the way an interrupt aborts a run.
    pub fn stop(&mut self) {
        self.runtime.interrupt();
    }

    pub fn step_in(&mut self) {
        self.command(Goal::Once, true);
    }

    /// Steps, and finishes any subroutine the step enters.
    pub fn step_over(&mut self, force: bool) {
        let depth = self.runtime.call_depth();
        self.command(Goal::Depth(depth), force);
    }

    /// Runs until the current subroutine returns. Does nothing outside
    /// a subroutine.
    pub fn step_out(&mut self, force: bool) {
        match self.runtime.call_depth() {
            0 => {}
            depth => self.command(Goal::Depth(depth - 1), force),
        }
    }

    pub fn run_to_breakpoint(&mut self) {
        self.command(Goal::Breakpoint, false);
    }

    pub fn run_to_line(&mut self, index: usize, force: bool) {
        self.command(Goal::Line(index), force);
    }

    fn command(&mut self, goal: Goal, force: bool) {
        if self.is_paused() {
            self.mode = Mode::Running { goal, force };
        }
    }

    /// Sets the breakpoint if absent, otherwise clears it. Returns true
    /// when the breakpoint is now set.
    pub fn toggle_breakpoint(&mut self, label: Label) -> bool {
        let set = if self.breakpoints.remove(&label) {
            false
        } else {
            self.breakpoints.insert(label)
        };
        self.notify(vec![Message::Breakpoint(label)]);
        set
    }

    /// Answers INPUT, edits the program, or outside a session runs a
    /// direct statement.
    pub fn enter(&mut self, line: &str) -> bool {
        if self.runtime.is_waiting_for_input() {
            return self.runtime.enter(line);
        }
        let statement = match self.runtime.parse(line) {
            Some(statement) => statement,
            None => return false,
        };
        if statement.label.is_some() {
            self.edit(statement);
        } else if self.active {
            self.runtime.report(error!(IllegalDirect; "{}", statement));
            return false;
        } else {
            return self.runtime.accept(statement).is_some();
        }
        true
    }

    fn edit(&mut self, statement: Statement) {
        let edit = self.runtime.edit(statement);
        let program = self.runtime.program();
        let mut messages = match edit {
            Edit::Added(index) => match program.get(index) {
                Some(line) => vec![Message::Add(line.label(), line.statement().to_string())],
                None => vec![],
            },
            Edit::Updated(index) => match program.get(index) {
                Some(line) => vec![Message::Update(index, line.statement().to_string())],
                None => vec![],
            },
            Edit::Removed(index) => vec![Message::Remove(index)],
            Edit::Unchanged => return,
        };
        if self.active {
            self.skip_comments();
            messages.push(Message::Cursor(self.runtime.cursor()));
            self.notify(messages);
        }
    }

    pub fn execute(&mut self, cycles: usize) -> Event {
        if !self.active {
            return self.runtime.execute(cycles);
        }
        let mut cycles = cycles;
        loop {
            if let Some(event) = self.runtime.next_event() {
                return event;
            }
            if !self.runtime.is_active() {
                self.finish();
                return self.runtime.execute(cycles);
            }
            if self.runtime.is_waiting_for_input() {
                return Event::Input(INPUT_PROMPT.to_string());
            }
            let (goal, force) = match self.mode {
                Mode::Paused => return Event::Stopped,
                Mode::Running { goal, force } => (goal, force),
            };
            if cycles == 0 {
                return Event::Running;
            }
            cycles -= 1;
            self.runtime.step();
            if !self.runtime.is_running() {
                continue;
            }
            let reached = match goal {
                Goal::Once => true,
                Goal::Depth(depth) => self.runtime.call_depth() <= depth,
                Goal::Line(index) => self.runtime.cursor() == index,
                Goal::Breakpoint => false,
            };
            if reached || (!force && self.at_breakpoint()) {
                self.pause();
            }
        }
    }

    fn pause(&mut self) {
        self.mode = Mode::Paused;
        self.skip_comments();
        tracing::debug!(cursor = self.runtime.cursor(), "paused");
        self.notify(vec![Message::Cursor(self.runtime.cursor())]);
    }

    /// Ends the session and blanks the viewer.
    fn finish(&mut self) {
        self.active = false;
        self.mode = Mode::Paused;
        tracing::info!("debug session ended");
        match self.viewer.connect() {
            Ok(_) => self.send_all(vec![Message::Clear, Message::Print]),
            Err(error) => tracing::warn!(%error, "viewer unavailable"),
        }
    }

    fn at_breakpoint(&self) -> bool {
        match self.runtime.current_label() {
            Some(label) => self.breakpoints.contains(&label),
            None => false,
        }
    }

    fn skip_comments(&mut self) {
        while self.runtime.is_running() {
            let comment = match self.runtime.program().get(self.runtime.cursor()) {
                Some(line) => line.statement().is_comment(),
                None => false,
            };
            if !comment {
                break;
            }
            self.runtime.step();
        }
    }

    fn full_state(&self) -> Vec<Message> {
        let mut messages = vec![Message::Clear];
        for line in self.runtime.program().lines() {
            messages.push(Message::Add(line.label(), line.statement().to_string()));
        }
        for label in &self.breakpoints {
            messages.push(Message::Breakpoint(*label));
        }
        messages.push(Message::Cursor(self.runtime.cursor()));
        messages.push(Message::Print);
        messages
    }

    /// Sends an incremental update, or everything after a reconnect.
    fn notify(&mut self, mut messages: Vec<Message>) {
        match self.viewer.connect() {
            Ok(true) => self.send_all(self.full_state()),
            Ok(false) => {
                messages.push(Message::Print);
                self.send_all(messages);
            }
            Err(error) => tracing::warn!(%error, "viewer unavailable"),
        }
    }

    fn send_all(&mut self, messages: Vec<Message>) {
        for message in &messages {
            if let Err(error) = self.viewer.send(message) {
                tracing::warn!(%error, "viewer update failed");
                self.viewer.close();
                break;
            }
        }
    }
}
