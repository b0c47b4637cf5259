extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use crate::Cli;
use ansi_term::Style;
use linefeed::{DefaultTerminal, Interface, ReadResult, Signal};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tinybasic::debug::{Debugger, NullViewer, ProcessViewer, Viewer};
use tinybasic::lang::Error;
use tinybasic::mach::{Evaluator, Event, Runtime};

const CYCLES: usize = 5000;

const DEBUG_HELP: &str = "\
s            step into
n[!]         step over, ! ignores breakpoints
o[!]         step out of the current subroutine
c            run to the next breakpoint
u[!] INDEX   run until the line at slot INDEX
b LABEL      toggle a breakpoint
l            list the program
v            show variables
q            stop the program
LABEL ...    edit a line";

pub fn main(cli: Cli) -> io::Result<()> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        tracing::warn!(%error, "Ctrl-C handler not installed");
    }

    let evaluator = match cli.seed {
        Some(seed) => Evaluator::seeded(seed),
        None => Evaluator::default(),
    };
    let mut runtime = Runtime::with_evaluator(evaluator);
    let term = Term::new(interrupted)?;

    let path = match &cli.file {
        Some(path) => path,
        None => return repl(&mut runtime, &term),
    };
    let source = std::fs::read_to_string(path)?;
    if let Err(error) = runtime.load(&source) {
        return term.error(&error);
    }
    if !cli.debug {
        runtime.run();
        drive(&mut runtime, &term)?;
        return Ok(());
    }
    let viewer: Box<dyn Viewer> = match cli.viewer {
        Some(program) => Box::new(ProcessViewer::new(program)),
        None => Box::new(NullViewer),
    };
    debug(Debugger::new(runtime, viewer), &term)
}

struct Term {
    command: Interface<DefaultTerminal>,
    input: Interface<DefaultTerminal>,
    interrupted: Arc<AtomicBool>,
}

impl Term {
    fn new(interrupted: Arc<AtomicBool>) -> io::Result<Term> {
        let command = Interface::new("TinyBasic")?;
        command.set_prompt("> ")?;
        let input = Interface::new("Input")?;
        input.set_report_signal(Signal::Interrupt, true);
        Ok(Term {
            command,
            input,
            interrupted,
        })
    }

    fn take_interrupt(&self) -> bool {
        self.interrupted.swap(false, Ordering::SeqCst)
    }

    fn error(&self, error: &Error) -> io::Result<()> {
        self.command.write_fmt(format_args!(
            "{}\n",
            Style::new().bold().paint(error.to_string())
        ))
    }
}

/// What the terminal can drive.
trait Machine {
    fn execute(&mut self, cycles: usize) -> Event;
    fn enter(&mut self, line: &str) -> bool;
    fn interrupt(&mut self);
}

impl Machine for Runtime {
    fn execute(&mut self, cycles: usize) -> Event {
        Runtime::execute(self, cycles)
    }
    fn enter(&mut self, line: &str) -> bool {
        Runtime::enter(self, line)
    }
    fn interrupt(&mut self) {
        Runtime::interrupt(self)
    }
}

impl<V: Viewer> Machine for Debugger<V> {
    fn execute(&mut self, cycles: usize) -> Event {
        Debugger::execute(self, cycles)
    }
    fn enter(&mut self, line: &str) -> bool {
        Debugger::enter(self, line)
    }
    fn interrupt(&mut self) {
        self.stop()
    }
}

enum Outcome {
    Stopped,
    Quit,
}

/// Runs the machine until it wants a command line.
fn drive<M: Machine>(machine: &mut M, term: &Term) -> io::Result<Outcome> {
    loop {
        if term.take_interrupt() {
            machine.interrupt();
        }
        match machine.execute(CYCLES) {
            Event::Stopped => return Ok(Outcome::Stopped),
            Event::Running => {}
            Event::Print(s) => term.command.write_fmt(format_args!("{}", s))?,
            Event::List(s) => term.command.write_fmt(format_args!("{}\n", s))?,
            Event::Error(error) => term.error(&error)?,
            Event::Input(prompt) => {
                term.input.set_prompt(&prompt)?;
                match term.input.read_line()? {
                    ReadResult::Input(string) => {
                        if machine.enter(&string) {
                            term.input.add_history_unique(string);
                        }
                    }
                    ReadResult::Signal(Signal::Interrupt) => {
                        term.input.set_buffer("")?;
                        term.input.lock_reader().cancel_read_line()?;
                        machine.interrupt();
                    }
                    ReadResult::Signal(_) | ReadResult::Eof => return Ok(Outcome::Quit),
                }
            }
        }
    }
}

fn repl(runtime: &mut Runtime, term: &Term) -> io::Result<()> {
    loop {
        if let Outcome::Quit = drive(runtime, term)? {
            return Ok(());
        }
        let string = match term.command.read_line()? {
            ReadResult::Input(string) => string,
            ReadResult::Signal(_) | ReadResult::Eof => return Ok(()),
        };
        if runtime.enter(&string) {
            term.command.add_history_unique(string);
        }
    }
}

fn debug<V: Viewer>(mut debugger: Debugger<V>, term: &Term) -> io::Result<()> {
    if !debugger.start() {
        return term.command.write_fmt(format_args!("Nothing to debug.\n"));
    }
    term.command.set_prompt("(debug) ")?;
    loop {
        if let Outcome::Quit = drive(&mut debugger, term)? {
            debugger.stop();
            continue;
        }
        if !debugger.is_active() {
            return Ok(());
        }
        show_line(&debugger, term, debugger.cursor())?;
        let string = match term.command.read_line()? {
            ReadResult::Input(string) => string,
            ReadResult::Signal(_) | ReadResult::Eof => {
                debugger.stop();
                continue;
            }
        };
        command(&mut debugger, term, string.trim())?;
        if !string.trim().is_empty() {
            term.command.add_history_unique(string);
        }
    }
}

fn command<V: Viewer>(debugger: &mut Debugger<V>, term: &Term, line: &str) -> io::Result<()> {
    let mut words = line.split_whitespace();
    let (name, force) = match words.next() {
        Some(word) => match word.strip_suffix('!') {
            Some(name) => (name, true),
            None => (word, false),
        },
        None => return Ok(()),
    };
    let number = words.next().map(str::parse::<usize>);
    match (name, number) {
        ("s", None) => debugger.step_in(),
        ("n", None) => debugger.step_over(force),
        ("o", None) => debugger.step_out(force),
        ("c", None) => debugger.run_to_breakpoint(),
        ("u", Some(Ok(index))) => debugger.run_to_line(index, force),
        ("b", Some(Ok(label))) if label <= u16::max_value() as usize => {
            let set = debugger.toggle_breakpoint(label as u16);
            let state = if set { "set" } else { "cleared" };
            term.command
                .write_fmt(format_args!("Breakpoint {} at {}\n", state, label))?;
        }
        ("l", None) => {
            for index in 0..debugger.runtime().program().len() {
                show_line(debugger, term, index)?;
            }
        }
        ("v", None) => {
            for (name, value) in debugger.runtime().memory().iter() {
                term.command.write_fmt(format_args!("{} = {}\n", name, value))?;
            }
        }
        ("q", None) => debugger.stop(),
        _ if name.starts_with(|c: char| c.is_ascii_digit()) => {
            debugger.enter(line);
        }
        _ => term.command.write_fmt(format_args!("{}\n", DEBUG_HELP))?,
    }
    Ok(())
}

fn show_line<V: Viewer>(debugger: &Debugger<V>, term: &Term, index: usize) -> io::Result<()> {
    let line = match debugger.runtime().program().get(index) {
        Some(line) => line,
        None => return Ok(()),
    };
    let current = debugger.is_paused() && index == debugger.cursor();
    let marker = match (current, debugger.breakpoints().contains(&line.label())) {
        (true, _) => ">",
        (false, true) => "*",
        (false, false) => " ",
    };
    let text = format!("{}{:>4} {:>5} {}", marker, index, line.label(), line.statement());
    if current {
        term.command
            .write_fmt(format_args!("{}\n", Style::new().bold().paint(text)))
    } else {
        term.command.write_fmt(format_args!("{}\n", text))
    }
}
