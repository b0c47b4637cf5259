#![allow(dead_code)]
use tinybasic::debug::{Debugger, Viewer};
use tinybasic::mach::{Event, Runtime};

pub fn exec(runtime: &mut Runtime) -> String {
    exec_n(runtime, 5000)
}

pub fn exec_n(runtime: &mut Runtime, cycles: usize) -> String {
    drain(|| runtime.execute(cycles), cycles)
}

pub fn debug_exec<V: Viewer>(debugger: &mut Debugger<V>) -> String {
    drain(|| debugger.execute(5000), 5000)
}

pub fn run(source: &str) -> String {
    let mut r = Runtime::default();
    if let Err(error) = r.load(source) {
        return format!("{}\n", error);
    }
    r.run();
    exec(&mut r)
}

fn drain<F: FnMut() -> Event>(mut execute: F, cycles: usize) -> String {
    let mut s = String::new();
    let mut prev_running = false;
    loop {
        let event = execute();
        match &event {
            Event::Stopped => break,
            Event::Error(error) => s.push_str(&format!("{}\n", error)),
            Event::Running => {
                if prev_running {
                    s.push_str(&format!("\n{} Execution cycles exceeded.\n", cycles));
                    break;
                }
            }
            Event::Print(ps) => s.push_str(ps),
            Event::Input(ps) => {
                s.push_str(ps);
                break;
            }
            Event::List(ls) => s.push_str(&format!("{}\n", ls)),
        }
        prev_running = event == Event::Running;
    }
    s
}
