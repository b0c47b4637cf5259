mod common;
use common::*;
use tinybasic::debug::{Debugger, MemoryViewer, Message, NullViewer};
use tinybasic::mach::Runtime;

const PROGRAM: &str = "\
10 REM START
20 LET A = 1
30 GOSUB 100
40 PRINT A
50 END
100 REM SUB
110 LET A = A + 1
120 RETURN
";

fn debugger(source: &str) -> Debugger<NullViewer> {
    let mut runtime = Runtime::default();
    runtime.load(source).unwrap();
    let mut d = Debugger::new(runtime, NullViewer);
    assert!(d.start());
    d
}

fn label<V: tinybasic::debug::Viewer>(d: &Debugger<V>) -> u16 {
    d.runtime().program().get(d.cursor()).unwrap().label()
}

#[test]
fn test_start_skips_comments() {
    let d = debugger(PROGRAM);
    assert!(d.is_active());
    assert!(d.is_paused());
    assert_eq!(label(&d), 20);
}

#[test]
fn test_step_in() {
    let mut d = debugger(PROGRAM);
    d.step_in();
    assert_eq!(debug_exec(&mut d), "");
    assert_eq!(label(&d), 30);
    d.step_in();
    debug_exec(&mut d);
    assert_eq!(label(&d), 110);
    d.step_in();
    debug_exec(&mut d);
    d.step_in();
    debug_exec(&mut d);
    assert_eq!(label(&d), 40);
    d.step_in();
    assert_eq!(debug_exec(&mut d), "2\n");
    d.step_in();
    assert_eq!(debug_exec(&mut d), "");
    assert!(!d.is_active());
}

#[test]
fn test_step_over_gosub() {
    let mut d = debugger(PROGRAM);
    d.step_over(false);
    debug_exec(&mut d);
    assert_eq!(label(&d), 30);
    d.step_over(false);
    assert_eq!(debug_exec(&mut d), "");
    assert_eq!(label(&d), 40);
    assert_eq!(d.runtime().call_depth(), 0);
}

#[test]
fn test_step_over_honors_breakpoints_unless_forced() {
    let mut d = debugger(PROGRAM);
    d.toggle_breakpoint(110);
    d.run_to_line(2, false);
    debug_exec(&mut d);
    assert_eq!(label(&d), 30);
    d.step_over(false);
    debug_exec(&mut d);
    assert_eq!(label(&d), 110);

    let mut d = debugger(PROGRAM);
    d.toggle_breakpoint(110);
    d.run_to_line(2, false);
    debug_exec(&mut d);
    d.step_over(true);
    debug_exec(&mut d);
    assert_eq!(label(&d), 40);
}

#[test]
fn test_step_out() {
    let mut d = debugger(PROGRAM);
    d.step_out(false);
    debug_exec(&mut d);
    assert_eq!(label(&d), 20);
    d.step_in();
    debug_exec(&mut d);
    d.step_in();
    debug_exec(&mut d);
    assert_eq!(label(&d), 110);
    assert_eq!(d.runtime().call_depth(), 1);
    d.step_out(false);
    debug_exec(&mut d);
    assert_eq!(label(&d), 40);
    assert_eq!(d.runtime().call_depth(), 0);
}

#[test]
fn test_run_to_breakpoint() {
    let mut d = debugger(PROGRAM);
    assert!(d.toggle_breakpoint(40));
    d.run_to_breakpoint();
    assert_eq!(debug_exec(&mut d), "");
    assert!(d.is_paused());
    assert_eq!(d.cursor(), 3);
    assert_eq!(label(&d), 40);
    d.run_to_breakpoint();
    assert_eq!(debug_exec(&mut d), "2\n");
    assert!(!d.is_active());
}

#[test]
fn test_toggle_breakpoint_twice() {
    let mut d = debugger(PROGRAM);
    assert!(d.toggle_breakpoint(40));
    assert!(!d.toggle_breakpoint(40));
    assert!(d.breakpoints().is_empty());
    d.run_to_breakpoint();
    assert_eq!(debug_exec(&mut d), "2\n");
    assert!(!d.is_active());
}

#[test]
fn test_run_to_line() {
    let mut d = debugger(PROGRAM);
    d.run_to_line(7, false);
    debug_exec(&mut d);
    assert_eq!(label(&d), 120);
}

#[test]
fn test_edits_keep_cursor_on_statement() {
    let mut d = debugger(PROGRAM);
    assert_eq!(label(&d), 20);
    assert!(d.enter("15 PRINT 15"));
    assert_eq!(label(&d), 20);
    assert!(d.enter("5 LET B = 0"));
    assert_eq!(label(&d), 20);
    assert!(d.enter("10"));
    assert_eq!(label(&d), 20);
    assert!(d.enter("20"));
    assert_eq!(label(&d), 15);
}

#[test]
fn test_removing_first_line_at_cursor() {
    let mut d = debugger("10 LET A = 1\n20 END\n");
    assert_eq!(d.cursor(), 0);
    assert!(d.enter("10"));
    assert_eq!(d.cursor(), 0);
    assert_eq!(label(&d), 20);
}

#[test]
fn test_removing_current_line_skips_comments() {
    let mut d = debugger("10 LET A = 1\n20 REM\n30 LET B = 2\n40 END\n");
    d.step_in();
    debug_exec(&mut d);
    assert_eq!(label(&d), 30);
    d.enter("30");
    assert_eq!(label(&d), 40);
    assert_eq!(d.cursor(), 2);
}

#[test]
fn test_direct_statement_rejected_while_debugging() {
    let mut d = debugger(PROGRAM);
    assert!(!d.enter("PRINT 1"));
    assert_eq!(debug_exec(&mut d), "Runtime error: illegal direct: PRINT 1\n");
    assert!(d.is_paused());
}

#[test]
fn test_input_while_debugging() {
    let mut d = debugger("10 INPUT A\n20 PRINT A\n30 END\n");
    d.step_in();
    assert_eq!(debug_exec(&mut d), "? ");
    assert!(!d.is_paused());
    d.step_in();
    assert!(d.enter("7"));
    assert_eq!(debug_exec(&mut d), "");
    assert_eq!(label(&d), 20);
    d.step_in();
    assert_eq!(debug_exec(&mut d), "7\n");
}

#[test]
fn test_errors_end_session() {
    let mut d = debugger("10 PRINT 1/0\n20 END\n");
    d.step_in();
    assert_eq!(
        debug_exec(&mut d),
        "Line 10: Runtime error: division by zero\n"
    );
    assert!(!d.is_active());
}

#[test]
fn test_stop() {
    let mut d = debugger(PROGRAM);
    d.stop();
    assert_eq!(
        debug_exec(&mut d),
        "Line 20: Runtime error: program terminated\n"
    );
    assert!(!d.is_active());
}

#[test]
fn test_nothing_to_debug() {
    let mut d = Debugger::new(Runtime::default(), NullViewer);
    assert!(!d.start());
    assert!(!d.is_active());
    assert!(d.enter("PRINT 5"));
    assert_eq!(debug_exec(&mut d), "5\n");
}

#[test]
fn test_viewer_protocol() {
    let mut runtime = Runtime::default();
    runtime.load("10 LET A = 1\n20 END\n").unwrap();
    let mut d = Debugger::new(runtime, MemoryViewer::new());
    d.start();
    assert_eq!(
        d.viewer_mut().take(),
        [
            Message::Clear,
            Message::Add(10, "LET A = 1".into()),
            Message::Add(20, "END".into()),
            Message::Cursor(0),
            Message::Print,
        ]
    );
    d.toggle_breakpoint(20);
    assert_eq!(
        d.viewer_mut().take(),
        [Message::Breakpoint(20), Message::Print]
    );
    d.enter("15 PRINT A");
    assert_eq!(
        d.viewer_mut().take(),
        [Message::Add(15, "PRINT A".into()), Message::Cursor(0), Message::Print]
    );
    d.enter("10 LET A = 2");
    assert_eq!(
        d.viewer_mut().take(),
        [Message::Update(0, "LET A = 2".into()), Message::Cursor(0), Message::Print]
    );
    d.enter("15");
    assert_eq!(
        d.viewer_mut().take(),
        [Message::Remove(1), Message::Cursor(0), Message::Print]
    );
    d.step_in();
    debug_exec(&mut d);
    assert_eq!(d.viewer_mut().take(), [Message::Cursor(1), Message::Print]);
}

#[test]
fn test_viewer_reconnect_resends_everything() {
    use tinybasic::debug::Viewer;
    let mut runtime = Runtime::default();
    runtime.load("10 LET A = 1\n20 END\n").unwrap();
    let mut d = Debugger::new(runtime, MemoryViewer::new());
    d.start();
    d.toggle_breakpoint(10);
    d.viewer_mut().take();
    d.viewer_mut().close();
    d.step_in();
    debug_exec(&mut d);
    assert_eq!(
        d.viewer_mut().take(),
        [
            Message::Clear,
            Message::Add(10, "LET A = 1".into()),
            Message::Add(20, "END".into()),
            Message::Breakpoint(10),
            Message::Cursor(1),
            Message::Print,
        ]
    );
}

#[test]
fn test_viewer_cleared_when_session_ends() {
    let mut runtime = Runtime::default();
    runtime.load("10 LET A = 1\n20 CLEAR\n").unwrap();
    let mut d = Debugger::new(runtime, MemoryViewer::new());
    d.start();
    d.viewer_mut().take();
    d.step_in();
    debug_exec(&mut d);
    assert_eq!(d.viewer_mut().take(), [Message::Cursor(1), Message::Print]);
    d.step_in();
    assert_eq!(debug_exec(&mut d), "");
    assert!(!d.is_active());
    assert!(d.runtime().program().is_empty());
    assert_eq!(d.viewer_mut().take(), [Message::Clear, Message::Print]);
    d.enter("10 PRINT 1");
    assert!(d.viewer_mut().take().is_empty());
}
