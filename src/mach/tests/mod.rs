use super::*;
use crate::lang;


fn exec(runtime: &mut Runtime) -> String {
    let mut s = String::new();
    loop {
        match runtime.execute(1000) {
            Event::Stopped | Event::Running => break,
            Event::Print(ps) => s.push_str(&ps),
            Event::List(ls) => s.push_str(&format!("{}\n", ls)),
            Event::Input(ps) => {
                s.push_str(&ps);
                break;
            }
            Event::Error(e) => s.push_str(&format!("{}\n", e)),
        }
    }
    s
}

fn label_at_cursor(runtime: &Runtime) -> Option<u16> {
    runtime.program().get(runtime.cursor()).map(|l| l.label())
}
