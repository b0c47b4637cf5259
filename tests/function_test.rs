mod common;
use common::*;
use tinybasic::mach::{Evaluator, Runtime};

fn seeded(seed: u64) -> Runtime {
    Runtime::with_evaluator(Evaluator::seeded(seed))
}

#[test]
fn test_rnd_seeded_is_repeatable() {
    let source = "10 PRINT RND(1000)\n20 PRINT RND(1000)\n30 PRINT RND(1000)\n40 END\n";
    let mut a = seeded(42);
    a.load(source).unwrap();
    a.run();
    let mut b = seeded(42);
    b.load(source).unwrap();
    b.run();
    assert_eq!(exec(&mut a), exec(&mut b));
}

#[test]
fn test_rnd_of_one() {
    let mut r = Runtime::default();
    r.enter("PRINT RND(1)+RND(1)");
    assert_eq!(exec(&mut r), "2\n");
}

#[test]
fn test_rnd_range() {
    let mut r = seeded(3);
    r.enter("10 LET A = RND(3)");
    r.enter("20 IF A < 1 THEN PRINT A");
    r.enter("30 IF A > 3 THEN PRINT A");
    r.enter("40 END");
    for _ in 0..100 {
        r.enter("RUN");
        assert_eq!(exec(&mut r), "");
    }
}

#[test]
fn test_rnd_requires_positive_argument() {
    let mut r = Runtime::default();
    r.enter("PRINT RND(-3)");
    assert_eq!(exec(&mut r), "Runtime error: illegal function call: RND(-3)\n");
    r.enter("PRINT RND(0)");
    assert_eq!(exec(&mut r), "Runtime error: illegal function call: RND(0)\n");
}

#[test]
fn test_rnd_needs_parentheses() {
    let mut r = Runtime::default();
    assert!(!r.enter("LET A = RND"));
    assert!(exec(&mut r).starts_with("Syntax error: empty expression"));
}
