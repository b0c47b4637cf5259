use crate::lang::Label;

/// One line of the viewer protocol.
///
/// Slot indexes are positions in the program store. Labels are used
/// only where the viewer cannot know the slot yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Add(Label, String),
    Update(usize, String),
    Remove(usize),
    Breakpoint(Label),
    Cursor(usize),
    Print,
    Clear,
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Message::*;
        match self {
            Add(label, text) => write!(f, "a:{}:{}", label, text),
            Update(index, text) => write!(f, "u:{}:{}", index, text),
            Remove(index) => write!(f, "r:{}", index),
            Breakpoint(label) => write!(f, "b:{}", label),
            Cursor(index) => write!(f, "c:{}", index),
            Print => write!(f, "print"),
            Clear => write!(f, "clear"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_lines() {
        assert_eq!(Message::Add(10, "PRINT X".into()).to_string(), "a:10:PRINT X");
        assert_eq!(Message::Update(2, "END".into()).to_string(), "u:2:END");
        assert_eq!(Message::Remove(0).to_string(), "r:0");
        assert_eq!(Message::Breakpoint(30).to_string(), "b:30");
        assert_eq!(Message::Cursor(4).to_string(), "c:4");
        assert_eq!(Message::Print.to_string(), "print");
        assert_eq!(Message::Clear.to_string(), "clear");
    }
}
