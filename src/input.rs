use crate::session::Status;

/// A keystroke as the session engine sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Printable(char),
    Backspace,
    Other,
}

impl Keystroke {
    pub fn classify_char(c: char) -> Self {
        if is_printable(c) {
            Keystroke::Printable(c)
        } else {
            Keystroke::Other
        }
    }
}

/// Letters and the space bar are the only characters a passage is typed with.
pub fn is_printable(c: char) -> bool {
    c.is_ascii_alphabetic() || c == ' '
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Appended(char),
    /// Backspace accepted; holds the removed character if there was one
    Erased(Option<char>),
    Rejected,
}

/// Target passage and what has been typed against it so far.
///
/// `typed` never grows past the length of `target`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    target: String,
    target_len: usize,
    typed: String,
    typed_len: usize,
    backspace_errors: u32,
}

impl Transcript {
    pub fn new(target: String) -> Self {
        let target_len = target.chars().count();
        Self {
            target,
            target_len,
            ..Self::default()
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn typed_len(&self) -> usize {
        self.typed_len
    }

    pub fn target_len(&self) -> usize {
        self.target_len
    }

    pub fn backspace_errors(&self) -> u32 {
        self.backspace_errors
    }

    pub fn is_complete(&self) -> bool {
        self.typed_len == self.target_len
    }

    /// Expected character at `idx`, if the target is that long.
    pub fn expected(&self, idx: usize) -> Option<char> {
        self.target.chars().nth(idx)
    }

    fn push(&mut self, c: char) -> bool {
        if self.typed_len >= self.target_len {
            return false;
        }
        self.typed.push(c);
        self.typed_len += 1;
        true
    }

    fn backspace(&mut self) -> Option<char> {
        self.backspace_errors += 1;
        let removed = self.typed.pop();
        if removed.is_some() {
            self.typed_len -= 1;
        }
        removed
    }
}

/// Applies a single keystroke to the transcript.
///
/// Nothing is accepted once the session has finished. Every accepted
/// backspace counts as an error, even on an empty transcript or when the
/// erased character was correct.
pub fn apply(transcript: &mut Transcript, status: Status, key: Keystroke) -> InputOutcome {
    if status == Status::Finished {
        return InputOutcome::Rejected;
    }

    match key {
        Keystroke::Printable(c) if is_printable(c) => {
            if transcript.push(c) {
                InputOutcome::Appended(c)
            } else {
                InputOutcome::Rejected
            }
        }
        Keystroke::Backspace => InputOutcome::Erased(transcript.backspace()),
        Keystroke::Printable(_) | Keystroke::Other => InputOutcome::Rejected,
    }
}
