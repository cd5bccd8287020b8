//! One-line results printed for the user next to the tracing log: files written,
//! the end-of-run summary, prompts, and fatal usage errors.
use colored::{ColoredString, Colorize};
use std::fmt::Display;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Saved,
    Done,
    Failed,
    Input,
    Error,
}

impl Tag {
    fn label(self) -> &'static str {
        match self {
            Tag::Saved => "saved",
            Tag::Done => "done",
            Tag::Failed => "failed",
            Tag::Input => "input",
            Tag::Error => "error",
        }
    }

    fn paint(self, text: &str) -> ColoredString {
        match self {
            Tag::Saved | Tag::Done => text.green().bold(),
            Tag::Failed => text.yellow().bold(),
            Tag::Input => text.cyan(),
            Tag::Error => text.red().bold(),
        }
    }
}

/// `text` behind a right-aligned tag, e.g. `[ saved] delta.json: ...`.
pub fn line(tag: Tag, text: impl Display) -> String {
    format!("{} {}", tag.paint(&format!("[{:>6}]", tag.label())), text)
}

/// Reports a snapshot or delta file that was just written.
pub fn saved(path: &Path, contents: impl Display) {
    println!("{}", line(Tag::Saved, format_args!("{}: {}", path.display(), contents)));
}

/// Reports the end of a `load` run. Item failures do not fail the command, so
/// they only change the tag.
pub fn finished(summary: impl Display, failures: usize) {
    let text = if failures == 0 {
        line(Tag::Done, format_args!("finished: {}", summary))
    } else {
        line(Tag::Failed, format_args!("finished with failures: {}", summary))
    };
    println!("{}", text);
}

pub fn prompt(text: impl Display) {
    println!("{}", line(Tag::Input, text));
}

pub fn error(text: impl Display) {
    eprintln!("{}", line(Tag::Error, text));
}
