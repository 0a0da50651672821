//! The interactive surface: messages and questions for the human reviewer.

use log::{debug, warn};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Talks to the human reviewing the edits.
pub trait Console {
    /// Shows a message.
    fn show(&mut self, message: &str) -> io::Result<()>;

    /// Asks a question and returns the answer without the trailing line break.
    fn ask(&mut self, question: &str) -> io::Result<String>;

    /// Opens a URL for visual cross reference. Best effort: failures must not abort the run.
    fn open(&mut self, _url: &str) {}
}

/// A [Console] on stdin / stdout which opens URLs in the system browser.
pub struct Terminal<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl Terminal<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Terminal::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Terminal { input, output }
    }
}

impl<R: BufRead, W: Write> Console for Terminal<R, W> {
    fn show(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }

        Ok(answer.trim_end_matches(&['\r', '\n'][..]).to_owned())
    }

    fn open(&mut self, url: &str) {
        debug!("opening {} in the browser", url);

        if let Err(e) = webbrowser::open(url) {
            warn!("could not open {} in a browser: {}", url, e);
        }
    }
}

/// A [Console] answering from a script and recording everything. Useful to drive a run without a human.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    answers: VecDeque<String>,
    transcript: Vec<String>,
    opened: Vec<String>,
}

impl Scripted {
    pub fn new<I: IntoIterator<Item = S>, S: Into<String>>(answers: I) -> Self {
        Scripted {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Everything shown and asked, in order.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// The questions asked, in order.
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.transcript
            .iter()
            .filter_map(|x| x.strip_prefix("? "))
    }

    /// The URLs opened, in order.
    pub fn opened(&self) -> &[String] {
        &self.opened
    }

    /// The answers which were not consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for Scripted {
    fn show(&mut self, message: &str) -> io::Result<()> {
        self.transcript.push(message.to_owned());
        Ok(())
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.transcript.push(format!("? {}", question));

        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted answer left for {:?}", question),
            )
        })
    }

    fn open(&mut self, url: &str) {
        self.opened.push(url.to_owned());
    }
}
