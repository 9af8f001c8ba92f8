use crate::config::Key;
use pagehost::Selector;
use std::str::FromStr;
use std::time::Duration;
use strum::{EnumString, IntoStaticStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
enum Verb {
    Click,
    Hover,
    Leave,
    Focus,
    Key,
    PointerDown,
    PointerUp,
    PointerCancel,
    Swipe,
    Wait,
    Scroll,
    Resize,
    Snapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Click the `nth` (0-based) element matching the selector.
    Click { selector: Selector, nth: usize },
    Hover,
    Leave,
    Focus(Selector),
    /// Key press delivered to the focused element.
    Key(Key),
    PointerDown(f64),
    PointerUp(f64),
    PointerCancel,
    /// Pointer down at `from`, up at `to`.
    Swipe { from: f64, to: f64 },
    Wait(Duration),
    Scroll(f64),
    /// New width for every slide, then a resize event.
    Resize(f64),
    Snapshot,
}

#[derive(Error, Debug, PartialEq)]
pub enum StepError {
    #[error("unknown step '{0}'")]
    UnknownVerb(String),
    #[error("'{verb}' expects {expected}")]
    MissingArgument {
        verb: &'static str,
        expected: &'static str,
    },
    #[error("'{verb}' takes no more than {max} argument(s)")]
    TooManyArguments { verb: &'static str, max: usize },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unknown key '{0}'")]
    InvalidKey(String),
    #[error("cannot split line: {0}")]
    Tokenize(String),
}

#[derive(Error, Debug, PartialEq)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: StepError,
}

struct Args<'a> {
    verb: &'static str,
    words: std::slice::Iter<'a, String>,
}

impl<'a> Args<'a> {
    fn required(&mut self, expected: &'static str) -> Result<&'a str, StepError> {
        self.words
            .next()
            .map(String::as_str)
            .ok_or(StepError::MissingArgument {
                verb: self.verb,
                expected,
            })
    }

    fn optional(&mut self) -> Option<&'a str> {
        self.words.next().map(String::as_str)
    }

    fn number(&mut self, expected: &'static str) -> Result<f64, StepError> {
        let word = self.required(expected)?;
        word.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| StepError::InvalidNumber(word.to_string()))
    }

    fn finish(mut self, max: usize) -> Result<(), StepError> {
        match self.words.next() {
            Some(_) => Err(StepError::TooManyArguments {
                verb: self.verb,
                max,
            }),
            None => Ok(()),
        }
    }
}

impl FromStr for Step {
    type Err = StepError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words = shell_words::split(line).map_err(|e| StepError::Tokenize(e.to_string()))?;
        let (head, rest) = words
            .split_first()
            .ok_or_else(|| StepError::UnknownVerb(String::new()))?;
        let verb =
            Verb::from_str(head).map_err(|_| StepError::UnknownVerb(head.to_string()))?;

        let mut args = Args {
            verb: verb.into(),
            words: rest.iter(),
        };

        let (step, max_args) = match verb {
            Verb::Click => {
                let selector = Selector::from(args.required("a selector")?);
                let nth = match args.optional() {
                    Some(n) => parse_count(n)?,
                    None => 0,
                };
                (Step::Click { selector, nth }, 2)
            }
            Verb::Hover => (Step::Hover, 0),
            Verb::Leave => (Step::Leave, 0),
            Verb::Focus => (Step::Focus(Selector::from(args.required("a selector")?)), 1),
            Verb::Key => {
                let name = args.required("a key name")?;
                let key =
                    Key::from_str(name).map_err(|_| StepError::InvalidKey(name.to_string()))?;
                (Step::Key(key), 1)
            }
            Verb::PointerDown => (Step::PointerDown(args.number("an x position")?), 1),
            Verb::PointerUp => (Step::PointerUp(args.number("an x position")?), 1),
            Verb::PointerCancel => (Step::PointerCancel, 0),
            Verb::Swipe => {
                let from = args.number("start and end x positions")?;
                let to = args.number("start and end x positions")?;
                (Step::Swipe { from, to }, 2)
            }
            Verb::Wait => {
                let ms = parse_count(args.required("milliseconds")?)?;
                (Step::Wait(Duration::from_millis(ms as u64)), 1)
            }
            Verb::Scroll => (Step::Scroll(args.number("a vertical offset")?), 1),
            Verb::Resize => (Step::Resize(args.number("a slide width")?), 1),
            Verb::Snapshot => (Step::Snapshot, 0),
        };

        args.finish(max_args)?;
        Ok(step)
    }
}

fn parse_count(word: &str) -> Result<usize, StepError> {
    word.parse()
        .map_err(|_| StepError::InvalidNumber(word.to_string()))
}

/// Strips a trailing `#` comment that is not inside quotes.
fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    for (i, ch) in line.char_indices() {
        match (ch, quote) {
            ('"' | '\'', None) => quote = Some(ch),
            (c, Some(q)) if c == q => quote = None,
            ('#', None) => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parses one line; blank and comment-only lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Step>, StepError> {
    let text = strip_comment(line).trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse().map(Some)
}

/// Parses a whole script, keeping the 1-based line number of each step.
/// An unquoted `#` starts a comment, so id selectors need quotes.
pub fn parse_script(src: &str) -> Result<Vec<(usize, Step)>, ScriptError> {
    let mut steps = Vec::new();
    for (i, raw) in src.lines().enumerate() {
        let line = i + 1;
        if let Some(step) = parse_line(raw).map_err(|source| ScriptError { line, source })? {
            steps.push((line, step));
        }
    }
    Ok(steps)
}
