//! Interactive human review of a generated tweet.
//!
//! The reviewer accepts, edits, or skips the tweet. Accepted and edited
//! tweets are recorded as `{"content": ..} -> {"tweet": ..}` examples.

use std::io::{BufRead, Write};

use log::info;

use crate::domain::{CONTENT_KEY, Example, TWEET_KEY, fields};
use crate::error::Result;
use crate::store::ExampleStore;

/// Line that ends a multi-line edit
const EDIT_TERMINATOR: &str = ".";

/// What the reviewer chose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    Accepted(String),
    Edited(String),
    Skipped,
}

impl ReviewDecision {
    /// The tweet to record, if any.
    pub fn final_tweet(&self) -> Option<&str> {
        match self {
            ReviewDecision::Accepted(tweet) | ReviewDecision::Edited(tweet) => Some(tweet),
            ReviewDecision::Skipped => None,
        }
    }
}

/// Line-oriented review prompt over any reader/writer pair.
pub struct ReviewSession<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ReviewSession<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for a decision. End of input counts as a skip.
    pub fn prompt(&mut self, tweet: &str) -> Result<ReviewDecision> {
        writeln!(self.output, "\n{}\n", tweet)?;
        loop {
            write!(self.output, "[a]ccept, [e]dit, [s]kip? ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(ReviewDecision::Skipped);
            };
            match line.trim().to_ascii_lowercase().as_str() {
                "a" | "accept" => return Ok(ReviewDecision::Accepted(tweet.to_string())),
                "s" | "skip" => return Ok(ReviewDecision::Skipped),
                "e" | "edit" => match self.read_edit()? {
                    Some(edited) => return Ok(ReviewDecision::Edited(edited)),
                    None => return Ok(ReviewDecision::Skipped),
                },
                other => writeln!(self.output, "unrecognized choice '{}'", other)?,
            }
        }
    }

    /// Prompt, then record the final tweet against `content`.
    pub async fn review(
        &mut self,
        store: &dyn ExampleStore,
        dataset_id: &str,
        content: &str,
        tweet: &str,
    ) -> Result<(ReviewDecision, Option<Example>)> {
        let decision = self.prompt(tweet)?;
        let Some(final_tweet) = decision.final_tweet() else {
            writeln!(self.output, "Skipped; nothing recorded.")?;
            return Ok((decision, None));
        };

        let example = store
            .record_example(
                dataset_id,
                fields([(CONTENT_KEY, content)]),
                fields([(TWEET_KEY, final_tweet)]),
            )
            .await?;
        info!("review: recorded {} in '{}'", example.id, dataset_id);
        writeln!(self.output, "Recorded as {}.", example.id)?;
        Ok((decision, Some(example)))
    }

    /// Read replacement text until a lone "." line. `None` on end of input
    /// before any text was entered.
    fn read_edit(&mut self) -> Result<Option<String>> {
        loop {
            writeln!(self.output, "Enter the new tweet; finish with a line containing only '.'")?;
            self.output.flush()?;

            let mut lines = Vec::new();
            let mut eof = false;
            loop {
                match self.read_line()? {
                    Some(line) if line.trim_end() == EDIT_TERMINATOR => break,
                    Some(line) => lines.push(line.trim_end().to_string()),
                    None => {
                        eof = true;
                        break;
                    }
                }
            }

            let edited = lines.join("\n").trim().to_string();
            if !edited.is_empty() {
                return Ok(Some(edited));
            }
            if eof {
                return Ok(None);
            }
            writeln!(self.output, "The tweet cannot be empty.")?;
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
