//! Trajectory records and their canonical CSV encoding
//!
//! A trajectory is one recorded optimization attempt: a benchmark URI
//! plus the ordered action tokens that were applied to it, optionally
//! with the reward that was observed at the time. The canonical text
//! form is a 4-field CSV row:
//!
//! ```text
//! benchmark,reward,walltime,commandline
//! ```
//!
//! where `commandline` carries the actions in tool-invocation form,
//! e.g. `opt -mem2reg -simplifycfg input.bc -o output.bc`. The wrapper
//! (`opt` and the `input.bc -o output.bc` tail) is boilerplate: decoding
//! strips it down to the bare action tokens and encoding reconstructs it.

use crate::error::{OptcheckError, OptcheckResult};
use serde::{Deserialize, Serialize};

/// Tool name that prefixes every recorded commandline
const COMMANDLINE_TOOL: &str = "opt";

/// Fixed argument tail that closes every recorded commandline
const COMMANDLINE_TAIL: [&str; 3] = ["input.bc", "-o", "output.bc"];

/// Number of comma-separated fields in the canonical encoding
const CSV_FIELD_COUNT: usize = 4;

/// One recorded trajectory: benchmark, optional reward, action tokens.
///
/// Records are immutable values: constructed once (from a literal or by
/// [`TrajectoryRecord::from_csv`]) and then only read. Replay applies
/// the tokens of `commandline` strictly in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    /// URI-like identifier of a program in the benchmark corpus
    pub benchmark: String,
    /// Previously observed reward, informational only
    pub reward: Option<f64>,
    /// Ordered action tokens, boilerplate stripped
    pub commandline: Vec<String>,
}

impl TrajectoryRecord {
    /// Create a record without a reward
    pub fn new(benchmark: impl Into<String>, commandline: Vec<String>) -> Self {
        Self {
            benchmark: benchmark.into(),
            reward: None,
            commandline,
        }
    }

    /// Attach an observed reward
    pub fn with_reward(mut self, reward: f64) -> Self {
        self.reward = Some(reward);
        self
    }

    /// Decode a record from its canonical CSV row.
    ///
    /// Fails with [`OptcheckError::MalformedRecord`] when the row does
    /// not have exactly four comma-separated fields or the benchmark
    /// field is empty. Blank lines must be filtered out by the caller
    /// before reaching this decoder.
    pub fn from_csv(line: &str) -> OptcheckResult<Self> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != CSV_FIELD_COUNT {
            return Err(OptcheckError::malformed_record(format!(
                "expected {} comma-separated fields, found {}: {:?}",
                CSV_FIELD_COUNT,
                fields.len(),
                line
            )));
        }

        let benchmark = fields[0].trim();
        if benchmark.is_empty() {
            return Err(OptcheckError::malformed_record(format!(
                "empty benchmark field: {:?}",
                line
            )));
        }

        let reward = parse_optional_float(fields[1], "reward")?;
        // Field 3 is the recorded walltime. It is validated but not
        // carried: wall clock time is not reproducible across replays.
        parse_optional_float(fields[2], "walltime")?;

        let commandline = parse_commandline(fields[3])?;

        Ok(Self {
            benchmark: benchmark.to_string(),
            reward,
            commandline,
        })
    }

    /// Encode the record back into its canonical CSV row.
    ///
    /// Left inverse of [`TrajectoryRecord::from_csv`]: any record
    /// produced by the decoder encodes back to an equivalent row, and
    /// `from_csv(to_csv(r)) == r` for every record `r`.
    pub fn to_csv(&self) -> String {
        let reward = self
            .reward
            .map(|r| r.to_string())
            .unwrap_or_default();
        format!("{},{},,{}", self.benchmark, reward, self.commandline_text())
    }

    /// The commandline in full tool-invocation form,
    /// e.g. `opt -mem2reg input.bc -o output.bc`
    pub fn commandline_text(&self) -> String {
        let mut parts = Vec::with_capacity(self.commandline.len() + 4);
        parts.push(COMMANDLINE_TOOL.to_string());
        parts.extend(self.commandline.iter().cloned());
        parts.extend(COMMANDLINE_TAIL.iter().map(|s| s.to_string()));
        parts.join(" ")
    }

    /// Deterministic human-readable identity for reporting,
    /// `benchmark,commandline`
    pub fn id(&self) -> String {
        format!("{},{}", self.benchmark, self.commandline_text())
    }
}

impl std::fmt::Display for TrajectoryRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

fn parse_optional_float(field: &str, name: &str) -> OptcheckResult<Option<f64>> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(None);
    }
    field.parse::<f64>().map(Some).map_err(|e| {
        OptcheckError::malformed_record(format!("bad {} field {:?}: {}", name, field, e))
    })
}

/// Strip the tool-invocation boilerplate from a recorded commandline,
/// leaving the bare action tokens.
fn parse_commandline(text: &str) -> OptcheckResult<Vec<String>> {
    let mut tokens = shell_words::split(text.trim())
        .map_err(|e| OptcheckError::malformed_record(format!("bad commandline: {}", e)))?;

    if tokens.first().map(|t| t.as_str()) == Some(COMMANDLINE_TOOL) {
        tokens.remove(0);
    }
    if tokens.len() >= COMMANDLINE_TAIL.len()
        && tokens[tokens.len() - COMMANDLINE_TAIL.len()..]
            .iter()
            .zip(COMMANDLINE_TAIL.iter())
            .all(|(a, b)| a == b)
    {
        tokens.truncate(tokens.len() - COMMANDLINE_TAIL.len());
    }

    Ok(tokens)
}
