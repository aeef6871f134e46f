use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use ragkit_core::DistanceMetric;

pub const USAGE: &str = "Usage: ragkit <command> [args...]

Commands:
  ingest [path] [--reset|--append]   chunk, embed and store a file or directory
  query \"<text>\" [--top-k N] [--threshold X] [--metric cosine|euclidean]
  chat [path]                        console chat (ingests `path` first if given)
  clear                              remove every stored record
  status                             show store location and record count";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ingest { path: Option<PathBuf>, reset: Option<bool> },
    Query { text: String, overrides: QueryOverrides },
    Chat { path: Option<PathBuf> },
    Clear,
    Status,
    Help,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QueryOverrides {
    pub top_k: Option<usize>,
    pub threshold: Option<f64>,
    pub metric: Option<DistanceMetric>,
}

/// Parse everything after the program name. No command means `chat`.
pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some((cmd, rest)) = args.split_first() else {
        return Ok(Command::Chat { path: None });
    };
    match cmd.as_str() {
        "ingest" => {
            let mut path = None;
            let mut reset = None;
            for arg in rest {
                match arg.as_str() {
                    "--reset" => reset = Some(true),
                    "--append" => reset = Some(false),
                    s if s.starts_with('-') => bail!("unknown flag for ingest: {s}"),
                    s => path = Some(PathBuf::from(s)),
                }
            }
            Ok(Command::Ingest { path, reset })
        }
        "query" => parse_query(rest),
        "chat" => Ok(Command::Chat { path: rest.first().map(PathBuf::from) }),
        "clear" => Ok(Command::Clear),
        "status" => Ok(Command::Status),
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => bail!("unknown command: {other}"),
    }
}

fn parse_query(rest: &[String]) -> Result<Command> {
    let mut text = None;
    let mut overrides = QueryOverrides::default();
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--top-k" | "-k" => {
                let value = flag_value(rest, i, "--top-k")?;
                overrides.top_k = Some(value.parse().context("--top-k requires a number")?);
                i += 1;
            }
            "--threshold" => {
                let value = flag_value(rest, i, "--threshold")?;
                overrides.threshold = Some(value.parse().context("--threshold requires a number")?);
                i += 1;
            }
            "--metric" => {
                overrides.metric = Some(flag_value(rest, i, "--metric")?.parse()?);
                i += 1;
            }
            s if s.starts_with("--") => bail!("unknown flag for query: {s}"),
            s => text = Some(s.to_string()),
        }
        i += 1;
    }
    let text = text.context("query requires a question, e.g. ragkit query \"how do I clean it?\"")?;
    Ok(Command::Query { text, overrides })
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1).map(String::as_str).with_context(|| format!("{flag} requires a value"))
}
