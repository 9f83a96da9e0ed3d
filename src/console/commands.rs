use anyhow::{anyhow, bail, Context, Result};

/// Duration presets offered when creating a task, in seconds.
pub const DURATION_PRESETS: [(&str, u64); 4] = [
    ("day", 86_400),
    ("week", 604_800),
    ("month", 2_592_000),
    ("year", 31_536_000),
];

pub const HELP: &str = "\
Commands:
  add <seconds|day|week|month|year> <name> [| description]
  list                 show active tasks
  stats                show completion analytics
  yes | y              answer the pending prompt: completed
  no | n               answer the pending prompt: not completed
  help                 show this help
  quit                 shut down";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add {
        duration_secs: f64,
        name: String,
        description: String,
    },
    List,
    Stats,
    Answer(bool),
    Help,
    Quit,
}

/// Parses one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" => parse_add(rest)?,
        "list" | "ls" => Command::List,
        "stats" => Command::Stats,
        "yes" | "y" => Command::Answer(true),
        "no" | "n" => Command::Answer(false),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(command))
}

fn parse_add(rest: &str) -> Result<Command> {
    let (duration, rest) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| anyhow!("usage: add <seconds|day|week|month|year> <name> [| description]"))?;
    let duration_secs = parse_duration(duration)?;

    let (name, description) = match rest.split_once('|') {
        Some((name, description)) => (name.trim(), description.trim()),
        None => (rest.trim(), ""),
    };
    if name.is_empty() {
        bail!("task name must not be empty");
    }

    Ok(Command::Add {
        duration_secs,
        name: name.to_string(),
        description: description.to_string(),
    })
}

/// Seconds as a number, or one of [`DURATION_PRESETS`].
pub fn parse_duration(token: &str) -> Result<f64> {
    let token = token.trim();
    if let Some((_, secs)) = DURATION_PRESETS
        .iter()
        .find(|(preset, _)| preset.eq_ignore_ascii_case(token))
    {
        return Ok(*secs as f64);
    }

    let secs: f64 = token
        .parse()
        .with_context(|| format!("'{token}' is neither seconds nor a preset"))?;
    if !secs.is_finite() {
        bail!("duration must be finite");
    }
    Ok(secs)
}
