//! Terminal front end. This is the only place that writes to the user; the
//! engine reaches it through [`UiEvent`]s on a channel.

pub mod commands;
pub mod render;

use std::{collections::VecDeque, io::Write};

use anyhow::Result;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;

use crate::{
    engine::EngineContext,
    models::{ExpiredTask, TaskView},
    sinks::{CompletionResponder, UiEvent},
};

use commands::{parse_command, Command, HELP};
use render::{completion_question, near_expiry_message, render_stats, render_tasks};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console<W: Write> {
    ctx: EngineContext,
    out: W,
    latest: Vec<TaskView>,
    pending: VecDeque<(ExpiredTask, CompletionResponder)>,
}

impl<W: Write> Console<W> {
    pub fn new(ctx: EngineContext, out: W) -> Self {
        Self {
            ctx,
            out,
            latest: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn pending_prompts(&self) -> usize {
        self.pending.len()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn handle_event(&mut self, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::Notify(task) => {
                writeln!(self.out, "{}", near_expiry_message(&task.name))?;
            }
            UiEvent::Alert(message) => {
                writeln!(self.out, "warning: {message}")?;
            }
            UiEvent::Refresh(tasks) => {
                self.latest = tasks;
            }
            UiEvent::AskCompletion { task, responder } => {
                self.pending.push_back((task, responder));
                if self.pending.len() == 1 {
                    self.show_prompt()?;
                }
            }
            UiEvent::Analytics(stats) => {
                writeln!(self.out, "{}", render_stats(&stats))?;
            }
        }
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(err) => {
                writeln!(self.out, "{err:#}")?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Add {
                duration_secs,
                name,
                description,
            } => match self.ctx.add_task(&name, &description, duration_secs) {
                Ok(_) => writeln!(self.out, "Added '{name}'")?,
                Err(err) => writeln!(self.out, "Could not add '{name}': {err:#}")?,
            },
            Command::List => {
                let urgent_window = self.ctx.settings().urgent_window();
                writeln!(self.out, "{}", render_tasks(&self.latest, urgent_window))?;
            }
            Command::Stats => {
                writeln!(self.out, "{}", render_stats(&self.ctx.stats()))?;
            }
            Command::Answer(completed) => self.answer(completed)?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn answer(&mut self, completed: bool) -> Result<()> {
        let Some((task, responder)) = self.pending.pop_front() else {
            writeln!(self.out, "No task is waiting for an answer")?;
            return Ok(());
        };
        if !responder.answer(completed) {
            log_warn!("answer for task {} arrived after the engine stopped", task.id);
        }
        if !self.pending.is_empty() {
            self.show_prompt()?;
        }
        Ok(())
    }

    fn show_prompt(&mut self) -> Result<()> {
        if let Some((task, _)) = self.pending.front() {
            writeln!(self.out, "{}", completion_question(&task.name))?;
        }
        Ok(())
    }
}

/// Runs the console on the current task until `quit`, end of input, Ctrl-C,
/// or `shutdown` is cancelled elsewhere.
pub async fn run_console(
    ctx: EngineContext,
    mut events: mpsc::UnboundedReceiver<UiEvent>,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut console = Console::new(ctx, std::io::stdout());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    console.handle_line("help")?;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = &mut ctrl_c => {
                log_debug!("ctrl-c received");
                break;
            }
            event = events.recv() => match event {
                Some(event) => console.handle_event(event)?,
                None => break,
            },
            line = lines.next_line() => match line? {
                Some(line) => {
                    if console.handle_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                None => break,
            },
        }
        console.out.flush()?;
    }

    shutdown.cancel();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{CompletionStats, TaskId},
        settings::EngineSettings,
        sinks::{ChannelSinks, PromptSink},
    };
    use chrono::Utc;

    fn console() -> Console<Vec<u8>> {
        let ctx = EngineContext::new(EngineSettings::default()).unwrap();
        Console::new(ctx, Vec::new())
    }

    fn output(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    fn expired(name: &str) -> ExpiredTask {
        ExpiredTask {
            id: TaskId::new(),
            name: name.into(),
            description: String::new(),
            end_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn prompts_are_answered_one_at_a_time() {
        let (sinks, mut rx) = ChannelSinks::new();
        let mut console = console();

        let first = sinks.ask_completion(&expired("first")).unwrap();
        let second = sinks.ask_completion(&expired("second")).unwrap();
        while let Ok(event) = rx.try_recv() {
            console.handle_event(event).unwrap();
        }
        assert_eq!(console.pending_prompts(), 2);

        console.handle_line("y").unwrap();
        console.handle_line("n").unwrap();
        console.handle_line("n").unwrap();
        assert!(first.await.unwrap());
        assert!(!second.await.unwrap());

        let out = output(console);
        let first_at = out.find("'first'").unwrap();
        let second_at = out.find("'second'").unwrap();
        assert!(first_at < second_at);
        assert!(out.contains("No task is waiting for an answer"));
    }

    #[test]
    fn add_and_list_use_latest_refresh() {
        let mut console = console();
        assert_eq!(console.handle_line("add 90 Laundry | darks").unwrap(), Flow::Continue);
        assert_eq!(console.ctx.store.len(), 1);

        console.handle_line("list").unwrap();
        let views = console.ctx.store.snapshot(tokio::time::Instant::now());
        console.handle_event(UiEvent::Refresh(views)).unwrap();
        console.handle_line("list").unwrap();

        let out = output(console);
        assert!(out.contains("Added 'Laundry'"));
        assert!(out.contains("No tasks yet"));
        assert!(out.contains("- Laundry\n    darks\n    Time Left: 0:01:"));
    }

    #[test]
    fn events_render_messages() {
        let mut console = console();
        console
            .handle_event(UiEvent::Analytics(CompletionStats {
                completed: 1,
                incomplete: 1,
            }))
            .unwrap();
        console.handle_event(UiEvent::Alert("render refresh failed".into())).unwrap();
        assert_eq!(console.handle_line("quit").unwrap(), Flow::Quit);

        let out = output(console);
        assert!(out.contains("Completed: 1  Incomplete: 1  (50% completed)"));
        assert!(out.contains("warning: render refresh failed"));
    }

    #[test]
    fn bad_commands_do_not_stop_the_console() {
        let mut console = console();
        assert_eq!(console.handle_line("add nope x").unwrap(), Flow::Continue);
        assert_eq!(console.handle_line("add nan x").unwrap(), Flow::Continue);
        assert_eq!(console.handle_line("add 1e300 x").unwrap(), Flow::Continue);
        assert_eq!(console.ctx.store.len(), 0);
        let out = output(console);
        assert!(out.contains("neither seconds nor a preset"));
        assert!(out.contains("duration must be finite"));
        assert!(out.contains("Could not add 'x'"));
    }
}
