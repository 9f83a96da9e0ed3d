use anyhow::{anyhow, Result};
use tokio::sync::{mpsc, oneshot};

use crate::models::{CompletionStats, ExpiredTask, TaskView};

use super::{AnalyticsSink, NotificationSink, PromptSink, RenderSink};

/// Work for the thread that owns the presentation layer.
#[derive(Debug)]
pub enum UiEvent {
    Notify(TaskView),
    Alert(String),
    Refresh(Vec<TaskView>),
    AskCompletion {
        task: ExpiredTask,
        responder: CompletionResponder,
    },
    Analytics(CompletionStats),
}

/// One-shot answer slot for a completion prompt.
#[derive(Debug)]
pub struct CompletionResponder {
    sender: oneshot::Sender<bool>,
}

impl CompletionResponder {
    /// Returns false when the engine stopped waiting for this answer.
    pub fn answer(self, completed: bool) -> bool {
        self.sender.send(completed).is_ok()
    }
}

/// Sink implementation that forwards every call to the presentation thread.
#[derive(Clone)]
pub struct ChannelSinks {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl ChannelSinks {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: UiEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| anyhow!("presentation channel closed"))
    }
}

impl NotificationSink for ChannelSinks {
    fn notify(&self, task: &TaskView) -> Result<()> {
        self.send(UiEvent::Notify(task.clone()))
    }

    fn alert(&self, message: &str) -> Result<()> {
        self.send(UiEvent::Alert(message.to_string()))
    }
}

impl PromptSink for ChannelSinks {
    fn ask_completion(&self, task: &ExpiredTask) -> Result<oneshot::Receiver<bool>> {
        let (sender, receiver) = oneshot::channel();
        self.send(UiEvent::AskCompletion {
            task: task.clone(),
            responder: CompletionResponder { sender },
        })?;
        Ok(receiver)
    }
}

impl RenderSink for ChannelSinks {
    fn refresh(&self, tasks: &[TaskView]) -> Result<()> {
        self.send(UiEvent::Refresh(tasks.to_vec()))
    }
}

impl AnalyticsSink for ChannelSinks {
    fn update(&self, stats: CompletionStats) -> Result<()> {
        self.send(UiEvent::Analytics(stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskId;
    use chrono::Utc;

    #[tokio::test]
    async fn prompt_answer_travels_back() {
        let (sinks, mut rx) = ChannelSinks::new();
        let task = ExpiredTask {
            id: TaskId::new(),
            name: "report".into(),
            description: String::new(),
            end_at: Utc::now(),
        };

        let answer = sinks.ask_completion(&task).unwrap();
        match rx.recv().await {
            Some(UiEvent::AskCompletion { task: asked, responder }) => {
                assert_eq!(asked.name, "report");
                assert!(responder.answer(true));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(answer.await.unwrap());
    }

    #[tokio::test]
    async fn closed_channel_is_an_error() {
        let (sinks, rx) = ChannelSinks::new();
        drop(rx);
        assert!(sinks.refresh(&[]).is_err());
        assert!(sinks.update(CompletionStats::default()).is_err());
    }
}
