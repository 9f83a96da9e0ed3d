use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CompletionOutcome {
    Completed,
    Incomplete,
}

impl CompletionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionOutcome::Completed => "Completed",
            CompletionOutcome::Incomplete => "Incomplete",
        }
    }
}

impl From<bool> for CompletionOutcome {
    fn from(completed: bool) -> Self {
        if completed {
            CompletionOutcome::Completed
        } else {
            CompletionOutcome::Incomplete
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStats {
    pub completed: u64,
    pub incomplete: u64,
}

impl CompletionStats {
    pub fn answered(&self) -> u64 {
        self.completed + self.incomplete
    }

    /// Share of answered prompts marked completed, `None` before the first answer.
    pub fn completion_rate(&self) -> Option<f64> {
        match self.answered() {
            0 => None,
            total => Some(self.completed as f64 / total as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_is_undefined_until_first_answer() {
        assert_eq!(CompletionStats::default().completion_rate(), None);
    }

    #[test]
    fn rate_follows_counts() {
        let stats = CompletionStats {
            completed: 3,
            incomplete: 1,
        };
        assert_eq!(stats.answered(), 4);
        assert_eq!(stats.completion_rate(), Some(0.75));
    }

    #[test]
    fn bool_answers_map_to_outcomes() {
        assert_eq!(CompletionOutcome::from(true), CompletionOutcome::Completed);
        assert_eq!(CompletionOutcome::from(false), CompletionOutcome::Incomplete);
    }
}
