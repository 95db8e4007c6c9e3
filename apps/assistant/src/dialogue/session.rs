//! The single conversational context of a running assistant.

use crate::models::conversation::CareerFields;

/// Where the conversation currently is. Every variant except `Idle` belongs
/// to the scripted career flow and names the slot the next input fills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    CareerInterest,
    CareerSkills,
    CareerGoals,
}

impl Mode {
    pub fn is_career(self) -> bool {
        !matches!(self, Mode::Idle)
    }
}

/// Outcome of feeding one answer into the career flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CareerStep {
    AskSkills,
    AskGoals,
    /// All slots filled; the session is back to `Idle`.
    Complete(CareerFields),
}

#[derive(Debug, Default)]
pub struct Session {
    mode: Mode,
    fields: CareerFields,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[cfg(test)]
    pub fn fields(&self) -> &CareerFields {
        &self.fields
    }

    /// Enters the career flow with empty slots.
    pub fn start_career(&mut self) {
        self.mode = Mode::CareerInterest;
        self.fields = CareerFields::default();
    }

    /// Drops everything collected and returns to `Idle`.
    pub fn reset(&mut self) {
        self.mode = Mode::Idle;
        self.fields = CareerFields::default();
    }

    /// Stores `answer` verbatim in the current slot and moves to the next one.
    /// Returns `None` outside the career flow.
    pub fn advance(&mut self, answer: &str) -> Option<CareerStep> {
        match self.mode {
            Mode::Idle => None,
            Mode::CareerInterest => {
                self.fields.interests = answer.to_string();
                self.mode = Mode::CareerSkills;
                Some(CareerStep::AskSkills)
            }
            Mode::CareerSkills => {
                self.fields.skills = answer.to_string();
                self.mode = Mode::CareerGoals;
                Some(CareerStep::AskGoals)
            }
            Mode::CareerGoals => {
                self.fields.goals = answer.to_string();
                let fields = std::mem::take(&mut self.fields);
                self.mode = Mode::Idle;
                Some(CareerStep::Complete(fields))
            }
        }
    }

    /// Puts a completed flow back to its last slot, keeping the earlier answers.
    /// Used when the report could not be requested at all.
    pub fn reopen_goals(&mut self, fields: CareerFields) {
        self.fields = CareerFields {
            goals: String::new(),
            ..fields
        };
        self.mode = Mode::CareerGoals;
    }
}
