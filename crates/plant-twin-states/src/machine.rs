//! Water / light transitions between canned conditions

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::history::History;
use crate::state::{Condition, StateError, StateRecord};

/// A caretaker action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Water,
    ChangeLight,
}

impl FromStr for Action {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "water" => Ok(Action::Water),
            "light" | "change_light" => Ok(Action::ChangeLight),
            other => Err(StateError::UnknownAction(other.to_string())),
        }
    }
}

/// Current condition plus the history of every read
#[derive(Debug, Clone)]
pub struct StateMachine {
    condition: Condition,
    history: History,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new(Condition::Healthy)
    }
}

impl StateMachine {
    pub fn new(initial: Condition) -> Self {
        Self {
            condition: initial,
            history: History::new(),
        }
    }

    /// Start from an existing history
    pub fn with_history(initial: Condition, history: History) -> Self {
        Self {
            condition: initial,
            history,
        }
    }

    /// Start with a full history of random past reads ending at `now_ms`,
    /// the way a freshly started service presents itself.
    pub fn with_random_history<R: Rng>(initial: Condition, rng: &mut R, now_ms: u64) -> Self {
        let mut history = History::new();
        history.seed_random(rng, now_ms);
        Self::with_history(initial, history)
    }

    /// Current condition, without recording a read
    pub fn condition(&self) -> Condition {
        self.condition
    }

    /// Read the current condition. Every read is appended to the history.
    pub fn current(&mut self, now_ms: u64) -> StateRecord {
        let record = self.condition.record(now_ms);
        self.history.push(record.clone());
        record
    }

    /// Dehydrated recovers, stressed becomes light deprived, anything else
    /// is overwatered.
    pub fn water(&mut self, now_ms: u64) -> StateRecord {
        let next = match self.condition {
            Condition::Dehydrated => Condition::Healthy,
            Condition::Stressed => Condition::LightDeprived,
            _ => Condition::Overwatered,
        };
        self.transition(next, "water", now_ms)
    }

    /// Light deprived recovers, stressed becomes dehydrated, anything else
    /// is unchanged.
    pub fn change_light(&mut self, now_ms: u64) -> StateRecord {
        let next = match self.condition {
            Condition::LightDeprived => Condition::Healthy,
            Condition::Stressed => Condition::Dehydrated,
            other => other,
        };
        self.transition(next, "light", now_ms)
    }

    pub fn apply(&mut self, action: Action, now_ms: u64) -> StateRecord {
        match action {
            Action::Water => self.water(now_ms),
            Action::ChangeLight => self.change_light(now_ms),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    fn transition(&mut self, next: Condition, action: &str, now_ms: u64) -> StateRecord {
        if next != self.condition {
            log::info!("{}: {} -> {}", action, self.condition, next);
        } else {
            log::debug!("{}: stays {}", action, self.condition);
        }
        self.condition = next;
        next.record(now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_transitions() {
        let cases = [
            (Condition::Dehydrated, Condition::Healthy),
            (Condition::Stressed, Condition::LightDeprived),
            (Condition::Healthy, Condition::Overwatered),
            (Condition::LightDeprived, Condition::Overwatered),
            (Condition::Overwatered, Condition::Overwatered),
        ];
        for (from, to) in cases {
            let mut machine = StateMachine::new(from);
            assert_eq!(machine.water(0).state, to);
            assert_eq!(machine.condition(), to);
        }
    }

    #[test]
    fn test_light_transitions() {
        let cases = [
            (Condition::LightDeprived, Condition::Healthy),
            (Condition::Stressed, Condition::Dehydrated),
            (Condition::Healthy, Condition::Healthy),
            (Condition::Dehydrated, Condition::Dehydrated),
            (Condition::Overwatered, Condition::Overwatered),
        ];
        for (from, to) in cases {
            let mut machine = StateMachine::new(from);
            assert_eq!(machine.change_light(0).state, to);
        }
    }

    #[test]
    fn test_stressed_recovery_path() {
        let mut machine = StateMachine::new(Condition::Stressed);
        machine.apply(Action::ChangeLight, 0);
        machine.apply(Action::Water, 0);
        assert_eq!(machine.condition(), Condition::Healthy);
    }

    #[test]
    fn test_reads_are_recorded() {
        let mut machine = StateMachine::default();
        assert!(machine.history().is_empty());
        machine.current(10);
        machine.water(20);
        machine.current(30);

        let recent = machine.history().recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].state, Condition::Overwatered);
        assert_eq!(recent[0].timestamp_ms, 30);
        assert_eq!(recent[1].state, Condition::Healthy);
    }

    #[test]
    fn test_random_history_stays_capped() {
        use crate::history::MAX_HISTORY;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(9);
        let now = 50 * 60_000_000;
        let mut machine = StateMachine::with_random_history(Condition::Stressed, &mut rng, now);
        assert_eq!(machine.history().len(), MAX_HISTORY);
        let oldest = machine.history().iter().next().unwrap().timestamp_ms;

        machine.current(now + 1);
        machine.apply(Action::ChangeLight, now + 2);
        machine.current(now + 3);

        let history = machine.history();
        assert_eq!(history.len(), MAX_HISTORY);
        let recent = history.recent(2);
        assert_eq!(recent[0].timestamp_ms, now + 3);
        assert_eq!(recent[0].state, Condition::Dehydrated);
        assert_eq!(recent[1].state, Condition::Stressed);
        assert_eq!(history.iter().next().unwrap().timestamp_ms, oldest + 2 * 60_000);
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!("water".parse::<Action>().unwrap(), Action::Water);
        assert_eq!(" light".parse::<Action>().unwrap(), Action::ChangeLight);
        assert_eq!("change_light".parse::<Action>().unwrap(), Action::ChangeLight);
        assert!("prune".parse::<Action>().is_err());
    }
}
