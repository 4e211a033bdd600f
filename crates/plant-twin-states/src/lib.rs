//! Canned plant conditions for plant-twin - state transitions and rolling history
//!
//! Drive a plant through the five canned conditions:
//! ```
//! use plant_twin_states::{Action, Condition, StateMachine};
//!
//! let mut machine = StateMachine::new(Condition::Dehydrated);
//! machine.apply(Action::Water, 0);
//! assert_eq!(machine.condition(), Condition::Healthy);
//! ```

pub mod history;
pub mod machine;
pub mod state;

pub use history::{History, MAX_HISTORY};
pub use machine::{Action, StateMachine};
pub use state::{Condition, StateError, StateRecord};
