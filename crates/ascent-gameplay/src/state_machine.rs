//! Generic finite state machine.
//!
//! Each state tag maps to a [`StateBehavior`]: three plain function pointers
//! run on enter, once per tick, and on exit. The machine only remembers which
//! tag is active; all durable data lives in the context passed to the
//! callbacks.

use std::fmt::Debug;
use tracing::trace;

/// Enter/execute/exit callbacks for one state.
///
/// `on_execute` returns the state to transition to, if any. The transition is
/// applied after the callback returns.
pub struct StateBehavior<S, C> {
    /// Runs when the state becomes active.
    pub on_enter: fn(&mut C),
    /// Runs once per tick while the state is active.
    pub on_execute: fn(&mut C) -> Option<S>,
    /// Runs when the state is left.
    pub on_exit: fn(&mut C),
}

impl<S, C> Clone for StateBehavior<S, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, C> Copy for StateBehavior<S, C> {}

/// Callback that does nothing, for states without enter or exit work.
pub fn noop<C>(_: &mut C) {}

/// A closed set of state tags and their behavior table.
///
/// `behavior` must be total: every tag maps to a record.
pub trait StateSet<C>: Copy + Eq + Debug {
    /// Looks up the callbacks for this tag.
    fn behavior(self) -> StateBehavior<Self, C>;
}

/// Holds the active state tag and drives transitions.
#[derive(Debug, Clone)]
pub struct StateMachine<S> {
    /// Active state, `None` until the first transition.
    current: Option<S>,
    /// Number of transitions performed, self-transitions included.
    transitions: u64,
}

impl<S: Copy + Eq + Debug> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Copy + Eq + Debug> StateMachine<S> {
    /// Creates a machine with no active state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: None,
            transitions: 0,
        }
    }

    /// Returns the active state.
    #[must_use]
    pub fn current(&self) -> Option<S> {
        self.current
    }

    /// Checks whether `candidate` is the active state.
    #[must_use]
    pub fn is_state(&self, candidate: S) -> bool {
        self.current == Some(candidate)
    }

    /// Returns how many transitions have been performed.
    #[must_use]
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Exits the active state, enters `next` and makes it active.
    ///
    /// Always re-enters, even when `next` is already active.
    pub fn change_state<C>(&mut self, next: S, ctx: &mut C)
    where
        S: StateSet<C>,
    {
        if let Some(previous) = self.current {
            (previous.behavior().on_exit)(ctx);
        }
        (next.behavior().on_enter)(ctx);

        trace!(from = ?self.current, to = ?next, "state transition");
        self.current = Some(next);
        self.transitions += 1;
    }

    /// Runs the active state's execute callback once.
    ///
    /// Does nothing when no state has been set.
    pub fn execute<C>(&mut self, ctx: &mut C)
    where
        S: StateSet<C>,
    {
        let Some(state) = self.current else {
            return;
        };

        if let Some(next) = (state.behavior().on_execute)(ctx) {
            self.change_state(next, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
    }

    #[derive(Default)]
    struct Log {
        entries: Vec<&'static str>,
        go: bool,
    }

    impl StateSet<Log> for Light {
        fn behavior(self) -> StateBehavior<Self, Log> {
            match self {
                Light::Red => StateBehavior {
                    on_enter: |log| log.entries.push("enter red"),
                    on_execute: |log| {
                        log.entries.push("execute red");
                        log.go.then_some(Light::Green)
                    },
                    on_exit: |log| log.entries.push("exit red"),
                },
                Light::Green => StateBehavior {
                    on_enter: |log| log.entries.push("enter green"),
                    on_execute: |log| {
                        log.entries.push("execute green");
                        None
                    },
                    on_exit: noop,
                },
            }
        }
    }

    #[test]
    fn test_execute_without_state_is_noop() {
        let mut machine = StateMachine::<Light>::new();
        let mut log = Log::default();

        machine.execute(&mut log);

        assert!(log.entries.is_empty());
        assert_eq!(machine.current(), None);
    }

    #[test]
    fn test_change_state_runs_exit_then_enter() {
        let mut machine = StateMachine::new();
        let mut log = Log::default();

        machine.change_state(Light::Red, &mut log);
        machine.change_state(Light::Green, &mut log);

        assert_eq!(log.entries, vec!["enter red", "exit red", "enter green"]);
        assert!(machine.is_state(Light::Green));
        assert_eq!(machine.transitions(), 2);
    }

    #[test]
    fn test_self_transition_reenters() {
        let mut machine = StateMachine::new();
        let mut log = Log::default();

        machine.change_state(Light::Red, &mut log);
        machine.change_state(Light::Red, &mut log);

        assert_eq!(log.entries, vec!["enter red", "exit red", "enter red"]);
        assert_eq!(machine.transitions(), 2);
    }

    #[test]
    fn test_execute_applies_requested_transition_after_callback() {
        let mut machine = StateMachine::new();
        let mut log = Log::default();
        machine.change_state(Light::Red, &mut log);
        log.entries.clear();

        machine.execute(&mut log);
        assert_eq!(log.entries, vec!["execute red"]);
        assert!(machine.is_state(Light::Red));

        log.go = true;
        machine.execute(&mut log);
        assert_eq!(
            log.entries,
            vec!["execute red", "execute red", "exit red", "enter green"]
        );
        assert!(machine.is_state(Light::Green));
    }

    #[test]
    fn test_is_state_is_pure() {
        let mut machine = StateMachine::new();
        let mut log = Log::default();
        machine.change_state(Light::Green, &mut log);

        assert!(machine.is_state(Light::Green));
        assert!(!machine.is_state(Light::Red));
        assert_eq!(machine.transitions(), 1);
        assert_eq!(log.entries, vec!["enter green"]);
    }
}
