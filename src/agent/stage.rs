//! Onboarding stage — tracks which step of the script the session is on.

use serde::Serialize;

/// One step of the fixed onboarding script, always in `[1, 4]`.
///
/// Serializes as its bare number (the frontend renders a numeric stepper).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Stage(u8);

impl Stage {
    pub const FIRST: Stage = Stage(1);
    pub const LAST: Stage = Stage(4);

    /// Validate an arbitrary client-supplied stage number.
    pub fn new(value: i64) -> Option<Stage> {
        if (Self::FIRST.0 as i64..=Self::LAST.0 as i64).contains(&value) {
            Some(Stage(value as u8))
        } else {
            None
        }
    }

    /// The next stage in the script, if any.
    pub fn next(&self) -> Option<Stage> {
        if *self < Self::LAST {
            Some(Stage(self.0 + 1))
        } else {
            None
        }
    }

    /// Whether this is the final stage of the script.
    pub fn is_last(&self) -> bool {
        *self == Self::LAST
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_only_script_range() {
        for value in 1..=4 {
            assert_eq!(Stage::new(value).unwrap().get(), value as u8);
        }
        assert!(Stage::new(0).is_none());
        assert!(Stage::new(5).is_none());
        assert!(Stage::new(-1).is_none());
        assert!(Stage::new(i64::MAX).is_none());
    }

    #[test]
    fn next_walks_to_last_then_stops() {
        let mut stage = Stage::FIRST;
        let mut seen = vec![stage.get()];
        while let Some(next) = stage.next() {
            assert!(next > stage, "stages only move forward");
            stage = next;
            seen.push(stage.get());
        }
        assert_eq!(seen, [1, 2, 3, 4]);
        assert!(stage.is_last());
        assert!(stage.next().is_none());
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&Stage::new(3).unwrap()).unwrap();
        assert_eq!(json, "3");
    }

    #[test]
    fn default_is_first() {
        assert_eq!(Stage::default(), Stage::FIRST);
    }
}
