use log::{Level, LevelFilter};

/// Decides which record levels a sink accepts.
pub trait LevelEnabler: Send + Sync {
    fn enabled(&self, level: Level) -> bool;
}

/// Minimum severity: accepts the level itself and everything more severe.
impl LevelEnabler for LevelFilter {
    fn enabled(&self, level: Level) -> bool {
        level <= *self
    }
}

/// Accepts records of exactly one level.
///
/// More severe records are rejected too: an `ExactLevel(Level::Info)` sink
/// never sees warnings or errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactLevel(pub Level);

impl LevelEnabler for ExactLevel {
    fn enabled(&self, level: Level) -> bool {
        level == self.0
    }
}

/// Arbitrary predicate over levels.
pub struct LevelFn<F>(pub F);

impl<F> LevelEnabler for LevelFn<F>
where
    F: Fn(Level) -> bool + Send + Sync,
{
    fn enabled(&self, level: Level) -> bool {
        (self.0)(level)
    }
}
