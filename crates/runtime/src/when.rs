/// One-shot reaction: runs its effect the first time a condition holds and
/// never again.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct When {
    fired: bool,
}

impl When {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `effect` if `condition` holds and the latch has not fired yet.
    ///
    /// Returns `Some` with the effect's result on the firing call only.
    pub fn check<R>(&mut self, condition: bool, effect: impl FnOnce() -> R) -> Option<R> {
        if self.fired || !condition {
            return None;
        }
        self.fired = true;
        Some(effect())
    }
}

#[cfg(test)]
mod tests {
    use super::When;

    #[test]
    fn fires_once_when_condition_becomes_true() {
        let mut when = When::new();
        let mut runs = 0;
        assert_eq!(when.check(false, || runs += 1), None);
        assert_eq!(when.check(true, || runs += 1), Some(()));
        assert_eq!(when.check(true, || runs += 1), None);
        assert_eq!(runs, 1);
    }
}
