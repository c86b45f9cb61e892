use foundation::time::Time;

/// Trailing-edge debouncer.
///
/// Each `push` replaces the pending value and restarts the quiet period.
/// `poll` hands out the latest value once `delay_s` has passed without a new
/// push, so a burst of inputs collapses into a single output.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_s: f64,
    pending: Option<(Time, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_s: f64) -> Self {
        Self {
            delay_s: delay_s.max(0.0),
            pending: None,
        }
    }

    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(delay_ms as f64 / 1000.0)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn push(&mut self, now: Time, value: T) {
        self.pending = Some((now, value));
    }

    /// Returns the pending value if the quiet period has elapsed at `now`.
    pub fn poll(&mut self, now: Time) -> Option<T> {
        let ready = match &self.pending {
            Some((last, _)) => now.since(*last) >= self.delay_s,
            None => false,
        };
        if !ready {
            return None;
        }
        self.pending.take().map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use foundation::time::Time;

    #[test]
    fn burst_collapses_to_last_value() {
        let mut d = Debouncer::from_millis(500);
        for i in 0..10 {
            d.push(Time::from_millis(i as f64 * 10.0), i);
        }
        assert_eq!(d.poll(Time::from_millis(300.0)), None);
        assert_eq!(d.poll(Time::from_millis(600.0)), Some(9));
        assert_eq!(d.poll(Time::from_millis(2000.0)), None);
    }

    #[test]
    fn new_push_restarts_quiet_period() {
        let mut d = Debouncer::new(0.5);
        d.push(Time(0.0), "a");
        d.push(Time(0.4), "b");
        assert_eq!(d.poll(Time(0.6)), None);
        assert!(d.is_pending());
        assert_eq!(d.poll(Time(1.0)), Some("b"));
        assert!(!d.is_pending());
    }
}
