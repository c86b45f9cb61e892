use foundation::geo::Size;
use foundation::time::Time;
use runtime::Debouncer;
use tracing::debug;
use viewport::ViewportState;

use crate::widget::MapWidget;

/// Debounced window-resize handling.
///
/// Raw resize events arrive in bursts while the user drags a window edge;
/// only the last size of a burst is committed, once the window has been
/// quiet for the configured delay.
#[derive(Debug, Clone)]
pub struct ResizeObserver {
    debouncer: Debouncer<Size>,
}

impl ResizeObserver {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            debouncer: Debouncer::from_millis(delay_ms),
        }
    }

    pub fn on_resize(&mut self, now: Time, size: Size) {
        self.debouncer.push(now, size);
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Commits a settled size to the widget and the state.
    ///
    /// Returns `true` when the state's window size changed.
    pub fn poll<W: MapWidget + ?Sized>(
        &mut self,
        now: Time,
        state: &mut ViewportState,
        widget: &mut W,
    ) -> bool {
        let Some(size) = self.debouncer.poll(now) else {
            return false;
        };
        debug!(width = size.width, height = size.height, "window resized");
        widget.resize(size);
        let changed = state.set_window_size(size);
        // A new canvas shows a different region.
        state.set_viewport_params(None, None, Some(widget.bounds()));
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::ResizeObserver;
    use crate::headless::HeadlessMap;
    use crate::widget::MapWidget;
    use foundation::geo::Size;
    use foundation::time::Time;
    use viewport::ViewportState;

    #[test]
    fn burst_of_resizes_writes_window_size_once() {
        let mut state = ViewportState::default();
        let mut map = HeadlessMap::from_config(state.config());
        let mut observer = ResizeObserver::new(state.config().resize_debounce_ms);

        // Ten events within 100 ms.
        for i in 0..10 {
            let now = Time::from_millis(i as f64 * 10.0);
            observer.on_resize(now, Size::new(900.0 + i as f64, 700.0));
            assert!(!observer.poll(now, &mut state, &mut map));
        }
        for ms in (100..=2000).step_by(50) {
            observer.poll(Time::from_millis(ms as f64), &mut state, &mut map);
        }

        assert_eq!(state.revisions().window_size, 1);
        assert_eq!(state.window_size(), Size::new(909.0, 700.0));
        assert_eq!(map.camera().size, Size::new(909.0, 700.0));
        assert_eq!(state.bounds(), map.bounds());
    }

    #[test]
    fn separated_resizes_each_commit() {
        let mut state = ViewportState::default();
        let mut map = HeadlessMap::from_config(state.config());
        let mut observer = ResizeObserver::new(500);

        observer.on_resize(Time(0.0), Size::new(800.0, 600.0));
        assert!(observer.poll(Time(1.0), &mut state, &mut map));
        observer.on_resize(Time(2.0), Size::new(1024.0, 768.0));
        assert!(!observer.poll(Time(2.1), &mut state, &mut map));
        assert!(observer.poll(Time(3.0), &mut state, &mut map));
        assert_eq!(state.revisions().window_size, 2);
        assert!(!observer.is_pending());
    }
}
