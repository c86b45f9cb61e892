/// Field of [`crate::ViewportState`] touched by a mutation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    Center,
    Zoom,
    Bounds,
    WindowSize,
    Initialized,
    SelectedSite,
    Sites,
    /// A programmatic viewport change was requested.
    Transition,
    /// The widget projection was installed.
    Projection,
}

/// Notification published on the state's bus for every effective write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub topic: Topic,
    /// Revision of the field after the write.
    pub revision: u64,
}
