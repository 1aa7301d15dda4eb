/// Answer of an update callback's `before_update` hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Walk the parent groups and perform the update at each one
    Proceed,
    /// Abort the whole propagation without touching any group
    Stop,
}
