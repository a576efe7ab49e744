use storybook_core::Command;

mod core;

/// Describes work that must be performed outside the pure reducer.
pub(super) enum Effect {
    Audio(Command),
    QuitSafely,
}
