/// Main configuration module.
///
/// Re-exports submodules for game rules and polling/retry behavior.
pub mod game;
pub mod retry;
