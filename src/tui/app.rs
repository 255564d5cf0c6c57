mod state;

pub use state::{AppState, InputAction, Scene, Tally};
