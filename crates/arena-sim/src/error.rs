use arena_core::{BehaviorType, CoreError, Vec2};
use arena_sandbox::SandboxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("no behavior script registered for type `{0}`")]
    UnknownBehavior(BehaviorType),

    #[error("could not create a `{behavior}` actor: {source}")]
    Sandbox {
        behavior: BehaviorType,
        #[source]
        source:   SandboxError,
    },

    #[error("initial position {position} lies outside the {width} x {height} world")]
    PositionOutOfBounds {
        position: Vec2,
        width:    f64,
        height:   f64,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
