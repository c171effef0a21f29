use fa_alloc::AllocError;
use fa_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("allocation failed {attempts} times in a row, giving up")]
    AllocationGaveUp {
        attempts: u32,
        #[source]
        last:     AllocError,
    },
}

pub type SimResult<T> = Result<T, SimError>;
