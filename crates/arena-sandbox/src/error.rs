use std::fmt;

use arena_core::BehaviorType;
use rhai::EvalAltResult;
use thiserror::Error;

use crate::engine::MEMORY_QUOTA_EXCEEDED;

/// Fatal, creation-time failures.  Never produced by [`step`][crate::ActorSandbox::step].
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("behavior `{behavior}` failed to compile: {message}")]
    Compile {
        behavior: BehaviorType,
        message:  String,
    },

    #[error("behavior `{behavior}` does not define a parameterless `fn main()`")]
    MissingEntryPoint { behavior: BehaviorType },

    #[error("behavior `{behavior}` failed while bootstrapping: {fault}")]
    Bootstrap {
        behavior: BehaviorType,
        fault:    ScriptFault,
    },
}

pub type SandboxResult<T> = Result<T, SandboxError>;

// ── ScriptFault ───────────────────────────────────────────────────────────────

/// Why a script step was aborted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Uncaught exception, type error, bad bridge argument, …
    Runtime,
    /// The per-step operation budget ran out.
    OperationLimit,
    /// The sandbox's heap (or a single value) outgrew the memory quota, or
    /// the call stack got too deep.
    MemoryQuota,
    /// The step ran past its wall-clock deadline.
    Timeout,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FaultKind::Runtime        => "runtime",
            FaultKind::OperationLimit => "operation-limit",
            FaultKind::MemoryQuota    => "memory-quota",
            FaultKind::Timeout        => "timeout",
        })
    }
}

/// A recoverable failure of one script step.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} fault: {message}")]
pub struct ScriptFault {
    pub kind:    FaultKind,
    pub message: String,
}

impl ScriptFault {
    pub(crate) fn from_eval(err: &EvalAltResult) -> Self {
        Self {
            kind:    classify(err),
            message: err.to_string(),
        }
    }
}

fn classify(err: &EvalAltResult) -> FaultKind {
    match err {
        EvalAltResult::ErrorTooManyOperations(..) => FaultKind::OperationLimit,
        EvalAltResult::ErrorDataTooLarge(..) | EvalAltResult::ErrorStackOverflow(..) => {
            FaultKind::MemoryQuota
        }
        EvalAltResult::ErrorTerminated(token, _) => {
            if token.clone().into_string().is_ok_and(|t| t == MEMORY_QUOTA_EXCEEDED) {
                FaultKind::MemoryQuota
            } else {
                FaultKind::Timeout
            }
        }
        EvalAltResult::ErrorInFunctionCall(_, _, inner, _) => classify(inner),
        EvalAltResult::ErrorInModule(_, inner, _) => classify(inner),
        _ => FaultKind::Runtime,
    }
}
