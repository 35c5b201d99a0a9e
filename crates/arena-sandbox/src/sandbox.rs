//! [`ActorSandbox`] — one isolated script instance per actor.
//!
//! # Lifecycle
//!
//! 1. **Compile** the behavior source.  It must define `fn main()` with no
//!    parameters.
//! 2. **Bootstrap**: the script's top-level statements run exactly once, with
//!    a fresh empty map bound to the variable `memory`.
//! 3. **Step**: every call to [`ActorSandbox::step`] invokes `main` as a
//!    method on `memory`, so inside `main` the actor's private state is
//!    `this`.  Changes persist to the next step.
//!
//! Each sandbox owns its own engine, scope, and memory map.  Nothing created
//! by one actor's script is reachable from another's.
//!
//! # Limits
//!
//! Every step runs under the [`SandboxLimits`] it was created with.  Running
//! out of operations, memory, call depth, or wall-clock time aborts the step
//! with a [`ScriptFault`]; the sandbox stays usable for the next one.
//!
//! Memory is charged per sandbox, not per step: bytes a script leaves
//! reachable (in `memory` or top-level variables) count against every later
//! step until it lets go of them.  See [`CountingAllocator`][crate::CountingAllocator].

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use arena_core::{BehaviorType, SandboxLimits};
use rhai::{AST, Engine, Scope};

use crate::bridge::CapabilityBridge;
use crate::engine::{RunBudget, limited_engine, register_bridge};
use crate::error::{SandboxError, SandboxResult, ScriptFault};

/// Name of the per-step entry point a behavior must define.
pub const ENTRY_POINT: &str = "main";

/// Script variable holding the actor's private state.
pub const MEMORY_VAR: &str = "memory";

pub struct ActorSandbox<B: CapabilityBridge + 'static> {
    behavior_type: BehaviorType,
    engine:        Engine,
    scope:         Scope<'static>,
    /// Behavior functions plus a single `memory.main()` statement.
    invoke:        AST,
    bridge:        Rc<RefCell<B>>,
    budget:        Rc<RunBudget>,
}

impl<B: CapabilityBridge + 'static> ActorSandbox<B> {
    /// Compile `source`, bootstrap it, and bind it to `bridge`.
    pub fn new(
        source:        &str,
        behavior_type: BehaviorType,
        limits:        &SandboxLimits,
        bridge:        B,
    ) -> SandboxResult<Self> {
        let budget = Rc::new(RunBudget::new(limits));
        let bridge = Rc::new(RefCell::new(bridge));

        let mut engine = limited_engine(limits, &budget);
        register_bridge(&mut engine, &bridge);

        let compile_error = |message: String| SandboxError::Compile {
            behavior: behavior_type.clone(),
            message,
        };

        let behavior = engine
            .compile(source)
            .map_err(|e| compile_error(e.to_string()))?;

        let has_entry_point = behavior
            .iter_functions()
            .any(|f| f.name == ENTRY_POINT && f.params.is_empty());
        if !has_entry_point {
            return Err(SandboxError::MissingEntryPoint { behavior: behavior_type.clone() });
        }

        let call = engine
            .compile(format!("{MEMORY_VAR}.{ENTRY_POINT}();"))
            .map_err(|e| compile_error(e.to_string()))?;
        let invoke = behavior.clone_functions_only().merge(&call);

        let mut sandbox = Self {
            behavior_type,
            engine,
            scope: Scope::new(),
            invoke,
            bridge,
            budget,
        };
        sandbox.scope.push(MEMORY_VAR, rhai::Map::new());

        sandbox.budget.arm();
        let bootstrap = sandbox.engine.run_ast_with_scope(&mut sandbox.scope, &behavior);
        sandbox.budget.disarm();

        if let Err(err) = bootstrap {
            return Err(SandboxError::Bootstrap {
                behavior: sandbox.behavior_type,
                fault:    ScriptFault::from_eval(&err),
            });
        }

        tracing::trace!(behavior = %sandbox.behavior_type, "sandbox ready");
        Ok(sandbox)
    }

    /// Run `main` once.
    ///
    /// Bridge calls made by the script reach the bridge synchronously, before
    /// this returns.  A fault leaves the sandbox and its memory in whatever
    /// state the script had reached; the caller decides what else to do.
    pub fn step(&mut self) -> Result<(), ScriptFault> {
        self.budget.arm();
        let result = self.engine.run_ast_with_scope(&mut self.scope, &self.invoke);
        self.budget.disarm();
        result.map_err(|err| ScriptFault::from_eval(&err))
    }

    #[inline]
    pub fn behavior_type(&self) -> &BehaviorType {
        &self.behavior_type
    }

    /// Host-side access to the bridge between steps.
    ///
    /// The borrow ties up `self`, so it can never be held across a `step`.
    #[inline]
    pub fn bridge(&self) -> RefMut<'_, B> {
        self.bridge.borrow_mut()
    }

    /// Heap bytes the script still holds between steps.
    ///
    /// Always zero unless [`CountingAllocator`][crate::CountingAllocator] is
    /// the global allocator.
    #[inline]
    pub fn heap_bytes(&self) -> usize {
        usize::try_from(self.budget.held()).unwrap_or(0)
    }
}

impl<B: CapabilityBridge + 'static> std::fmt::Debug for ActorSandbox<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorSandbox")
            .field("behavior_type", &self.behavior_type)
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}
