//! Engine construction: resource limits, closed host channels, and the
//! bridge functions.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use arena_core::SandboxLimits;
use rhai::module_resolvers::DummyModuleResolver;
use rhai::{Dynamic, Engine, EvalAltResult, Position};
use serde_json::Value;

use crate::bridge::CapabilityBridge;
use crate::meter::thread_balance;

/// Termination token for a run that outgrew the memory quota.
pub(crate) const MEMORY_QUOTA_EXCEEDED: &str = "memory quota exceeded";

/// Termination token for a run that passed its wall-clock deadline.
pub(crate) const DEADLINE_EXCEEDED: &str = "step deadline exceeded";

/// Largest `log` call a script can make.
pub const MAX_LOG_ARGS: usize = 16;

// ── RunBudget ─────────────────────────────────────────────────────────────────

/// Memory and time accounting for one sandbox, shared with its engine's
/// progress hook.
///
/// Between runs only `retained` is meaningful: the heap bytes the sandbox
/// still holds (its scope, its memory map, anything they reference).
#[derive(Debug)]
pub(crate) struct RunBudget {
    quota:    isize,
    timeout:  Option<Duration>,
    retained: Cell<isize>,
    /// Thread balance when the current run started.
    baseline: Cell<Option<isize>>,
    deadline: Cell<Option<Instant>>,
}

impl RunBudget {
    pub(crate) fn new(limits: &SandboxLimits) -> Self {
        Self {
            quota:    isize::try_from(limits.memory_bytes()).unwrap_or(isize::MAX),
            timeout:  limits.step_timeout(),
            retained: Cell::new(0),
            baseline: Cell::new(None),
            deadline: Cell::new(None),
        }
    }

    /// Start metering a script run on the calling thread.
    pub(crate) fn arm(&self) {
        self.baseline.set(Some(thread_balance()));
        self.deadline.set(self.timeout.map(|t| Instant::now() + t));
    }

    /// Stop metering and keep whatever the run left allocated.
    pub(crate) fn disarm(&self) {
        self.retained.set(self.held().max(0));
        self.baseline.set(None);
        self.deadline.set(None);
    }

    /// Heap bytes currently charged to the sandbox.
    pub(crate) fn held(&self) -> isize {
        match self.baseline.get() {
            Some(start) => self.retained.get() + (thread_balance() - start),
            None => self.retained.get(),
        }
    }

    /// Why the running script must stop, if it must.
    ///
    /// A sandbox left over quota by an earlier run may still run, as long as
    /// this run does not add to the heap.
    fn exceeded(&self) -> Option<&'static str> {
        if let Some(start) = self.baseline.get() {
            let grown = thread_balance() - start;
            if grown > 0 && self.retained.get() + grown > self.quota {
                return Some(MEMORY_QUOTA_EXCEEDED);
            }
        }
        match self.deadline.get() {
            Some(at) if Instant::now() >= at => Some(DEADLINE_EXCEEDED),
            _ => None,
        }
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// A fresh engine with every limit applied and nothing of the host visible
/// beyond rhai's pure standard library.
pub(crate) fn limited_engine(limits: &SandboxLimits, budget: &Rc<RunBudget>) -> Engine {
    let mut engine = Engine::new();

    engine
        .set_max_operations(limits.max_operations)
        .set_max_call_levels(limits.max_call_levels)
        .set_max_expr_depths(limits.max_expr_depth, limits.max_function_expr_depth)
        .set_max_string_size(limits.memory_bytes())
        .set_max_array_size(limits.max_collection_len())
        .set_max_map_size(limits.max_collection_len());

    // No filesystem modules, no dynamic code, no stdout.
    engine.set_module_resolver(DummyModuleResolver::new());
    engine.disable_symbol("eval");
    engine.on_print(|_| {});
    engine.on_debug(|_, _, _| {});

    let budget = Rc::clone(budget);
    engine.on_progress(move |_ops| budget.exceeded().map(Dynamic::from));

    engine
}

macro_rules! register_log {
    ($engine:expr, $bridge:expr; $($arg:ident)*) => {{
        let bridge = Rc::clone($bridge);
        $engine.register_fn("log", move |$($arg: Dynamic),*| forward_log(&bridge, [$($arg),*]));
    }};
}

/// Registers `log` for every arity from the full argument list down to zero.
macro_rules! register_log_arities {
    ($engine:expr, $bridge:expr;) => {
        register_log!($engine, $bridge;);
    };
    ($engine:expr, $bridge:expr; $head:ident $($tail:ident)*) => {
        register_log!($engine, $bridge; $head $($tail)*);
        register_log_arities!($engine, $bridge; $($tail)*);
    };
}

/// Installs `log`, `changeSpeed`, and `getNearbyActors`.
///
/// `log` takes zero to [`MAX_LOG_ARGS`] arguments; rhai dispatches on arity.
pub(crate) fn register_bridge<B>(engine: &mut Engine, bridge: &Rc<RefCell<B>>)
where
    B: CapabilityBridge + 'static,
{
    register_log_arities!(engine, bridge; a b c d e f g h i j k l m n o p);

    let b = Rc::clone(bridge);
    engine.register_fn(
        "changeSpeed",
        move |x: Dynamic, y: Dynamic| -> Result<(), Box<EvalAltResult>> {
            let x = speed_component(&x, "x")?;
            let y = speed_component(&y, "y")?;
            b.borrow_mut().change_speed(x, y);
            Ok(())
        },
    );

    let b = Rc::clone(bridge);
    engine.register_fn(
        "getNearbyActors",
        move || -> Result<Dynamic, Box<EvalAltResult>> {
            let neighbors = b.borrow().get_nearby_actors();
            rhai::serde::to_dynamic(&neighbors)
        },
    );
}

// ── Boundary copies ───────────────────────────────────────────────────────────

fn forward_log<B, const N: usize>(
    bridge: &Rc<RefCell<B>>,
    values: [Dynamic; N],
) -> Result<(), Box<EvalAltResult>>
where
    B: CapabilityBridge,
{
    let copied = values
        .iter()
        .map(copy_out)
        .collect::<Result<Vec<_>, _>>()?;
    bridge.borrow_mut().log(copied);
    Ok(())
}

/// Deep-copies a script value into host-owned JSON.  Values with no plain-data
/// form (function pointers, timestamps, custom types) are rejected.
fn copy_out(value: &Dynamic) -> Result<Value, Box<EvalAltResult>> {
    let flat = value.flatten_clone();
    rhai::serde::from_dynamic::<Value>(&flat).map_err(|_| {
        runtime_error(format!(
            "log: a value of type `{}` cannot cross the sandbox boundary",
            flat.type_name()
        ))
    })
}

fn speed_component(value: &Dynamic, name: &str) -> Result<f64, Box<EvalAltResult>> {
    let n = if let Ok(f) = value.as_float() {
        f
    } else if let Ok(i) = value.as_int() {
        i as f64
    } else {
        return Err(runtime_error(format!(
            "changeSpeed: `{name}` must be a number, got `{}`",
            value.type_name()
        )));
    };
    if !n.is_finite() {
        return Err(runtime_error(format!("changeSpeed: `{name}` must be finite, got {n}")));
    }
    Ok(n)
}

fn runtime_error(message: String) -> Box<EvalAltResult> {
    Box::new(EvalAltResult::ErrorRuntime(message.into(), Position::NONE))
}
