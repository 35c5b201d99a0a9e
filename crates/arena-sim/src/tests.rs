//! Integration tests for arena-sim.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use arena_core::{ActorId, BehaviorType, Bounds, SandboxLimits, Tick, Vec2, WorldConfig};
use arena_sandbox::ScriptFault;
use serde_json::{Value, json};

use crate::{ActorSnapshot, NoopObserver, SimBuilder, SimObserver, TickSummary};

// ── Helpers ───────────────────────────────────────────────────────────────────

const IDLE: &str = "fn main() {}";

fn test_config() -> WorldConfig {
    WorldConfig {
        bounds:         Bounds::new(1400.0, 1000.0),
        max_speed:      10.0,
        range:          500.0,
        sandbox:        SandboxLimits::default(),
        tick_period_ms: 1,
        seed:           42,
        total_ticks:    None,
    }
}

/// Captures every script `log` call.
#[derive(Default)]
struct RecordingSink {
    lines: RefCell<Vec<(ActorId, BehaviorType, Vec<Value>)>>,
}

impl crate::ScriptLogSink for RecordingSink {
    fn log(&self, actor: ActorId, behavior_type: &BehaviorType, values: &[Value]) {
        self.lines
            .borrow_mut()
            .push((actor, behavior_type.clone(), values.to_vec()));
    }
}

impl RecordingSink {
    fn values_from(&self, actor: ActorId) -> Vec<Vec<Value>> {
        self.lines
            .borrow()
            .iter()
            .filter(|(id, _, _)| *id == actor)
            .map(|(_, _, v)| v.clone())
            .collect()
    }
}

/// Captures every observer callback.
#[derive(Default)]
struct Recorder {
    starts:    Vec<Tick>,
    snapshots: Vec<(Tick, ActorSnapshot)>,
    faults:    Vec<(Tick, ActorId, ScriptFault)>,
    summaries: Vec<TickSummary>,
    ended:     Option<Tick>,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, tick: Tick) {
        self.starts.push(tick);
    }
    fn on_actor_snapshot(&mut self, tick: Tick, snapshot: &ActorSnapshot) {
        self.snapshots.push((tick, snapshot.clone()));
    }
    fn on_script_fault(&mut self, tick: Tick, actor: ActorId, fault: &ScriptFault) {
        self.faults.push((tick, actor, fault.clone()));
    }
    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.summaries.push(*summary);
    }
    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;
    use arena_sandbox::SandboxError;

    #[test]
    fn builds_with_spawned_actors() {
        let sim = SimBuilder::new(test_config())
            .behavior("actor1", IDLE)
            .behavior("actor2", IDLE)
            .spawn("actor1", 18)
            .spawn("actor2", 9)
            .build()
            .unwrap();
        assert_eq!(sim.actors().len(), 27);
        assert_eq!(sim.snapshot(ActorId(17)).unwrap().behavior_type.as_str(), "actor1");
        assert_eq!(sim.snapshot(ActorId(18)).unwrap().behavior_type.as_str(), "actor2");
        for r in sim.actors().iter() {
            assert!(test_config().bounds.contains(r.position()));
            assert_eq!(r.velocity(), Vec2::ZERO);
            assert_eq!(r.crash_count(), 0);
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let build = || {
            SimBuilder::new(test_config())
                .behavior("a", IDLE)
                .spawn("a", 10)
                .build()
                .unwrap()
                .snapshots()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn unknown_behavior_errors() {
        let err = SimBuilder::new(test_config()).spawn("ghost", 1).build().unwrap_err();
        assert!(matches!(err, SimError::UnknownBehavior(ref t) if t.as_str() == "ghost"), "{err}");
    }

    #[test]
    fn compile_failure_errors() {
        let err = SimBuilder::new(test_config())
            .behavior("broken", "fn main( {")
            .spawn("broken", 1)
            .build()
            .unwrap_err();
        assert!(
            matches!(err, SimError::Sandbox { source: SandboxError::Compile { .. }, .. }),
            "{err}"
        );
    }

    #[test]
    fn missing_entry_point_errors() {
        let err = SimBuilder::new(test_config())
            .behavior("empty", "let x = 1;")
            .spawn("empty", 1)
            .build()
            .unwrap_err();
        assert!(
            matches!(err, SimError::Sandbox { source: SandboxError::MissingEntryPoint { .. }, .. }),
            "{err}"
        );
    }

    #[test]
    fn out_of_bounds_position_errors() {
        let err = SimBuilder::new(test_config())
            .behavior("a", IDLE)
            .spawn_at("a", Vec2::new(1500.0, 10.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::PositionOutOfBounds { .. }), "{err}");
    }

    #[test]
    fn invalid_config_errors() {
        let config = WorldConfig { max_speed: -1.0, ..test_config() };
        let err = SimBuilder::new(config).build().unwrap_err();
        assert!(matches!(err, SimError::Config(_)), "{err}");
    }

    #[test]
    fn unknown_actor_snapshot_errors() {
        let sim = SimBuilder::new(test_config()).build().unwrap();
        assert!(matches!(sim.snapshot(ActorId(0)), Err(SimError::Core(_))));
    }

    #[test]
    fn failed_add_leaves_world_unchanged() {
        let mut sim = SimBuilder::new(test_config())
            .behavior("a", IDLE)
            .spawn_at("a", Vec2::new(1.0, 1.0))
            .build()
            .unwrap();
        sim.register_behavior("bad", "throw \"boot\"; fn main() {}".to_string());
        assert!(sim.add_actor("bad", Vec2::new(2.0, 2.0)).is_err());
        assert_eq!(sim.actors().len(), 1);
        assert_eq!(sim.add_actor("a", Vec2::new(3.0, 3.0)).unwrap(), ActorId(1));
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod movement_tests {
    use super::*;

    #[test]
    fn change_speed_is_clamped_to_max_speed() {
        let mut sim = SimBuilder::new(test_config())
            .behavior("fast", "fn main() { changeSpeed(100, 0); }")
            .spawn_at("fast", Vec2::new(100.0, 100.0))
            .build()
            .unwrap();
        sim.run_ticks(1, &mut NoopObserver);
        let r = sim.actors().record(ActorId(0));
        assert_eq!(r.velocity(), Vec2::new(10.0, 0.0));
        assert_eq!(r.position(), Vec2::new(110.0, 100.0));
    }

    #[test]
    fn clamp_preserves_direction() {
        let mut sim = SimBuilder::new(test_config())
            .behavior("diag", "fn main() { changeSpeed(-30, 40.0); }")
            .spawn_at("diag", Vec2::new(500.0, 500.0))
            .build()
            .unwrap();
        sim.run_ticks(1, &mut NoopObserver);
        let v = sim.actors().velocity(ActorId(0));
        assert!((v.x + 6.0).abs() < 1e-9 && (v.y - 8.0).abs() < 1e-9, "{v}");
    }

    #[test]
    fn slow_request_is_kept_exactly() {
        let mut sim = SimBuilder::new(test_config())
            .behavior("slow", "fn main() { changeSpeed(3, -4); }")
            .spawn_at("slow", Vec2::new(50.0, 50.0))
            .build()
            .unwrap();
        sim.run_ticks(2, &mut NoopObserver);
        assert_eq!(sim.actors().position(ActorId(0)), Vec2::new(56.0, 42.0));
    }

    #[test]
    fn stops_at_the_wall() {
        let config = test_config();
        let width = config.bounds.width;
        let mut sim = SimBuilder::new(config)
            .behavior("east", "fn main() { changeSpeed(10, 0); }")
            .spawn_at("east", Vec2::new(width - 3.0, 500.0))
            .build()
            .unwrap();
        sim.run_ticks(1, &mut NoopObserver);
        assert_eq!(sim.actors().position(ActorId(0)).x, width);
        sim.run_ticks(5, &mut NoopObserver);
        assert_eq!(sim.actors().position(ActorId(0)), Vec2::new(width, 500.0));
    }

    #[test]
    fn all_actors_stay_in_bounds() {
        struct BoundsCheck(Bounds, usize);
        impl SimObserver for BoundsCheck {
            fn on_actor_snapshot(&mut self, _t: Tick, s: &ActorSnapshot) {
                assert!(self.0.contains(s.position), "{:?}", s);
                self.1 += 1;
            }
        }

        let config = WorldConfig { bounds: Bounds::new(120.0, 80.0), ..test_config() };
        let mut sim = SimBuilder::new(config)
            .behavior(
                "jitter",
                r#"
                memory.t = 0;
                fn main() {
                    this.t += 1;
                    let n = getNearbyActors().len();
                    changeSpeed((n * 3 + this.t) % 23 - 11, 9 - (n * 7 + this.t) % 19);
                }
                "#,
            )
            .spawn("jitter", 25)
            .build()
            .unwrap();
        let mut check = BoundsCheck(Bounds::new(120.0, 80.0), 0);
        sim.run_ticks(60, &mut check);
        assert_eq!(check.1, 25 * 60);
    }

    #[test]
    fn bootstrap_speed_is_kept() {
        let mut sim = SimBuilder::new(test_config())
            .behavior("eager", "changeSpeed(0, 2); fn main() {}")
            .spawn_at("eager", Vec2::new(10.0, 10.0))
            .build()
            .unwrap();
        assert_eq!(sim.actors().velocity(ActorId(0)), Vec2::new(0.0, 2.0));
        sim.run_ticks(1, &mut NoopObserver);
        assert_eq!(sim.actors().position(ActorId(0)), Vec2::new(10.0, 12.0));
    }
}

// ── Perception through the bridge ─────────────────────────────────────────────

#[cfg(test)]
mod perception_tests {
    use super::*;

    #[test]
    fn two_actor_scenario() {
        let sink = Rc::new(RecordingSink::default());
        let mut sim = SimBuilder::new(test_config())
            .behavior("A", "fn main() { log(getNearbyActors()); }")
            .behavior("B", IDLE)
            .spawn_at("A", Vec2::new(0.0, 0.0))
            .spawn_at("B", Vec2::new(10.0, 0.0))
            .log_sink(Rc::clone(&sink))
            .build()
            .unwrap();
        sim.run_ticks(1, &mut NoopObserver);

        assert_eq!(sink.values_from(ActorId(0)), vec![vec![json!([
            { "position": { "x": 10.0, "y": 0.0 }, "type": "B" }
        ])]]);
    }

    #[test]
    fn out_of_range_actors_are_invisible() {
        let config = WorldConfig { range: 50.0, ..test_config() };
        let sink = Rc::new(RecordingSink::default());
        let mut sim = SimBuilder::new(config)
            .behavior("looker", "fn main() { log(getNearbyActors().len()); }")
            .behavior("other", IDLE)
            .spawn_at("looker", Vec2::new(100.0, 100.0))
            .spawn_at("other", Vec2::new(150.0, 100.0))
            .spawn_at("other", Vec2::new(151.0, 100.0))
            .log_sink(Rc::clone(&sink))
            .build()
            .unwrap();
        sim.run_ticks(1, &mut NoopObserver);
        assert_eq!(sink.values_from(ActorId(0)), vec![vec![json!(1)]]);
    }

    #[test]
    fn later_actor_sees_sweep_start_positions() {
        // Actor 0 moves first; actor 1 must still see where it started.
        let sink = Rc::new(RecordingSink::default());
        let mut sim = SimBuilder::new(test_config())
            .behavior("mover", "fn main() { changeSpeed(10, 0); }")
            .behavior("watcher", "fn main() { log(getNearbyActors()[0].position.x); }")
            .spawn_at("mover", Vec2::new(100.0, 100.0))
            .spawn_at("watcher", Vec2::new(300.0, 100.0))
            .log_sink(Rc::clone(&sink))
            .build()
            .unwrap();
        sim.run_ticks(2, &mut NoopObserver);

        assert_eq!(sink.values_from(ActorId(1)), vec![vec![json!(-200.0)], vec![json!(-190.0)]]);
        assert_eq!(sim.actors().position(ActorId(0)), Vec2::new(120.0, 100.0));
    }

    #[test]
    fn log_is_tagged_with_actor_and_type() {
        let sink = Rc::new(RecordingSink::default());
        let mut sim = SimBuilder::new(test_config())
            .behavior("talker", "fn main() { log(\"hi\", 3); }")
            .spawn_at("talker", Vec2::new(1.0, 1.0))
            .spawn_at("talker", Vec2::new(2.0, 2.0))
            .log_sink(Rc::clone(&sink))
            .build()
            .unwrap();
        sim.run_ticks(1, &mut NoopObserver);

        let lines = sink.lines.borrow();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].0, ActorId(1));
        assert_eq!(lines[1].1.as_str(), "talker");
        assert_eq!(lines[1].2, vec![json!("hi"), json!(3)]);
    }
}

// ── Faults ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod fault_tests {
    use super::*;
    use arena_sandbox::FaultKind;

    #[test]
    fn fault_counts_once_and_spares_neighbors() {
        let mut rec = Recorder::default();
        let mut sim = SimBuilder::new(test_config())
            .behavior("bad", "fn main() { throw \"boom\"; }")
            .behavior("good", "fn main() { changeSpeed(1, 0); }")
            .spawn_at("good", Vec2::new(10.0, 10.0))
            .spawn_at("bad", Vec2::new(20.0, 20.0))
            .spawn_at("good", Vec2::new(30.0, 30.0))
            .build()
            .unwrap();

        sim.run_ticks(1, &mut rec);
        assert_eq!(sim.actors().crash_count(ActorId(1)), 1);
        assert_eq!(sim.actors().crash_count(ActorId(0)), 0);
        assert_eq!(sim.actors().crash_count(ActorId(2)), 0);
        assert_eq!(sim.actors().position(ActorId(0)), Vec2::new(11.0, 10.0));
        assert_eq!(sim.actors().position(ActorId(2)), Vec2::new(31.0, 30.0));

        sim.run_ticks(2, &mut rec);
        assert_eq!(sim.actors().crash_count(ActorId(1)), 3);
        assert_eq!(rec.faults.len(), 3);
        assert!(rec.faults.iter().all(|(_, id, f)| *id == ActorId(1) && f.kind == FaultKind::Runtime));
        assert_eq!(rec.summaries.iter().map(|s| s.faults).collect::<Vec<_>>(), vec![1, 1, 1]);
    }

    #[test]
    fn faulted_actor_keeps_moving() {
        let mut sim = SimBuilder::new(test_config())
            .behavior(
                "flaky",
                r#"
                memory.n = 0;
                fn main() {
                    this.n += 1;
                    if this.n == 1 { changeSpeed(5, 0); } else { throw "later"; }
                }
                "#,
            )
            .spawn_at("flaky", Vec2::new(0.0, 0.0))
            .build()
            .unwrap();
        sim.run_ticks(3, &mut NoopObserver);
        assert_eq!(sim.actors().crash_count(ActorId(0)), 2);
        assert_eq!(sim.actors().position(ActorId(0)), Vec2::new(15.0, 0.0));
    }

    #[test]
    fn runaway_script_is_contained() {
        let config = WorldConfig {
            sandbox: SandboxLimits {
                max_operations:  5_000,
                step_timeout_ms: None,
                ..SandboxLimits::default()
            },
            ..test_config()
        };
        let mut rec = Recorder::default();
        let mut sim = SimBuilder::new(config)
            .behavior("spin", "fn main() { let i = 0; loop { i += 1; } }")
            .behavior("good", "fn main() { changeSpeed(0, 1); }")
            .spawn_at("spin", Vec2::new(5.0, 5.0))
            .spawn_at("good", Vec2::new(5.0, 5.0))
            .build()
            .unwrap();
        sim.run_ticks(2, &mut rec);
        assert_eq!(rec.faults.len(), 2);
        assert!(rec.faults.iter().all(|(_, _, f)| f.kind == FaultKind::OperationLimit));
        assert_eq!(sim.actors().position(ActorId(1)), Vec2::new(5.0, 7.0));
    }

    #[test]
    fn fault_reported_before_snapshot_with_updated_count() {
        let mut rec = Recorder::default();
        let mut sim = SimBuilder::new(test_config())
            .behavior("bad", "fn main() { throw 1; }")
            .spawn_at("bad", Vec2::new(1.0, 1.0))
            .build()
            .unwrap();
        sim.run_ticks(2, &mut rec);
        let crashes: Vec<u64> = rec.snapshots.iter().map(|(_, s)| s.crashes).collect();
        assert_eq!(crashes, vec![1, 2]);
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;
    use crate::SchedulerState;

    fn three_actors() -> crate::Sim {
        SimBuilder::new(test_config())
            .behavior("a", IDLE)
            .spawn("a", 3)
            .build()
            .unwrap()
    }

    #[test]
    fn snapshots_in_creation_order_every_tick() {
        let mut rec = Recorder::default();
        let mut sim = three_actors();
        sim.run_ticks(2, &mut rec);

        let order: Vec<(u64, u32)> = rec.snapshots.iter().map(|(t, s)| (t.0, s.id.0)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
        assert_eq!(rec.starts, vec![Tick(0), Tick(1)]);
        assert_eq!(rec.summaries.len(), 2);
        assert!(rec.summaries.iter().all(|s| s.actors == 3 && s.faults == 0));
    }

    #[test]
    fn run_ticks_advances_clock() {
        let mut sim = three_actors();
        sim.run_ticks(4, &mut NoopObserver);
        assert_eq!(sim.current_tick(), Tick(4));
        assert_eq!(sim.state(), SchedulerState::Idle);
    }

    #[test]
    fn run_stops_at_total_ticks() {
        let config = WorldConfig { total_ticks: Some(3), tick_period_ms: 2, ..test_config() };
        let mut sim = SimBuilder::new(config)
            .behavior("a", IDLE)
            .spawn("a", 2)
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec);
        assert_eq!(rec.starts.len(), 3);
        assert_eq!(rec.ended, Some(Tick(3)));
        assert_eq!(sim.state(), SchedulerState::Idle);
    }

    #[test]
    fn run_is_paced() {
        let config = WorldConfig { total_ticks: Some(4), tick_period_ms: 10, ..test_config() };
        let mut sim = SimBuilder::new(config).build().unwrap();
        let started = std::time::Instant::now();
        sim.run(&mut NoopObserver);
        // First sweep starts immediately; three periods separate the rest.
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn tuple_observer_fans_out() {
        let mut pair = (Recorder::default(), Recorder::default());
        let mut sim = three_actors();
        sim.run_ticks(1, &mut pair);
        assert_eq!(pair.0.snapshots.len(), 3);
        assert_eq!(pair.1.snapshots, pair.0.snapshots);
    }
}

// ── Leaf pieces ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::{TickPacer, integrate, render_log_line};

    #[test]
    fn integrate_adds_and_clamps() {
        let b = Bounds::new(100.0, 50.0);
        assert_eq!(integrate(Vec2::new(10.0, 10.0), Vec2::new(3.0, -4.0), b), Vec2::new(13.0, 6.0));
        assert_eq!(integrate(Vec2::new(98.0, 1.0), Vec2::new(5.0, -5.0), b), Vec2::new(100.0, 0.0));
        assert_eq!(integrate(Vec2::new(0.0, 50.0), Vec2::ZERO, b), Vec2::new(0.0, 50.0));
    }

    #[test]
    fn snapshot_wire_format() {
        let s = ActorSnapshot {
            id:            ActorId(0),
            behavior_type: "actor1".into(),
            position:      Vec2::new(1.0, 2.0),
            crashes:       0,
        };
        assert_eq!(
            serde_json::to_string(&s).unwrap(),
            r#"{"id":0,"type":"actor1","position":{"x":1.0,"y":2.0},"crashes":0}"#
        );
    }

    #[test]
    fn log_line_rendering() {
        let line = render_log_line(&[json!("hello"), json!(3), json!({"a": [1, 2]}), Value::Null]);
        assert_eq!(line, r#"hello 3 {"a":[1,2]} null"#);
        assert_eq!(render_log_line(&[]), "");
    }

    #[test]
    fn pacer_first_wait_is_immediate() {
        let mut pacer = TickPacer::new(Duration::from_millis(200));
        let started = std::time::Instant::now();
        assert_eq!(pacer.wait(), None);
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn pacer_reports_overrun() {
        let mut pacer = TickPacer::new(Duration::from_millis(5));
        pacer.wait();
        std::thread::sleep(Duration::from_millis(20));
        let late = pacer.wait().expect("sweep overran");
        assert!(late >= Duration::from_millis(10));
    }

    #[test]
    fn zero_period_never_waits() {
        let mut pacer = TickPacer::new(Duration::ZERO);
        for _ in 0..3 {
            assert_eq!(pacer.wait(), None);
        }
    }
}
