//! Unit tests for arena-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ActorId, BehaviorType};

    #[test]
    fn index_roundtrip() {
        let id = ActorId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(ActorId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(ActorId(0) < ActorId(1));
    }

    #[test]
    fn display() {
        assert_eq!(ActorId(7).to_string(), "ActorId(7)");
        assert_eq!(BehaviorType::from("actor1").to_string(), "actor1");
    }

    #[test]
    fn behavior_type_equality_is_by_name() {
        let a = BehaviorType::from("wanderer");
        let b = BehaviorType::from(String::from("wanderer"));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "wanderer");
    }
}

#[cfg(test)]
mod geo {
    use crate::{Bounds, Vec2};

    #[test]
    fn sub_and_distance() {
        let a = Vec2::new(3.0, 4.0);
        assert_eq!(a - Vec2::ZERO, a);
        assert_eq!(Vec2::ZERO.distance(a), 5.0);
        assert_eq!(Vec2::new(10.0, 0.0) - Vec2::new(4.0, 2.0), Vec2::new(6.0, -2.0));
    }

    #[test]
    fn clamp_speed_scales_long_vectors_to_max() {
        assert_eq!(Vec2::new(100.0, 0.0).clamp_speed(10.0), Vec2::new(10.0, 0.0));
        let v = Vec2::new(30.0, 40.0).clamp_speed(10.0);
        assert!((v.x - 6.0).abs() < 1e-12 && (v.y - 8.0).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn clamp_speed_preserves_sign() {
        let v = Vec2::new(-100.0, 0.0).clamp_speed(10.0);
        assert_eq!(v, Vec2::new(-10.0, 0.0));
        let v = Vec2::new(-30.0, 40.0).clamp_speed(5.0);
        assert!(v.x < 0.0 && v.y > 0.0);
        assert!((v.length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn clamp_speed_leaves_short_and_zero_vectors() {
        assert_eq!(Vec2::new(1.0, -2.0).clamp_speed(10.0), Vec2::new(1.0, -2.0));
        assert_eq!(Vec2::ZERO.clamp_speed(10.0), Vec2::ZERO);
        assert_eq!(Vec2::new(5.0, 0.0).clamp_speed(0.0), Vec2::ZERO);
    }

    #[test]
    fn clamp_speed_never_exceeds_max_on_either_axis() {
        for (x, y) in [(1e6, -3.0), (-7.0, -7.0), (0.5, 1e9), (-12.0, 11.0)] {
            let v = Vec2::new(x, y).clamp_speed(10.0);
            assert!(v.x.abs() <= 10.0 + 1e-9 && v.y.abs() <= 10.0 + 1e-9, "{v}");
        }
    }

    #[test]
    fn bounds_contains_edges() {
        let b = Bounds::new(100.0, 50.0);
        assert!(b.contains(Vec2::ZERO));
        assert!(b.contains(Vec2::new(100.0, 50.0)));
        assert!(!b.contains(Vec2::new(100.1, 0.0)));
        assert!(!b.contains(Vec2::new(0.0, -0.1)));
    }

    #[test]
    fn bounds_clamp() {
        let b = Bounds::new(100.0, 50.0);
        assert_eq!(b.clamp(Vec2::new(-5.0, 70.0)), Vec2::new(0.0, 50.0));
        assert_eq!(b.clamp(Vec2::new(20.0, 30.0)), Vec2::new(20.0, 30.0));
    }
}

#[cfg(test)]
mod time {
    use std::time::Duration;

    use crate::{SimClock, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
    }

    #[test]
    fn clock_elapsed_follows_period() {
        let mut clock = SimClock::new(Duration::from_millis(100));
        assert_eq!(clock.elapsed(), Duration::ZERO);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(clock.elapsed(), Duration::from_millis(200));
    }
}

#[cfg(test)]
mod rng {
    use crate::{Bounds, SimRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        let bounds = Bounds::default();
        for _ in 0..100 {
            assert_eq!(r1.point_in(bounds), r2.point_in(bounds));
        }
    }

    #[test]
    fn points_stay_in_bounds() {
        let mut rng = SimRng::new(7);
        let bounds = Bounds::new(30.0, 2.0);
        for _ in 0..1000 {
            assert!(bounds.contains(rng.point_in(bounds)));
        }
    }
}

#[cfg(test)]
mod config {
    use crate::{Bounds, WorldConfig};

    #[test]
    fn defaults_match_reference_world() {
        let cfg = WorldConfig::default();
        assert_eq!(cfg.bounds, Bounds::new(1400.0, 1000.0));
        assert_eq!(cfg.max_speed, 10.0);
        assert_eq!(cfg.range, 500.0);
        assert_eq!(cfg.sandbox.memory_mb, 16);
        assert_eq!(cfg.tick_period_ms, 100);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn memory_quota_derivations() {
        let cfg = WorldConfig::default();
        assert_eq!(cfg.sandbox.memory_bytes(), 16 * 1024 * 1024);
        assert_eq!(cfg.sandbox.max_collection_len(), 1024 * 1024);
    }

    #[test]
    fn depth_defaults_follow_the_build() {
        let limits = crate::SandboxLimits::default();
        if cfg!(debug_assertions) {
            assert_eq!(limits.max_call_levels, 8);
            assert_eq!(limits.max_function_expr_depth, 16);
        } else {
            assert_eq!(limits.max_call_levels, 64);
            assert_eq!(limits.max_function_expr_depth, 32);
        }
    }

    #[test]
    fn rejects_degenerate_bounds() {
        let cfg = WorldConfig { bounds: Bounds::new(0.0, 10.0), ..WorldConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = WorldConfig { bounds: Bounds::new(f64::NAN, 10.0), ..WorldConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_negative_speed_and_range() {
        let cfg = WorldConfig { max_speed: -1.0, ..WorldConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = WorldConfig { range: f64::INFINITY, ..WorldConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
