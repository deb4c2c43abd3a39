use super::*;

fn at(frame: f64, from: f64, to: f64, config: SpringConfig) -> f64 {
    spring(&SpringParams::new(frame, 30.0).range(from, to).config(config)).unwrap()
}

#[test]
fn starts_exactly_at_from() {
    let config = SpringConfig::new(12.0, 100.0);
    assert_eq!(at(0.0, 5.0, 20.0, config), 5.0);
    assert_eq!(at(-10.0, 5.0, 20.0, config), 5.0);
    assert_eq!(at(-0.5, 0.85, 1.0, config), 0.85);
}

#[test]
fn defaults_are_unit_range_and_documented_config() {
    let params: SpringParams = serde_json::from_str(r#"{"frame": 9, "fps": 30}"#).unwrap();
    assert_eq!(params.from, 0.0);
    assert_eq!(params.to, 1.0);
    assert_eq!(params.config, SpringConfig::default());
    assert_eq!(params.config.damping, DEFAULT_DAMPING);
    assert_eq!(params.config.stiffness, DEFAULT_STIFFNESS);
    assert_eq!(params.config.mass, DEFAULT_MASS);

    let s = Spring::new(0.0, 1.0, &SpringConfig::default()).unwrap();
    assert_eq!(s.regime(), DampingRegime::Underdamped);
    assert!((s.damping_ratio() - 0.5).abs() < 1e-12);
    assert!((s.angular_frequency() - 10.0).abs() < 1e-12);
}

#[test]
fn underdamped_matches_analytic_reference() {
    let config = SpringConfig::new(12.0, 100.0);
    let expected = [
        (5.0, 0.946_794_093_097_841_5),
        (10.0, 1.011_091_513_400_106_4),
        (20.0, 1.000_077_457_442_604),
        (40.0, 1.000_051_970_183_1),
    ];
    for (frame, value) in expected {
        let got = at(frame, 0.85, 1.0, config);
        assert!((got - value).abs() < 1e-12, "frame {frame}: {got} vs {value}");
    }
}

#[test]
fn critically_damped_matches_analytic_reference() {
    // damping = 2 sqrt(k m)
    let config = SpringConfig::new(20.0, 100.0);
    let s = Spring::new(0.0, 1.0, &config).unwrap();
    assert_eq!(s.regime(), DampingRegime::Critical);
    // 1 - e^-1 (1 + 1) at t = 0.1 s
    let expected = 1.0 - 2.0 * (-1.0f64).exp();
    assert!((at(3.0, 0.0, 1.0, config) - expected).abs() < 1e-12);
    assert!((at(6.0, 0.0, 1.0, config) - 0.593_994_150_290_161_9).abs() < 1e-12);
}

#[test]
fn overdamped_matches_analytic_reference() {
    let config = SpringConfig::new(40.0, 100.0);
    let s = Spring::new(0.0, 1.0, &config).unwrap();
    assert_eq!(s.regime(), DampingRegime::Overdamped);
    assert!((at(6.0, 0.0, 1.0, config) - 0.369_639_977_721_982_3).abs() < 1e-12);
}

#[test]
fn non_oscillating_regimes_never_cross_target() {
    for config in [
        SpringConfig::new(20.0, 100.0),
        SpringConfig::new(40.0, 100.0),
        SpringConfig::new(300.0, 10.0).with_mass(2.0),
    ] {
        let mut prev = 0.0;
        for frame in 1..400 {
            let v = at(f64::from(frame), 0.0, 1.0, config);
            assert!(v <= 1.0, "{config:?} frame {frame}");
            assert!(v >= prev, "{config:?} frame {frame}");
            prev = v;
        }
    }
}

#[test]
fn underdamped_overshoots_then_settles() {
    let values: Vec<f64> = (0..120)
        .map(|f| at(f64::from(f), 0.0, 1.0, SpringConfig::default()))
        .collect();
    let peak = values.iter().copied().fold(f64::MIN, f64::max);
    assert!(peak > 1.1 && peak < 1.2, "peak {peak}");
    assert!((values[119] - 1.0).abs() < 1e-4);
}

#[test]
fn converges_to_target() {
    for config in [
        SpringConfig::default(),
        SpringConfig::new(8.0, 100.0),
        SpringConfig::new(15.0, 80.0),
        SpringConfig::new(10.0, 150.0),
        SpringConfig::new(20.0, 100.0),
        SpringConfig::new(200.0, 100.0),
        SpringConfig::new(12.0, 200.0).with_mass(3.0),
    ] {
        let v = at(100_000.0, 0.0, 1.0, config);
        assert!((v - 1.0).abs() < 1e-3, "{config:?}: {v}");
    }
}

#[test]
fn deterministic_and_order_independent() {
    let config = SpringConfig::new(10.0, 120.0);
    let frames = [17.0, 3.0, 55.0, 3.0, 0.0, 17.0];
    let first: Vec<u64> = frames
        .iter()
        .map(|f| at(*f, 0.8, 1.0, config).to_bits())
        .collect();
    let second: Vec<u64> = frames
        .iter()
        .map(|f| at(*f, 0.8, 1.0, config).to_bits())
        .collect();
    assert_eq!(first, second);
    assert_eq!(first[1], first[3]);
}

#[test]
fn velocity_starts_at_rest_and_matches_slope() {
    for config in [
        SpringConfig::default(),
        SpringConfig::new(20.0, 100.0),
        SpringConfig::new(40.0, 100.0),
    ] {
        let s = Spring::new(0.0, 1.0, &config).unwrap();
        assert_eq!(s.velocity_at(0.0), 0.0);
        for t in [0.05, 0.2, 0.6] {
            let h = 1e-6;
            let numeric = (s.position_at(t + h) - s.position_at(t - h)) / (2.0 * h);
            assert!((s.velocity_at(t) - numeric).abs() < 1e-4, "{config:?} t={t}");
        }
    }
}

#[test]
fn overshoot_clamping_holds_target() {
    let config = SpringConfig::default().with_overshoot_clamping(true);
    for frame in 0..90 {
        let up = at(f64::from(frame), 0.0, 1.0, config);
        assert!(up <= 1.0);
        let down = at(f64::from(frame), 1.0, 0.0, config);
        assert!(down >= 0.0);
    }
    let s = Spring::new(0.0, 1.0, &config).unwrap();
    assert_eq!(s.velocity_at(0.5), 0.0);
}

#[test]
fn reversed_direction_mirrors() {
    let config = SpringConfig::new(12.0, 100.0);
    for frame in [2.0, 7.0, 15.0] {
        let up = at(frame, 0.0, 1.0, config);
        let down = at(frame, 1.0, 0.0, config);
        assert!((up + down - 1.0).abs() < 1e-12);
    }
}

#[test]
fn equal_endpoints_stay_put() {
    assert_eq!(at(12.0, 3.0, 3.0, SpringConfig::default()), 3.0);
}

#[test]
fn measure_matches_brute_force_settle() {
    assert_eq!(
        measure_spring(30.0, &SpringConfig::default(), DEFAULT_REST_THRESHOLD).unwrap(),
        28
    );
    assert_eq!(
        measure_spring(60.0, &SpringConfig::default(), DEFAULT_REST_THRESHOLD).unwrap(),
        56
    );
    assert_eq!(
        measure_spring(30.0, &SpringConfig::new(20.0, 100.0), DEFAULT_REST_THRESHOLD).unwrap(),
        23
    );
    assert_eq!(
        measure_spring(30.0, &SpringConfig::new(200.0, 100.0), DEFAULT_REST_THRESHOLD).unwrap(),
        318
    );
}

#[test]
fn slow_springs_measure_without_scanning_every_frame() {
    let start = std::time::Instant::now();

    // Overdamped with a time constant of ~10^7 s.
    let sluggish = SpringConfig::new(1e7, 1.0);
    let frames = measure_spring(30.0, &sluggish, DEFAULT_REST_THRESHOLD).unwrap();
    let s = Spring::new(0.0, 1.0, &sluggish).unwrap();
    let at = |f: u64| (s.position_at(f as f64 / 30.0) - 1.0).abs();
    assert!(frames > 1_000_000_000);
    assert!(at(frames - 1) > DEFAULT_REST_THRESHOLD);
    assert!(at(frames) <= DEFAULT_REST_THRESHOLD);

    let p = SpringParams::new(10.0, 30.0)
        .config(sluggish)
        .duration_in_frames(30.0);
    let stretched = spring(&p).unwrap();
    assert!(stretched > 0.0 && stretched < 1.0);
    let settled = spring(&SpringParams { frame: 30.0, ..p }).unwrap();
    assert!(((1.0 - settled) - DEFAULT_REST_THRESHOLD).abs() < 1e-6, "{settled}");

    // Barely damped: rings for ~10^7 s before settling.
    let ringing = SpringConfig::new(1e-6, 100.0);
    assert_eq!(
        measure_spring(30.0, &ringing, DEFAULT_REST_THRESHOLD).unwrap(),
        317_898_591
    );

    assert!(start.elapsed() < std::time::Duration::from_secs(2));
}

#[test]
fn duration_stretches_time() {
    let config = SpringConfig::default();
    let natural = FrameSpring::new(30.0, 0.0, 1.0, &config, None).unwrap();
    let stretched = FrameSpring::new(30.0, 0.0, 1.0, &config, Some(56.0)).unwrap();
    assert_eq!(stretched.sample(56.0), natural.sample(28.0));
    assert_eq!(stretched.sample(0.0), 0.0);
    let p = SpringParams::new(56.0, 30.0).duration_in_frames(56.0);
    assert_eq!(spring(&p).unwrap(), natural.sample(28.0));
}

#[test]
fn rejects_invalid_config() {
    for config in [
        SpringConfig::new(0.0, 100.0),
        SpringConfig::new(10.0, -1.0),
        SpringConfig::new(10.0, 100.0).with_mass(0.0),
        SpringConfig::new(f64::NAN, 100.0),
        SpringConfig::new(10.0, f64::INFINITY),
    ] {
        let err = spring(&SpringParams::new(10.0, 30.0).config(config)).unwrap_err();
        assert!(matches!(err, MotionError::InvalidSpringConfig(_)), "{config:?}");
    }
}

#[test]
fn rejects_invalid_fps_and_duration() {
    assert!(spring(&SpringParams::new(10.0, 0.0)).is_err());
    assert!(spring(&SpringParams::new(10.0, f64::NAN)).is_err());
    assert!(spring(&SpringParams::new(10.0, 30.0).duration_in_frames(0.0)).is_err());
    assert!(measure_spring(30.0, &SpringConfig::default(), 0.0).is_err());
}
