use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
    assert!(!r.is_empty());
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    let empty = FrameRange::new(FrameIndex(3), FrameIndex(3)).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.frames().count(), 0);
}

#[test]
fn frame_range_iterates_in_order() {
    let r = FrameRange::new(FrameIndex(7), FrameIndex(10)).unwrap();
    let frames: Vec<u64> = r.frames().map(|f| f.0).collect();
    assert_eq!(frames, vec![7, 8, 9]);
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let bad = Fps { num: 30, den: 0 };
    assert!(bad.validate().is_err());
}

#[test]
fn fps_rational_conversions() {
    let fps = Fps::new(30000, 1001).unwrap();
    assert!((fps.as_f64() - 29.970_029_97).abs() < 1e-6);
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frames_to_secs(90), 3.0);
}
