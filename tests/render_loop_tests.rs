//! Frame loop tests against a recording surface.

use particle_morph::prelude::*;

/// Keeps a copy of every frame it is handed.
#[derive(Default)]
struct RecordingSurface {
    frames: Vec<Recorded>,
}

struct Recorded {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    progress: f32,
    time: f32,
    generation: u64,
}

impl DisplaySurface for RecordingSurface {
    type Error = ();

    fn present(&mut self, frame: &Frame<'_>) -> Result<(), ()> {
        self.frames.push(Recorded {
            positions: frame.positions.to_vec(),
            colors: frame.colors.to_vec(),
            progress: frame.progress,
            time: frame.time,
            generation: frame.generation,
        });
        Ok(())
    }
}

fn field(count: u32) -> ParticleField {
    ParticleField::new(FieldConfig::default().with_particle_count(count).with_seed(99)).unwrap()
}

fn scroll_config(lag: f32) -> ScrollConfig {
    ScrollConfig {
        page_height: 2000.0,
        viewport_height: 1000.0,
        lag_seconds: lag,
        ease: Ease::Linear,
        line_height: 50.0,
    }
}

#[test]
fn test_fixed_steps_are_deterministic() {
    let mut a = RenderLoop::new(field(64), ConstantProgress(0.3));
    let mut b = RenderLoop::new(field(64), ConstantProgress(0.3));
    let mut sa = RecordingSurface::default();
    let mut sb = RecordingSurface::default();

    for _ in 0..10 {
        a.step(1.0 / 60.0, &mut sa).unwrap();
        b.step(1.0 / 60.0, &mut sb).unwrap();
    }

    assert_eq!(sa.frames.len(), 10);
    for (fa, fb) in sa.frames.iter().zip(&sb.frames) {
        assert_eq!(fa.positions, fb.positions);
        assert_eq!(fa.time, fb.time);
    }
    assert!((sa.frames[9].time - 10.0 / 60.0).abs() < 1e-5);
}

#[test]
fn test_frame_matches_field_update() {
    let mut looper = RenderLoop::new(field(32), ConstantProgress(0.75));
    let mut surface = RecordingSurface::default();
    looper.step(0.5, &mut surface).unwrap();

    let mut reference = field(32);
    let expected = reference.update(0.75, 0.5).to_vec();

    let frame = &surface.frames[0];
    assert_eq!(frame.positions, expected);
    assert_eq!(frame.colors, reference.colors());
    assert_eq!(frame.progress, 0.75);
}

#[test]
fn test_scroll_drives_progress() {
    let mut looper = RenderLoop::new(field(16), ScrollProgress::new(&scroll_config(0.0)));
    let mut surface = RecordingSurface::default();

    looper.step(0.1, &mut surface).unwrap();
    assert_eq!(surface.frames[0].progress, 0.0);

    // Half of the 1000px scrollable range.
    looper.source_mut().scroll_by(500.0);
    looper.step(0.1, &mut surface).unwrap();
    assert!((surface.frames[1].progress - 0.5).abs() < 1e-6);

    looper.source_mut().scroll_pages(5.0);
    looper.step(0.1, &mut surface).unwrap();
    assert_eq!(surface.frames[2].progress, 1.0);
}

#[test]
fn test_scroll_lag_approaches_target() {
    let mut looper = RenderLoop::new(field(16), ScrollProgress::new(&scroll_config(1.5)));
    let mut surface = RecordingSurface::default();

    looper.source_mut().scroll_by(1000.0);
    looper.step(1.0 / 60.0, &mut surface).unwrap();
    let first = surface.frames[0].progress;
    assert!(first > 0.0 && first < 0.1, "moved too fast: {}", first);

    for _ in 0..180 {
        looper.step(1.0 / 60.0, &mut surface).unwrap();
    }
    let settled = looper.last_progress();
    assert!(settled > 0.99, "did not settle: {}", settled);

    let progresses: Vec<f32> = surface.frames.iter().map(|f| f.progress).collect();
    assert!(progresses.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn test_reconfigure_bumps_generation_in_frames() {
    let mut looper = RenderLoop::new(field(8), ConstantProgress(0.0));
    let mut surface = RecordingSurface::default();
    looper.step(0.1, &mut surface).unwrap();
    looper
        .reconfigure(FieldConfig::default().with_particle_count(12).with_seed(1))
        .unwrap();
    looper.step(0.1, &mut surface).unwrap();

    assert_eq!(surface.frames[0].generation, 0);
    assert_eq!(surface.frames[1].generation, 1);
    assert_eq!(surface.frames[1].positions.len(), 12);
    assert_eq!(surface.frames[1].colors.len(), 12);
}

#[test]
fn test_paused_time_freezes_jitter() {
    let mut looper = RenderLoop::new(field(8), ConstantProgress(0.2));
    let mut surface = RecordingSurface::default();
    looper.step(0.25, &mut surface).unwrap();
    looper.time_mut().pause();
    looper.step(0.25, &mut surface).unwrap();

    assert_eq!(surface.frames[0].time, surface.frames[1].time);
    assert_eq!(surface.frames[0].positions, surface.frames[1].positions);
}
