//! End-to-end scheduler behavior on synthetic timelines.
//!
//! Every test injects its own instants, so nothing here sleeps.

use std::time::{Duration, Instant};

use proptest::prelude::*;
use reel_core::geometry::Size;
use reel_render::ansi::CLEAR_AND_HOME;
use reel_render::compiler::{Animation, DEFAULT_CANVAS};
use reel_render::counting_writer::CountingWriter;
use reel_runtime::{PlaybackScheduler, SchedulerConfig};

const DELAY: Duration = Duration::from_millis(30);

fn stock_sized_animation(frames: usize) -> Animation {
    let raw: Vec<Vec<String>> = (0..frames)
        .map(|f| {
            (0..DEFAULT_CANVAS.height)
                .map(|row| {
                    let mut line = format!("{f:03}{row:02}");
                    line.push_str("<color>");
                    line.push_str(&"#".repeat(10));
                    line.push_str("</color>");
                    line
                })
                .collect()
        })
        .collect();
    Animation::compile(&raw, "\x1b[34m", DEFAULT_CANVAS).unwrap()
}

fn scheduler(
    frames: usize,
    terminal: Size,
    t0: Instant,
) -> PlaybackScheduler<CountingWriter<Vec<u8>>> {
    PlaybackScheduler::new(
        stock_sized_animation(frames),
        SchedulerConfig::default(),
        CountingWriter::new(Vec::new()),
        t0,
        terminal,
    )
}

#[test]
fn frame_is_centered_in_80x43() {
    let t0 = Instant::now();
    let mut s = scheduler(2, Size::new(80, 43), t0);
    let tick = s.tick(t0).unwrap();
    assert!(tick.rendered);

    let out = String::from_utf8(s.into_sink().into_inner()).unwrap();
    let body = out.strip_prefix(CLEAR_AND_HOME).unwrap();
    // One row of vertical padding, one column of horizontal padding.
    let rows: Vec<&str> = body.split("\r\n").collect();
    assert_eq!(rows.len(), 1 + 41);
    assert_eq!(rows[0], "");
    assert!(rows[1].starts_with(" 00000\x1b[34m"));
    assert!(rows[41].starts_with(" 00040"));
    assert!(!out.ends_with("\r\n"));
}

#[test]
fn too_small_terminal_costs_zero_bytes() {
    let t0 = Instant::now();
    let mut s = scheduler(2, Size::new(40, 20), t0);
    for i in 0..10u32 {
        let tick = s.tick(t0 + DELAY * i).unwrap();
        assert!(tick.too_small);
        assert!(!tick.rendered);
    }
    assert_eq!(s.sink().bytes_written(), 0);
    assert_eq!(s.sink().write_calls(), 0);
}

#[test]
fn each_frame_is_a_single_write() {
    let t0 = Instant::now();
    let mut s = scheduler(5, Size::new(120, 50), t0);
    let mut renders = 0;
    for i in 0..25u32 {
        if s.tick(t0 + DELAY * i).unwrap().rendered {
            renders += 1;
        }
    }
    assert_eq!(renders, 25);
    assert_eq!(s.sink().write_calls(), 25);
}

#[test]
fn shutdown_after_playback_flushes_nothing_extra() {
    let t0 = Instant::now();
    let mut s = scheduler(3, Size::new(80, 43), t0);
    s.tick(t0).unwrap();
    let written = s.sink().bytes_written();
    assert_eq!(s.shutdown().unwrap(), 0);
    assert_eq!(s.sink().bytes_written(), written);
}

proptest! {
    /// Ticking at least once per frame never skips an index.
    #[test]
    fn regular_ticks_visit_every_index(
        frames in 1usize..12,
        jitter_us in prop::collection::vec(0u64..29_000, 1..80),
    ) {
        let t0 = Instant::now();
        let mut s = scheduler(frames, Size::new(80, 43), t0);
        let mut previous = s.tick(t0).unwrap().frame_index;
        for (i, jitter) in jitter_us.iter().enumerate() {
            let boundary = DELAY * (i as u32 + 1);
            let tick = s.tick(t0 + boundary + Duration::from_micros(*jitter)).unwrap();
            prop_assert!(tick.rendered);
            prop_assert_eq!(tick.skipped, 0);
            prop_assert_eq!(tick.frame_index, (previous + 1) % frames);
            previous = tick.frame_index;
        }
    }

    /// However late a tick is, it draws at most one frame and the sleep is
    /// bounded by one frame delay.
    #[test]
    fn late_ticks_render_once_with_bounded_sleep(
        gaps_ms in prop::collection::vec(1u64..2_000, 1..40),
    ) {
        let t0 = Instant::now();
        let mut s = scheduler(7, Size::new(80, 43), t0);
        let mut at = t0;
        s.tick(at).unwrap();
        for gap in gaps_ms {
            let writes = s.sink().write_calls();
            at += Duration::from_millis(gap);
            let tick = s.tick(at).unwrap();
            prop_assert!(s.sink().write_calls() - writes <= 1);
            prop_assert!(tick.sleep <= DELAY);
            prop_assert!(tick.sleep >= Duration::from_millis(1));
            if tick.behind > 3 {
                prop_assert_eq!(tick.skipped, tick.behind - 1);
            }
        }
    }
}
