//! Property tests for feed selection and loading invariants.

use proptest::prelude::*;
use reelfeed::app::App;
use reelfeed::catalog::VideoEntry;
use reelfeed::config::Config;
use reelfeed::feed::{active_index_for, ViewportMetrics};
use reelfeed::platform::{Clipboard, HeadlessBackend, ShareError, Sharer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

struct NullClipboard;

impl Clipboard for NullClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ShareError> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Step {
    ScrollTo(u32),
    ScrollBy(i64),
    Wait(u64),
    Like,
    Mute,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u32..400).prop_map(Step::ScrollTo),
        (-25i64..25).prop_map(Step::ScrollBy),
        (0u64..1500).prop_map(Step::Wait),
        Just(Step::Like),
        Just(Step::Mute),
    ]
}

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_active_index_is_clamped_midpoint(
        top in 0u32..100_000,
        h in 1u32..2_000,
        loaded in 1usize..50,
    ) {
        let m = ViewportMetrics {
            scroll_top: top,
            viewport_height: h,
            scroll_height: loaded as u32 * h,
        };
        let idx = active_index_for(&m, loaded).unwrap();
        prop_assert!(idx < loaded);

        let exact = ((f64::from(top) + f64::from(h) / 2.0) / f64::from(h)).floor() as usize;
        prop_assert_eq!(idx, exact.min(loaded - 1));
    }

    #[test]
    fn prop_no_index_without_content(top in 0u32..1000, h in 0u32..100) {
        let m = ViewportMetrics { scroll_top: top, viewport_height: h, scroll_height: 0 };
        prop_assert_eq!(active_index_for(&m, 0), None);
    }

    #[test]
    fn prop_feed_invariants_hold(
        total in 0usize..14,
        rows in 4u16..30,
        steps in prop::collection::vec(step(), 1..40),
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let entries: Vec<VideoEntry> = (0..total)
                .map(|i| VideoEntry {
                    id: format!("v{}", i),
                    src: Url::parse(&format!("https://cdn.example.com/{}.mp4", i)).unwrap(),
                    tags: vec![],
                })
                .collect();
            let (tx, mut events) = mpsc::channel(8);
            let mut app = App::new(
                Arc::new(entries),
                &Config::default(),
                Box::new(HeadlessBackend),
                Sharer::new(None, Box::new(NullClipboard)),
                tx,
            )
            .unwrap();
            app.resize(rows);
            let mut scroll = app.mount().unwrap();
            let mut prev_loaded = app.feed.state().loaded_count;

            for s in steps {
                match s {
                    Step::ScrollTo(top) => app.viewport.scroll_to(top),
                    Step::ScrollBy(d) => app.viewport.scroll_by(d),
                    Step::Wait(ms) => {
                        tokio::task::yield_now().await;
                        tokio::time::advance(Duration::from_millis(ms)).await;
                        tokio::task::yield_now().await;
                        app.on_tick();
                    }
                    Step::Like => app.like_active(),
                    Step::Mute => app.mute_active(),
                }
                while let Ok(m) = scroll.try_recv() {
                    app.on_viewport(m);
                }
                while let Ok(e) = events.try_recv() {
                    app.handle_feed_event(e);
                }

                let state = app.feed.state();
                prop_assert!(state.loaded_count <= total);
                prop_assert!(state.loaded_count >= prev_loaded);
                prev_loaded = state.loaded_count;
                prop_assert_eq!(app.reels.len(), state.loaded_count);
                prop_assert!(state.liked_ids.len() <= total);

                let playing: Vec<usize> = app
                    .reels
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.is_playing())
                    .map(|(i, _)| i)
                    .collect();
                prop_assert!(playing.len() <= 1);
                if let Some(&i) = playing.first() {
                    prop_assert_eq!(Some(i), app.feed.active_index());
                }
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}
