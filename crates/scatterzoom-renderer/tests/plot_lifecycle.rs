use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use scatterzoom_core::{generate_with_rng, Dataset, DatasetBounds, ScreenPoint, Transform};
use scatterzoom_renderer::{
    Container, Lifecycle, PlotError, PlotKind, PlotOptions, PointerEvent, ScatterPlot, WheelEvent,
};
use tokio::task::LocalSet;
use tokio::time::{self, Instant};

fn dataset(count: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(42);
    generate_with_rng(&DatasetBounds::default().with_count(count), &mut rng)
}

fn options() -> PlotOptions {
    PlotOptions {
        allocation_chunk: 50,
        ..Default::default()
    }
}

fn plot(kind: PlotKind, data: Dataset, container: &Container) -> ScatterPlot {
    ScatterPlot::new(kind, data, 400.0, 300.0, container, |_| {}, options()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_scale_to_waits_for_duration() {
    LocalSet::new()
        .run_until(async {
            let container = Container::new();
            for kind in PlotKind::ALL {
                for factor in [0.05, 1.0, 2.0] {
                    for millis in [0, 1500] {
                        let p = plot(kind, dataset(200), &container);
                        let duration = Duration::from_millis(millis);
                        let start = Instant::now();
                        p.scale_to(factor, Some(duration)).await;
                        assert!(start.elapsed() >= duration, "{kind:?} {factor} {millis}");
                        // Let the final animation frame land.
                        time::sleep(Duration::from_millis(50)).await;
                        assert!((p.transform().scale - factor).abs() < 1e-9);
                        p.destroy();
                    }
                }
            }
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_scale_to_defaults_to_configured_duration() {
    LocalSet::new()
        .run_until(async {
            let container = Container::new();
            let p = plot(PlotKind::SharedTexture, dataset(10), &container);
            let start = Instant::now();
            p.scale_to(0.5, None).await;
            assert!(start.elapsed() >= Duration::from_millis(1500));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_destroy_before_setup_finishes() {
    LocalSet::new()
        .run_until(async {
            let container = Container::new();
            let p = plot(PlotKind::UniqueTexture, dataset(1000), &container);
            assert_eq!(p.lifecycle(), Lifecycle::Initializing);
            let pending = p.scale_to(0.05, Some(Duration::from_millis(1500)));
            p.destroy();
            p.destroy();
            assert_eq!(p.lifecycle(), Lifecycle::Initializing);

            let start = Instant::now();
            pending.await;
            assert!(start.elapsed() < Duration::from_millis(1500));
            assert!(p.is_destroyed());
            assert!(container.is_empty());
            assert_eq!(p.primitive_count(), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_everything_after_destroy_is_a_no_op() {
    LocalSet::new()
        .run_until(async {
            let container = Container::new();
            for kind in PlotKind::ALL {
                let p = plot(kind, dataset(100), &container);
                p.scale_to(1.0, Some(Duration::ZERO)).await;
                p.destroy();
                assert!(p.is_destroyed());
                assert!(container.is_empty());

                let before = p.transform();
                p.destroy();
                p.wheel(&WheelEvent::new(-100.0, ScreenPoint::new(10.0, 10.0)));
                p.pointer(&PointerEvent::Down(ScreenPoint::new(0.0, 0.0)));
                p.pointer(&PointerEvent::Move(ScreenPoint::new(30.0, 30.0)));
                p.set_transform(Transform::new(4.0, 0.0, 0.0));
                let start = Instant::now();
                p.scale_to(0.05, Some(Duration::from_millis(1500))).await;
                assert_eq!(start.elapsed(), Duration::ZERO);
                assert_eq!(p.transform(), before);
                assert!(p.visible_indices().is_empty());
                assert_eq!(p.primitive_count(), 0);
                assert!(p.with_framebuffer(|_| ()).is_none());
                assert_eq!(p.frame_stats().lifecycle, Lifecycle::Destroyed);
            }
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_empty_dataset() {
    LocalSet::new()
        .run_until(async {
            let container = Container::new();
            for kind in PlotKind::ALL {
                let p = plot(kind, Dataset::empty(), &container);
                p.scale_to(0.05, Some(Duration::from_millis(100))).await;
                assert!(p.ready());
                assert_eq!(p.primitive_count(), 0);
                assert!(p.visible_indices().is_empty());
                p.destroy();
            }
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_invalid_viewport() {
    LocalSet::new()
        .run_until(async {
            let container = Container::new();
            for (w, h) in [(0.0, 300.0), (400.0, -1.0), (f64::NAN, 10.0)] {
                let err = ScatterPlot::new(
                    PlotKind::RedrawGraphics,
                    dataset(10),
                    w,
                    h,
                    &container,
                    |_| {},
                    options(),
                )
                .unwrap_err();
                assert!(matches!(err, PlotError::InvalidViewport { .. }));
            }
            for kind in PlotKind::ALL {
                let err = ScatterPlot::new(
                    kind,
                    dataset(10),
                    1e12,
                    1e12,
                    &container,
                    |_| {},
                    options(),
                )
                .unwrap_err();
                assert!(matches!(err, PlotError::ViewportTooLarge { .. }));
            }
            assert!(container.is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_strategies_agree_under_gestures() {
    LocalSet::new()
        .run_until(async {
            let container = Container::new();
            let data = dataset(3000);
            let gestures = |p: &ScatterPlot| {
                let mut seen = vec![p.visible_indices()];
                p.wheel(&WheelEvent::new(400.0, ScreenPoint::new(200.0, 150.0)));
                seen.push(p.visible_indices());
                p.pointer(&PointerEvent::Down(ScreenPoint::new(100.0, 100.0)));
                p.pointer(&PointerEvent::Move(ScreenPoint::new(160.0, 40.0)));
                p.pointer(&PointerEvent::Up);
                seen.push(p.visible_indices());
                p.wheel(&WheelEvent::new(-150.0, ScreenPoint::new(0.0, 0.0)));
                seen.push(p.visible_indices());
                seen
            };

            let mut results = Vec::new();
            for kind in PlotKind::ALL {
                let p = plot(kind, data.clone(), &container);
                p.scale_to(1.0, Some(Duration::ZERO)).await;
                results.push(gestures(&p));
                p.destroy();
            }
            for r in &results[1..] {
                assert_eq!(r, &results[0]);
            }
            assert!(results[0][1].len() > results[0][0].len());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_fps_samples_stop_after_destroy() {
    LocalSet::new()
        .run_until(async {
            let container = Container::new();
            let samples = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&samples);
            let p = ScatterPlot::new(
                PlotKind::SharedTexture,
                dataset(50),
                400.0,
                300.0,
                &container,
                move |fps| sink.borrow_mut().push(fps),
                options(),
            )
            .unwrap();
            time::sleep(Duration::from_millis(500)).await;
            let count = samples.borrow().len();
            assert!(count >= 25);
            assert!(samples.borrow().iter().all(|fps| *fps > 0.0));

            p.destroy();
            time::sleep(Duration::from_millis(500)).await;
            assert_eq!(samples.borrow().len(), count);
        })
        .await;
}
