//! Scroll animation controller
//!
//! Owns the set of running scrolls. Starting a scroll stops the running ones
//! of its namespace, resolves start and target positions, then either jumps
//! straight to the target or schedules a tick that moves every scroll view
//! along the easing curve until the end time passes, the views stop
//! accepting writes, or the scroll is interrupted.
//!
//! Completion callbacks and [`ScrollEvent`]s are delivered after the
//! controller lock is released, so callbacks may start or stop scrolls.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::config::ScrollConfig;
use crate::diagnostics;
use crate::instance::{apply_position, probe_start_position, ScrollInstance};
use crate::interrupt::{should_interrupt, InputEvent, InterruptListener};
use crate::lock;
use crate::options::{FinishCallback, ResolvedOptions, ScrollOptions};
use crate::timer;
use crate::timing::{elapsed_ms, is_complete, round_position};
use crate::view::Document;
use crate::{Error, Result};

/// Lifecycle notifications, mirroring the completion callbacks
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollEvent {
    /// A scroll was scheduled
    Started {
        id: Uuid,
        namespace: String,
        from: f64,
        to: f64,
        duration: Duration,
    },
    /// A scroll ended; `reached` is what the completion callback received
    Finished {
        id: Uuid,
        namespace: String,
        reached: bool,
    },
}

/// Why a running scroll stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    /// End time passed, target written
    Completed,
    /// Stopped by `stop`, `stop_all`, a namespace restart or user input
    Interrupted,
    /// No scroll view accepted the last position
    Unreachable,
}

impl StopReason {
    fn reached(self) -> bool {
        matches!(self, StopReason::Completed)
    }
}

/// Drives scroll animations
///
/// Cheap to clone; clones control the same running set.
#[derive(Clone)]
pub struct ScrollController {
    shared: Arc<Shared>,
}

struct Shared {
    config: ScrollConfig,
    runtime: Handle,
    inner: Mutex<Inner>,
}

struct Inner {
    /// Running instances in start order; membership implies an active timer
    running: Vec<ScrollInstance>,
    document: Document,
    event_tx: Option<mpsc::UnboundedSender<ScrollEvent>>,
}

impl ScrollController {
    /// Create a controller on the current tokio runtime
    pub fn new(config: ScrollConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        Ok(Self::with_runtime(config, runtime))
    }

    /// Create a controller whose ticks run on `runtime`
    pub fn with_runtime(config: ScrollConfig, runtime: Handle) -> Self {
        let count = diagnostics::register_controller();
        if count > 1 && config.log_level.enabled() {
            warn!(
                count,
                "Another ScrollController already exists, one per process is usually enough"
            );
        }

        Self {
            shared: Arc::new(Shared {
                config,
                runtime,
                inner: Mutex::new(Inner {
                    running: Vec::new(),
                    document: Document::default(),
                    event_tx: None,
                }),
            }),
        }
    }

    /// Set the document scrolls fall back to when their options name none
    pub fn with_document(self, document: Document) -> Self {
        self.set_document(document);
        self
    }

    /// Set the event sender for lifecycle notifications
    pub fn with_event_sender(self, tx: mpsc::UnboundedSender<ScrollEvent>) -> Self {
        self.lock().event_tx = Some(tx);
        self
    }

    /// Replace the default document; running scrolls keep theirs
    pub fn set_document(&self, document: Document) {
        self.lock().document = document;
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.shared.config
    }

    /// Number of running scrolls
    pub fn running_count(&self) -> usize {
        self.lock().running.len()
    }

    /// Whether a scroll of `namespace` is running
    pub fn is_running(&self, namespace: &str) -> bool {
        self.lock()
            .running
            .iter()
            .any(|instance| instance.namespace().as_deref() == Some(namespace))
    }

    /// Create an instance from `options` and start it
    pub fn scroll(&self, options: ScrollOptions) -> ScrollInstance {
        let instance = ScrollInstance::new(options);
        self.start(&instance);
        instance
    }

    /// Start (or restart) a scroll
    ///
    /// When this returns, the instance is either running with exactly one
    /// timer, or its completion callback has fired, or it was skipped
    /// because there was nothing to scroll.
    pub fn start(&self, instance: &ScrollInstance) {
        let mut outbox = Outbox::default();
        {
            let mut inner = self.lock();
            outbox.event_tx = inner.event_tx.clone();

            let resolved = instance
                .options()
                .resolve(&self.shared.config, &inner.document);

            self.stop_matching(&mut inner.running, Some(&resolved.namespace), &mut outbox);
            self.begin(&mut inner.running, instance, resolved, &mut outbox);
        }
        outbox.deliver();
    }

    /// Stop a scroll, returns whether it was running
    ///
    /// A running scroll reports `false` to its completion callback.
    pub fn stop(&self, instance: &ScrollInstance) -> bool {
        let mut outbox = Outbox::default();
        let stopped = {
            let mut inner = self.lock();
            outbox.event_tx = inner.event_tx.clone();
            self.stop_internal(
                &mut inner.running,
                instance,
                StopReason::Interrupted,
                &mut outbox,
            )
        };
        outbox.deliver();
        stopped
    }

    /// Stop every scroll of `namespace`, or every scroll for `None` or `""`
    ///
    /// Returns whether anything was stopped.
    pub fn stop_all(&self, namespace: Option<&str>) -> bool {
        let mut outbox = Outbox::default();
        let stopped = {
            let mut inner = self.lock();
            outbox.event_tx = inner.event_tx.clone();
            self.stop_matching(&mut inner.running, namespace, &mut outbox)
        };
        outbox.deliver();
        stopped
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.shared.inner)
    }

    fn diagnostics(&self) -> bool {
        self.shared.config.log_level.enabled()
    }

    fn begin(
        &self,
        running: &mut Vec<ScrollInstance>,
        instance: &ScrollInstance,
        resolved: ResolvedOptions,
        outbox: &mut Outbox,
    ) {
        if resolved.scroll_views.is_empty() {
            if self.diagnostics() {
                warn!(
                    namespace = %resolved.namespace,
                    "No scroll views specified, nothing to scroll"
                );
            }
            return;
        }

        let resolved = Arc::new(resolved);
        let mut state = instance.state();
        state.generation += 1;
        state.resolved = Some(Arc::clone(&resolved));
        state.start_time = None;
        state.end_time = None;

        let axis = resolved.axis;
        let start = probe_start_position(&resolved.scroll_views, axis);
        state.start_position = start;

        let Some(target) = resolved.target_position() else {
            state.target_position = None;
            state.distance = None;
            drop(state);
            if self.diagnostics() {
                warn!(
                    namespace = %resolved.namespace,
                    requested = ?resolved.target,
                    "Scroll target could not be resolved, not scrolling"
                );
            }
            outbox.finish(instance, &resolved, false);
            return;
        };

        let distance = target - start;
        let duration = resolved.execution_duration(distance);
        state.target_position = Some(target);
        state.distance = Some(distance);
        state.execution_duration = duration;

        let at_destination = distance.abs() < resolved.min_scroll_distance;
        if at_destination || duration <= resolved.interval {
            drop(state);
            if self.diagnostics() {
                if at_destination {
                    debug!(to = target, distance, "Already at the destination, jumping to target");
                } else {
                    debug!(?duration, "Scroll shorter than one tick, jumping to target");
                }
            }
            apply_position(
                &resolved.scroll_views,
                axis,
                target,
                resolved.min_scroll_distance,
            );
            outbox.finish(instance, &resolved, true);
            return;
        }

        if resolved.interruptible {
            match &resolved.input {
                Some(input) => {
                    let id = input.attach(self.interrupt_listener(&resolved));
                    state.listener = Some((Arc::clone(input), id));
                }
                None => debug!(
                    namespace = %resolved.namespace,
                    "No input source, scroll cannot be interrupted by input"
                ),
            }
        }

        let now = Instant::now();
        state.start_time = Some(now);
        state.end_time = Some(now + duration);

        let generation = state.generation;
        let weak = Arc::downgrade(&self.shared);
        let ticking = instance.clone();
        state.timer = Some(timer::every(
            &self.shared.runtime,
            resolved.interval,
            move || match weak.upgrade() {
                Some(shared) => ScrollController { shared }.tick(&ticking, generation),
                None => ControlFlow::Break(()),
            },
        ));
        drop(state);

        debug!(
            namespace = %resolved.namespace,
            from = start,
            to = target,
            ?duration,
            "Scroll started"
        );
        running.push(instance.clone());
        outbox.event(ScrollEvent::Started {
            id: instance.id(),
            namespace: resolved.namespace.clone(),
            from: start,
            to: target,
            duration,
        });
    }

    /// Advance one scroll by one tick
    fn tick(&self, instance: &ScrollInstance, generation: u64) -> ControlFlow<()> {
        let mut outbox = Outbox::default();
        let flow = {
            let mut inner = self.lock();
            outbox.event_tx = inner.event_tx.clone();

            let state = instance.state();
            // A stop or restart may have raced this tick
            if state.generation != generation || state.timer.is_none() {
                return ControlFlow::Break(());
            }
            let (Some(resolved), Some(start_time), Some(end_time), Some(target), Some(distance)) = (
                state.resolved.clone(),
                state.start_time,
                state.end_time,
                state.target_position,
                state.distance,
            ) else {
                return ControlFlow::Break(());
            };
            let start = state.start_position;
            let duration_ms = state.execution_duration.as_secs_f64() * 1000.0;
            drop(state);

            let now = Instant::now();
            let mut reason = None;
            let position = if is_complete(end_time, now) {
                reason = Some(StopReason::Completed);
                target
            } else {
                round_position(resolved.easing.ease(
                    elapsed_ms(start_time, now),
                    start,
                    distance,
                    duration_ms,
                ))
            };
            trace!(position, "Scroll tick");

            if !apply_position(
                &resolved.scroll_views,
                resolved.axis,
                position,
                resolved.min_scroll_distance,
            ) {
                debug!(position, "No scroll view accepted the position, stopping early");
                reason = Some(StopReason::Unreachable);
            }

            match reason {
                Some(reason) => {
                    self.stop_internal(&mut inner.running, instance, reason, &mut outbox);
                    ControlFlow::Break(())
                }
                None => ControlFlow::Continue(()),
            }
        };
        outbox.deliver();
        flow
    }

    /// Stop every running instance matching `namespace`
    fn stop_matching(
        &self,
        running: &mut Vec<ScrollInstance>,
        namespace: Option<&str>,
        outbox: &mut Outbox,
    ) -> bool {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        let mut stopped = false;
        let mut index = 0;

        while index < running.len() {
            let instance = running[index].clone();
            let matches = match namespace {
                Some(ns) => instance.namespace().as_deref() == Some(ns),
                None => true,
            };
            if matches {
                // Removes `instance` from `running`, so `index` now points at the next one
                self.stop_internal(running, &instance, StopReason::Interrupted, outbox);
                stopped = true;
            } else {
                index += 1;
            }
        }
        stopped
    }

    /// Shared stop sequence, returns whether a timer was cancelled
    fn stop_internal(
        &self,
        running: &mut Vec<ScrollInstance>,
        instance: &ScrollInstance,
        reason: StopReason,
        outbox: &mut Outbox,
    ) -> bool {
        if let Some(index) = running.iter().position(|r| r.same_as(instance)) {
            running.remove(index);
        }

        let mut state = instance.state();
        if let Some((input, id)) = state.listener.take() {
            input.detach(id);
        }
        let Some(timer) = state.timer.take() else {
            return false;
        };
        timer.cancel();
        let resolved = state.resolved.clone();
        drop(state);

        debug!(id = %instance.id(), ?reason, "Scroll stopped");
        if let Some(resolved) = resolved {
            outbox.finish(instance, &resolved, reason.reached());
        }
        true
    }

    /// Listener stopping the namespace of `resolved` on interrupting input
    fn interrupt_listener(&self, resolved: &ResolvedOptions) -> InterruptListener {
        let weak = Arc::downgrade(&self.shared);
        let namespace = resolved.namespace.clone();
        let keys = resolved.interrupt_keys.clone();
        let views = resolved.scroll_views.clone();

        Arc::new(move |event: &InputEvent| {
            if !should_interrupt(event, &keys, &views) {
                return;
            }
            if let Some(shared) = weak.upgrade() {
                debug!(namespace = %namespace, ?event, "Scroll interrupted by input");
                ScrollController { shared }.stop_all(Some(&namespace));
            }
        })
    }
}

/// Notifications collected under the lock, delivered after it is released
#[derive(Default)]
struct Outbox {
    event_tx: Option<mpsc::UnboundedSender<ScrollEvent>>,
    pending: Vec<Notice>,
}

enum Notice {
    Event(ScrollEvent),
    Finish(FinishCallback, bool),
}

impl Outbox {
    fn event(&mut self, event: ScrollEvent) {
        self.pending.push(Notice::Event(event));
    }

    fn finish(&mut self, instance: &ScrollInstance, resolved: &ResolvedOptions, reached: bool) {
        self.event(ScrollEvent::Finished {
            id: instance.id(),
            namespace: resolved.namespace.clone(),
            reached,
        });
        if let Some(callback) = &resolved.on_finish {
            self.pending.push(Notice::Finish(Arc::clone(callback), reached));
        }
    }

    fn deliver(self) {
        for notice in self.pending {
            match notice {
                Notice::Event(event) => {
                    if let Some(ref tx) = self.event_tx {
                        if tx.send(event).is_err() {
                            trace!("Scroll event receiver dropped");
                        }
                    }
                }
                Notice::Finish(callback, reached) => callback(reached),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::Range;
    use std::sync::Mutex;

    use crate::interrupt::EventBus;
    use crate::options::ScrollTarget;
    use crate::view::{AnchorResolver, Axis, ScrollView};

    /// Scroll view over `rows`, clamping writes to `[0, max]`
    struct Pane {
        offset: Mutex<f64>,
        max: f64,
        rows: Range<u16>,
        frozen: bool,
    }

    impl Pane {
        fn new(offset: f64, rows: Range<u16>) -> Arc<Self> {
            Arc::new(Self {
                offset: Mutex::new(offset),
                max: 10_000.0,
                rows,
                frozen: false,
            })
        }

        fn frozen() -> Arc<Self> {
            Arc::new(Self {
                offset: Mutex::new(0.0),
                max: 10_000.0,
                rows: 0..10,
                frozen: true,
            })
        }

        fn offset(&self) -> f64 {
            *self.offset.lock().unwrap()
        }
    }

    impl ScrollView for Pane {
        fn scroll_offset(&self, _axis: Axis) -> Option<f64> {
            Some(self.offset())
        }

        fn set_scroll_offset(&self, _axis: Axis, offset: f64) {
            if !self.frozen {
                *self.offset.lock().unwrap() = offset.clamp(0.0, self.max);
            }
        }

        fn contains(&self, _column: u16, row: u16) -> bool {
            self.rows.contains(&row)
        }
    }

    struct Headings;

    impl AnchorResolver for Headings {
        fn resolve(&self, anchor: &str) -> Option<(f64, f64)> {
            match anchor {
                "intro" => Some((0.0, 300.0)),
                _ => None,
            }
        }
    }

    type Results = Arc<Mutex<Vec<bool>>>;

    fn recorder() -> (Results, impl Fn(bool) + Clone + Send + Sync + 'static) {
        let results: Results = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&results);
        (results, move |reached| sink.lock().unwrap().push(reached))
    }

    fn results(results: &Results) -> Vec<bool> {
        results.lock().unwrap().clone()
    }

    fn views(pane: &Arc<Pane>) -> Vec<Arc<dyn ScrollView>> {
        vec![pane.clone() as Arc<dyn ScrollView>]
    }

    fn controller() -> ScrollController {
        ScrollController::new(ScrollConfig::default()).unwrap()
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        assert!(matches!(
            ScrollController::new(ScrollConfig::default()),
            Err(Error::NoRuntime)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_animates_to_target_and_reports_success() {
        let controller = controller();
        let pane = Pane::new(0.0, 0..10);
        let (done, on_finish) = recorder();

        let instance = controller.scroll(
            ScrollOptions::new()
                .target(500.0)
                .scroll_views(views(&pane))
                .duration(Duration::from_millis(1000))
                .min_scroll_distance(5.0)
                .on_finish(on_finish),
        );

        assert!(instance.is_running());
        assert_eq!(controller.running_count(), 1);
        assert_eq!(instance.distance(), Some(500.0));

        sleep_ms(500).await;
        let midway = pane.offset();
        assert!(midway > 0.0 && midway < 500.0, "midway offset {}", midway);
        assert!(results(&done).is_empty());

        sleep_ms(600).await;
        assert_eq!(pane.offset(), 500.0);
        assert_eq!(results(&done), vec![true]);
        assert!(!instance.is_running());
        assert_eq!(controller.running_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_easing_drives_positions() {
        let controller = controller();
        let pane = Pane::new(0.0, 0..10);

        controller.scroll(
            ScrollOptions::new()
                .target(500.0)
                .scroll_views(views(&pane))
                .duration(Duration::from_millis(1000))
                .easing(|t: f64, b: f64, c: f64, d: f64| c * t / d + b),
        );

        sleep_ms(505).await;
        assert_eq!(pane.offset(), 250.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_distance_jumps_synchronously() {
        let controller = controller();
        let pane = Pane::new(100.0, 0..10);
        let (done, on_finish) = recorder();

        let instance = controller.scroll(
            ScrollOptions::new()
                .target(101.0)
                .scroll_views(views(&pane))
                .min_scroll_distance(2.0)
                .on_finish(on_finish),
        );

        assert_eq!(pane.offset(), 101.0);
        assert_eq!(results(&done), vec![true]);
        assert!(!instance.is_running());
        assert_eq!(controller.running_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duration_within_one_tick_jumps() {
        let controller = controller();
        let pane = Pane::new(0.0, 0..10);
        let (done, on_finish) = recorder();

        controller.scroll(
            ScrollOptions::new()
                .target(800.0)
                .scroll_views(views(&pane))
                .duration(Duration::from_millis(10))
                .interval(Duration::from_millis(10))
                .on_finish(on_finish),
        );

        assert_eq!(pane.offset(), 800.0);
        assert_eq!(results(&done), vec![true]);
        assert_eq!(controller.running_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_sets_duration() {
        let controller = controller();
        let pane = Pane::new(0.0, 0..10);

        let instance = controller.scroll(
            ScrollOptions::new()
                .target(500.0)
                .scroll_views(views(&pane))
                .speed(1000.0),
        );

        assert_eq!(instance.execution_duration(), Duration::from_millis(500));
        sleep_ms(510).await;
        assert_eq!(pane.offset(), 500.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_position_is_probed() {
        let controller = controller();
        let blank = Pane::new(0.0, 0..10);
        let scrolled = Pane::new(200.0, 10..20);

        let instance = controller.scroll(
            ScrollOptions::new()
                .target(500.0)
                .scroll_views(vec![
                    blank.clone() as Arc<dyn ScrollView>,
                    scrolled.clone() as Arc<dyn ScrollView>,
                ]),
        );

        assert_eq!(instance.start_position(), 200.0);
        assert_eq!(instance.distance(), Some(300.0));
        controller.stop(&instance);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_scroll_views_is_skipped() {
        let controller = controller();
        let (done, on_finish) = recorder();

        let instance = controller.scroll(
            ScrollOptions::new()
                .target(500.0)
                .scroll_views(Vec::new())
                .on_finish(on_finish),
        );

        sleep_ms(50).await;
        assert!(results(&done).is_empty());
        assert!(!instance.is_running());
        assert_eq!(controller.running_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unresolvable_target_reports_failure() {
        let pane = Pane::new(0.0, 0..10);
        let controller = controller().with_document(
            Document::new()
                .with_scroll_view(pane.clone())
                .with_anchors(Arc::new(Headings)),
        );
        let (done, on_finish) = recorder();

        let instance = controller.scroll(
            ScrollOptions::new()
                .target(ScrollTarget::Anchor("missing".into()))
                .on_finish(on_finish),
        );

        assert_eq!(results(&done), vec![false]);
        assert_eq!(instance.target_position(), None);
        assert!(!instance.is_running());
        assert_eq!(pane.offset(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_anchor_target_uses_document() {
        let pane = Pane::new(0.0, 0..10);
        let controller = controller().with_document(
            Document::new()
                .with_scroll_view(pane.clone())
                .with_anchors(Arc::new(Headings)),
        );

        let instance = controller.scroll(
            ScrollOptions::new()
                .target("intro")
                .scroll_offset(50.0)
                .duration(Duration::from_millis(200)),
        );

        assert_eq!(instance.target_position(), Some(250.0));
        sleep_ms(250).await;
        assert_eq!(pane.offset(), 250.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_namespace_restart_stops_previous() {
        let controller = controller();
        let pane = Pane::new(0.0, 0..10);
        let (first_done, first_finish) = recorder();
        let (second_done, second_finish) = recorder();

        let first = controller.scroll(
            ScrollOptions::new()
                .target(500.0)
                .namespace("main")
                .scroll_views(views(&pane))
                .on_finish(first_finish),
        );
        sleep_ms(100).await;

        let second = controller.scroll(
            ScrollOptions::new()
                .target(0.0)
                .namespace("main")
                .scroll_views(views(&pane))
                .duration(Duration::from_millis(300))
                .on_finish(second_finish),
        );

        assert_eq!(results(&first_done), vec![false]);
        assert!(!first.is_running());
        assert!(second.is_running());
        assert_eq!(controller.running_count(), 1);

        sleep_ms(400).await;
        assert_eq!(results(&second_done), vec![true]);
        assert_eq!(results(&first_done), vec![false]);
        assert_eq!(pane.offset(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_scoped_to_namespace() {
        let controller = controller();
        let left = Pane::new(0.0, 0..10);
        let right = Pane::new(0.0, 10..20);
        let (left_done, left_finish) = recorder();
        let (right_done, right_finish) = recorder();

        let a = controller.scroll(
            ScrollOptions::new()
                .target(400.0)
                .namespace("left")
                .scroll_views(views(&left))
                .duration(Duration::from_millis(500))
                .on_finish(left_finish),
        );
        let b = controller.scroll(
            ScrollOptions::new()
                .target(400.0)
                .namespace("right")
                .scroll_views(views(&right))
                .duration(Duration::from_millis(500))
                .on_finish(right_finish),
        );
        assert_eq!(controller.running_count(), 2);

        assert!(controller.stop_all(Some("left")));
        assert!(!a.is_running());
        assert!(b.is_running());
        assert!(!controller.stop_all(Some("left")));
        assert!(controller.is_running("right"));

        sleep_ms(600).await;
        assert_eq!(results(&left_done), vec![false]);
        assert_eq!(results(&right_done), vec![true]);
        assert_eq!(right.offset(), 400.0);
        assert!(left.offset() < 400.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_without_namespace_stops_everything() {
        let controller = controller();
        assert!(!controller.stop_all(None));

        let (done, on_finish) = recorder();
        let on_finish = Arc::new(on_finish);
        let mut instances = Vec::new();
        for ns in ["a", "b", "c"] {
            let pane = Pane::new(0.0, 0..10);
            let callback = Arc::clone(&on_finish);
            instances.push(controller.scroll(
                ScrollOptions::new()
                    .target(900.0)
                    .namespace(ns)
                    .scroll_views(views(&pane))
                    .on_finish(move |reached| callback(reached)),
            ));
        }
        assert_eq!(controller.running_count(), 3);

        assert!(controller.stop_all(None));
        assert_eq!(controller.running_count(), 0);
        assert!(instances.iter().all(|i| !i.is_running()));
        assert_eq!(results(&done), vec![false, false, false]);
        assert!(!controller.stop_all(Some("")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let controller = controller();
        let pane = Pane::new(0.0, 0..10);
        let (done, on_finish) = recorder();

        let instance = controller.scroll(
            ScrollOptions::new()
                .target(500.0)
                .scroll_views(views(&pane))
                .on_finish(on_finish),
        );

        assert!(controller.stop(&instance));
        assert!(!controller.stop(&instance));
        sleep_ms(2000).await;

        assert_eq!(results(&done), vec![false]);
        assert_eq!(pane.offset(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_instance_can_be_restarted() {
        let controller = controller();
        let pane = Pane::new(0.0, 0..10);
        let (done, on_finish) = recorder();

        let instance = ScrollInstance::new(
            ScrollOptions::new()
                .target(300.0)
                .scroll_views(views(&pane))
                .duration(Duration::from_millis(100))
                .on_finish(on_finish),
        );

        controller.start(&instance);
        controller.stop(&instance);
        controller.start(&instance);
        sleep_ms(150).await;

        assert_eq!(results(&done), vec![false, true]);
        assert_eq!(pane.offset(), 300.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unwritable_views_stop_early_with_failure() {
        let controller = controller();
        let pane = Pane::frozen();
        let (done, on_finish) = recorder();

        let instance = controller.scroll(
            ScrollOptions::new()
                .target(500.0)
                .scroll_views(views(&pane))
                .duration(Duration::from_millis(1000))
                .on_finish(on_finish),
        );

        sleep_ms(300).await;
        assert!(!instance.is_running());
        assert_eq!(results(&done), vec![false]);
        assert_eq!(pane.offset(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_keys() {
        let bus = Arc::new(EventBus::new());
        let pane = Pane::new(0.0, 0..10);
        let controller = controller().with_document(
            Document::new()
                .with_scroll_view(pane.clone())
                .with_input(bus.clone()),
        );
        let (done, on_finish) = recorder();

        let instance = controller.scroll(
            ScrollOptions::new()
                .target(500.0)
                .interrupt_keys(["<Esc>"])
                .on_finish(on_finish),
        );
        assert!(instance.interrupt_listeners_attached());
        assert_eq!(bus.listener_count(), 1);

        bus.dispatch(&InputEvent::key_release("j"));
        assert!(instance.is_running());

        bus.dispatch(&InputEvent::key_release("<Escape>"));
        assert!(!instance.is_running());
        assert!(!instance.interrupt_listeners_attached());
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(results(&done), vec![false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mouse_press_inside_views_interrupts() {
        let bus = Arc::new(EventBus::new());
        let pane = Pane::new(0.0, 5..15);
        let controller =
            controller().with_document(Document::new().with_input(bus.clone()));

        let instance = controller.scroll(
            ScrollOptions::new()
                .target(500.0)
                .scroll_views(views(&pane)),
        );

        bus.dispatch(&InputEvent::mouse_press(3, 20));
        assert!(instance.is_running());

        bus.dispatch(&InputEvent::mouse_press(3, 7));
        assert!(!instance.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_only_affects_own_namespace() {
        let bus = Arc::new(EventBus::new());
        let controller =
            controller().with_document(Document::new().with_input(bus.clone()));
        let top = Pane::new(0.0, 0..10);
        let bottom = Pane::new(0.0, 10..20);

        let interruptible = controller.scroll(
            ScrollOptions::new()
                .target(500.0)
                .namespace("top")
                .scroll_views(views(&top)),
        );
        let steady = controller.scroll(
            ScrollOptions::new()
                .target(500.0)
                .namespace("bottom")
                .interruptible(false)
                .scroll_views(views(&bottom)),
        );
        assert!(!steady.interrupt_listeners_attached());
        assert_eq!(bus.listener_count(), 1);

        bus.dispatch(&InputEvent::key_release("<Esc>"));
        assert!(!interruptible.is_running());
        assert!(steady.is_running());

        // Clicking inside the non-interruptible view does nothing either
        bus.dispatch(&InputEvent::mouse_press(0, 12));
        assert!(steady.is_running());
        controller.stop_all(None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_may_restart_scroll() {
        let controller = controller();
        let pane = Pane::new(0.0, 0..10);
        let (done, on_finish) = recorder();

        let chained = controller.clone();
        let follow_up_views = views(&pane);
        let follow_up = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&follow_up);
        controller.scroll(
            ScrollOptions::new()
                .target(200.0)
                .scroll_views(views(&pane))
                .duration(Duration::from_millis(100))
                .on_finish(move |_| {
                    let next = chained.scroll(
                        ScrollOptions::new()
                            .target(400.0)
                            .scroll_views(follow_up_views.clone())
                            .duration(Duration::from_millis(100))
                            .on_finish(on_finish.clone()),
                    );
                    *slot.lock().unwrap() = Some(next);
                }),
        );

        sleep_ms(250).await;
        assert_eq!(pane.offset(), 400.0);
        assert_eq!(results(&done), vec![true]);
        assert!(follow_up.lock().unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_are_sent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = controller().with_event_sender(tx);
        let pane = Pane::new(0.0, 0..10);

        let instance = controller.scroll(
            ScrollOptions::new()
                .target(100.0)
                .namespace("events")
                .scroll_views(views(&pane))
                .duration(Duration::from_millis(100)),
        );
        sleep_ms(150).await;

        assert_eq!(
            rx.recv().await,
            Some(ScrollEvent::Started {
                id: instance.id(),
                namespace: "events".into(),
                from: 0.0,
                to: 100.0,
                duration: Duration::from_millis(100),
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(ScrollEvent::Finished {
                id: instance.id(),
                namespace: "events".into(),
                reached: true,
            })
        );
    }

    #[tokio::test]
    async fn test_controller_count_is_tracked() {
        let before = diagnostics::controller_count();
        let _controller = controller();
        assert!(diagnostics::controller_count() > before);
    }
}
