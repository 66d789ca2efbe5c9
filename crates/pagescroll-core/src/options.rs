//! Per-request scroll options and their merge over the process defaults

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ScrollConfig, DEFAULT_DURATION_MS};
use crate::easing::Easing;
use crate::interrupt::{InterruptKeys, InterruptSource};
use crate::timing::duration_for_speed;
use crate::view::{AnchorResolver, Axis, Document, ScrollView};

/// Completion callback, `true` when the target was reached
pub type FinishCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Where a scroll should end up
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollTarget {
    /// Literal offset along the scroll axis
    Offset(f64),
    /// Literal content position; the axis picks the coordinate
    Point { x: f64, y: f64 },
    /// Named anchor looked up through the document's resolver
    Anchor(String),
}

impl ScrollTarget {
    /// Content coordinate of the target along `axis`
    pub fn resolve(&self, axis: Axis, anchors: Option<&dyn AnchorResolver>) -> Option<f64> {
        let value = match self {
            ScrollTarget::Offset(offset) => *offset,
            ScrollTarget::Point { x, y } => pick(axis, *x, *y),
            ScrollTarget::Anchor(name) => {
                let (x, y) = anchors?.resolve(name)?;
                pick(axis, x, y)
            }
        };
        value.is_finite().then_some(value)
    }
}

fn pick(axis: Axis, x: f64, y: f64) -> f64 {
    match axis {
        Axis::Vertical => y,
        Axis::Horizontal => x,
    }
}

impl From<f64> for ScrollTarget {
    fn from(offset: f64) -> Self {
        ScrollTarget::Offset(offset)
    }
}

impl From<&str> for ScrollTarget {
    fn from(anchor: &str) -> Self {
        ScrollTarget::Anchor(anchor.to_string())
    }
}

/// Partial options for one scroll request
///
/// Unset fields fall back to the controller's config and document when the
/// scroll starts.
#[derive(Clone, Default)]
pub struct ScrollOptions {
    pub document: Option<Document>,
    pub target: Option<ScrollTarget>,
    /// `Some(vec![])` explicitly scrolls nothing; `None` uses the document's views
    pub scroll_views: Option<Vec<Arc<dyn ScrollView>>>,
    pub namespace: Option<String>,
    pub duration: Option<Duration>,
    pub speed: Option<f64>,
    pub interruptible: Option<bool>,
    pub easing: Option<Arc<dyn Easing>>,
    pub min_scroll_distance: Option<f64>,
    pub interval: Option<Duration>,
    pub axis: Option<Axis>,
    pub scroll_offset: Option<f64>,
    pub interrupt_keys: Option<Vec<String>>,
    pub on_finish: Option<FinishCallback>,
}

impl ScrollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: impl Into<ScrollTarget>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }

    pub fn scroll_views(mut self, views: Vec<Arc<dyn ScrollView>>) -> Self {
        self.scroll_views = Some(views);
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn interruptible(mut self, interruptible: bool) -> Self {
        self.interruptible = Some(interruptible);
        self
    }

    pub fn easing(mut self, easing: impl Easing + 'static) -> Self {
        self.easing = Some(Arc::new(easing));
        self
    }

    pub fn min_scroll_distance(mut self, distance: f64) -> Self {
        self.min_scroll_distance = Some(distance);
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    pub fn scroll_offset(mut self, offset: f64) -> Self {
        self.scroll_offset = Some(offset);
        self
    }

    pub fn interrupt_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interrupt_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn on_finish(mut self, callback: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.on_finish = Some(Arc::new(callback));
        self
    }

    /// Merge these options over `config` and the controller's `document`
    pub fn resolve(&self, config: &ScrollConfig, document: &Document) -> ResolvedOptions {
        let document = self.document.as_ref().unwrap_or(document);

        ResolvedOptions {
            target: self.target.clone(),
            scroll_views: self
                .scroll_views
                .clone()
                .unwrap_or_else(|| document.scroll_views.clone()),
            anchors: document.anchors.clone(),
            input: document.input.clone(),
            namespace: self
                .namespace
                .clone()
                .unwrap_or_else(|| config.namespace.clone()),
            duration: self.duration.or(config.duration_ms.map(Duration::from_millis)),
            speed: self.speed.or(config.speed),
            duration_is_explicit: self.duration.is_some(),
            speed_is_explicit: self.speed.is_some(),
            interruptible: self.interruptible.unwrap_or(config.interruptible),
            easing: self
                .easing
                .clone()
                .unwrap_or_else(|| Arc::new(config.easing) as Arc<dyn Easing>),
            min_scroll_distance: self
                .min_scroll_distance
                .unwrap_or(config.min_scroll_distance),
            interval: self.interval.unwrap_or_else(|| config.interval()),
            axis: self
                .axis
                .unwrap_or_else(|| Axis::from_vertical(config.vertical)),
            scroll_offset: self.scroll_offset.unwrap_or(config.scroll_offset),
            interrupt_keys: match &self.interrupt_keys {
                Some(keys) => InterruptKeys::from_notation(keys),
                None => InterruptKeys::from_notation(&config.interrupt_keys),
            },
            on_finish: self.on_finish.clone(),
        }
    }
}

impl fmt::Debug for ScrollOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollOptions")
            .field("target", &self.target)
            .field("scroll_views", &self.scroll_views.as_ref().map(Vec::len))
            .field("namespace", &self.namespace)
            .field("duration", &self.duration)
            .field("speed", &self.speed)
            .field("interruptible", &self.interruptible)
            .field("axis", &self.axis)
            .finish_non_exhaustive()
    }
}

/// Options after merging, fixed for the lifetime of one run
#[derive(Clone)]
pub struct ResolvedOptions {
    pub target: Option<ScrollTarget>,
    pub scroll_views: Vec<Arc<dyn ScrollView>>,
    pub anchors: Option<Arc<dyn AnchorResolver>>,
    pub input: Option<Arc<dyn InterruptSource>>,
    pub namespace: String,
    pub duration: Option<Duration>,
    pub speed: Option<f64>,
    duration_is_explicit: bool,
    speed_is_explicit: bool,
    pub interruptible: bool,
    pub easing: Arc<dyn Easing>,
    pub min_scroll_distance: f64,
    pub interval: Duration,
    pub axis: Axis,
    pub scroll_offset: f64,
    pub interrupt_keys: InterruptKeys,
    pub on_finish: Option<FinishCallback>,
}

impl ResolvedOptions {
    /// Target position along the scroll axis, offset applied and rounded
    pub fn target_position(&self) -> Option<f64> {
        let target = self
            .target
            .as_ref()?
            .resolve(self.axis, self.anchors.as_deref())?;
        Some(crate::timing::round_position(target - self.scroll_offset))
    }

    /// How long covering `distance` should take
    ///
    /// A duration or speed given on the request beats one from the config;
    /// on the same level a duration beats a speed.
    pub fn execution_duration(&self, distance: f64) -> Duration {
        let by_speed = |speed: Option<f64>| speed.and_then(|s| duration_for_speed(distance, s));

        if self.duration_is_explicit {
            if let Some(duration) = self.duration {
                return duration;
            }
        }
        if self.speed_is_explicit {
            if let Some(duration) = by_speed(self.speed) {
                return duration;
            }
        }
        self.duration
            .or_else(|| by_speed(self.speed))
            .unwrap_or(Duration::from_millis(DEFAULT_DURATION_MS))
    }
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("target", &self.target)
            .field("scroll_views", &self.scroll_views.len())
            .field("namespace", &self.namespace)
            .field("duration", &self.duration)
            .field("speed", &self.speed)
            .field("interruptible", &self.interruptible)
            .field("min_scroll_distance", &self.min_scroll_distance)
            .field("interval", &self.interval)
            .field("axis", &self.axis)
            .field("scroll_offset", &self.scroll_offset)
            .finish_non_exhaustive()
    }
}
