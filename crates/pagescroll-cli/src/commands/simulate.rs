use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use pagescroll_core::{
    Axis, Document, EasingType, EventBus, InputEvent, ScrollConfig, ScrollController, ScrollEvent,
    ScrollOptions, ScrollView,
};

#[derive(Args, Clone, Debug)]
pub struct SimulateArgs {
    /// Offset the simulated view starts at
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub from: f64,
    /// Offset to scroll to
    #[arg(long, allow_hyphen_values = true)]
    pub to: f64,
    /// Animation duration in milliseconds
    #[arg(short, long)]
    pub duration_ms: Option<u64>,
    /// Speed in positions per second, used when no duration is given
    #[arg(short, long)]
    pub speed: Option<f64>,
    /// Easing curve (none, linear, quad-in-out, cubic, quintic, ease-out, expo-in-out)
    #[arg(short, long)]
    pub easing: Option<EasingType>,
    /// Tick interval in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,
    /// Distances below this are jumped
    #[arg(long)]
    pub min_distance: Option<f64>,
    /// Largest offset the simulated view accepts
    #[arg(long, default_value_t = 10_000.0)]
    pub max: f64,
    /// Release <Esc> after this many milliseconds
    #[arg(long)]
    pub interrupt_after_ms: Option<u64>,
    /// Print JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}

impl SimulateArgs {
    /// Request options from the flags; unset flags fall back to the config
    fn options(&self) -> ScrollOptions {
        let mut options = ScrollOptions::new().target(self.to);
        if let Some(ms) = self.duration_ms {
            options = options.duration(Duration::from_millis(ms));
        }
        if let Some(speed) = self.speed {
            options = options.speed(speed);
        }
        if let Some(easing) = self.easing {
            options = options.easing(easing);
        }
        if let Some(ms) = self.interval_ms {
            options = options.interval(Duration::from_millis(ms));
        }
        if let Some(distance) = self.min_distance {
            options = options.min_scroll_distance(distance);
        }
        options
    }
}

/// Output record, one per line in JSON mode
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record {
    Started {
        from: f64,
        to: f64,
        duration_ms: u128,
        easing: &'static str,
    },
    Frame {
        elapsed_ms: u128,
        position: f64,
    },
    Finished {
        reached: bool,
        position: f64,
        elapsed_ms: u128,
    },
}

impl Record {
    fn text(&self) -> String {
        match self {
            Record::Started {
                from,
                to,
                duration_ms,
                easing,
            } => format!("scroll {} -> {} over {} ms ({})", from, to, duration_ms, easing),
            Record::Frame {
                elapsed_ms,
                position,
            } => format!("{:>6} ms  {:>8}", elapsed_ms, position),
            Record::Finished {
                reached: true,
                elapsed_ms,
                ..
            } => format!("reached the target after {} ms", elapsed_ms),
            Record::Finished {
                reached: false,
                position,
                elapsed_ms,
            } => format!("stopped at {} after {} ms, target not reached", position, elapsed_ms),
        }
    }
}

/// In-memory scroll view reporting every accepted offset
struct SimulatedView {
    offset: Mutex<f64>,
    max: f64,
    frames: mpsc::UnboundedSender<(Instant, f64)>,
}

impl SimulatedView {
    fn new(offset: f64, max: f64, frames: mpsc::UnboundedSender<(Instant, f64)>) -> Self {
        Self {
            offset: Mutex::new(offset.clamp(0.0, max)),
            max,
            frames,
        }
    }

    fn offset(&self) -> f64 {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ScrollView for SimulatedView {
    fn scroll_offset(&self, _axis: Axis) -> Option<f64> {
        Some(self.offset())
    }

    fn set_scroll_offset(&self, _axis: Axis, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        let offset = offset.clamp(0.0, self.max);
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner) = offset;
        // The receiver only goes away once the simulation is over
        let _ = self.frames.send((Instant::now(), offset));
    }

    fn contains(&self, _column: u16, _row: u16) -> bool {
        false
    }
}

pub async fn run(config: ScrollConfig, args: SimulateArgs) -> Result<()> {
    if !args.max.is_finite() || args.max < 0.0 {
        bail!("--max must be a non-negative number, got {}", args.max);
    }

    let easing = args.easing.unwrap_or(config.easing);
    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let view = Arc::new(SimulatedView::new(args.from, args.max, frame_tx));
    let bus = Arc::new(EventBus::new());

    let controller = ScrollController::new(config)?
        .with_document(
            Document::new()
                .with_scroll_view(view.clone())
                .with_input(bus.clone()),
        )
        .with_event_sender(event_tx);

    if let Some(after) = args.interrupt_after_ms {
        let bus = Arc::clone(&bus);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(after)).await;
            let listeners = bus.dispatch(&InputEvent::key_release("<Esc>"));
            debug!(listeners, "Released <Esc>");
        });
    }

    let emit = |record: Record| -> Result<()> {
        if args.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}", record.text());
        }
        Ok(())
    };

    let started = Instant::now();
    let frame = |(at, position): (Instant, f64)| Record::Frame {
        elapsed_ms: at.saturating_duration_since(started).as_millis(),
        position,
    };

    let instance = controller.scroll(args.options());
    debug!(id = %instance.id(), "Simulation started");

    let reached = loop {
        tokio::select! {
            biased;
            Some(event) = event_rx.recv() => match event {
                ScrollEvent::Started { from, to, duration, .. } => emit(Record::Started {
                    from,
                    to,
                    duration_ms: duration.as_millis(),
                    easing: easing.name(),
                })?,
                ScrollEvent::Finished { reached, .. } => break reached,
            },
            Some(written) = frame_rx.recv() => emit(frame(written))?,
            else => bail!("scroll controller stopped without finishing"),
        }
    };

    while let Ok(written) = frame_rx.try_recv() {
        emit(frame(written))?;
    }

    emit(Record::Finished {
        reached,
        position: view.offset(),
        elapsed_ms: started.elapsed().as_millis(),
    })
}
