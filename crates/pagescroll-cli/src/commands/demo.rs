use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::info;

use pagescroll_core::{
    Axis, Document, EventBus, ScrollConfig, ScrollController, ScrollEvent, ScrollOptions,
    ScrollTarget,
};
use pagescroll_tui::{
    widgets::{ContentWidget, StatusBarWidget},
    AnchorMap, AppEvent, EventHandler, InputTranslator, Viewport,
};

/// Redraw period while idle or animating
const TICK_RATE_MS: u64 = 16;

const HINT: &str = " q:quit j/k:line d/u:half page g/G:top/bottom n/p:heading 1-9:jump s:stop i:toggle ";

pub async fn run(config: ScrollConfig, file: Option<PathBuf>) -> Result<()> {
    let (title, lines) = match file {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let title = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());
            (title, text.lines().map(String::from).collect())
        }
        None => ("pagescroll demo".to_string(), sample_document()),
    };

    let releases_reported = matches!(supports_keyboard_enhancement(), Ok(true));
    let (mut demo, event_rx) = Demo::new(config, title, lines, releases_reported)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("pagescroll"))?;
    if releases_reported {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!(releases_reported, "Demo started");

    let result = demo.run_loop(&mut terminal, event_rx);

    // Restore terminal
    demo.controller.stop_all(None);
    if releases_reported {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

struct Demo {
    title: String,
    lines: Vec<String>,
    anchors: AnchorMap,
    viewport: Arc<Viewport>,
    controller: ScrollController,
    bus: Arc<EventBus>,
    translator: InputTranslator,
    /// Key whose press started the current scroll, until it is released
    trigger: Option<KeyCode>,
    /// Applied to scrolls started from now on
    interruptible: bool,
    status: String,
    should_quit: bool,
}

impl Demo {
    fn new(
        config: ScrollConfig,
        title: String,
        lines: Vec<String>,
        releases_reported: bool,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ScrollEvent>)> {
        let anchors = AnchorMap::from_headings(&lines);
        let viewport = Arc::new(Viewport::default());
        let bus = Arc::new(EventBus::new());
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let interruptible = config.interruptible;

        let controller = ScrollController::new(config)?
            .with_document(
                Document::new()
                    .with_scroll_view(viewport.clone())
                    .with_anchors(Arc::new(anchors.clone()))
                    .with_input(bus.clone()),
            )
            .with_event_sender(event_tx);

        let demo = Self {
            title,
            lines,
            anchors,
            viewport,
            controller,
            bus,
            translator: InputTranslator::new(releases_reported),
            trigger: None,
            interruptible,
            status: "ready".to_string(),
            should_quit: false,
        };
        Ok((demo, event_rx))
    }

    fn run_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut scroll_events: mpsc::UnboundedReceiver<ScrollEvent>,
    ) -> Result<()> {
        let events = EventHandler::new(TICK_RATE_MS);

        while !self.should_quit {
            while let Ok(event) = scroll_events.try_recv() {
                self.on_scroll_event(event);
            }

            terminal.draw(|frame| self.draw(frame))?;

            if let Some(event) = events.next()? {
                self.handle_event(event);
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        let animating = self.controller.running_count() > 0;
        ContentWidget::render(
            frame,
            chunks[0],
            &self.title,
            &self.lines,
            &self.viewport,
            animating,
        );

        let status = format!(
            " line {}/{} | {} | {}",
            self.viewport.offset(Axis::Vertical),
            self.viewport.max_offset(Axis::Vertical),
            if self.interruptible {
                "interruptible"
            } else {
                "uninterruptible"
            },
            self.status,
        );
        StatusBarWidget::render(frame, chunks[1], &status, HINT);
    }

    fn handle_event(&mut self, event: AppEvent) {
        if let AppEvent::Key(key) = &event {
            // Letting go of the key that started a scroll must not stop it
            if key.kind == KeyEventKind::Release && self.trigger == Some(key.code) {
                self.trigger = None;
                return;
            }
        }

        // Interrupts see every event before it is acted on
        if let Some(input) = self.translator.translate(&event) {
            self.bus.dispatch(&input);
        }

        if let AppEvent::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.on_key(key);
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        let offset = i32::from(self.viewport.offset(Axis::Vertical));
        let half_page = i32::from(self.viewport.area().height / 2).max(1);
        let page = i32::from(self.viewport.area().height).max(1);

        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => {
                self.viewport.scroll_by(Axis::Vertical, 1)
            }
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => {
                self.viewport.scroll_by(Axis::Vertical, -1)
            }
            (KeyCode::Char('d'), _) => self.animate(key.code, f64::from(offset + half_page)),
            (KeyCode::Char('u'), _) => self.animate(key.code, f64::from(offset - half_page)),
            (KeyCode::PageDown, _) => self.animate(key.code, f64::from(offset + page)),
            (KeyCode::PageUp, _) => self.animate(key.code, f64::from(offset - page)),
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => self.animate(key.code, 0.0),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => {
                self.animate(key.code, f64::from(self.viewport.max_offset(Axis::Vertical)))
            }
            (KeyCode::Char('n'), _) => {
                if let Some(name) = self.heading_after(offset) {
                    self.animate(key.code, ScrollTarget::Anchor(name));
                }
            }
            (KeyCode::Char('p'), _) => {
                if let Some(name) = self.heading_before(offset) {
                    self.animate(key.code, ScrollTarget::Anchor(name));
                }
            }
            (KeyCode::Char(c @ '1'..='9'), _) => {
                let index = c as usize - '1' as usize;
                let name = self.anchors.names().get(index).map(|name| name.to_string());
                if let Some(name) = name {
                    self.animate(key.code, ScrollTarget::Anchor(name));
                }
            }
            (KeyCode::Char('s'), _) => {
                if !self.controller.stop_all(None) {
                    self.status = "nothing to stop".to_string();
                }
            }
            (KeyCode::Char('i'), _) => self.interruptible = !self.interruptible,
            _ => {}
        }
    }

    fn animate(&mut self, key: KeyCode, target: impl Into<ScrollTarget>) {
        let target = match target.into() {
            ScrollTarget::Offset(offset) => {
                let max = f64::from(self.viewport.max_offset(Axis::Vertical));
                ScrollTarget::Offset(offset.clamp(0.0, max))
            }
            other => other,
        };
        self.status = format!("scrolling to {}", describe(&target));
        if self.translator.releases_reported() {
            self.trigger = Some(key);
        }
        self.controller.scroll(
            ScrollOptions::new()
                .target(target)
                .interruptible(self.interruptible),
        );
    }

    fn heading_after(&self, offset: i32) -> Option<String> {
        self.anchors
            .names()
            .into_iter()
            .find(|name| self.anchor_line(name).is_some_and(|line| line > offset))
            .map(String::from)
    }

    fn heading_before(&self, offset: i32) -> Option<String> {
        self.anchors
            .names()
            .into_iter()
            .rev()
            .find(|name| self.anchor_line(name).is_some_and(|line| line < offset))
            .map(String::from)
    }

    fn anchor_line(&self, name: &str) -> Option<i32> {
        self.anchors.get(name).map(|(_, line)| i32::from(line))
    }

    fn on_scroll_event(&mut self, event: ScrollEvent) {
        self.status = match event {
            ScrollEvent::Started { from, to, duration, .. } => {
                format!("scrolling {} -> {} in {} ms", from, to, duration.as_millis())
            }
            ScrollEvent::Finished { reached: true, .. } => "reached target".to_string(),
            ScrollEvent::Finished { reached: false, .. } => "stopped before target".to_string(),
        };
    }
}

fn describe(target: &ScrollTarget) -> String {
    match target {
        ScrollTarget::Offset(offset) => format!("line {}", offset),
        ScrollTarget::Point { x, y } => format!("({}, {})", x, y),
        ScrollTarget::Anchor(name) => format!("#{}", name),
    }
}

/// Built-in document with headings to jump between
fn sample_document() -> Vec<String> {
    const CHAPTERS: [&str; 6] = [
        "Getting around",
        "Namespaces",
        "Interrupting a scroll",
        "Easing curves",
        "Duration and speed",
        "The end",
    ];

    let mut lines = vec![
        "# pagescroll demo".to_string(),
        String::new(),
        "Press d/u, g/G, n/p or a digit to start an animated scroll.".to_string(),
        "Press any interrupt key (Esc, Space, arrows, ...) or click".to_string(),
        "inside this pane while it moves to stop it.".to_string(),
        "Press i to make new scrolls ignore input.".to_string(),
        String::new(),
    ];

    for (number, chapter) in CHAPTERS.iter().enumerate() {
        lines.push(format!("## {}. {}", number + 1, chapter));
        lines.push(String::new());
        for paragraph in 1..=4 {
            for line in 1..=6 {
                lines.push(format!(
                    "{} / paragraph {} / line {}: the quick brown fox jumps over the lazy dog.",
                    chapter, paragraph, line
                ));
            }
            lines.push(String::new());
        }
    }
    lines
}
