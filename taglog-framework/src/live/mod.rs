//! Live terminal redraw engine.
//!
//! [`LiveRenderer`] is a destination that owns one "live region": the terminal
//! row under the cursor. While a spinner runs, that row shows `frame message` and
//! is repainted on every timer tick. Plain prints are slotted in above it:
//!
//! ```text
//! erase live row ─> write "message\n" (permanent scrollback) ─> repaint spinner
//! ```
//!
//! so printed lines and the animation never overwrite each other.
//!
//! # Scheduling
//!
//! Everything runs on one thread. The animation timer is a task spawned with
//! [`tokio::task::spawn_local`], so spinner control must happen inside a
//! [`tokio::task::LocalSet`] on a current-thread runtime. Synchronous calls and
//! timer ticks never overlap; each tick re-checks that its own spinner session
//! is still the active one, so a tick that was already due when the spinner
//! stopped does nothing.

mod content_line_maker;
mod frames;
mod terminal;

pub use content_line_maker::{display_width, fit_single_line, truncate_to_width};
pub use frames::{DEFAULT_FRAME_SET, FRAME_SETS, FrameSet, frame_set, frame_set_names};
pub use terminal::{CrosstermTerminal, Terminal};

use crate::{
    error::Result,
    exit_hook,
    filter::{FilterSpec, Tester},
    format::{Value, compose},
    writer::{Destination, DestinationId},
};
use std::{
    cell::RefCell,
    io,
    rc::{Rc, Weak},
    time::Duration,
};
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

pub const DEFAULT_FALLBACK_WIDTH: u16 = 80;

// tokio intervals reject a zero period
const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct SpinnerOptions {
    /// name of a registered frame set
    pub frame_set: String,
    /// tick period; `None` uses the frame set's own interval
    pub interval: Option<Duration>,
}

impl SpinnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_set(mut self, name: impl Into<String>) -> Self {
        self.frame_set = name.into();
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }
}

impl Default for SpinnerOptions {
    fn default() -> Self {
        Self {
            frame_set: DEFAULT_FRAME_SET.to_string(),
            interval: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RendererDesc {
    pub filter: Option<FilterSpec>,
    /// width assumed when the terminal cannot report one
    pub fallback_width: u16,
}

impl Default for RendererDesc {
    fn default() -> Self {
        Self {
            filter: None,
            fallback_width: DEFAULT_FALLBACK_WIDTH,
        }
    }
}

/// mutable state of the live region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveRegionState {
    pub active: bool,
    /// status text, already cut to one line that fits next to the frame
    pub current_message: String,
    pub current_frame_index: usize,
    /// width the current message was fitted against
    pub terminal_width: u16,
}

struct LiveRegion {
    terminal: Box<dyn Terminal>,
    state: LiveRegionState,
    frames: &'static FrameSet,
    // untruncated text, re-fitted when the width changes
    source_message: String,
    timer: Option<JoinHandle<()>>,
    // bumped on every start; ticks from older sessions bail out
    session: u64,
    cursor_hidden: bool,
    fallback_width: u16,
}

impl LiveRegion {
    fn query_width(&self) -> u16 {
        self.terminal.width().unwrap_or(self.fallback_width)
    }

    fn message_budget(&self, width: u16) -> usize {
        (width as usize).saturating_sub(self.frames.max_frame_width() + 1)
    }

    fn fit_message(&mut self, width: u16) {
        self.state.terminal_width = width;
        self.state.current_message = fit_single_line(&self.source_message, self.message_budget(width));
    }

    fn set_message(&mut self, message: String) {
        self.source_message = message;
        let width = self.query_width();
        self.fit_message(width);
    }

    fn is_current(&self, session: u64) -> bool {
        self.state.active && self.session == session
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn set_cursor_hidden(&mut self) -> io::Result<()> {
        if !self.cursor_hidden {
            self.terminal.set_cursor_visible(false)?;
            self.cursor_hidden = true;
        }
        Ok(())
    }

    fn clear_line(&mut self) -> io::Result<()> {
        self.terminal.erase_line()?;
        self.terminal.move_to_column(0)
    }

    fn draw_frame(&mut self) -> io::Result<()> {
        let width = self.query_width();
        if width != self.state.terminal_width {
            log::debug!("Terminal width changed to {}, refitting spinner text", width);
            self.fit_message(width);
        }

        self.clear_line()?;
        let frame = self.frames.frame(self.state.current_frame_index);
        self.terminal
            .write(&format!("{} {}", frame, self.state.current_message))
    }

    fn first_paint(&mut self) -> io::Result<()> {
        self.set_cursor_hidden()?;
        self.draw_frame()?;
        self.terminal.flush()
    }

    fn tick(&mut self) -> io::Result<()> {
        self.state.current_frame_index = (self.state.current_frame_index + 1) % self.frames.frames.len();
        self.draw_frame()?;
        self.terminal.flush()
    }

    /// leave the animating state; returns whether it was animating
    fn deactivate(&mut self) -> io::Result<bool> {
        let was_active = std::mem::replace(&mut self.state.active, false);
        self.cancel_timer();

        let erased = if was_active { self.clear_line() } else { Ok(()) };
        // the cursor is always restored, even if erasing failed
        self.cursor_hidden = false;
        let shown = self.terminal.set_cursor_visible(true);
        let flushed = self.terminal.flush();

        erased.and(shown).and(flushed).map(|_| was_active)
    }
}

async fn animate(region: Weak<RefCell<LiveRegion>>, session: u64, period: Duration) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let Some(shared) = region.upgrade() else {
            break;
        };
        let mut live = shared.borrow_mut();
        if !live.is_current(session) {
            break;
        }
        if let Err(e) = live.tick() {
            log::debug!("Spinner repaint failed: {}", e);
        }
    }
}

/// destination that prints lines and animates a spinner below them
pub struct LiveRenderer {
    id: DestinationId,
    tester: Tester,
    region: Rc<RefCell<LiveRegion>>,
}

impl LiveRenderer {
    /// renderer on stdout, admitting everything
    pub fn new() -> Self {
        Self::with_terminal(Box::new(CrosstermTerminal::new()), RendererDesc::default())
    }

    pub fn filtered(filter: FilterSpec) -> Self {
        let desc = RendererDesc {
            filter: Some(filter),
            ..RendererDesc::default()
        };
        Self::with_terminal(Box::new(CrosstermTerminal::new()), desc)
    }

    pub fn with_terminal(terminal: Box<dyn Terminal>, desc: RendererDesc) -> Self {
        let frames = FRAME_SETS
            .iter()
            .find(|set| set.name == DEFAULT_FRAME_SET)
            .unwrap_or(&FRAME_SETS[0]);

        let region = LiveRegion {
            terminal,
            state: LiveRegionState::default(),
            frames,
            source_message: String::new(),
            timer: None,
            session: 0,
            cursor_hidden: false,
            fallback_width: desc.fallback_width,
        };

        Self {
            id: DestinationId::new(),
            tester: Tester::compile(desc.filter.as_ref()),
            region: Rc::new(RefCell::new(region)),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.region.borrow().state.active
    }

    /// start (or restart) the spinner with `message` as its status text
    ///
    /// An unknown frame set is reported before anything is drawn.
    ///
    /// # Panics
    ///
    /// Panics when called outside a [`tokio::task::LocalSet`]. The renderer is
    /// still idle when that happens.
    pub fn start_spinner(&mut self, message: &str, options: SpinnerOptions) -> Result<()> {
        let frames = frame_set(&options.frame_set)?;
        let period = options.interval.unwrap_or_else(|| frames.interval()).max(MIN_INTERVAL);

        // the timer is spawned before any state changes; its first tick comes
        // after this call returns
        let session = self.region.borrow().session + 1;
        let timer = tokio::task::spawn_local(animate(Rc::downgrade(&self.region), session, period));

        let drawn = {
            let mut region = self.region.borrow_mut();
            region.cancel_timer();
            region.timer = Some(timer);
            region.session = session;
            region.frames = frames;
            region.state.active = true;
            region.state.current_frame_index = 0;
            region.set_message(message.to_string());
            region.first_paint()
        };
        if let Err(e) = drawn {
            let _ = self.teardown();
            return Err(e.into());
        }

        if !exit_hook::is_attached(self.id)
            && let Some(hook) = self.region.borrow().terminal.exit_hook()
        {
            exit_hook::attach(self.id, hook);
        }

        log::debug!(
            "Spinner started with frame set {} every {:?}",
            frames.name,
            period
        );
        Ok(())
    }

    /// replace the status text; shown from the next tick on
    pub fn update_spinner(&mut self, values: &[Value]) {
        self.region.borrow_mut().set_message(compose(values));
    }

    /// stop the spinner, erase its row and restore the cursor
    ///
    /// Non-empty `values` are then printed as a normal line. Calling this while
    /// idle only restores the cursor.
    pub fn stop_spinner(&mut self, values: &[Value]) -> Result<()> {
        self.teardown()?;

        let message = compose(values);
        if !message.is_empty() {
            self.print_rendered(&message)?;
        }
        Ok(())
    }

    fn teardown(&mut self) -> io::Result<()> {
        exit_hook::detach(self.id);
        let was_active = self.region.borrow_mut().deactivate()?;
        if was_active {
            log::debug!("Spinner stopped");
        }
        Ok(())
    }

    /// copy of the current region state
    pub fn state(&self) -> LiveRegionState {
        self.region.borrow().state.clone()
    }
}

impl Default for LiveRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Destination for LiveRenderer {
    fn on_print(&mut self, message: &str) -> Result<()> {
        let mut region = self.region.borrow_mut();
        let mut line = String::with_capacity(message.len() + 1);
        line.push_str(message);
        line.push('\n');

        if region.state.active {
            region.clear_line()?;
            region.terminal.write(&line)?;
            region.draw_frame()?;
        } else {
            region.terminal.write(&line)?;
        }
        region.terminal.flush()?;
        Ok(())
    }

    fn tester(&self) -> &Tester {
        &self.tester
    }

    fn id(&self) -> DestinationId {
        self.id
    }
}

impl Drop for LiveRenderer {
    fn drop(&mut self) {
        let needs_teardown = {
            let region = self.region.borrow();
            region.state.active || region.cursor_hidden
        };
        if needs_teardown && let Err(e) = self.teardown() {
            log::debug!("Failed to restore terminal on drop: {}", e);
        }
        exit_hook::detach(self.id);
    }
}
