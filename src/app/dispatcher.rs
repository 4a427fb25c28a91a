//! The single control flow that owns every screen 🎛️
//!
//! Producers only push into queues; everything that touches the navigation
//! stack, the overlay or the scroller happens here, one event at a time.

use crate::app::config::Config;
use crate::app::effects::{Effect, EffectRunner};
use crate::app::events::{AppEvent, Completion, Inbox, Senders};
use crate::app::keys::Action;
use crate::app::navigation::NavStack;
use crate::display::Display;
use crate::scroller::TextScroller;
use crate::screens::{
    ActionCtx, ActionResult, Frame, ListScreen, MenuScreen, Screen, StatusScreen, TextScreen,
    UrgentMessage, UrgentScreen,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Remote,
    Network,
    Keyboard,
}

pub struct Dispatcher {
    config: Arc<Config>,
    display: Box<dyn Display>,
    scroller: TextScroller,
    root: StatusScreen,
    stack: NavStack,
    overlay: UrgentScreen,
    last_command: Option<Instant>,
    pending: Vec<Effect>,
    last_frame: String,
}

impl Dispatcher {
    pub fn new(config: Arc<Config>, display: Box<dyn Display>) -> Self {
        let scroller = TextScroller::new(config.display.width, config.display.height);
        Self {
            config,
            display,
            scroller,
            root: StatusScreen::new(),
            stack: NavStack::new(),
            overlay: UrgentScreen::new(),
            last_command: None,
            pending: Vec::new(),
            last_frame: String::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn overlay(&self) -> &UrgentScreen {
        &self.overlay
    }

    pub fn root(&self) -> &StatusScreen {
        &self.root
    }

    /// Last block handed to the display.
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    /// Effects requested by screens since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.pending)
    }

    fn rows(&self) -> usize {
        self.config.display.height
    }

    pub fn handle_event(&mut self, event: AppEvent, now: Instant) -> Flow {
        match event {
            AppEvent::Shutdown => return Flow::Stop,
            AppEvent::Reload(config) => self.reload(*config),
            AppEvent::Remote(token) => self.on_command(&token, Source::Remote, now),
            AppEvent::Network(line) => self.on_command(&line, Source::Network, now),
            AppEvent::Keyboard(key) => self.on_command(&key, Source::Keyboard, now),
            AppEvent::Status(status) => self.root.update(status),
            AppEvent::Completed(done) => {
                self.on_completion(done);
                self.render(false);
            }
            AppEvent::Tick => self.render(true),
        }
        Flow::Continue
    }

    fn debounced(&mut self, now: Instant) -> bool {
        let gap = self.config.display.debounce();
        if let Some(last) = self.last_command {
            if now.saturating_duration_since(last) < gap {
                return true;
            }
        }
        self.last_command = Some(now);
        false
    }

    fn on_command(&mut self, token: &str, source: Source, now: Instant) {
        let token = token.trim();
        if token.is_empty() {
            return;
        }
        let action = self.config.keys.action(token);

        // Unmapped network lines are urgent messages, not key presses.
        if source == Source::Network && matches!(action, Action::Unknown(_)) {
            self.overlay
                .add_json(token, self.config.display.urgent_ticks());
            self.render(false);
            return;
        }

        if self.debounced(now) {
            tracing::debug!(token, ?source, "debounced");
            return;
        }
        tracing::debug!(token, ?source, ?action, "command");

        match action {
            Action::MenuShow => {
                if self.stack.is_empty() {
                    self.stack
                        .push(Box::new(MenuScreen::new(self.config.menu.clone())));
                } else {
                    self.stack.reset();
                }
            }
            Action::ToggleBacklight => self.display.toggle_backlight(),
            Action::Unknown(raw) => self.overlay.add_msg(vec![raw], 0, false),
            action => self.route(&action, token),
        }
        self.render(false);
    }

    /// Hand the action to the visible screen: overlay, stack top, or root.
    fn route(&mut self, action: &Action, token: &str) {
        let mut ctx = ActionCtx::new(self.rows());
        let from_overlay = self.overlay.has_messages();
        let result = if from_overlay {
            self.overlay.action(action, &mut ctx)
        } else if let Some(top) = self.stack.top_mut() {
            top.action(action, &mut ctx)
        } else {
            self.root.action(action, &mut ctx)
        };
        tracing::debug!(?result, from_overlay, "action result");

        match result {
            ActionResult::Ok => {}
            ActionResult::Push(screen) => self.stack.push(screen),
            // The overlay is not part of the stack; closing it reveals
            // whatever was underneath.
            ActionResult::Back if !from_overlay => {
                self.stack.pop();
            }
            ActionResult::Exit if !from_overlay => self.stack.reset(),
            ActionResult::Back | ActionResult::Exit => {}
            ActionResult::Unhandled => {
                self.overlay.add_msg(vec![token.to_string()], 0, false);
            }
        }
        self.pending.extend(ctx.into_effects());
    }

    fn on_completion(&mut self, done: Completion) {
        match done {
            Completion::Playlists(names) => {
                self.stack.push(Box::new(ListScreen::playlists(names)));
            }
            Completion::Queue { labels, current } => {
                let rows = self.rows();
                self.stack
                    .push(Box::new(ListScreen::queue(labels, current, rows)));
            }
            Completion::CommandOutput(lines) => {
                self.stack.push(Box::new(TextScreen::new(lines)));
            }
            Completion::Failed(message) => {
                let msg = UrgentMessage::from_text(&message, self.config.display.urgent_ticks());
                self.overlay.add_msg(msg.lines, msg.remaining, false);
            }
        }
    }

    fn current_frame(&mut self) -> (Frame, bool) {
        let rows = self.rows();
        if self.overlay.has_messages() {
            (self.overlay.show(rows), true)
        } else if let Some(top) = self.stack.top_mut() {
            (top.show(rows), false)
        } else {
            (self.root.show(rows), false)
        }
    }

    /// Draw the visible screen. A tick (`advance`) expires screens, scrolls
    /// long rows and spends overlay budget; other refreshes only redraw.
    pub fn render(&mut self, advance: bool) {
        if advance {
            if self.stack.drop_invalid() {
                tracing::debug!(depth = self.stack.len(), "expired screen popped");
            }
        }

        let (frame, from_overlay) = self.current_frame();
        self.scroller.set(&frame.text(), frame.fixed_prefix);
        let text = if advance {
            self.scroller.tick()
        } else {
            self.scroller.get()
        };
        self.display.display(&text);
        self.last_frame = text;

        if advance && from_overlay {
            self.overlay.tick();
        }
    }

    /// Swap in a new configuration. Navigation restarts at the root; the
    /// overlay and the last player status are kept.
    pub fn reload(&mut self, config: Config) {
        let geometry_changed = config.display.width != self.config.display.width
            || config.display.height != self.config.display.height;
        self.config = Arc::new(config);
        self.stack.reset();
        if geometry_changed {
            self.scroller =
                TextScroller::new(self.config.display.width, self.config.display.height);
        }
        tracing::info!(geometry_changed, "configuration reloaded");
        self.render(false);
    }

    pub fn close(&mut self) {
        self.display.close();
    }

    /// Event loop. Returns after shutdown or a panic while handling an
    /// event; in both cases collaborators are told to stop and the display
    /// is closed.
    pub async fn run(mut self, mut inbox: Inbox, runner: EffectRunner, senders: Senders) {
        tracing::info!("dispatcher started");
        loop {
            let event = inbox.next().await;
            let is_reload = matches!(event, AppEvent::Reload(_));

            let flow = catch_unwind(AssertUnwindSafe(|| {
                self.handle_event(event, Instant::now())
            }));
            match flow {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop) => break,
                Err(panic) => {
                    tracing::error!("dispatcher panicked: {}", panic_message(panic.as_ref()));
                    break;
                }
            }

            for effect in self.take_effects() {
                runner.spawn(effect);
            }
            if is_reload {
                inbox.set_refresh(self.config.display.refresh());
            }
        }

        tracing::info!("dispatcher stopping");
        senders.shutdown();
        self.close();
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
