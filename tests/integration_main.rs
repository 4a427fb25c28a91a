use anyhow::{anyhow, Result};
use mpd_lcd::app::config::{Config, MenuNode};
use mpd_lcd::app::effects::{Effect, EffectRunner};
use mpd_lcd::app::events::{self, AppEvent, Completion};
use mpd_lcd::app::{Dispatcher, Flow};
use mpd_lcd::display::Display;
use mpd_lcd::player::{PlayerCommand, PlayerStatus, PlayerTrait};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Display that keeps every frame it is given.
#[derive(Clone, Default)]
struct RecordingDisplay {
    frames: Arc<Mutex<Vec<String>>>,
    backlight_toggles: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
}

impl RecordingDisplay {
    fn last(&self) -> String {
        self.frames.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl Display for RecordingDisplay {
    fn display(&mut self, text: &str) {
        self.frames.lock().unwrap().push(text.to_string());
    }
    fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
    fn toggle_backlight(&mut self) {
        self.backlight_toggles.fetch_add(1, Ordering::SeqCst);
    }
    fn is_active(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }
}

/// Player that records calls; `stop` always fails.
#[derive(Default)]
struct FakePlayer {
    calls: Mutex<Vec<String>>,
}

impl FakePlayer {
    fn record(&self, call: &str) -> Result<()> {
        self.calls.lock().unwrap().push(call.to_string());
        Ok(())
    }
}

impl PlayerTrait for FakePlayer {
    fn status(&self) -> Result<PlayerStatus> {
        Ok(PlayerStatus::default())
    }
    fn play(&self, pos: Option<u32>) -> Result<()> {
        self.record(&format!("play {pos:?}"))
    }
    fn stop(&self) -> Result<()> {
        Err(anyhow!("connection refused"))
    }
    fn pause(&self) -> Result<()> {
        self.record("pause")
    }
    fn next(&self) -> Result<()> {
        self.record("next")
    }
    fn prev(&self) -> Result<()> {
        self.record("prev")
    }
    fn volume_up(&self) -> Result<()> {
        self.record("volume_up")
    }
    fn volume_down(&self) -> Result<()> {
        self.record("volume_down")
    }
    fn toggle_mute(&self) -> Result<()> {
        self.record("mute")
    }
    fn playlists(&self) -> Result<Vec<String>> {
        Ok(vec!["jazz".to_string(), "rock".to_string()])
    }
}

fn setup(config: Config) -> (Dispatcher, RecordingDisplay) {
    let display = RecordingDisplay::default();
    let dispatcher = Dispatcher::new(Arc::new(config), Box::new(display.clone()));
    (dispatcher, display)
}

fn rows(frame: &str) -> Vec<String> {
    frame.split('\n').map(str::to_string).collect()
}

/// Feeds remote tokens far enough apart to pass the debounce guard.
struct Clock(Instant);

impl Clock {
    fn new() -> Self {
        Self(Instant::now())
    }

    fn later(&mut self) -> Instant {
        self.0 += Duration::from_millis(600);
        self.0
    }
}

fn remote(d: &mut Dispatcher, clock: &mut Clock, token: &str) {
    d.handle_event(AppEvent::Remote(token.to_string()), clock.later());
}

fn tick(d: &mut Dispatcher) {
    d.handle_event(AppEvent::Tick, Instant::now());
}

#[test]
fn test_menu_show_on_empty_menu() {
    let config = Config {
        menu: MenuNode::default(),
        ..Config::default()
    };
    let (mut d, display) = setup(config);
    let mut clock = Clock::new();

    remote(&mut d, &mut clock, "KEY_MENU");
    assert_eq!(d.stack_len(), 1);
    assert_eq!(rows(&display.last()), vec![" ".repeat(16), " ".repeat(16)]);
}

#[test]
fn test_menu_show_marks_first_item() {
    let (mut d, display) = setup(Config::default());
    let mut clock = Clock::new();

    remote(&mut d, &mut clock, "KEY_MENU");
    let frame = rows(&display.last());
    assert_eq!(frame.len(), 2);
    assert!(frame[0].starts_with("\x7ePlaylists"));
    assert!(frame[1].starts_with(" Queue"));
    assert!(frame.iter().all(|r| r.len() == 16));

    // Menu key again closes the menu.
    remote(&mut d, &mut clock, "KEY_MENU");
    assert_eq!(d.stack_len(), 0);
}

#[test]
fn test_idle_status_shows_stop_and_clock() {
    let (mut d, display) = setup(Config::default());
    tick(&mut d);
    let frame = rows(&display.last());
    assert_eq!(frame.len(), 2);
    assert!(frame[0].contains('\x02'));
    let clock = frame[1].trim_end();
    assert_eq!(clock.len(), 14);
    assert_eq!(&clock[2..3], "-");
    assert_eq!(&clock[8..9], ":");
}

#[test]
fn test_network_alert_shows_for_three_ticks() {
    let (mut d, display) = setup(Config::default());
    d.handle_event(
        AppEvent::Network(r#"{"Text":"Alert!","Timeout":3,"PutOnTop":false}"#.to_string()),
        Instant::now(),
    );
    assert_eq!(d.overlay().len(), 1);

    for _ in 0..3 {
        tick(&mut d);
        assert!(display.last().starts_with("Alert!"));
    }
    tick(&mut d);
    assert!(!display.last().starts_with("Alert!"));
    assert!(!d.overlay().has_messages());
}

#[test]
fn test_debounce_drops_second_token() {
    let (mut d, display) = setup(Config::default());
    let t0 = Instant::now();
    d.handle_event(AppEvent::Remote("KEY_MENU".to_string()), t0);
    d.handle_event(
        AppEvent::Remote("KEY_DOWN".to_string()),
        t0 + Duration::from_millis(100),
    );
    assert!(display.last().starts_with("\x7ePlaylists"));

    d.handle_event(
        AppEvent::Remote("KEY_DOWN".to_string()),
        t0 + Duration::from_millis(700),
    );
    assert!(rows(&display.last())[1].starts_with("\x7eQueue"));
}

#[test]
fn test_unknown_token_becomes_urgent_message() {
    let (mut d, display) = setup(Config::default());
    let mut clock = Clock::new();
    remote(&mut d, &mut clock, "KEY_RED");
    assert_eq!(d.overlay().len(), 1);
    assert!(display.last().starts_with("KEY_RED"));

    // Sticky until dismissed.
    for _ in 0..20 {
        tick(&mut d);
    }
    assert_eq!(d.overlay().len(), 1);
    remote(&mut d, &mut clock, "KEY_OK");
    assert!(!d.overlay().has_messages());
}

#[test]
fn test_unhandled_action_goes_to_overlay() {
    let (mut d, _display) = setup(Config::default());
    let mut clock = Clock::new();
    remote(&mut d, &mut clock, "KEY_MENU");
    // Menus do not handle player keys.
    remote(&mut d, &mut clock, "KEY_NEXT");
    assert_eq!(d.overlay().head().map(|m| m.lines.clone()), Some(vec!["KEY_NEXT".to_string()]));
    assert!(d.take_effects().is_empty());
}

#[test]
fn test_closing_overlay_keeps_stack() {
    let (mut d, display) = setup(Config::default());
    let mut clock = Clock::new();
    remote(&mut d, &mut clock, "KEY_MENU");
    d.handle_event(AppEvent::Network("disk almost full".to_string()), clock.later());
    assert!(display.last().starts_with("disk almost full"));

    remote(&mut d, &mut clock, "KEY_BACK");
    assert!(!d.overlay().has_messages());
    assert_eq!(d.stack_len(), 1);
    assert!(display.last().starts_with("\x7ePlaylists"));
}

#[test]
fn test_playlists_completion_and_select() {
    let (mut d, display) = setup(Config::default());
    let mut clock = Clock::new();
    remote(&mut d, &mut clock, "KEY_MENU");
    remote(&mut d, &mut clock, "KEY_OK");
    assert_eq!(d.take_effects(), vec![Effect::LoadPlaylists]);

    d.handle_event(
        AppEvent::Completed(Completion::Playlists(vec![
            "jazz".to_string(),
            "rock".to_string(),
        ])),
        Instant::now(),
    );
    assert_eq!(d.stack_len(), 2);
    assert!(display.last().starts_with("\x7ejazz"));

    remote(&mut d, &mut clock, "KEY_DOWN");
    remote(&mut d, &mut clock, "KEY_OK");
    assert_eq!(
        d.take_effects(),
        vec![Effect::Player(PlayerCommand::PlayPlaylist("rock".to_string()))]
    );
    // Selecting does not navigate.
    assert_eq!(d.stack_len(), 2);

    remote(&mut d, &mut clock, "KEY_BACK");
    remote(&mut d, &mut clock, "KEY_BACK");
    remote(&mut d, &mut clock, "KEY_BACK");
    assert_eq!(d.stack_len(), 0);
}

#[test]
fn test_home_item_returns_to_status() {
    let (mut d, display) = setup(Config::default());
    let mut clock = Clock::new();
    remote(&mut d, &mut clock, "KEY_MENU");
    // Menu -> System -> Home (last entry, reached by wrapping up).
    remote(&mut d, &mut clock, "KEY_UP");
    remote(&mut d, &mut clock, "KEY_OK");
    assert_eq!(d.stack_len(), 2);
    remote(&mut d, &mut clock, "KEY_UP");
    assert!(rows(&display.last())[1].starts_with("\x7eHome"));

    remote(&mut d, &mut clock, "KEY_OK");
    assert_eq!(d.stack_len(), 0);
    assert!(display.last().contains('\x02'));
}

#[test]
fn test_command_output_is_pushed() {
    let (mut d, display) = setup(Config::default());
    d.handle_event(
        AppEvent::Completed(Completion::CommandOutput(vec!["up 3 days".to_string()])),
        Instant::now(),
    );
    assert_eq!(d.stack_len(), 1);
    assert!(display.last().starts_with("up 3 days"));
}

#[test]
fn test_player_failure_is_shown() {
    let (mut d, display) = setup(Config::default());
    d.handle_event(
        AppEvent::Completed(Completion::Failed("Err: connection refused".to_string())),
        Instant::now(),
    );
    assert!(display.last().starts_with("Err: connection"));
    assert_eq!(d.overlay().head().map(|m| m.remaining), Some(10));
}

#[test]
fn test_player_key_flash_expires() {
    let (mut d, display) = setup(Config::default());
    let mut clock = Clock::new();
    remote(&mut d, &mut clock, "KEY_PLAY");
    assert_eq!(d.take_effects(), vec![Effect::Player(PlayerCommand::Play(None))]);
    assert_eq!(d.stack_len(), 1);
    assert!(display.last().starts_with("play"));

    tick(&mut d);
    tick(&mut d);
    assert!(display.last().starts_with("play"));
    tick(&mut d);
    assert_eq!(d.stack_len(), 0);
    assert!(display.last().contains('\x02'));
}

#[test]
fn test_status_update_reaches_root() {
    let (mut d, display) = setup(Config::default());
    d.handle_event(
        AppEvent::Status(PlayerStatus {
            playing: true,
            state_label: "play".to_string(),
            flags: String::new(),
            volume: "70".to_string(),
            current_track: "1/2; Nina Simone; Sinnerman".to_string(),
            error: String::new(),
        }),
        Instant::now(),
    );
    tick(&mut d);
    let frame = rows(&display.last());
    assert!(frame[0].contains('\x00'));
    // Long track rows scroll one byte per tick.
    assert_eq!(frame[1], "/2; Nina Simone;");
}

#[test]
fn test_backlight_toggle_is_global() {
    let (mut d, display) = setup(Config::default());
    let mut clock = Clock::new();
    remote(&mut d, &mut clock, "KEY_MENU");
    remote(&mut d, &mut clock, "KEY_SCREEN");
    assert_eq!(display.backlight_toggles.load(Ordering::SeqCst), 1);
    assert_eq!(d.stack_len(), 1);
    assert!(!d.overlay().has_messages());
}

#[test]
fn test_reload_resets_navigation() {
    let (mut d, display) = setup(Config::default());
    let mut clock = Clock::new();
    remote(&mut d, &mut clock, "KEY_MENU");
    remote(&mut d, &mut clock, "KEY_RED");

    let mut config = Config::default();
    config.display.width = 20;
    assert_eq!(d.handle_event(AppEvent::Reload(Box::new(config)), Instant::now()), Flow::Continue);
    assert_eq!(d.stack_len(), 0);
    // Overlay survives a reload.
    assert_eq!(d.overlay().len(), 1);
    assert!(rows(&display.last()).iter().all(|r| r.len() == 20));
    assert_eq!(d.config().display.width, 20);
}

#[tokio::test]
async fn test_effect_runner_reports_results() {
    let player = Arc::new(FakePlayer::default());
    let (tx, mut rx) = mpsc::channel(8);
    let runner = EffectRunner::new(player.clone(), tx);

    runner.spawn(Effect::LoadPlaylists);
    assert_eq!(
        rx.recv().await,
        Some(Completion::Playlists(vec!["jazz".to_string(), "rock".to_string()]))
    );

    runner.spawn(Effect::Player(PlayerCommand::Stop));
    match rx.recv().await {
        Some(Completion::Failed(msg)) => assert!(msg.starts_with("Err: ")),
        other => panic!("expected failure, got {other:?}"),
    }

    runner.spawn(Effect::LoadQueue);
    assert_eq!(
        rx.recv().await,
        Some(Completion::Queue {
            labels: Vec::new(),
            current: None
        })
    );

    // Successful player commands report nothing.
    runner.spawn(Effect::Player(PlayerCommand::Next));
    let deadline = Instant::now() + Duration::from_secs(5);
    while player.calls.lock().unwrap().is_empty() {
        assert!(Instant::now() < deadline, "next never ran");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(*player.calls.lock().unwrap(), vec!["next".to_string()]);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_run_loop_until_shutdown() {
    let display = RecordingDisplay::default();
    let config = Arc::new(Config::default());
    let (senders, inbox) = events::channels(Duration::from_millis(20));
    let runner = EffectRunner::new(Arc::new(FakePlayer::default()), senders.completions.clone());
    let dispatcher = Dispatcher::new(config, Box::new(display.clone()));
    let task = tokio::spawn(dispatcher.run(inbox, runner, senders.clone()));

    senders.remote.send("KEY_MENU".to_string()).await.unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while !display.last().starts_with("\x7e") {
        assert!(Instant::now() < deadline, "menu never rendered");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    senders.shutdown();
    task.await.unwrap();
    assert!(display.closed.load(Ordering::SeqCst));
}
