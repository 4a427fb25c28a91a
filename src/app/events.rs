//! Input queues feeding the dispatcher.
//!
//! Every producer owns a sender for its own bounded queue; the dispatcher
//! owns the `Inbox` and merges the queues with a fixed priority.

use crate::app::config::Config;
use crate::player::PlayerStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Interval, MissedTickBehavior};

const QUEUE_DEPTH: usize = 64;

#[derive(Debug)]
pub enum AppEvent {
    Shutdown,
    Reload(Box<Config>),
    /// Button name from the remote.
    Remote(String),
    /// Line received on the TCP listener.
    Network(String),
    /// Key pressed in console mode.
    Keyboard(String),
    Status(PlayerStatus),
    Completed(Completion),
    Tick,
}

/// Result of an effect that ran outside the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Playlists(Vec<String>),
    Queue {
        labels: Vec<String>,
        current: Option<usize>,
    },
    CommandOutput(Vec<String>),
    Failed(String),
}

/// Producer ends of every queue.
#[derive(Clone)]
pub struct Senders {
    pub shutdown: Arc<watch::Sender<bool>>,
    pub reload: mpsc::Sender<Box<Config>>,
    pub remote: mpsc::Sender<String>,
    pub network: mpsc::Sender<String>,
    pub keyboard: mpsc::Sender<String>,
    pub status: mpsc::Sender<PlayerStatus>,
    pub completions: mpsc::Sender<Completion>,
}

impl Senders {
    /// Ask everyone to stop.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}

pub struct Inbox {
    shutdown: watch::Receiver<bool>,
    reload: mpsc::Receiver<Box<Config>>,
    remote: mpsc::Receiver<String>,
    network: mpsc::Receiver<String>,
    keyboard: mpsc::Receiver<String>,
    status: mpsc::Receiver<PlayerStatus>,
    completions: mpsc::Receiver<Completion>,
    ticker: Interval,
}

pub fn channels(refresh: Duration) -> (Senders, Inbox) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (reload_tx, reload_rx) = mpsc::channel(4);
    let (remote_tx, remote_rx) = mpsc::channel(QUEUE_DEPTH);
    let (network_tx, network_rx) = mpsc::channel(QUEUE_DEPTH);
    let (keyboard_tx, keyboard_rx) = mpsc::channel(QUEUE_DEPTH);
    let (status_tx, status_rx) = mpsc::channel(QUEUE_DEPTH);
    let (completion_tx, completion_rx) = mpsc::channel(QUEUE_DEPTH);

    let senders = Senders {
        shutdown: Arc::new(shutdown_tx),
        reload: reload_tx,
        remote: remote_tx,
        network: network_tx,
        keyboard: keyboard_tx,
        status: status_tx,
        completions: completion_tx,
    };
    let inbox = Inbox {
        shutdown: shutdown_rx,
        reload: reload_rx,
        remote: remote_rx,
        network: network_rx,
        keyboard: keyboard_rx,
        status: status_rx,
        completions: completion_rx,
        ticker: ticker(refresh),
    };
    (senders, inbox)
}

/// Resolves once shutdown is requested or every sender is gone.
pub async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    loop {
        let stop = *rx.borrow_and_update();
        if stop || rx.changed().await.is_err() {
            return;
        }
    }
}

fn ticker(refresh: Duration) -> Interval {
    let mut interval = tokio::time::interval(refresh);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

impl Inbox {
    /// Wait for the next event. Ties go to the earlier branch.
    pub async fn next(&mut self) -> AppEvent {
        tokio::select! {
            biased;
            _ = shutdown_requested(&mut self.shutdown) => AppEvent::Shutdown,
            Some(config) = self.reload.recv() => AppEvent::Reload(config),
            Some(token) = self.remote.recv() => AppEvent::Remote(token),
            Some(line) = self.network.recv() => AppEvent::Network(line),
            Some(key) = self.keyboard.recv() => AppEvent::Keyboard(key),
            Some(status) = self.status.recv() => AppEvent::Status(status),
            Some(done) = self.completions.recv() => AppEvent::Completed(done),
            _ = self.ticker.tick() => AppEvent::Tick,
        }
    }

    pub fn set_refresh(&mut self, refresh: Duration) {
        if self.ticker.period() != refresh {
            tracing::info!(?refresh, "refresh interval changed");
            self.ticker = ticker(refresh);
        }
    }
}
