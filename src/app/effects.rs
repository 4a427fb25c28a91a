//! Side effects requested by screens, executed off the dispatcher's control flow.

use crate::app::events::Completion;
use crate::app::executor::{self, CommandSpec};
use crate::player::{PlayerCommand, PlayerTrait};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send a command to the player.
    Player(PlayerCommand),
    /// Run a menu shell command; its output comes back as a text screen.
    Run(CommandSpec),
    /// Fetch stored playlists and open them as a list screen.
    LoadPlaylists,
    /// Fetch the current queue and open it as a list screen.
    LoadQueue,
}

/// Runs effects on tokio tasks and reports results on the completion queue.
#[derive(Clone)]
pub struct EffectRunner {
    player: Arc<dyn PlayerTrait>,
    completions: mpsc::Sender<Completion>,
}

impl EffectRunner {
    pub fn new(player: Arc<dyn PlayerTrait>, completions: mpsc::Sender<Completion>) -> Self {
        Self {
            player,
            completions,
        }
    }

    pub fn spawn(&self, effect: Effect) {
        tracing::debug!(?effect, "running effect");
        let player = self.player.clone();
        let tx = self.completions.clone();

        match effect {
            Effect::Player(cmd) => {
                tokio::task::spawn_blocking(move || {
                    if let Err(e) = cmd.run(player.as_ref()) {
                        tracing::warn!(?cmd, "player command failed: {e:#}");
                        let _ = tx.blocking_send(Completion::Failed(format!("Err: {e}")));
                    }
                });
            }
            Effect::LoadPlaylists => {
                tokio::task::spawn_blocking(move || {
                    let completion = match player.playlists() {
                        Ok(names) => Completion::Playlists(names),
                        Err(e) => {
                            tracing::warn!("listing playlists failed: {e:#}");
                            Completion::Failed(format!("Err: {e}"))
                        }
                    };
                    let _ = tx.blocking_send(completion);
                });
            }
            Effect::LoadQueue => {
                tokio::task::spawn_blocking(move || {
                    let completion = match player.queue() {
                        Ok((labels, current)) => Completion::Queue { labels, current },
                        Err(e) => {
                            tracing::warn!("reading queue failed: {e:#}");
                            Completion::Failed(format!("Err: {e}"))
                        }
                    };
                    let _ = tx.blocking_send(completion);
                });
            }
            Effect::Run(spec) => {
                tokio::spawn(async move {
                    let lines = executor::execute(&spec).await;
                    let _ = tx.send(Completion::CommandOutput(lines)).await;
                });
            }
        }
    }
}
