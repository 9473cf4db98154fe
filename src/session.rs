//! Session controller
//!
//! Owns score, level, timer and the running/paused flags, and turns player
//! commands into simulator calls. Results are reported as `GameEvent`s the
//! host drains once per frame.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{StepReport, Simulator, advance, advance_effects};

/// Something the host may want to react to (HUD, effects, logging)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A flip was accepted
    Flipped {
        score_award: u64,
        /// Gold nugget dropped by this flip
        gold: Option<u32>,
    },
    /// Gold picked up by one click
    GoldCollected {
        count: usize,
        level: u32,
        score_award: u64,
        bonus_seconds: i32,
    },
    /// Level raised by the timer
    LevelUp {
        level: u32,
        flow_rate: f32,
        gravity: f32,
    },
    /// Timer ran out
    GameOver { score: u64, level: u32 },
    /// Fresh session started
    Restarted,
}

/// Score, timer and level for one play session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    pub level: u32,
    /// Seconds left
    pub timer: i32,
    pub running: bool,
    pub paused: bool,
    /// Flip spin, 1.0 right after a flip, settling to 0
    pub flip_animation: f32,
    session_seconds: i32,
    flip_cooldown_ms: f64,
    last_flip_ms: Option<f64>,
    /// Lowest timer mark that already awarded a level
    last_level_mark: i32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        Self {
            score: 0,
            level: 1,
            timer: settings.session_seconds,
            running: true,
            paused: false,
            flip_animation: 0.0,
            session_seconds: settings.session_seconds,
            flip_cooldown_ms: settings.flip_cooldown_ms,
            last_flip_ms: None,
            last_level_mark: i32::MAX,
            events: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.running && !self.paused
    }

    pub fn is_game_over(&self) -> bool {
        !self.running
    }

    /// Rotation for the hourglass frame (radians)
    pub fn flip_angle(&self) -> f32 {
        self.flip_animation * PI
    }

    /// Take queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Flip the hourglass at host time `now_ms`
    ///
    /// Ignored while inactive or within the cooldown of the last accepted
    /// flip. Returns whether the flip happened.
    pub fn flip(&mut self, sim: &mut Simulator, now_ms: f64) -> bool {
        if !self.is_active() {
            return false;
        }
        if let Some(last) = self.last_flip_ms
            && now_ms - last < self.flip_cooldown_ms
        {
            return false;
        }

        self.last_flip_ms = Some(now_ms);
        let outcome = sim.flip();
        self.flip_animation = 1.0;

        let score_award = FLIP_SCORE * self.level as u64;
        self.score += score_award;
        self.events.push(GameEvent::Flipped {
            score_award,
            gold: outcome.gold,
        });
        true
    }

    /// Click/tap at `point`: collect gold, award score and time
    ///
    /// Ignored while paused or after game over, so no score or time is
    /// awarded outside active play. Returns the number of nuggets collected.
    pub fn collect_at(&mut self, sim: &mut Simulator, point: Vec2) -> usize {
        if !self.is_active() {
            return 0;
        }
        let collected = sim.collect_at(point);
        if collected.is_empty() {
            return 0;
        }

        for nugget in &collected {
            sim.spawn_burst(nugget.pos);
        }
        let count = collected.len();
        let score_award = GOLD_SCORE * self.level as u64 * count as u64;
        let bonus_seconds = GOLD_BONUS_SECONDS * count as i32;
        self.score += score_award;
        self.timer += bonus_seconds;
        self.events.push(GameEvent::GoldCollected {
            count,
            level: self.level,
            score_award,
            bonus_seconds,
        });
        count
    }

    /// Pause or resume; ignored once the session has ended
    pub fn set_paused(&mut self, sim: &mut Simulator, paused: bool) {
        if !self.running {
            return;
        }
        self.paused = paused;
        sim.set_paused(paused);
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
    }

    pub fn toggle_pause(&mut self, sim: &mut Simulator) {
        let paused = !self.paused;
        self.set_paused(sim, paused);
    }

    /// Wall-clock second: count down, end the session or level up
    pub fn tick_second(&mut self, sim: &mut Simulator) {
        if !self.is_active() {
            return;
        }

        self.timer -= 1;
        if self.timer <= 0 {
            self.running = false;
            sim.set_paused(true);
            log::info!("Game over: score {} at level {}", self.score, self.level);
            self.events.push(GameEvent::GameOver {
                score: self.score,
                level: self.level,
            });
            return;
        }

        // Each multiple of ten only levels up once; the bonus time would
        // otherwise bring the timer back to the same mark.
        if self.timer % LEVEL_UP_EVERY == 0 && self.timer < self.last_level_mark {
            self.last_level_mark = self.timer;
            self.level += 1;
            self.timer += LEVEL_UP_BONUS_SECONDS;
            sim.apply_level_up(self.level, FLOW_RATE_STEP, GRAVITY_STEP);
            log::info!(
                "Level {} (flow {:.4}, gravity {:.2})",
                self.level,
                sim.flow_rate,
                sim.gravity
            );
            self.events.push(GameEvent::LevelUp {
                level: self.level,
                flow_rate: sim.flow_rate,
                gravity: sim.gravity,
            });
        }
    }

    /// One display frame
    ///
    /// Physics only runs while active; effects and the flip spin always do.
    pub fn frame(&mut self, sim: &mut Simulator, delta: f32) -> StepReport {
        let report = if self.is_active() {
            advance(sim, delta)
        } else {
            StepReport::default()
        };
        advance_effects(sim, delta);
        self.settle_flip_animation();
        report
    }

    /// Geometric decay of the flip spin
    fn settle_flip_animation(&mut self) {
        if self.flip_animation > 0.0 {
            self.flip_animation *= FLIP_SETTLE;
            if self.flip_animation < FLIP_SNAP {
                self.flip_animation = 0.0;
            }
        }
    }

    /// Start over with a fresh simulator fill
    pub fn restart(&mut self, sim: &mut Simulator) {
        self.score = 0;
        self.level = 1;
        self.timer = self.session_seconds;
        self.running = true;
        self.paused = false;
        self.flip_animation = 0.0;
        self.last_flip_ms = None;
        self.last_level_mark = i32::MAX;
        self.events.clear();
        sim.reset();
        log::info!("Session restarted");
        self.events.push(GameEvent::Restarted);
    }
}
