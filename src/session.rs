//! Frame loop glue: viewport tracking, update cadence and frame snapshots.

use crate::config::PatternConfig;
use crate::engine::PatternEngine;
use crate::error::Result;
use crate::frame::Frame;

/// Fires at most `speed` times per second.
#[derive(Debug, Clone, Default)]
pub struct UpdateClock {
    last_update: f64,
}

impl UpdateClock {
    /// Returns `true` and records `now` when the next update is due.
    pub fn should_update(&mut self, now: f64, speed: f32) -> bool {
        if speed <= 0.0 {
            return false;
        }
        let due = now > self.last_update + 1.0 / speed as f64;
        if due {
            self.last_update = now;
        }
        due
    }
}

pub struct Session {
    engine: PatternEngine,
    config: PatternConfig,
    clock: UpdateClock,
}

impl Session {
    pub fn new(config: PatternConfig) -> Result<Self> {
        let config = config.sanitized();
        let mut engine = PatternEngine::new(config.seed);
        engine.set_probabilities(config.probability_horizontal, config.probability_vertical)?;
        Ok(Self {
            engine,
            config,
            clock: UpdateClock::default(),
        })
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    pub fn engine(&self) -> &PatternEngine {
        &self.engine
    }

    /// Replace the parameters. New values take effect on the next frame.
    pub fn set_config(&mut self, config: PatternConfig) -> Result<()> {
        let config = config.sanitized();
        self.engine
            .set_probabilities(config.probability_horizontal, config.probability_vertical)?;
        if config.update_policy != self.config.update_policy {
            log::info!("Update policy changed to {}", config.update_policy.label());
        }
        self.config = config;
        Ok(())
    }

    /// Run one frame at time `now` (seconds) for the given viewport size.
    ///
    /// A resize regenerates the pattern and skips the timed update for that
    /// frame. On error nothing is drawn and the caller retries next frame.
    pub fn frame(&mut self, viewport_width: u32, viewport_height: u32, now: f64) -> Result<Frame> {
        let (width, height) = self.config.grid_dimensions(viewport_width, viewport_height)?;
        let resized = self.engine.set_dimensions(width, height)?;

        if !resized && self.clock.should_update(now, self.config.update_speed) {
            self.engine.mutate(
                self.config.update_policy,
                self.config.probability_horizontal,
                self.config.probability_vertical,
            )?;
        }

        let labels = self.engine.compute_labels(self.config.colored)?;
        Frame::capture(&self.engine, self.config.cell_size, labels)
    }
}
