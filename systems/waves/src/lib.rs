#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! The wave/intermission finite state machine: pre-game, timed
//! intermissions, an active phase enumerating sub-waves, a brief warp
//! transition between waves, and the game-over/victory terminal states.

use holdfast_core::WaveConfig;

/// The scheduler's current phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WavePhase {
    /// Before the first intermission has started.
    PreGame,
    /// Counting down to the next wave's start.
    Intermission {
        /// Seconds left before the wave begins.
        seconds_remaining: f32,
        /// The wave index that will start when the countdown reaches zero.
        next_wave_index: u32,
    },
    /// A wave is underway, enumerating sub-waves over time.
    Active {
        /// 1-indexed wave number.
        wave_index: u32,
        /// 0-indexed sub-wave reached so far.
        sub_wave_index: u32,
        /// Seconds elapsed since the last sub-wave started.
        seconds_since_sub_wave: f32,
    },
    /// A brief transition after a wave clears, before the next intermission.
    Warp {
        /// Seconds left in the transition.
        seconds_remaining: f32,
        /// The wave index that will start the following intermission.
        next_wave_index: u32,
    },
    /// The portal was destroyed; terminal.
    GameOver,
    /// Every wave was cleared; terminal.
    Victory,
}

/// Finite-state scheduler driving wave progression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveScheduler {
    phase: WavePhase,
}

impl Default for WaveScheduler {
    fn default() -> Self {
        Self {
            phase: WavePhase::PreGame,
        }
    }
}

/// Events the scheduler emits on a state transition, for `world` to act on
/// (triggering an aging pass, growing the portal's safety radius, or
/// enumerating a sub-wave's spawns).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SchedulerEvent {
    /// A new wave began; `world` should grow the portal and trigger an
    /// aging pass.
    WaveStarted {
        /// The wave that started.
        wave_index: u32,
    },
    /// A sub-wave within the active wave began.
    SubWaveStarted {
        /// The wave it belongs to.
        wave_index: u32,
        /// The sub-wave index within that wave.
        sub_wave_index: u32,
    },
    /// Every configured wave was cleared.
    AllWavesCleared,
    /// The portal was destroyed.
    GameOver,
}

impl WaveScheduler {
    /// Creates a scheduler in its initial `PreGame` phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Whether the game has ended, one way or another.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.phase, WavePhase::GameOver | WavePhase::Victory)
    }

    /// Advances the scheduler by `dt` seconds.
    ///
    /// `wave_cleared` should be true exactly once every enemy of the
    /// current active wave has been defeated; `portal_destroyed` forces an
    /// immediate transition to `GameOver` regardless of phase.
    pub fn tick(&mut self, dt: f32, wave_cleared: bool, portal_destroyed: bool, config: &WaveConfig) -> Vec<SchedulerEvent> {
        if portal_destroyed && !self.is_terminal() {
            self.phase = WavePhase::GameOver;
            return vec![SchedulerEvent::GameOver];
        }
        if self.is_terminal() {
            return Vec::new();
        }

        match self.phase {
            WavePhase::PreGame => {
                self.phase = WavePhase::Intermission {
                    seconds_remaining: config.wave_start_delay_seconds,
                    next_wave_index: 1,
                };
                Vec::new()
            }
            WavePhase::Intermission {
                seconds_remaining,
                next_wave_index,
            } => self.tick_intermission(seconds_remaining, next_wave_index, dt, config),
            WavePhase::Active {
                wave_index,
                sub_wave_index,
                seconds_since_sub_wave,
            } => self.tick_active(wave_index, sub_wave_index, seconds_since_sub_wave, dt, wave_cleared, config),
            WavePhase::Warp {
                seconds_remaining,
                next_wave_index,
            } => self.tick_warp(seconds_remaining, next_wave_index, dt, config),
            WavePhase::GameOver | WavePhase::Victory => Vec::new(),
        }
    }

    fn tick_intermission(&mut self, seconds_remaining: f32, next_wave_index: u32, dt: f32, config: &WaveConfig) -> Vec<SchedulerEvent> {
        let remaining = seconds_remaining - dt;
        if remaining > 0.0 {
            self.phase = WavePhase::Intermission { seconds_remaining: remaining, next_wave_index };
            return Vec::new();
        }
        let wave_index = next_wave_index;
        self.phase = WavePhase::Active {
            wave_index,
            sub_wave_index: 0,
            seconds_since_sub_wave: 0.0,
        };
        vec![
            SchedulerEvent::WaveStarted { wave_index },
            SchedulerEvent::SubWaveStarted { wave_index, sub_wave_index: 0 },
        ]
    }

    fn tick_active(
        &mut self,
        wave_index: u32,
        sub_wave_index: u32,
        seconds_since_sub_wave: f32,
        dt: f32,
        wave_cleared: bool,
        config: &WaveConfig,
    ) -> Vec<SchedulerEvent> {
        if wave_cleared {
            let next_wave_index = wave_index + 1;
            self.phase = WavePhase::Warp {
                seconds_remaining: config.warp_phase_duration_seconds,
                next_wave_index,
            };
            return Vec::new();
        }

        let elapsed = seconds_since_sub_wave + dt;
        if sub_wave_index + 1 < config.sub_waves_per_wave && elapsed >= config.sub_wave_interval_seconds {
            let next_sub_wave = sub_wave_index + 1;
            self.phase = WavePhase::Active {
                wave_index,
                sub_wave_index: next_sub_wave,
                seconds_since_sub_wave: 0.0,
            };
            return vec![SchedulerEvent::SubWaveStarted { wave_index, sub_wave_index: next_sub_wave }];
        }

        self.phase = WavePhase::Active {
            wave_index,
            sub_wave_index,
            seconds_since_sub_wave: elapsed,
        };
        Vec::new()
    }

    fn tick_warp(&mut self, seconds_remaining: f32, next_wave_index: u32, dt: f32, config: &WaveConfig) -> Vec<SchedulerEvent> {
        let remaining = seconds_remaining - dt;
        if remaining > 0.0 {
            self.phase = WavePhase::Warp { seconds_remaining: remaining, next_wave_index };
            return Vec::new();
        }
        if next_wave_index > config.total_waves {
            self.phase = WavePhase::Victory;
            return vec![SchedulerEvent::AllWavesCleared];
        }
        self.phase = WavePhase::Intermission {
            seconds_remaining: config.wave_start_delay_seconds,
            next_wave_index,
        };
        Vec::new()
    }
}
