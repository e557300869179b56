//! Fixed timestep game loop
//!
//! The loop samples an injected [`Clock`], turns elapsed time into whole
//! ticks and runs them synchronously, rendering after each one. Tests drive
//! it with [`ManualClock`]; the binary uses [`SystemClock`].

use std::time::{Duration, Instant};

use crate::audio::{AudioPort, MusicTrack};
use crate::input::{InputPort, read_tick_input};
use crate::render::Renderer;
use crate::sim::{GameState, TickOutcome, tick};

/// Monotonic time since some fixed origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// Fixed timestep accumulator.
/// Converts variable frame time into a whole number of ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(step: Duration, max_steps: u32) -> Self {
        Self {
            step,
            accumulator: Duration::ZERO,
            max_steps: max_steps.max(1),
        }
    }

    /// Add frame time and return how many ticks to run now.
    ///
    /// Time beyond `max_steps` ticks is dropped to avoid a spiral of death.
    pub fn accumulate(&mut self, frame: Duration) -> u32 {
        self.accumulator += frame;

        let cap = self.step * self.max_steps;
        if self.accumulator > cap {
            log::debug!(
                "Frame took {:?}, dropping {:?} of simulation time",
                frame,
                self.accumulator - cap
            );
            self.accumulator = cap;
        }

        let steps = (self.accumulator.as_nanos() / self.step.as_nanos().max(1)) as u32;
        self.accumulator -= self.step * steps;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0)
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.step.as_secs_f32()
    }

    /// Time left until the next tick is owed
    pub fn until_next(&self) -> Duration {
        self.step.saturating_sub(self.accumulator)
    }
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Owns the game and its collaborators and steps them in lockstep
pub struct GameLoop<C, I, A, R> {
    state: GameState,
    clock: C,
    input: I,
    audio: A,
    renderer: R,
    timestep: FixedTimestep,
    last_time: Duration,
    exited: bool,
}

impl<C, I, A, R> GameLoop<C, I, A, R>
where
    C: Clock,
    I: InputPort,
    A: AudioPort,
    R: Renderer,
{
    /// Start in the menu with menu music playing
    pub fn new(state: GameState, clock: C, input: I, mut audio: A, renderer: R) -> Self {
        let timestep = FixedTimestep::new(
            state.tuning.tick_duration(),
            state.tuning.max_ticks_per_frame,
        );
        audio.play_music(MusicTrack::Menu);
        log::info!(
            "Game loop ready: {} Hz, seed {}",
            state.tuning.tick_rate,
            state.seed
        );

        Self {
            last_time: clock.now(),
            state,
            clock,
            input,
            audio,
            renderer,
            timestep,
            exited: false,
        }
    }

    /// Run every tick owed since the last frame
    pub fn frame(&mut self) -> LoopControl {
        if self.exited {
            return LoopControl::Exit;
        }

        let now = self.clock.now();
        let elapsed = now.saturating_sub(self.last_time);
        self.last_time = now;

        let steps = self.timestep.accumulate(elapsed);
        for _ in 0..steps {
            let input = read_tick_input(&mut self.input);
            let outcome = tick(&mut self.state, &input, &mut self.audio);
            self.renderer.render(&self.state.snapshot());

            if outcome == TickOutcome::Exit {
                self.exited = true;
                log::info!("Exiting after {} ticks", self.state.time_ticks);
                return LoopControl::Exit;
            }
        }
        LoopControl::Continue
    }

    /// Run against the clock, sleeping until the next tick is owed.
    ///
    /// `before_frame` gets the frame number and the input port so the host
    /// can feed key edges. Stops on exit or after `max_frames` frames.
    pub fn run<F>(&mut self, max_frames: Option<u64>, mut before_frame: F) -> LoopControl
    where
        F: FnMut(u64, &mut I),
    {
        let mut frame = 0;
        while max_frames.is_none_or(|max| frame < max) {
            before_frame(frame, &mut self.input);
            if self.frame() == LoopControl::Exit {
                return LoopControl::Exit;
            }
            frame += 1;
            std::thread::sleep(self.timestep.until_next());
        }
        LoopControl::Continue
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }
}
