//! Host tick constants.
//!
//! The simulation uses a clamped variable timestep: callers pass whatever `dt` they
//! measured and the tick clamps it so a stall does not teleport actors through walls.

/// Default tick frequency (Hz) for the headless runner.
pub const DEFAULT_TICK_HZ: f32 = 60.0;

/// Default number of ticks the headless runner simulates.
pub const DEFAULT_TICKS: u64 = 600;

/// Max dt (seconds) for one tick.
pub const MAX_DT_S: f32 = 0.10;

/// Longest ray the query world will trace. Unbounded casts are clipped to this.
pub const MAX_CAST_DISTANCE: f32 = 1.0e4;
