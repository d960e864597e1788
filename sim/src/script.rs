//! Scripted input for headless runs.
//!
//! A script is a list of `(ticks, input)` spans played back in order. Past the end
//! of the script the actor receives no input.

use kinematic2d::MotorInput;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// How many ticks this input is held for.
    pub ticks: u64,
    #[serde(default)]
    pub input: MotorInput,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputScript {
    steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    /// Total scripted ticks.
    pub fn len(&self) -> u64 {
        self.steps.iter().map(|s| s.ticks).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Input held on `tick`, counting from 0.
    pub fn input_at(&self, tick: u64) -> MotorInput {
        let mut start = 0u64;
        for step in &self.steps {
            let end = start.saturating_add(step.ticks);
            if tick < end {
                return step.input;
            }
            start = end;
        }
        MotorInput::default()
    }
}
