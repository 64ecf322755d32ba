use serde::{Deserialize, Serialize};

/// How a trial picks the next site to open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sampling {
    /// Draw a uniform (row, col); redraw if it is already open.
    #[default]
    Rejection,
    /// Keep the blocked sites in a vector and swap-remove a uniform pick.
    BlockedSet,
}

/// All tunable parameters for a threshold estimate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub grid_size: usize,
    pub trials: usize,
    pub seed: u64,
    pub sampling: Sampling,
    /// Run trials on the rayon pool.
    pub parallel: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            grid_size: 200,
            trials: 100,
            seed: 42,
            sampling: Sampling::Rejection,
            parallel: true,
        }
    }
}
