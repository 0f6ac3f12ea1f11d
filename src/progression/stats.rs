use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NUM_TRACKS: usize = 3;

/// One of the three progression axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Study,
    Exercise,
    Work,
}

impl Track {
    /// Fixed enumeration order. Tie-breaks depend on it.
    pub const ALL: [Track; NUM_TRACKS] = [Track::Study, Track::Exercise, Track::Work];

    pub fn name(&self) -> &'static str {
        match self {
            Track::Study => "study",
            Track::Exercise => "exercise",
            Track::Work => "work",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Track::Study => "Study (Knowledge)",
            Track::Exercise => "Exercise (Stamina)",
            Track::Work => "Work (Focus)",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Track::Study => 0,
            Track::Exercise => 1,
            Track::Work => 2,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Track {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "study" => Ok(Track::Study),
            "exercise" => Ok(Track::Exercise),
            "work" => Ok(Track::Work),
            other => Err(format!("unknown track '{}'", other)),
        }
    }
}

/// Cumulative EXP per track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub study: u64,
    #[serde(default)]
    pub exercise: u64,
    #[serde(default)]
    pub work: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, track: Track) -> u64 {
        match track {
            Track::Study => self.study,
            Track::Exercise => self.exercise,
            Track::Work => self.work,
        }
    }

    pub fn set(&mut self, track: Track, value: u64) {
        match track {
            Track::Study => self.study = value,
            Track::Exercise => self.exercise = value,
            Track::Work => self.work = value,
        }
    }

    pub fn add(&mut self, track: Track, amount: u64) {
        self.set(track, self.get(track).saturating_add(amount));
    }

    /// Subtracts with a floor of 0. Returns the amount actually removed.
    pub fn sub_clamped(&mut self, track: Track, amount: u64) -> u64 {
        let current = self.get(track);
        let removed = amount.min(current);
        self.set(track, current - removed);
        removed
    }

    /// The track holding the highest EXP. Ties go to the earlier track in
    /// `Track::ALL` order.
    pub fn strongest_track(&self) -> Track {
        let mut best = Track::Study;
        for track in Track::ALL {
            if self.get(track) > self.get(best) {
                best = track;
            }
        }
        best
    }

    pub fn max_value(&self) -> u64 {
        Track::ALL.iter().map(|t| self.get(*t)).max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        Track::ALL.iter().map(|t| self.get(*t)).sum()
    }
}
