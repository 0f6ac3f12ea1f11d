use super::stats::Track;
use crate::core::constants::{LEVELS_PER_RANK_TIER, RANK_TIER_COUNT};

const STUDY_TITLES: [&str; RANK_TIER_COUNT] = [
    "Apprentice Reader",
    "Seeker of Knowledge",
    "Town Know-It-All",
    "Learned Scholar",
    "Royal Sage",
    "Unraveler of Truth",
    "Akashic Reader",
    "Omniscient Oracle",
    "God of Wisdom",
    "The All-Knowing",
];

const EXERCISE_TITLES: [&str; RANK_TIER_COUNT] = [
    "Fledgling Adventurer",
    "Training Warrior",
    "Seasoned Fighter",
    "Hero of a Thousand",
    "Legendary Martial Artist",
    "Avatar of the War God",
    "Earthshaker",
    "Star Breaker",
    "God of Strength",
    "The Destroyer",
];

const WORK_TITLES: [&str; RANK_TIER_COUNT] = [
    "Rookie Day Laborer",
    "Skilled Artisan",
    "Guild Master",
    "Town Notable",
    "Head of the Conglomerate",
    "Royal Chancellor",
    "Ruler of the World",
    "Keeper of Space-Time",
    "God of Work",
    "The Creator",
];

/// Title tier for a level: one tier per ten levels, capped at the last one.
pub fn rank_tier(level: u32) -> usize {
    ((level / LEVELS_PER_RANK_TIER) as usize).min(RANK_TIER_COUNT - 1)
}

pub fn rank_title(track: Track, level: u32) -> &'static str {
    let titles = match track {
        Track::Study => &STUDY_TITLES,
        Track::Exercise => &EXERCISE_TITLES,
        Track::Work => &WORK_TITLES,
    };
    titles[rank_tier(level)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_tier_boundaries() {
        assert_eq!(rank_tier(1), 0);
        assert_eq!(rank_tier(9), 0);
        assert_eq!(rank_tier(10), 1);
        assert_eq!(rank_tier(99), 9);
        assert_eq!(rank_tier(500), 9);
    }

    #[test]
    fn test_rank_title_per_track() {
        assert_eq!(rank_title(Track::Study, 1), "Apprentice Reader");
        assert_eq!(rank_title(Track::Exercise, 25), "Seasoned Fighter");
        assert_eq!(rank_title(Track::Work, 1000), "The Creator");
    }
}
