// XP curve
pub const LEVEL_BASE_EXP: u64 = 100;
pub const LEVEL_GROWTH_NUM: u64 = 11;
pub const LEVEL_GROWTH_DEN: u64 = 10;
pub const LEVELS_PER_RANK_TIER: u32 = 10;
pub const RANK_TIER_COUNT: usize = 10;

// Streak bonus schedule (7-day cycle)
pub const STREAK_CYCLE_DAYS: u32 = 7;
pub const STREAK_MID_CYCLE_DAY: u32 = 3;
pub const STREAK_DAILY_BONUS: u64 = 10;
pub const STREAK_MID_BONUS: u64 = 30;
pub const STREAK_BIG_BONUS: u64 = 100;

// Task rewards
/// Overdue completions keep 30% of the base reward.
/// Largest reward a task may carry; ledger deltas are signed.
pub const MAX_TASK_REWARD: u64 = i64::MAX as u64;
pub const OVERDUE_REWARD_NUM: u64 = 3;
pub const OVERDUE_REWARD_DEN: u64 = 10;
/// Gold income is half of the granted EXP.
pub const GOLD_PER_REWARD_NUM: u64 = 1;
pub const GOLD_PER_REWARD_DEN: u64 = 2;
pub const SABORI_PENALTY_MIN: u64 = 10;
pub const SABORI_PENALTY_MAX: u64 = 30;

// Weekly mission pool
pub const WEEKLY_MISSION_COUNT: usize = 7;
pub const WEEKLY_MAX_SABORI: usize = 3;

// Idle generator
pub const IDLE_LEVELS_PER_GOLD_HOUR: u32 = 3;
pub const SECONDS_PER_HOUR: i64 = 3600;

// Boss sizing
pub const BOSS_HP_PER_DAY: u64 = 100;
pub const BOSS_BASE_HP: u64 = 1000;
pub const BOSS_MIN_HP: u64 = 1;
/// reward_gold = floor(hp * 0.5)
pub const BOSS_GOLD_NUM: u64 = 1;
pub const BOSS_GOLD_DEN: u64 = 2;
/// exp_reward = floor(hp * 0.2)
pub const BOSS_EXP_NUM: u64 = 1;
pub const BOSS_EXP_DEN: u64 = 5;
pub const BOSS_EXP_SPLIT: u64 = 3;

// Shop
pub const POTION_BASE_COST: u64 = 1000;
pub const POTION_COST_STEP: u64 = 100;
pub const POTION_STAT_GAIN: u64 = 50;
pub const TICKET_BASE_COST: u64 = 2000;
pub const TICKET_COST_STEP: u64 = 200;

// Content generator fallbacks
pub const FALLBACK_TASK_REWARD: u64 = 30;
pub const FALLBACK_GOAL_REWARD: u64 = 50;
pub const FALLBACK_SABORI_REWARD: u64 = 10;
pub const FALLBACK_FILLER_REWARD: u64 = 30;

// Analytics
pub const DEFAULT_HEATMAP_WEEKS: u32 = 20;
/// Longest heatmap window, about ten years.
pub const MAX_HEATMAP_WEEKS: u32 = 520;
