use crate::core::constants::{
    BOSS_EXP_DEN, BOSS_EXP_NUM, BOSS_GOLD_DEN, BOSS_GOLD_NUM, BOSS_MIN_HP,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type BossId = Uuid;

/// Flavor of a long-term goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BossArchetype {
    /// Physical, stamina or competitive goals.
    #[default]
    Dragon,
    /// Breaking a bad habit.
    Demon,
    /// Deep study, research, complex problems.
    Kraken,
    /// Building, saving, slow accumulation.
    Golem,
}

impl BossArchetype {
    pub const ALL: [BossArchetype; 4] = [
        BossArchetype::Dragon,
        BossArchetype::Demon,
        BossArchetype::Kraken,
        BossArchetype::Golem,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BossArchetype::Dragon => "dragon",
            BossArchetype::Demon => "demon",
            BossArchetype::Kraken => "kraken",
            BossArchetype::Golem => "golem",
        }
    }
}

impl fmt::Display for BossArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BossArchetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BossArchetype::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown boss archetype '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BossStatus {
    #[default]
    Active,
    /// Terminal.
    Defeated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boss {
    pub id: BossId,
    /// The goal the boss stands for.
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub hp: u64,
    pub max_hp: u64,
    pub reward_gold: u64,
    pub exp_reward: u64,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub archetype: BossArchetype,
    #[serde(default)]
    pub status: BossStatus,
}

impl Boss {
    /// A fresh active boss. Rewards scale with HP: half of it in gold and a
    /// fifth of it in EXP.
    pub fn new(
        name: impl Into<String>,
        hp: u64,
        archetype: BossArchetype,
        deadline: Option<NaiveDate>,
    ) -> Self {
        let hp = hp.max(BOSS_MIN_HP);
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            hp,
            max_hp: hp,
            reward_gold: hp * BOSS_GOLD_NUM / BOSS_GOLD_DEN,
            exp_reward: hp * BOSS_EXP_NUM / BOSS_EXP_DEN,
            deadline,
            archetype,
            status: BossStatus::Active,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == BossStatus::Active
    }

    /// Deals damage to an active boss. Returns true only on the hit that
    /// takes HP to zero; a defeated boss ignores further damage.
    pub fn take_damage(&mut self, damage: u64) -> bool {
        if !self.is_active() {
            return false;
        }
        self.hp = self.hp.saturating_sub(damage);
        if self.hp == 0 {
            self.status = BossStatus::Defeated;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_boss_rewards_scale_with_hp() {
        let boss = Boss::new("Marathon", 1701, BossArchetype::Dragon, None);
        assert_eq!(boss.hp, 1701);
        assert_eq!(boss.max_hp, 1701);
        assert_eq!(boss.reward_gold, 850);
        assert_eq!(boss.exp_reward, 340);
        assert!(boss.is_active());
    }

    #[test]
    fn test_new_boss_hp_floor() {
        let boss = Boss::new("Nothing", 0, BossArchetype::Golem, None);
        assert_eq!(boss.hp, 1);
    }

    #[test]
    fn test_take_damage_clamps_and_defeats_once() {
        let mut boss = Boss::new("Quit sugar", 40, BossArchetype::Demon, None);
        assert!(!boss.take_damage(15));
        assert_eq!(boss.hp, 25);
        assert!(boss.take_damage(50));
        assert_eq!(boss.hp, 0);
        assert_eq!(boss.status, BossStatus::Defeated);
        assert!(!boss.take_damage(50));
        assert_eq!(boss.hp, 0);
    }

    #[test]
    fn test_zero_damage_keeps_boss_alive() {
        let mut boss = Boss::new("Quit sugar", 40, BossArchetype::Demon, None);
        assert!(!boss.take_damage(0));
        assert!(boss.is_active());
    }

    #[test]
    fn test_archetype_parse() {
        assert_eq!("Kraken".parse::<BossArchetype>(), Ok(BossArchetype::Kraken));
        assert!("hydra".parse::<BossArchetype>().is_err());
    }
}
