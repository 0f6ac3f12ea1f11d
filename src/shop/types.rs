use crate::core::constants::{
    POTION_BASE_COST, POTION_COST_STEP, TICKET_BASE_COST, TICKET_COST_STEP,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopItem {
    /// +50 EXP to every track.
    Potion,
    /// One penalty-free emergency skip.
    SkipTicket,
}

impl ShopItem {
    pub const ALL: [ShopItem; 2] = [ShopItem::Potion, ShopItem::SkipTicket];

    pub fn name(&self) -> &'static str {
        match self {
            ShopItem::Potion => "Growth Potion",
            ShopItem::SkipTicket => "Skip Ticket",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ShopItem::Potion => "+50 EXP to study, exercise and work",
            ShopItem::SkipTicket => "Skip all of today's tasks without a penalty",
        }
    }

    pub fn base_cost(&self) -> u64 {
        match self {
            ShopItem::Potion => POTION_BASE_COST,
            ShopItem::SkipTicket => TICKET_BASE_COST,
        }
    }

    pub fn cost_step(&self) -> u64 {
        match self {
            ShopItem::Potion => POTION_COST_STEP,
            ShopItem::SkipTicket => TICKET_COST_STEP,
        }
    }

    /// Cost after `bought` purchases this month.
    pub fn cost_after(&self, bought: u32) -> u64 {
        self.base_cost() + self.cost_step() * bought as u64
    }
}

impl fmt::Display for ShopItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShopItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "potion" => Ok(ShopItem::Potion),
            "ticket" | "skip_ticket" | "skip-ticket" => Ok(ShopItem::SkipTicket),
            other => Err(format!("unknown shop item '{}'", other)),
        }
    }
}
