//! Shop pricing, monthly resets and purchase effects.

use super::types::ShopItem;
use crate::core::constants::POTION_STAT_GAIN;
use crate::core::error::{EngineError, EngineResult};
use crate::core::events::{ActionResult, EngineEvent};
use crate::core::session_state::SessionState;
use crate::idle::GeneratorData;
use crate::progression::{grant_exp, Track};

/// Purchases of `item` counted toward this month's price.
pub fn bought_this_month(item: ShopItem, gen: &GeneratorData) -> u32 {
    match item {
        ShopItem::Potion => gen.potion_count,
        ShopItem::SkipTicket => gen.ticket_bought_count,
    }
}

/// Current price of `item`.
pub fn price(item: ShopItem, gen: &GeneratorData) -> u64 {
    item.cost_after(bought_this_month(item, gen))
}

/// Resets the purchase counters when `month` differs from the last recorded
/// shop month. Returns true when a reset happened.
pub fn open_shop(gen: &mut GeneratorData, month: &str) -> bool {
    if gen.last_shop_month.as_deref() == Some(month) {
        return false;
    }
    gen.potion_count = 0;
    gen.ticket_bought_count = 0;
    gen.last_shop_month = Some(month.to_string());
    true
}

/// Buys one `item`. The monthly reset is applied first so a purchase in a
/// new month never pays last month's price.
pub fn purchase(
    state: &mut SessionState,
    item: ShopItem,
    month: &str,
) -> EngineResult<ActionResult> {
    let mut result = ActionResult::default();
    let reset = open_shop(&mut state.generator, month);

    let cost = price(item, &state.generator);
    if state.gold < cost {
        return Err(EngineError::InsufficientGold {
            cost,
            gold: state.gold,
        });
    }

    if reset {
        result.push(EngineEvent::ShopMonthReset {
            month: month.to_string(),
        });
    }

    state.gold -= cost;
    result.push(EngineEvent::ItemPurchased { item, cost });

    match item {
        ShopItem::Potion => {
            state.generator.potion_count += 1;
            for track in Track::ALL {
                result.push(EngineEvent::ExpGained {
                    track,
                    amount: POTION_STAT_GAIN,
                });
                if let Some(level) = grant_exp(&mut state.stats, track, POTION_STAT_GAIN) {
                    result.push(EngineEvent::LevelUp { track, level });
                }
            }
        }
        ShopItem::SkipTicket => {
            state.generator.ticket_bought_count += 1;
            state.generator.ticket_inventory += 1;
        }
    }

    tracing::info!(item = %item, cost, gold = state.gold, "shop purchase");
    Ok(result)
}
