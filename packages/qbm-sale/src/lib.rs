use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Timestamp, Uint128};

/// Tokens mintable through the whitelist and public sales combined
pub const MAX_SUPPLY: u32 = 40;
/// Whitelist + public mints allowed per address
pub const MAX_PER_USER: u32 = 5;
/// Tokens reserved for the team, minted outside the sale pool
pub const SUPPLY_FOR_DEVS: u32 = 15;

/// 0.069 STARS
pub const PUBLIC_PRICE: u128 = 69_000;
/// 0.025 STARS
pub const WHITELIST_PRICE: u128 = 25_000;

/// Stage of the sale at a given block time.
/// Once public sale opens the whitelist window stays open as well.
#[cw_serde]
pub enum SalePhase {
    NotStarted,
    WhitelistActive,
    PublicActive,
}

impl SalePhase {
    pub fn whitelist_open(&self) -> bool {
        !matches!(self, SalePhase::NotStarted)
    }

    pub fn public_open(&self) -> bool {
        matches!(self, SalePhase::PublicActive)
    }
}

#[cw_serde]
pub struct SaleTimes {
    pub whitelist_sale_start: Timestamp,
    pub public_sale_start: Timestamp,
}

impl SaleTimes {
    /// Both start times are inclusive.
    pub fn phase(&self, now: Timestamp) -> SalePhase {
        if now >= self.public_sale_start {
            SalePhase::PublicActive
        } else if now >= self.whitelist_sale_start {
            SalePhase::WhitelistActive
        } else {
            SalePhase::NotStarted
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.whitelist_sale_start <= self.public_sale_start
    }
}

#[cw_serde]
pub struct ConstantsResponse {
    pub max_supply: u32,
    pub max_per_user: u32,
    pub supply_for_devs: u32,
    pub public_price: Uint128,
    pub whitelist_price: Uint128,
    pub denom: String,
}

#[cw_serde]
pub struct SupplyResponse {
    /// Whitelist and public mints
    pub total_minted: u32,
    pub dev_minted: u32,
}
