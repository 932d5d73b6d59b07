use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Empty};
use cw_controllers::Admin;
use cw_storage_plus::{Item, Map};
use qbm_sale::SaleTimes;
use sg_std::StargazeMsgWrapper;

/// Embedded cw721 collection holding the minted tokens
pub type QbmCollection<'a> = cw721_base::Cw721Contract<'a, Empty, StargazeMsgWrapper, Empty, Empty>;

#[cw_serde]
pub struct Config {
    /// Marketplace proxy, treated as an approved operator for every owner
    pub proxy: Addr,
    /// Minted tokens get `{base_token_uri}/{token_id}`
    pub base_token_uri: Option<String>,
}

pub const CONFIG: Item<Config> = Item::new("config");

pub const SALE_TIMES: Item<SaleTimes> = Item::new("sale-times");

/// Owner, the only caller allowed to seed the whitelist and dev mint
pub const ADMIN: Admin = Admin::new("admin");

/// Address -> remaining whitelist mints
pub const WHITELIST: Map<&Addr, u32> = Map::new("wl");

/// Address -> whitelist + public mints
pub const MINT_COUNT: Map<&Addr, u32> = Map::new("mint-count");

pub const TOTAL_MINTED: Item<u32> = Item::new("total-minted");

pub const DEV_MINTED: Item<u32> = Item::new("dev-minted");

/// Never decremented, so token ids are not reused
pub const LAST_TOKEN_ID: Item<u64> = Item::new("last-token-id");
