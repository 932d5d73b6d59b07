#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{to_binary, Addr, Binary, Coin, Deps, Env, Order, StdResult, Uint128};
use qbm_sale::{
    ConstantsResponse, SalePhase, SupplyResponse, MAX_PER_USER, MAX_SUPPLY, PUBLIC_PRICE,
    SUPPLY_FOR_DEVS, WHITELIST_PRICE,
};
use sg_std::NATIVE_DENOM;

use crate::msg::QueryMsg;
use crate::state::{
    QbmCollection, ADMIN, CONFIG, DEV_MINTED, MINT_COUNT, SALE_TIMES, TOTAL_MINTED, WHITELIST,
};

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    let api = deps.api;

    match msg {
        QueryMsg::Constants {} => to_binary(&query_constants()),
        QueryMsg::Config {} => to_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::SaleTimes {} => to_binary(&SALE_TIMES.load(deps.storage)?),
        QueryMsg::SalePhase {} => to_binary(&query_sale_phase(deps, &env)?),
        QueryMsg::Whitelist { address } => {
            to_binary(&query_whitelist(deps, api.addr_validate(&address)?)?)
        }
        QueryMsg::MintCount { address } => {
            to_binary(&query_mint_count(deps, api.addr_validate(&address)?)?)
        }
        QueryMsg::Supply {} => to_binary(&query_supply(deps)?),
        QueryMsg::BalanceOf { owner } => {
            to_binary(&query_balance_of(deps, api.addr_validate(&owner)?)?)
        }
        QueryMsg::Treasury {} => to_binary(&query_treasury(deps, &env)?),
        QueryMsg::IsApprovedForAll { owner, operator } => to_binary(&query_is_approved_for_all(
            deps,
            &env,
            api.addr_validate(&owner)?,
            api.addr_validate(&operator)?,
        )?),
        QueryMsg::Admin {} => to_binary(&ADMIN.query_admin(deps)?),
        _ => QbmCollection::default().query(deps, env, msg.into()),
    }
}

pub fn query_constants() -> ConstantsResponse {
    ConstantsResponse {
        max_supply: MAX_SUPPLY,
        max_per_user: MAX_PER_USER,
        supply_for_devs: SUPPLY_FOR_DEVS,
        public_price: Uint128::from(PUBLIC_PRICE),
        whitelist_price: Uint128::from(WHITELIST_PRICE),
        denom: NATIVE_DENOM.to_string(),
    }
}

pub fn query_sale_phase(deps: Deps, env: &Env) -> StdResult<SalePhase> {
    Ok(SALE_TIMES.load(deps.storage)?.phase(env.block.time))
}

pub fn query_whitelist(deps: Deps, address: Addr) -> StdResult<u32> {
    Ok(WHITELIST
        .may_load(deps.storage, &address)?
        .unwrap_or_default())
}

pub fn query_mint_count(deps: Deps, address: Addr) -> StdResult<u32> {
    Ok(MINT_COUNT
        .may_load(deps.storage, &address)?
        .unwrap_or_default())
}

pub fn query_supply(deps: Deps) -> StdResult<SupplyResponse> {
    Ok(SupplyResponse {
        total_minted: TOTAL_MINTED.load(deps.storage)?,
        dev_minted: DEV_MINTED.load(deps.storage)?,
    })
}

/// Counts through the owner index so transfers are reflected
pub fn query_balance_of(deps: Deps, owner: Addr) -> StdResult<u32> {
    let token_ids = QbmCollection::default()
        .tokens
        .idx
        .owner
        .prefix(owner)
        .keys(deps.storage, None, None, Order::Ascending)
        .collect::<StdResult<Vec<_>>>()?;

    Ok(token_ids.len() as u32)
}

pub fn query_treasury(deps: Deps, env: &Env) -> StdResult<Coin> {
    deps.querier
        .query_balance(&env.contract.address, NATIVE_DENOM)
}

pub fn query_is_approved_for_all(
    deps: Deps,
    env: &Env,
    owner: Addr,
    operator: Addr,
) -> StdResult<bool> {
    if CONFIG.load(deps.storage)?.proxy == operator {
        return Ok(true);
    }

    let approval = QbmCollection::default()
        .operators
        .may_load(deps.storage, (&owner, &operator))?;
    Ok(approval.map_or(false, |expires| !expires.is_expired(&env.block)))
}
