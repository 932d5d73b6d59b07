#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    coins, Addr, BankMsg, Binary, Deps, DepsMut, Empty, Env, Event, MessageInfo, StdError,
    Storage, Uint128,
};
use cw2::set_contract_version;
use cw721::Cw721ReceiveMsg;
use cw721_base::state::TokenInfo;
use cw721_base::InstantiateMsg as Cw721InstantiateMsg;
use cw_utils::{maybe_addr, may_pay, nonpayable};
use qbm_sale::{
    SaleTimes, MAX_PER_USER, MAX_SUPPLY, PUBLIC_PRICE, SUPPLY_FOR_DEVS, WHITELIST_PRICE,
};
use semver::Version;
use sg_std::{CosmosMsg, Response, NATIVE_DENOM};

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg};
use crate::state::{
    Config, QbmCollection, ADMIN, CONFIG, DEV_MINTED, LAST_TOKEN_ID, MINT_COUNT, SALE_TIMES,
    TOTAL_MINTED, WHITELIST,
};

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:qbm-minter";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let sale_times = SaleTimes {
        whitelist_sale_start: msg.whitelist_sale_start,
        public_sale_start: msg.public_sale_start,
    };
    validate_sale_times(&sale_times)?;

    let api = deps.api;
    let admin = maybe_addr(api, msg.admin)?.unwrap_or_else(|| info.sender.clone());
    let proxy = api.addr_validate(&msg.proxy_address)?;

    // the minter itself is the only cw721 minter, tokens are written directly
    QbmCollection::default().instantiate(
        deps.branch(),
        env.clone(),
        info.clone(),
        Cw721InstantiateMsg {
            name: msg.name,
            symbol: msg.symbol,
            minter: env.contract.address.to_string(),
        },
    )?;
    // cw721-base records its own version, overwrite it
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    ADMIN.set(deps.branch(), Some(admin.clone()))?;
    CONFIG.save(
        deps.storage,
        &Config {
            proxy: proxy.clone(),
            base_token_uri: msg.base_token_uri,
        },
    )?;
    SALE_TIMES.save(deps.storage, &sale_times)?;
    TOTAL_MINTED.save(deps.storage, &0)?;
    DEV_MINTED.save(deps.storage, &0)?;
    LAST_TOKEN_ID.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("minter_addr", env.contract.address.to_string())
        .add_attribute("admin", admin)
        .add_attribute("proxy", proxy)
        .add_attribute(
            "whitelist_sale_start",
            sale_times.whitelist_sale_start.to_string(),
        )
        .add_attribute("public_sale_start", sale_times.public_sale_start.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    let api = deps.api;

    // funds are only accepted by the sale mints, anything else would leak into the treasury
    if !matches!(
        msg,
        ExecuteMsg::WhitelistMint {} | ExecuteMsg::PublicMint { .. }
    ) {
        nonpayable(&info)?;
    }

    match msg {
        ExecuteMsg::SeedWhitelist { accounts, amounts } => {
            execute_seed_whitelist(deps, info, accounts, amounts)
        }
        ExecuteMsg::WhitelistMint {} => execute_whitelist_mint(deps, env, info),
        ExecuteMsg::PublicMint { quantity } => execute_public_mint(deps, env, info, quantity),
        ExecuteMsg::DevMint {
            recipient,
            quantity,
        } => execute_dev_mint(deps, info, recipient, quantity),
        ExecuteMsg::Withdraw { recipient } => execute_withdraw(deps, env, info, recipient),
        ExecuteMsg::UpdateSaleTimes {
            whitelist_sale_start,
            public_sale_start,
        } => execute_update_sale_times(
            deps,
            info,
            SaleTimes {
                whitelist_sale_start,
                public_sale_start,
            },
        ),
        ExecuteMsg::UpdateProxy { proxy_address } => {
            execute_update_proxy(deps, info, proxy_address)
        }
        ExecuteMsg::UpdateBaseTokenUri { base_token_uri } => {
            execute_update_base_token_uri(deps, info, base_token_uri)
        }
        ExecuteMsg::UpdateAdmin { admin } => {
            Ok(ADMIN.execute_update_admin(deps, info, maybe_addr(api, admin)?)?)
        }
        ExecuteMsg::TransferNft {
            recipient,
            token_id,
        } => execute_transfer_nft(deps, env, info, recipient, token_id),
        ExecuteMsg::SendNft {
            contract,
            token_id,
            msg,
        } => execute_send_nft(deps, env, info, contract, token_id, msg),
        _ => QbmCollection::default()
            .execute(deps, env, info, msg.into())
            .map_err(|e| e.into()),
    }
}

pub fn execute_seed_whitelist(
    deps: DepsMut,
    info: MessageInfo,
    accounts: Vec<String>,
    amounts: Vec<u32>,
) -> Result<Response, ContractError> {
    only_admin(deps.as_ref(), &info)?;

    if accounts.is_empty() {
        return Err(ContractError::NoAccounts {});
    }
    if accounts.len() != amounts.len() {
        return Err(ContractError::LengthMismatch {});
    }

    // validate everything before the first write
    let allocations = accounts
        .iter()
        .map(|account| deps.api.addr_validate(account))
        .zip(amounts)
        .map(|(addr, amount)| addr.map(|addr| (addr, amount)))
        .collect::<Result<Vec<_>, StdError>>()?;

    for (addr, amount) in allocations.iter() {
        WHITELIST.save(deps.storage, addr, amount)?;
    }

    let event = Event::new("seed_whitelist")
        .add_attribute("count", allocations.len().to_string())
        .add_attribute("sender", info.sender);
    Ok(Response::new()
        .add_attribute("action", "seed_whitelist")
        .add_event(event))
}

/// Mints a single token out of the sender's whitelist allocation
pub fn execute_whitelist_mint(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let phase = SALE_TIMES.load(deps.storage)?.phase(env.block.time);
    if !phase.whitelist_open() {
        return Err(ContractError::WhitelistSaleNotStarted {});
    }

    let price = Uint128::from(WHITELIST_PRICE);
    let refund = charge(&info, price)?;

    let reserved = WHITELIST
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    if reserved == 0 {
        return Err(ContractError::NoMintsReserved {});
    }
    let (minted, total) = check_sale_limits(deps.storage, &info.sender, 1)?;

    WHITELIST.save(deps.storage, &info.sender, &(reserved - 1))?;
    MINT_COUNT.save(deps.storage, &info.sender, &(minted + 1))?;
    TOTAL_MINTED.save(deps.storage, &(total + 1))?;

    let token_ids = mint_tokens(deps.storage, &info.sender, 1)?;
    Ok(mint_response(
        "whitelist_mint",
        &info.sender,
        token_ids,
        price,
        refund,
    ))
}

pub fn execute_public_mint(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    quantity: u32,
) -> Result<Response, ContractError> {
    let phase = SALE_TIMES.load(deps.storage)?.phase(env.block.time);
    if !phase.public_open() {
        return Err(ContractError::PublicSaleNotStarted {});
    }
    if quantity == 0 {
        return Err(ContractError::InvalidQuantity {});
    }

    let (minted, total) = check_sale_limits(deps.storage, &info.sender, quantity)?;

    // quantity is at most MAX_PER_USER here
    let price = Uint128::from(PUBLIC_PRICE * u128::from(quantity));
    let refund = charge(&info, price)?;

    MINT_COUNT.save(deps.storage, &info.sender, &(minted + quantity))?;
    TOTAL_MINTED.save(deps.storage, &(total + quantity))?;

    let token_ids = mint_tokens(deps.storage, &info.sender, quantity)?;
    Ok(mint_response(
        "public_mint",
        &info.sender,
        token_ids,
        price,
        refund,
    ))
}

/// Mints out of the dev reserve, which is accounted apart from the sale supply
pub fn execute_dev_mint(
    deps: DepsMut,
    info: MessageInfo,
    recipient: String,
    quantity: u32,
) -> Result<Response, ContractError> {
    only_admin(deps.as_ref(), &info)?;
    if quantity == 0 {
        return Err(ContractError::InvalidQuantity {});
    }

    let dev_minted = DEV_MINTED.load(deps.storage)?;
    if dev_minted.saturating_add(quantity) > SUPPLY_FOR_DEVS {
        return Err(ContractError::ExceedsDevReserve {});
    }
    let recipient = deps.api.addr_validate(&recipient)?;

    DEV_MINTED.save(deps.storage, &(dev_minted + quantity))?;
    let token_ids = mint_tokens(deps.storage, &recipient, quantity)?;

    let event = Event::new("dev_mint")
        .add_attribute("sender", info.sender)
        .add_attribute("recipient", recipient)
        .add_attribute("quantity", quantity.to_string())
        .add_attribute("token_ids", token_ids.join(","));
    Ok(Response::new()
        .add_attribute("action", "dev_mint")
        .add_event(event))
}

pub fn execute_withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: Option<String>,
) -> Result<Response, ContractError> {
    only_admin(deps.as_ref(), &info)?;

    let recipient = maybe_addr(deps.api, recipient)?.unwrap_or_else(|| info.sender.clone());
    let treasury = deps
        .querier
        .query_balance(&env.contract.address, NATIVE_DENOM)?;
    if treasury.amount.is_zero() {
        return Err(ContractError::NothingToWithdraw {});
    }

    let event = Event::new("withdraw")
        .add_attribute("recipient", recipient.to_string())
        .add_attribute("amount", treasury.to_string());
    Ok(Response::new()
        .add_attribute("action", "withdraw")
        .add_event(event)
        .add_message(BankMsg::Send {
            to_address: recipient.to_string(),
            amount: vec![treasury],
        }))
}

pub fn execute_update_sale_times(
    deps: DepsMut,
    info: MessageInfo,
    sale_times: SaleTimes,
) -> Result<Response, ContractError> {
    only_admin(deps.as_ref(), &info)?;
    validate_sale_times(&sale_times)?;

    SALE_TIMES.save(deps.storage, &sale_times)?;

    let event = Event::new("update_sale_times")
        .add_attribute(
            "whitelist_sale_start",
            sale_times.whitelist_sale_start.to_string(),
        )
        .add_attribute("public_sale_start", sale_times.public_sale_start.to_string());
    Ok(Response::new().add_event(event))
}

pub fn execute_update_proxy(
    deps: DepsMut,
    info: MessageInfo,
    proxy_address: String,
) -> Result<Response, ContractError> {
    only_admin(deps.as_ref(), &info)?;

    let proxy = deps.api.addr_validate(&proxy_address)?;
    CONFIG.update(deps.storage, |mut config| -> Result<_, ContractError> {
        config.proxy = proxy.clone();
        Ok(config)
    })?;

    let event = Event::new("update_proxy").add_attribute("proxy", proxy);
    Ok(Response::new().add_event(event))
}

pub fn execute_update_base_token_uri(
    deps: DepsMut,
    info: MessageInfo,
    base_token_uri: Option<String>,
) -> Result<Response, ContractError> {
    only_admin(deps.as_ref(), &info)?;

    CONFIG.update(deps.storage, |mut config| -> Result<_, ContractError> {
        config.base_token_uri = base_token_uri.clone();
        Ok(config)
    })?;

    let event = Event::new("update_base_token_uri")
        .add_attribute("base_token_uri", base_token_uri.unwrap_or_default());
    Ok(Response::new().add_event(event))
}

/// The proxy may move any token, everyone else goes through cw721 approvals
pub fn execute_transfer_nft(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    token_id: String,
) -> Result<Response, ContractError> {
    if !is_proxy(deps.as_ref(), &info.sender)? {
        return Ok(QbmCollection::default().execute(
            deps,
            env,
            info,
            cw721_base::ExecuteMsg::TransferNft {
                recipient,
                token_id,
            },
        )?);
    }

    let recipient = deps.api.addr_validate(&recipient)?;
    move_token(deps.storage, &token_id, &recipient)?;

    Ok(Response::new()
        .add_attribute("action", "transfer_nft")
        .add_attribute("sender", info.sender)
        .add_attribute("recipient", recipient)
        .add_attribute("token_id", token_id))
}

pub fn execute_send_nft(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    contract: String,
    token_id: String,
    msg: Binary,
) -> Result<Response, ContractError> {
    if !is_proxy(deps.as_ref(), &info.sender)? {
        return Ok(QbmCollection::default().execute(
            deps,
            env,
            info,
            cw721_base::ExecuteMsg::SendNft {
                contract,
                token_id,
                msg,
            },
        )?);
    }

    let contract = deps.api.addr_validate(&contract)?;
    move_token(deps.storage, &token_id, &contract)?;

    let receive_msg: CosmosMsg = Cw721ReceiveMsg {
        sender: info.sender.to_string(),
        token_id: token_id.clone(),
        msg,
    }
    .into_cosmos_msg(contract.clone())?;

    Ok(Response::new()
        .add_message(receive_msg)
        .add_attribute("action", "send_nft")
        .add_attribute("sender", info.sender)
        .add_attribute("recipient", contract)
        .add_attribute("token_id", token_id))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let current_version = cw2::get_contract_version(deps.storage)?;
    if current_version.contract != CONTRACT_NAME {
        return Err(StdError::generic_err("Cannot upgrade to a different contract").into());
    }
    let version: Version = current_version
        .version
        .parse()
        .map_err(|_| ContractError::InvalidContractVersion {})?;
    let new_version: Version = CONTRACT_VERSION
        .parse()
        .map_err(|_| ContractError::InvalidContractVersion {})?;

    if version > new_version {
        return Err(StdError::generic_err("Cannot upgrade to a previous contract version").into());
    }
    // if same version return
    if version == new_version {
        return Ok(Response::new());
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let event = Event::new("migrate")
        .add_attribute("from_version", version.to_string())
        .add_attribute("to_version", new_version.to_string());
    Ok(Response::new().add_event(event))
}

fn only_admin(deps: Deps, info: &MessageInfo) -> Result<(), ContractError> {
    if !ADMIN.is_admin(deps, &info.sender)? {
        return Err(ContractError::Unauthorized {});
    }
    Ok(())
}

fn is_proxy(deps: Deps, sender: &Addr) -> Result<bool, ContractError> {
    Ok(CONFIG.load(deps.storage)?.proxy == *sender)
}

fn validate_sale_times(sale_times: &SaleTimes) -> Result<(), ContractError> {
    if !sale_times.is_ordered() {
        return Err(ContractError::InvalidSaleTimes(
            sale_times.public_sale_start,
            sale_times.whitelist_sale_start,
        ));
    }
    Ok(())
}

/// Returns the excess over `price` to refund
fn charge(info: &MessageInfo, price: Uint128) -> Result<Uint128, ContractError> {
    let paid = may_pay(info, NATIVE_DENOM)?;
    if paid < price {
        return Err(ContractError::NotEnoughFunds {});
    }
    Ok(paid - price)
}

/// Checks the per user and sale supply caps for `quantity` more sale mints.
/// Returns the sender's mint count and the total minted so far.
fn check_sale_limits(
    storage: &dyn Storage,
    sender: &Addr,
    quantity: u32,
) -> Result<(u32, u32), ContractError> {
    let minted = MINT_COUNT.may_load(storage, sender)?.unwrap_or_default();
    if minted.saturating_add(quantity) > MAX_PER_USER {
        return Err(ContractError::ExceedsMaxPerUser {});
    }

    let total = TOTAL_MINTED.load(storage)?;
    if total.saturating_add(quantity) > MAX_SUPPLY {
        return Err(ContractError::ExceedsMaxSupply {});
    }

    Ok((minted, total))
}

fn mint_tokens(
    storage: &mut dyn Storage,
    owner: &Addr,
    quantity: u32,
) -> Result<Vec<String>, ContractError> {
    let collection = QbmCollection::default();
    let base_token_uri = CONFIG.load(storage)?.base_token_uri;
    let mut last_token_id = LAST_TOKEN_ID.load(storage)?;

    let mut token_ids = Vec::with_capacity(quantity as usize);
    for _ in 0..quantity {
        last_token_id += 1;
        let token_id = last_token_id.to_string();
        let token = TokenInfo {
            owner: owner.clone(),
            approvals: vec![],
            token_uri: base_token_uri
                .as_ref()
                .map(|uri| format!("{}/{}", uri.trim_end_matches('/'), token_id)),
            extension: Empty {},
        };
        collection
            .tokens
            .update(storage, &token_id, |old| match old {
                Some(_) => Err(cw721_base::ContractError::Claimed {}),
                None => Ok(token),
            })?;
        collection.increment_tokens(storage)?;
        token_ids.push(token_id);
    }
    LAST_TOKEN_ID.save(storage, &last_token_id)?;

    Ok(token_ids)
}

fn move_token(
    storage: &mut dyn Storage,
    token_id: &str,
    recipient: &Addr,
) -> Result<(), ContractError> {
    let collection = QbmCollection::default();
    let mut token = collection.tokens.load(storage, token_id)?;
    token.owner = recipient.clone();
    token.approvals = vec![];
    collection.tokens.save(storage, token_id, &token)?;
    Ok(())
}

fn mint_response(
    action: &str,
    sender: &Addr,
    token_ids: Vec<String>,
    price: Uint128,
    refund: Uint128,
) -> Response {
    let event = Event::new(action)
        .add_attribute("sender", sender)
        .add_attribute("quantity", token_ids.len().to_string())
        .add_attribute("token_ids", token_ids.join(","))
        .add_attribute("price", price.to_string())
        .add_attribute("refund", refund.to_string());
    let res = Response::new()
        .add_attribute("action", action)
        .add_event(event);

    if refund.is_zero() {
        return res;
    }
    res.add_message(BankMsg::Send {
        to_address: sender.to_string(),
        amount: coins(refund.u128(), NATIVE_DENOM),
    })
}
