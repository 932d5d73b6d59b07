use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coins, to_binary, Addr, Coin, QuerierWrapper, QueryRequest, StdResult, Uint128, WasmMsg,
    WasmQuery,
};
use qbm_sale::{SalePhase, SupplyResponse, PUBLIC_PRICE, WHITELIST_PRICE};
use serde::de::DeserializeOwned;
use sg_std::{CosmosMsg, NATIVE_DENOM};

use crate::msg::{ExecuteMsg, QueryMsg};

/// QbmMinterContract is a wrapper around Addr that provides a lot of helpers
#[cw_serde]
pub struct QbmMinterContract(pub Addr);

impl QbmMinterContract {
    pub fn addr(&self) -> Addr {
        self.0.clone()
    }

    pub fn call<T: Into<ExecuteMsg>>(&self, msg: T, funds: Vec<Coin>) -> StdResult<CosmosMsg> {
        let msg = to_binary(&msg.into())?;
        Ok(WasmMsg::Execute {
            contract_addr: self.addr().into(),
            msg,
            funds,
        }
        .into())
    }

    /// Pays exactly the whitelist price for one token
    pub fn whitelist_mint(&self) -> StdResult<CosmosMsg> {
        self.call(
            ExecuteMsg::WhitelistMint {},
            coins(WHITELIST_PRICE, NATIVE_DENOM),
        )
    }

    /// Pays exactly the public price for `quantity` tokens
    pub fn public_mint(&self, quantity: u32) -> StdResult<CosmosMsg> {
        self.call(
            ExecuteMsg::PublicMint { quantity },
            coins(public_price(quantity).u128(), NATIVE_DENOM),
        )
    }

    fn query<T: DeserializeOwned>(
        &self,
        querier: &QuerierWrapper,
        msg: &QueryMsg,
    ) -> StdResult<T> {
        querier.query(&QueryRequest::Wasm(WasmQuery::Smart {
            contract_addr: self.addr().into(),
            msg: to_binary(msg)?,
        }))
    }

    pub fn sale_phase(&self, querier: &QuerierWrapper) -> StdResult<SalePhase> {
        self.query(querier, &QueryMsg::SalePhase {})
    }

    pub fn supply(&self, querier: &QuerierWrapper) -> StdResult<SupplyResponse> {
        self.query(querier, &QueryMsg::Supply {})
    }

    pub fn whitelist(
        &self,
        querier: &QuerierWrapper,
        address: impl Into<String>,
    ) -> StdResult<u32> {
        self.query(
            querier,
            &QueryMsg::Whitelist {
                address: address.into(),
            },
        )
    }

    pub fn balance_of(
        &self,
        querier: &QuerierWrapper,
        owner: impl Into<String>,
    ) -> StdResult<u32> {
        self.query(
            querier,
            &QueryMsg::BalanceOf {
                owner: owner.into(),
            },
        )
    }

    pub fn treasury(&self, querier: &QuerierWrapper) -> StdResult<Coin> {
        self.query(querier, &QueryMsg::Treasury {})
    }
}

pub fn public_price(quantity: u32) -> Uint128 {
    Uint128::from(PUBLIC_PRICE) * Uint128::from(quantity)
}
