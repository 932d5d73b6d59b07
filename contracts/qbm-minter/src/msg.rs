use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, Coin, Empty, Timestamp};
use cw721::{
    AllNftInfoResponse, ApprovalResponse, ApprovalsResponse, ContractInfoResponse, Expiration,
    NftInfoResponse, NumTokensResponse, OperatorsResponse, OwnerOfResponse, TokensResponse,
};
use cw_controllers::AdminResponse;
use qbm_sale::{ConstantsResponse, SalePhase, SaleTimes, SupplyResponse};

use crate::state::Config;

#[cw_serde]
pub struct InstantiateMsg {
    /// Defaults to the sender
    pub admin: Option<String>,
    pub proxy_address: String,
    pub whitelist_sale_start: Timestamp,
    pub public_sale_start: Timestamp,
    pub name: String,
    pub symbol: String,
    pub base_token_uri: Option<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Set (not add) the whitelist allocation of each account. Owner only.
    SeedWhitelist {
        accounts: Vec<String>,
        amounts: Vec<u32>,
    },
    /// Mint one token out of the sender's whitelist allocation
    WhitelistMint {},
    /// Mint `quantity` tokens at the public price
    PublicMint { quantity: u32 },
    /// Mint from the dev reserve to `recipient`. Owner only.
    DevMint { recipient: String, quantity: u32 },
    /// Send the treasury to `recipient`, or to the owner
    Withdraw { recipient: Option<String> },
    UpdateSaleTimes {
        whitelist_sale_start: Timestamp,
        public_sale_start: Timestamp,
    },
    UpdateProxy { proxy_address: String },
    UpdateBaseTokenUri { base_token_uri: Option<String> },
    /// Hand over ownership, or renounce it with `None`
    UpdateAdmin { admin: Option<String> },
    /// Transfer is a base message to move a token to another account without triggering actions
    TransferNft { recipient: String, token_id: String },
    /// Send is a base message to transfer a token to a contract and trigger an action
    /// on the receiving contract.
    SendNft {
        contract: String,
        token_id: String,
        msg: Binary,
    },
    /// Allows operator to transfer / send the token from the owner's account.
    /// If expiration is set, then this allowance has a time/height limit
    Approve {
        spender: String,
        token_id: String,
        expires: Option<Expiration>,
    },
    /// Remove previously granted Approval
    Revoke { spender: String, token_id: String },
    /// Allows operator to transfer / send any token from the owner's account.
    /// If expiration is set, then this allowance has a time/height limit
    ApproveAll {
        operator: String,
        expires: Option<Expiration>,
    },
    /// Remove previously granted ApproveAll permission
    RevokeAll { operator: String },
}

impl From<ExecuteMsg> for cw721_base::ExecuteMsg<Empty, Empty> {
    fn from(msg: ExecuteMsg) -> cw721_base::ExecuteMsg<Empty, Empty> {
        match msg {
            ExecuteMsg::TransferNft {
                recipient,
                token_id,
            } => cw721_base::ExecuteMsg::TransferNft {
                recipient,
                token_id,
            },
            ExecuteMsg::SendNft {
                contract,
                token_id,
                msg,
            } => cw721_base::ExecuteMsg::SendNft {
                contract,
                token_id,
                msg,
            },
            ExecuteMsg::Approve {
                spender,
                token_id,
                expires,
            } => cw721_base::ExecuteMsg::Approve {
                spender,
                token_id,
                expires,
            },
            ExecuteMsg::Revoke { spender, token_id } => {
                cw721_base::ExecuteMsg::Revoke { spender, token_id }
            }
            ExecuteMsg::ApproveAll { operator, expires } => {
                cw721_base::ExecuteMsg::ApproveAll { operator, expires }
            }
            ExecuteMsg::RevokeAll { operator } => cw721_base::ExecuteMsg::RevokeAll { operator },
            _ => unreachable!("cannot convert {:?} to Cw721ExecuteMsg", msg),
        }
    }
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConstantsResponse)]
    Constants {},
    #[returns(Config)]
    Config {},
    #[returns(SaleTimes)]
    SaleTimes {},
    /// Phase at the current block time
    #[returns(SalePhase)]
    SalePhase {},
    /// Remaining whitelist allocation
    #[returns(u32)]
    Whitelist { address: String },
    /// Whitelist + public mints by `address`
    #[returns(u32)]
    MintCount { address: String },
    #[returns(SupplyResponse)]
    Supply {},
    /// Number of tokens currently held by `owner`
    #[returns(u32)]
    BalanceOf { owner: String },
    /// Funds held by the contract
    #[returns(Coin)]
    Treasury {},
    /// True for the proxy, otherwise follows cw721 operator approvals
    #[returns(bool)]
    IsApprovedForAll { owner: String, operator: String },
    #[returns(AdminResponse)]
    Admin {},
    #[returns(OwnerOfResponse)]
    OwnerOf {
        token_id: String,
        include_expired: Option<bool>,
    },
    #[returns(ApprovalResponse)]
    Approval {
        token_id: String,
        spender: String,
        include_expired: Option<bool>,
    },
    #[returns(ApprovalsResponse)]
    Approvals {
        token_id: String,
        include_expired: Option<bool>,
    },
    #[returns(OperatorsResponse)]
    AllOperators {
        owner: String,
        include_expired: Option<bool>,
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(NumTokensResponse)]
    NumTokens {},
    #[returns(ContractInfoResponse)]
    ContractInfo {},
    #[returns(NftInfoResponse<Empty>)]
    NftInfo { token_id: String },
    #[returns(AllNftInfoResponse<Empty>)]
    AllNftInfo {
        token_id: String,
        include_expired: Option<bool>,
    },
    #[returns(TokensResponse)]
    Tokens {
        owner: String,
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(TokensResponse)]
    AllTokens {
        start_after: Option<String>,
        limit: Option<u32>,
    },
}

impl From<QueryMsg> for cw721_base::QueryMsg<Empty> {
    fn from(msg: QueryMsg) -> cw721_base::QueryMsg<Empty> {
        match msg {
            QueryMsg::OwnerOf {
                token_id,
                include_expired,
            } => cw721_base::QueryMsg::OwnerOf {
                token_id,
                include_expired,
            },
            QueryMsg::Approval {
                token_id,
                spender,
                include_expired,
            } => cw721_base::QueryMsg::Approval {
                token_id,
                spender,
                include_expired,
            },
            QueryMsg::Approvals {
                token_id,
                include_expired,
            } => cw721_base::QueryMsg::Approvals {
                token_id,
                include_expired,
            },
            QueryMsg::AllOperators {
                owner,
                include_expired,
                start_after,
                limit,
            } => cw721_base::QueryMsg::AllOperators {
                owner,
                include_expired,
                start_after,
                limit,
            },
            QueryMsg::NumTokens {} => cw721_base::QueryMsg::NumTokens {},
            QueryMsg::ContractInfo {} => cw721_base::QueryMsg::ContractInfo {},
            QueryMsg::NftInfo { token_id } => cw721_base::QueryMsg::NftInfo { token_id },
            QueryMsg::AllNftInfo {
                token_id,
                include_expired,
            } => cw721_base::QueryMsg::AllNftInfo {
                token_id,
                include_expired,
            },
            QueryMsg::Tokens {
                owner,
                start_after,
                limit,
            } => cw721_base::QueryMsg::Tokens {
                owner,
                start_after,
                limit,
            },
            QueryMsg::AllTokens { start_after, limit } => {
                cw721_base::QueryMsg::AllTokens { start_after, limit }
            }
            _ => unreachable!("cannot convert {:?} to Cw721QueryMsg", msg),
        }
    }
}

#[cw_serde]
pub struct MigrateMsg {}
