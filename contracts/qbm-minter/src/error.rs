use cosmwasm_std::{StdError, Timestamp};
use cw_controllers::AdminError;
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("{0}")]
    Admin(#[from] AdminError),

    #[error("{0}")]
    Base(#[from] cw721_base::ContractError),

    #[error("QBM: Unauthorized.")]
    Unauthorized {},

    #[error("QBM: No accounts provided.")]
    NoAccounts {},

    #[error("QBM: Amounts and accounts don't match.")]
    LengthMismatch {},

    #[error("QBM: Quantity must be greater than zero.")]
    InvalidQuantity {},

    #[error("QBM: Public sale starts before whitelist sale ({0} < {1}).")]
    InvalidSaleTimes(Timestamp, Timestamp),

    #[error("QBM: Whitelist sale has not started yet.")]
    WhitelistSaleNotStarted {},

    #[error("QBM: Public sale has not started yet.")]
    PublicSaleNotStarted {},

    #[error("QBM: User has no mints reserved.")]
    NoMintsReserved {},

    #[error("QBM: Exceeds the max amount per user.")]
    ExceedsMaxPerUser {},

    #[error("QBM: Exceeds the max supply.")]
    ExceedsMaxSupply {},

    #[error("QBM: Exceeds the mints reserved for devs.")]
    ExceedsDevReserve {},

    #[error("QBM: Not enough ETH.")]
    NotEnoughFunds {},

    #[error("QBM: Nothing to withdraw.")]
    NothingToWithdraw {},

    #[error("InvalidContractVersion")]
    InvalidContractVersion {},
}
