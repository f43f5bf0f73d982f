use soroban_sdk::contracttype;

// Constants
pub const WITHDRAWAL_WAIT_SECONDS: u64 = 30 * 24 * 60 * 60; // 30 days
pub const MAX_NAME_LEN: u32 = 32;
pub const PRICE_GROWTH_NUMERATOR: i128 = 10_011; // +0.11% per mint
pub const PRICE_GROWTH_DENOMINATOR: i128 = 10_000;

/// Payout recorded at a position in the mint sequence
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawalRecord {
    pub occurred: bool,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Initialized,
    Registry,
    NativeToken,
    SaleOpensAt,
    Price, // Price paid by the latest mint (initial price before any)
    TotalIssued,
    LastParticipant, // Absent = nobody eligible for the pot
    LastMintTime,
    NumWithdrawals,
    Entropy,
    Withdrawal(u64), // Mint index → WithdrawalRecord
    TokenName(u64),
    Seed(u64),
}
