use soroban_sdk::{contracttype, Address, BytesN, String};

#[contracttype]
#[derive(Clone, Debug)]
pub struct MintedEvent {
    pub token_id: u64,
    pub owner: Address,
    pub price: i128,
    pub seed: BytesN<32>,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct WithdrawalEvent {
    /// Mint sequence index the payout is logged under
    pub index: u64,
    pub destination: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TokenNameEvent {
    pub token_id: u64,
    pub name: String,
}
