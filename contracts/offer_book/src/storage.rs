use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OfferKind {
    /// Asset escrowed, waiting for a buyer to pay `amount`
    Sell,
    /// `amount` escrowed, waiting for the asset owner to deliver
    Buy,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Offer {
    pub kind: OfferKind,
    /// Registry contract the asset lives in
    pub registry: Address,
    pub token_id: u64,
    /// Party that made the offer and holds the claim on the escrow
    pub offeror: Address,
    /// Asking price (sell) or escrowed payment (buy)
    pub amount: i128,
    /// Cleared exactly once, by accept or cancel
    pub active: bool,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Initialized,
    NativeToken,
    OfferCounter,
    Offer(u64),               // Offer ID → Offer
    AssetOffers(Address, u64), // (registry, token_id) → active offer ids
}
