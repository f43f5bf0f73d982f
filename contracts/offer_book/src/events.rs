use soroban_sdk::{contracttype, Address};

use crate::storage::OfferKind;

#[contracttype]
#[derive(Clone, Debug)]
pub struct OfferMadeEvent {
    pub offer_id: u64,
    pub kind: OfferKind,
    pub registry: Address,
    pub token_id: u64,
    pub offeror: Address,
    pub amount: i128,
}

/// Sell offer accepted
#[contracttype]
#[derive(Clone, Debug)]
pub struct ItemBoughtEvent {
    pub offer_id: u64,
    pub seller: Address,
    pub buyer: Address,
    pub amount: i128,
}

/// Buy offer accepted
#[contracttype]
#[derive(Clone, Debug)]
pub struct ItemSoldEvent {
    pub offer_id: u64,
    pub seller: Address,
    pub buyer: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct OfferCanceledEvent {
    pub offer_id: u64,
    pub offeror: Address,
}
