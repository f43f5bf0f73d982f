#![no_std]

mod error;
mod events;
mod registry;
mod storage;

pub use error::Error;
use events::*;
pub use storage::{Offer, OfferKind};
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol, Vec};

#[contract]
pub struct OfferBook;

#[contractimpl]
impl OfferBook {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// Initialize the offer book
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address, native_token: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::NativeToken, &native_token);
        env.storage().instance().set(&DataKey::OfferCounter, &0u64);

        Ok(())
    }

    // ============================================
    // MAKE OFFERS
    // ============================================

    /// List an asset for sale, taking it into escrow
    ///
    /// The offer book must be approved for the asset (or for all of the
    /// seller's assets) in `registry`; otherwise the registry rejects the
    /// escrow transfer and the call aborts.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Price must be positive
    pub fn make_sell_offer(
        env: Env,
        seller: Address,
        registry: Address,
        token_id: u64,
        price: i128,
    ) -> Result<u64, Error> {
        Self::native_token(&env)?;

        if price <= 0 {
            return Err(Error::InvalidAmount);
        }

        seller.require_auth();

        let offer_id = Self::record_offer(
            &env,
            Offer {
                kind: OfferKind::Sell,
                registry: registry.clone(),
                token_id,
                offeror: seller.clone(),
                amount: price,
                active: true,
            },
        );

        registry::transfer_from(
            &env,
            &registry,
            &seller,
            &env.current_contract_address(),
            token_id,
        );

        env.events().publish(
            (Symbol::new(&env, "offer_made"), offer_id),
            OfferMadeEvent {
                offer_id,
                kind: OfferKind::Sell,
                registry,
                token_id,
                offeror: seller,
                amount: price,
            },
        );

        Ok(offer_id)
    }

    /// Offer `payment` for an asset, escrowing the funds
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Payment must be positive
    ///
    /// Unissued assets abort with the registry's `NoSuchAsset`.
    pub fn make_buy_offer(
        env: Env,
        buyer: Address,
        registry: Address,
        token_id: u64,
        payment: i128,
    ) -> Result<u64, Error> {
        let native_token = Self::native_token(&env)?;

        if payment <= 0 {
            return Err(Error::InvalidAmount);
        }

        buyer.require_auth();

        // Traps with NoSuchAsset for unissued ids
        registry::owner_of(&env, &registry, token_id);

        let offer_id = Self::record_offer(
            &env,
            Offer {
                kind: OfferKind::Buy,
                registry: registry.clone(),
                token_id,
                offeror: buyer.clone(),
                amount: payment,
                active: true,
            },
        );

        token::Client::new(&env, &native_token).transfer(
            &buyer,
            &env.current_contract_address(),
            &payment,
        );

        env.events().publish(
            (Symbol::new(&env, "offer_made"), offer_id),
            OfferMadeEvent {
                offer_id,
                kind: OfferKind::Buy,
                registry,
                token_id,
                offeror: buyer,
                amount: payment,
            },
        );

        Ok(offer_id)
    }

    // ============================================
    // ACCEPT OFFERS
    // ============================================

    /// Buy a listed asset for exactly its asking price
    ///
    /// # Errors
    /// - `OfferNotFound`: Unknown offer id
    /// - `WrongOfferKind`: Offer is a buy offer
    /// - `OfferNotActive`: Offer already accepted or cancelled
    /// - `IncorrectValue`: `payment` differs from the asking price
    pub fn accept_sell_offer(
        env: Env,
        buyer: Address,
        offer_id: u64,
        payment: i128,
    ) -> Result<(), Error> {
        let native_token = Self::native_token(&env)?;
        let mut offer = Self::open_offer(&env, offer_id, OfferKind::Sell)?;

        if payment != offer.amount {
            return Err(Error::IncorrectValue);
        }

        buyer.require_auth();

        Self::close_offer(&env, offer_id, &mut offer);

        registry::transfer_from(
            &env,
            &offer.registry,
            &env.current_contract_address(),
            &buyer,
            offer.token_id,
        );

        log!(&env, "sell offer settled", offer_id, offer.amount);
        token::Client::new(&env, &native_token).transfer(&buyer, &offer.offeror, &offer.amount);

        env.events().publish(
            (Symbol::new(&env, "item_bought"), offer_id),
            ItemBoughtEvent {
                offer_id,
                seller: offer.offeror,
                buyer,
                amount: offer.amount,
            },
        );

        Ok(())
    }

    /// Deliver an asset to a standing buy offer and collect the escrow
    ///
    /// The caller must currently own the asset and have approved the offer
    /// book in the registry; otherwise the registry aborts the call.
    ///
    /// # Errors
    /// - `OfferNotFound`: Unknown offer id
    /// - `WrongOfferKind`: Offer is a sell offer
    /// - `OfferNotActive`: Offer already accepted or cancelled
    pub fn accept_buy_offer(env: Env, seller: Address, offer_id: u64) -> Result<(), Error> {
        let native_token = Self::native_token(&env)?;
        let mut offer = Self::open_offer(&env, offer_id, OfferKind::Buy)?;

        seller.require_auth();

        Self::close_offer(&env, offer_id, &mut offer);

        registry::transfer_from(&env, &offer.registry, &seller, &offer.offeror, offer.token_id);

        log!(&env, "buy offer settled", offer_id, offer.amount);
        token::Client::new(&env, &native_token).transfer(
            &env.current_contract_address(),
            &seller,
            &offer.amount,
        );

        env.events().publish(
            (Symbol::new(&env, "item_sold"), offer_id),
            ItemSoldEvent {
                offer_id,
                seller,
                buyer: offer.offeror,
                amount: offer.amount,
            },
        );

        Ok(())
    }

    // ============================================
    // CANCEL OFFERS
    // ============================================

    /// Withdraw a sell offer, returning the asset to the seller
    ///
    /// # Errors
    /// - `OfferNotFound`: Unknown offer id
    /// - `WrongOfferKind`: Offer is a buy offer
    /// - `OfferNotActive`: Offer already accepted or cancelled
    /// - `NotOfferor`: Caller did not make the offer
    pub fn cancel_sell_offer(env: Env, offeror: Address, offer_id: u64) -> Result<(), Error> {
        let mut offer = Self::open_offer(&env, offer_id, OfferKind::Sell)?;
        Self::check_offeror(&offer, &offeror)?;

        Self::close_offer(&env, offer_id, &mut offer);

        registry::transfer_from(
            &env,
            &offer.registry,
            &env.current_contract_address(),
            &offer.offeror,
            offer.token_id,
        );

        Self::publish_cancel(&env, offer_id, offeror);

        Ok(())
    }

    /// Withdraw a buy offer, refunding the escrowed payment
    ///
    /// # Errors
    /// - `OfferNotFound`: Unknown offer id
    /// - `WrongOfferKind`: Offer is a sell offer
    /// - `OfferNotActive`: Offer already accepted or cancelled
    /// - `NotOfferor`: Caller did not make the offer
    pub fn cancel_buy_offer(env: Env, offeror: Address, offer_id: u64) -> Result<(), Error> {
        let native_token = Self::native_token(&env)?;
        let mut offer = Self::open_offer(&env, offer_id, OfferKind::Buy)?;
        Self::check_offeror(&offer, &offeror)?;

        Self::close_offer(&env, offer_id, &mut offer);

        log!(&env, "buy offer refunded", offer_id, offer.amount);
        token::Client::new(&env, &native_token).transfer(
            &env.current_contract_address(),
            &offer.offeror,
            &offer.amount,
        );

        Self::publish_cancel(&env, offer_id, offeror);

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_offer(env: Env, offer_id: u64) -> Result<Offer, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Offer(offer_id))
            .ok_or(Error::OfferNotFound)
    }

    /// Offers created so far; ids run from 0 to `num_offers() - 1`
    pub fn num_offers(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::OfferCounter)
            .unwrap_or(0)
    }

    /// Offers against an asset that can still be accepted or cancelled
    pub fn active_offers_for_asset(env: Env, registry: Address, token_id: u64) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::AssetOffers(registry, token_id))
            .unwrap_or(Vec::new(&env))
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn native_token(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::NativeToken)
            .ok_or(Error::NotInitialized)
    }

    fn record_offer(env: &Env, offer: Offer) -> u64 {
        let offer_id = Self::num_offers(env.clone());

        let index_key = DataKey::AssetOffers(offer.registry.clone(), offer.token_id);
        let mut ids =
            Self::active_offers_for_asset(env.clone(), offer.registry.clone(), offer.token_id);
        ids.push_back(offer_id);

        env.storage()
            .persistent()
            .set(&DataKey::Offer(offer_id), &offer);
        env.storage().persistent().set(&index_key, &ids);
        env.storage()
            .instance()
            .set(&DataKey::OfferCounter, &(offer_id + 1));

        offer_id
    }

    fn open_offer(env: &Env, offer_id: u64, kind: OfferKind) -> Result<Offer, Error> {
        let offer = Self::get_offer(env.clone(), offer_id)?;

        if offer.kind != kind {
            return Err(Error::WrongOfferKind);
        }
        if !offer.active {
            return Err(Error::OfferNotActive);
        }

        Ok(offer)
    }

    fn check_offeror(offer: &Offer, caller: &Address) -> Result<(), Error> {
        if offer.offeror != *caller {
            return Err(Error::NotOfferor);
        }

        caller.require_auth();
        Ok(())
    }

    /// Clear the active flag and drop the id from the asset's index
    fn close_offer(env: &Env, offer_id: u64, offer: &mut Offer) {
        offer.active = false;
        env.storage()
            .persistent()
            .set(&DataKey::Offer(offer_id), &*offer);

        let index_key = DataKey::AssetOffers(offer.registry.clone(), offer.token_id);
        let mut ids =
            Self::active_offers_for_asset(env.clone(), offer.registry.clone(), offer.token_id);
        if let Some(position) = ids.first_index_of(offer_id) {
            ids.remove(position);
        }

        if ids.is_empty() {
            env.storage().persistent().remove(&index_key);
        } else {
            env.storage().persistent().set(&index_key, &ids);
        }
    }

    fn publish_cancel(env: &Env, offer_id: u64, offeror: Address) {
        env.events().publish(
            (Symbol::new(env, "offer_canceled"), offer_id),
            OfferCanceledEvent { offer_id, offeror },
        );
    }
}

#[cfg(test)]
mod test;
