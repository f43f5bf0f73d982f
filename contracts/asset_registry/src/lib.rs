#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::{ApprovalEvent, ApprovalForAllEvent, IssuedEvent, TransferEvent};
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol, Vec};

#[contract]
pub struct AssetRegistry;

#[contractimpl]
impl AssetRegistry {
    /// Initialize the registry
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::NextTokenId, &0u64);

        Ok(())
    }

    /// Add an operator allowed to issue new assets (the mint ledger)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn add_operator(env: Env, operator: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        env.storage()
            .instance()
            .set(&DataKey::Operators(operator), &true);

        Ok(())
    }

    /// Remove an operator
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn remove_operator(env: Env, operator: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        env.storage()
            .instance()
            .remove(&DataKey::Operators(operator));

        Ok(())
    }

    /// Issue the next sequential asset to `to`
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOperator`: Caller is not a registered issuer
    pub fn issue(env: Env, operator: Address, to: Address) -> Result<u64, Error> {
        let token_id: u64 = env
            .storage()
            .instance()
            .get(&DataKey::NextTokenId)
            .ok_or(Error::NotInitialized)?;

        operator.require_auth();

        if !Self::is_operator(env.clone(), operator) {
            return Err(Error::NotOperator);
        }

        env.storage()
            .persistent()
            .set(&DataKey::Owner(token_id), &to);
        storage::add_owned(&env, &to, token_id);
        env.storage()
            .instance()
            .set(&DataKey::NextTokenId, &(token_id + 1));

        env.events().publish(
            (Symbol::new(&env, "issued"), token_id),
            IssuedEvent {
                token_id,
                to: to.clone(),
            },
        );

        Ok(token_id)
    }

    /// Move an asset, authorized by its owner
    ///
    /// # Errors
    /// - `NoSuchAsset`: Asset never issued
    /// - `NotOwner`: `from` does not own the asset
    pub fn transfer(env: Env, from: Address, to: Address, token_id: u64) -> Result<(), Error> {
        from.require_auth();

        Self::move_token(&env, &from, &from, &to, token_id)
    }

    /// Move an asset on behalf of its owner
    ///
    /// # Errors
    /// - `NoSuchAsset`: Asset never issued
    /// - `NotOwner`: `from` does not own the asset
    /// - `NotAuthorized`: Spender is not owner, approved, or operator-for-all
    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        token_id: u64,
    ) -> Result<(), Error> {
        spender.require_auth();

        Self::move_token(&env, &spender, &from, &to, token_id)
    }

    /// Approve a single address for one asset (`None` clears it)
    ///
    /// # Errors
    /// - `NoSuchAsset`: Asset never issued
    /// - `NotAuthorized`: Caller is neither owner nor operator-for-all
    /// - `InvalidApproval`: Owner approving itself
    pub fn approve(
        env: Env,
        caller: Address,
        approved: Option<Address>,
        token_id: u64,
    ) -> Result<(), Error> {
        caller.require_auth();

        let owner = Self::owner_of(env.clone(), token_id)?;
        if caller != owner && !Self::is_approved_for_all(env.clone(), owner.clone(), caller) {
            return Err(Error::NotAuthorized);
        }

        match &approved {
            Some(address) if *address == owner => return Err(Error::InvalidApproval),
            Some(address) => env
                .storage()
                .persistent()
                .set(&DataKey::Approved(token_id), address),
            None => env.storage().persistent().remove(&DataKey::Approved(token_id)),
        }

        env.events().publish(
            (Symbol::new(&env, "approval"), token_id),
            ApprovalEvent {
                token_id,
                owner,
                approved,
            },
        );

        Ok(())
    }

    /// Grant or revoke `operator` control over every asset of `owner`
    ///
    /// # Errors
    /// - `InvalidApproval`: Owner approving itself
    pub fn set_approval_for_all(
        env: Env,
        owner: Address,
        operator: Address,
        approved: bool,
    ) -> Result<(), Error> {
        owner.require_auth();

        if owner == operator {
            return Err(Error::InvalidApproval);
        }

        let key = DataKey::ApprovalForAll(owner.clone(), operator.clone());
        if approved {
            env.storage().persistent().set(&key, &true);
        } else {
            env.storage().persistent().remove(&key);
        }

        env.events().publish(
            (Symbol::new(&env, "approval_all"), owner.clone()),
            ApprovalForAllEvent {
                owner,
                operator,
                approved,
            },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn owner_of(env: Env, token_id: u64) -> Result<Address, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Owner(token_id))
            .ok_or(Error::NoSuchAsset)
    }

    pub fn get_approved(env: Env, token_id: u64) -> Result<Option<Address>, Error> {
        Self::owner_of(env.clone(), token_id)?;
        Ok(env.storage().persistent().get(&DataKey::Approved(token_id)))
    }

    pub fn is_approved_for_all(env: Env, owner: Address, operator: Address) -> bool {
        env.storage()
            .persistent()
            .get::<DataKey, bool>(&DataKey::ApprovalForAll(owner, operator))
            .unwrap_or(false)
    }

    pub fn balance_of(env: Env, owner: Address) -> u32 {
        storage::owned_tokens(&env, &owner).len()
    }

    /// Ids held by `owner`, in acquisition order
    pub fn tokens_of_owner(env: Env, owner: Address) -> Vec<u64> {
        storage::owned_tokens(&env, &owner)
    }

    pub fn total_supply(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::NextTokenId)
            .unwrap_or(0)
    }

    pub fn is_operator(env: Env, address: Address) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Operators(address))
            .unwrap_or(false)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn move_token(
        env: &Env,
        spender: &Address,
        from: &Address,
        to: &Address,
        token_id: u64,
    ) -> Result<(), Error> {
        let owner = Self::owner_of(env.clone(), token_id)?;
        if owner != *from {
            return Err(Error::NotOwner);
        }

        let approved: Option<Address> = env
            .storage()
            .persistent()
            .get(&DataKey::Approved(token_id));
        let authorized = *spender == owner
            || approved.as_ref() == Some(spender)
            || Self::is_approved_for_all(env.clone(), owner.clone(), spender.clone());
        if !authorized {
            return Err(Error::NotAuthorized);
        }

        env.storage().persistent().remove(&DataKey::Approved(token_id));
        env.storage()
            .persistent()
            .set(&DataKey::Owner(token_id), to);
        storage::remove_owned(env, from, token_id);
        storage::add_owned(env, to, token_id);

        env.events().publish(
            (Symbol::new(env, "transfer"), token_id),
            TransferEvent {
                token_id,
                from: from.clone(),
                to: to.clone(),
            },
        );

        Ok(())
    }
}
