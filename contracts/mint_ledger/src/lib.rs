#![no_std]

mod error;
mod events;
mod pricing;
mod registry;
mod storage;

pub use error::Error;
use events::*;
use pricing::{next_price, payout_share, refund_due, seconds_until};
pub use storage::WithdrawalRecord;
use storage::{DataKey, MAX_NAME_LEN, WITHDRAWAL_WAIT_SECONDS};

use soroban_sdk::{
    contract, contractimpl, log, token, Address, Bytes, BytesN, Env, String, Symbol, Vec,
};

#[contract]
pub struct MintLedger;

#[contractimpl]
impl MintLedger {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// Initialize the mint ledger
    ///
    /// The ledger must also be registered as an operator on `registry`
    /// before the first mint.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidAmount`: `initial_price` must be positive
    pub fn initialize(
        env: Env,
        admin: Address,
        registry: Address,
        native_token: Address,
        sale_opens_at: u64,
        initial_price: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        if initial_price <= 0 {
            return Err(Error::InvalidAmount);
        }

        admin.require_auth();

        let mut material = Bytes::new(&env);
        material.extend_from_array(&sale_opens_at.to_be_bytes());
        material.extend_from_array(&initial_price.to_be_bytes());
        let entropy: BytesN<32> = env.crypto().sha256(&material).to_bytes();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Registry, &registry);
        env.storage().instance().set(&DataKey::NativeToken, &native_token);
        env.storage().instance().set(&DataKey::SaleOpensAt, &sale_opens_at);
        env.storage().instance().set(&DataKey::Price, &initial_price);
        env.storage().instance().set(&DataKey::TotalIssued, &0u64);
        env.storage().instance().set(&DataKey::NumWithdrawals, &0u64);
        env.storage().instance().set(&DataKey::Entropy, &entropy);

        Ok(())
    }

    // ============================================
    // MINT
    // ============================================

    /// Mint the next asset to `minter`, paying at least the current price
    ///
    /// `payment` is pulled from the minter in full and everything above the
    /// price is sent back in the same invocation.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `SaleNotOpen`: Ledger time before the sale opening
    /// - `PaymentTooLow`: `payment` below `get_mint_price()`
    /// - `RegistryOutOfSync`: Registry issued an unexpected id
    pub fn mint(env: Env, minter: Address, payment: i128) -> Result<u64, Error> {
        let registry = Self::registry(&env)?;
        let native_token = Self::native_token(&env)?;

        let now = env.ledger().timestamp();
        if now < Self::sale_opens_at(env.clone()) {
            return Err(Error::SaleNotOpen);
        }

        let price = Self::get_mint_price(env.clone())?;
        let refund = refund_due(payment, price).ok_or(Error::PaymentTooLow)?;

        minter.require_auth();

        let token_id = Self::total_issued(env.clone());
        let seed = Self::next_seed(&env, token_id);

        // Bookkeeping first; external calls below see a consistent ledger
        env.storage().instance().set(&DataKey::Price, &price);
        env.storage()
            .instance()
            .set(&DataKey::TotalIssued, &(token_id + 1));
        env.storage()
            .instance()
            .set(&DataKey::LastParticipant, &minter);
        env.storage().instance().set(&DataKey::LastMintTime, &now);
        env.storage()
            .persistent()
            .set(&DataKey::Seed(token_id), &seed);

        let native = token::Client::new(&env, &native_token);
        native.transfer(&minter, &env.current_contract_address(), &payment);

        let issued = registry::issue(&env, &registry, &minter);
        if issued != token_id {
            return Err(Error::RegistryOutOfSync);
        }

        if refund > 0 {
            log!(&env, "mint refund", token_id, refund);
            native.transfer(&env.current_contract_address(), &minter, &refund);
        }

        env.events().publish(
            (Symbol::new(&env, "minted"), token_id),
            MintedEvent {
                token_id,
                owner: minter,
                price,
                seed,
            },
        );

        Ok(token_id)
    }

    // ============================================
    // POT SPLIT
    // ============================================

    /// Pay half of the retained balance to the last minter once the ledger
    /// has been idle for 30 days
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `CooldownNotElapsed`: Less than 30 days since the last mint
    /// - `NotLastParticipant`: Caller is not the most recent minter, or the
    ///   pot was already taken since that mint
    pub fn withdraw(env: Env, caller: Address) -> Result<i128, Error> {
        let native_token = Self::native_token(&env)?;

        if Self::time_until_withdrawal(env.clone()) > 0 {
            return Err(Error::CooldownNotElapsed);
        }

        if Self::last_participant(env.clone()) != Some(caller.clone()) {
            return Err(Error::NotLastParticipant);
        }

        caller.require_auth();

        let index = Self::total_issued(env.clone())
            .checked_sub(1)
            .ok_or(Error::NotLastParticipant)?;

        let native = token::Client::new(&env, &native_token);
        let amount = payout_share(native.balance(&env.current_contract_address()));

        let num_withdrawals = Self::num_withdrawals(env.clone());
        env.storage().persistent().set(
            &DataKey::Withdrawal(index),
            &WithdrawalRecord {
                occurred: true,
                amount,
            },
        );
        env.storage()
            .instance()
            .set(&DataKey::NumWithdrawals, &(num_withdrawals + 1));
        env.storage().instance().remove(&DataKey::LastParticipant);

        if amount > 0 {
            log!(&env, "pot payout", index, amount);
            native.transfer(&env.current_contract_address(), &caller, &amount);
        }

        env.events().publish(
            (Symbol::new(&env, "withdrawal"), index),
            WithdrawalEvent {
                index,
                destination: caller,
                amount,
            },
        );

        Ok(amount)
    }

    // ============================================
    // TOKEN NAMES
    // ============================================

    /// Set the display name of an asset (current owner only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOwner`: Caller does not own the asset
    /// - `NameTooLong`: More than 32 bytes
    ///
    /// Unissued ids abort with the registry's `NoSuchAsset`.
    pub fn set_token_name(
        env: Env,
        caller: Address,
        token_id: u64,
        name: String,
    ) -> Result<(), Error> {
        let registry = Self::registry(&env)?;

        caller.require_auth();

        if registry::owner_of(&env, &registry, token_id) != caller {
            return Err(Error::NotOwner);
        }

        if name.len() > MAX_NAME_LEN {
            return Err(Error::NameTooLong);
        }

        env.storage()
            .persistent()
            .set(&DataKey::TokenName(token_id), &name);

        env.events().publish(
            (Symbol::new(&env, "token_name"), token_id),
            TokenNameEvent { token_id, name },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Price the next mint must pay
    pub fn get_mint_price(env: Env) -> Result<i128, Error> {
        let price: i128 = env
            .storage()
            .instance()
            .get(&DataKey::Price)
            .ok_or(Error::NotInitialized)?;

        next_price(price).ok_or(Error::InvalidAmount)
    }

    pub fn total_issued(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::TotalIssued)
            .unwrap_or(0)
    }

    /// `None` before the first mint and right after each payout
    pub fn last_participant(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::LastParticipant)
    }

    pub fn last_mint_time(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::LastMintTime)
            .unwrap_or(0)
    }

    pub fn sale_opens_at(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::SaleOpensAt)
            .unwrap_or(0)
    }

    pub fn time_until_sale(env: Env) -> u64 {
        seconds_until(env.ledger().timestamp(), Self::sale_opens_at(env.clone()))
    }

    pub fn time_until_withdrawal(env: Env) -> u64 {
        let deadline = Self::last_mint_time(env.clone()).saturating_add(WITHDRAWAL_WAIT_SECONDS);
        seconds_until(env.ledger().timestamp(), deadline)
    }

    /// What `withdraw` would pay right now
    pub fn withdrawal_amount(env: Env) -> Result<i128, Error> {
        let native_token = Self::native_token(&env)?;
        let balance = token::Client::new(&env, &native_token)
            .balance(&env.current_contract_address());

        Ok(payout_share(balance))
    }

    pub fn withdrawal_record(env: Env, index: u64) -> WithdrawalRecord {
        env.storage()
            .persistent()
            .get(&DataKey::Withdrawal(index))
            .unwrap_or(WithdrawalRecord {
                occurred: false,
                amount: 0,
            })
    }

    pub fn num_withdrawals(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::NumWithdrawals)
            .unwrap_or(0)
    }

    /// Display name, empty if never set
    pub fn token_name(env: Env, token_id: u64) -> String {
        env.storage()
            .persistent()
            .get(&DataKey::TokenName(token_id))
            .unwrap_or(String::from_str(&env, ""))
    }

    /// Seed the asset's random walk is rendered from
    pub fn seed(env: Env, token_id: u64) -> Result<BytesN<32>, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Seed(token_id))
            .ok_or(Error::TokenNotMinted)
    }

    pub fn wallet_of_owner(env: Env, owner: Address) -> Result<Vec<u64>, Error> {
        let registry = Self::registry(&env)?;
        Ok(registry::tokens_of_owner(&env, &registry, &owner))
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn registry(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Registry)
            .ok_or(Error::NotInitialized)
    }

    fn native_token(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::NativeToken)
            .ok_or(Error::NotInitialized)
    }

    /// Advance the entropy chain and return the new link as the seed
    fn next_seed(env: &Env, token_id: u64) -> BytesN<32> {
        let entropy: BytesN<32> = env
            .storage()
            .instance()
            .get(&DataKey::Entropy)
            .unwrap_or(BytesN::from_array(env, &[0u8; 32]));

        let mut material = Bytes::from(entropy);
        material.extend_from_array(&env.ledger().timestamp().to_be_bytes());
        material.extend_from_array(&env.ledger().sequence().to_be_bytes());
        material.extend_from_array(&token_id.to_be_bytes());

        let seed: BytesN<32> = env.crypto().sha256(&material).to_bytes();
        env.storage().instance().set(&DataKey::Entropy, &seed);
        seed
    }
}
