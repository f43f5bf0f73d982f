use soroban_sdk::{contracttype, Address, Env, Vec};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Initialized,
    Operators(Address),
    NextTokenId,
    Owner(u64),
    Approved(u64),
    ApprovalForAll(Address, Address), // (owner, operator)
    OwnedTokens(Address),
}

pub fn owned_tokens(env: &Env, owner: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::OwnedTokens(owner.clone()))
        .unwrap_or(Vec::new(env))
}

pub fn add_owned(env: &Env, owner: &Address, token_id: u64) {
    let mut tokens = owned_tokens(env, owner);
    tokens.push_back(token_id);
    env.storage()
        .persistent()
        .set(&DataKey::OwnedTokens(owner.clone()), &tokens);
}

pub fn remove_owned(env: &Env, owner: &Address, token_id: u64) {
    let key = DataKey::OwnedTokens(owner.clone());
    let mut tokens = owned_tokens(env, owner);
    if let Some(index) = tokens.first_index_of(token_id) {
        tokens.remove(index);
    }

    if tokens.is_empty() {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &tokens);
    }
}
