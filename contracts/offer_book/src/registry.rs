use soroban_sdk::{vec, Address, Env, IntoVal, Symbol};

/// Move an asset with the offer book as spender. The registry re-checks
/// ownership and approval on every call, so stale offers fail here.
pub fn transfer_from(env: &Env, registry: &Address, from: &Address, to: &Address, token_id: u64) {
    env.invoke_contract::<()>(
        registry,
        &Symbol::new(env, "transfer_from"),
        vec![
            env,
            env.current_contract_address().to_val(),
            from.to_val(),
            to.to_val(),
            token_id.into_val(env),
        ],
    );
}

pub fn owner_of(env: &Env, registry: &Address, token_id: u64) -> Address {
    env.invoke_contract(
        registry,
        &Symbol::new(env, "owner_of"),
        vec![env, token_id.into_val(env)],
    )
}
