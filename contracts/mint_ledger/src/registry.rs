use soroban_sdk::{vec, Address, Env, IntoVal, Symbol, Vec};

// Calls into the asset registry. A failing registry call traps and aborts
// the whole mint ledger invocation.

pub fn issue(env: &Env, registry: &Address, to: &Address) -> u64 {
    env.invoke_contract(
        registry,
        &Symbol::new(env, "issue"),
        vec![
            env,
            env.current_contract_address().to_val(),
            to.to_val(),
        ],
    )
}

pub fn owner_of(env: &Env, registry: &Address, token_id: u64) -> Address {
    env.invoke_contract(
        registry,
        &Symbol::new(env, "owner_of"),
        vec![env, token_id.into_val(env)],
    )
}

pub fn tokens_of_owner(env: &Env, registry: &Address, owner: &Address) -> Vec<u64> {
    env.invoke_contract(
        registry,
        &Symbol::new(env, "tokens_of_owner"),
        vec![env, owner.to_val()],
    )
}
