use super::*;
use asset_registry::{AssetRegistry, AssetRegistryClient};
use mint_ledger::{MintLedger, MintLedgerClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, vec, Address, Env,
};

const SCALE: i128 = 10_000_000;
const START: u64 = 1_700_000_000;

struct TestContext {
    env: Env,
    admin: Address,
    user1: Address,
    user2: Address,
    user3: Address,
    native_token: Address,
    registry_id: Address,
    book_id: Address,
    /// Asset 0, minted to user1
    token_id: u64,
}

impl TestContext {
    fn book(&self) -> OfferBookClient<'_> {
        OfferBookClient::new(&self.env, &self.book_id)
    }

    fn registry(&self) -> AssetRegistryClient<'_> {
        AssetRegistryClient::new(&self.env, &self.registry_id)
    }

    fn native(&self) -> token::Client<'_> {
        token::Client::new(&self.env, &self.native_token)
    }
}

fn setup_test() -> TestContext {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(START);

    let admin = Address::generate(&env);
    let user1 = Address::generate(&env);
    let user2 = Address::generate(&env);
    let user3 = Address::generate(&env);

    let native_contract = env.register_stellar_asset_contract_v2(admin.clone());
    let native_token = native_contract.address();
    let native_admin = token::StellarAssetClient::new(&env, &native_token);
    native_admin.mint(&user1, &(1_000i128 * SCALE));
    native_admin.mint(&user2, &(1_000i128 * SCALE));
    native_admin.mint(&user3, &(1_000i128 * SCALE));

    let registry_id = env.register(AssetRegistry, ());
    let registry = AssetRegistryClient::new(&env, &registry_id);
    registry.initialize(&admin);

    let ledger_id = env.register(MintLedger, ());
    let ledger = MintLedgerClient::new(&env, &ledger_id);
    ledger.initialize(&admin, &registry_id, &native_token, &START, &(SCALE / 1_000));
    registry.add_operator(&ledger_id);

    let book_id = env.register(OfferBook, ());
    let book = OfferBookClient::new(&env, &book_id);
    book.initialize(&admin, &native_token);

    let price = ledger.get_mint_price();
    let token_id = ledger.mint(&user1, &price);

    TestContext {
        env,
        admin,
        user1,
        user2,
        user3,
        native_token,
        registry_id,
        book_id,
        token_id,
    }
}

#[test]
fn test_initial_state() {
    let ctx = setup_test();
    let book = ctx.book();

    assert_eq!(book.num_offers(), 0);
    assert_eq!(book.try_get_offer(&0), Err(Ok(Error::OfferNotFound)));
    let result = book.try_initialize(&ctx.admin, &ctx.native_token);
    assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
}

#[test]
fn test_initialize_requires_admin_auth() {
    let env = Env::default();

    let book_id = env.register(OfferBook, ());
    let book = OfferBookClient::new(&env, &book_id);
    let admin = Address::generate(&env);
    let native = Address::generate(&env);

    // Nobody signed for `admin`
    assert!(book.try_initialize(&admin, &native).is_err());
    let result = book.try_make_buy_offer(&admin, &native, &0, &SCALE);
    assert_eq!(result, Err(Ok(Error::NotInitialized)));

    env.mock_all_auths();
    book.initialize(&admin, &native);
    assert_eq!(env.auths()[0].0, admin);
}

#[test]
fn test_sell_offer_lifecycle() {
    let ctx = setup_test();
    let book = ctx.book();
    let registry = ctx.registry();
    let native = ctx.native();
    let price = 5 * SCALE;

    // No approval yet: registry refuses the escrow transfer
    let result = book.try_make_sell_offer(&ctx.user1, &ctx.registry_id, &ctx.token_id, &price);
    assert!(result.is_err());
    assert_eq!(book.num_offers(), 0);
    assert_eq!(registry.owner_of(&ctx.token_id), ctx.user1);

    registry.approve(&ctx.user1, &Some(ctx.book_id.clone()), &ctx.token_id);
    let offer_id = book.make_sell_offer(&ctx.user1, &ctx.registry_id, &ctx.token_id, &price);
    assert_eq!(offer_id, 0);
    assert_eq!(book.num_offers(), 1);
    assert_eq!(registry.owner_of(&ctx.token_id), ctx.book_id);

    let result = book.try_accept_sell_offer(&ctx.user2, &offer_id, &(price - 1));
    assert_eq!(result, Err(Ok(Error::IncorrectValue)));
    let result = book.try_accept_sell_offer(&ctx.user2, &offer_id, &(price + 1));
    assert_eq!(result, Err(Ok(Error::IncorrectValue)));

    let seller_before = native.balance(&ctx.user1);
    let buyer_before = native.balance(&ctx.user2);

    book.accept_sell_offer(&ctx.user2, &offer_id, &price);

    assert_eq!(registry.owner_of(&ctx.token_id), ctx.user2);
    assert_eq!(native.balance(&ctx.user1), seller_before + price);
    assert_eq!(native.balance(&ctx.user2), buyer_before - price);
    assert!(!book.get_offer(&offer_id).active);

    let result = book.try_accept_sell_offer(&ctx.user3, &offer_id, &price);
    assert_eq!(result, Err(Ok(Error::OfferNotActive)));
    let result = book.try_cancel_sell_offer(&ctx.user1, &offer_id);
    assert_eq!(result, Err(Ok(Error::OfferNotActive)));
}

#[test]
fn test_escrowed_asset_cannot_move_out_of_band() {
    let ctx = setup_test();
    let book = ctx.book();
    let registry = ctx.registry();

    registry.set_approval_for_all(&ctx.user1, &ctx.book_id, &true);
    book.make_sell_offer(&ctx.user1, &ctx.registry_id, &ctx.token_id, &SCALE);

    let result = registry.try_transfer(&ctx.user1, &ctx.user3, &ctx.token_id);
    assert_eq!(result, Err(Ok(asset_registry::Error::NotOwner)));
}

#[test]
fn test_cancel_sell_offer() {
    let ctx = setup_test();
    let book = ctx.book();
    let registry = ctx.registry();

    registry.set_approval_for_all(&ctx.user1, &ctx.book_id, &true);
    let offer_id = book.make_sell_offer(&ctx.user1, &ctx.registry_id, &ctx.token_id, &SCALE);

    let result = book.try_cancel_sell_offer(&ctx.user2, &offer_id);
    assert_eq!(result, Err(Ok(Error::NotOfferor)));

    book.cancel_sell_offer(&ctx.user1, &offer_id);
    assert_eq!(registry.owner_of(&ctx.token_id), ctx.user1);

    let result = book.try_accept_sell_offer(&ctx.user2, &offer_id, &SCALE);
    assert_eq!(result, Err(Ok(Error::OfferNotActive)));
}

#[test]
fn test_buy_offer_cancel_returns_escrow() {
    let ctx = setup_test();
    let book = ctx.book();
    let native = ctx.native();
    let amount = 3 * SCALE;

    let before = native.balance(&ctx.user2);
    let offer_id = book.make_buy_offer(&ctx.user2, &ctx.registry_id, &ctx.token_id, &amount);

    assert_eq!(native.balance(&ctx.user2), before - amount);
    assert_eq!(native.balance(&ctx.book_id), amount);

    let result = book.try_cancel_buy_offer(&ctx.user3, &offer_id);
    assert_eq!(result, Err(Ok(Error::NotOfferor)));

    book.cancel_buy_offer(&ctx.user2, &offer_id);
    assert_eq!(native.balance(&ctx.user2), before);
    assert_eq!(native.balance(&ctx.book_id), 0);

    let result = book.try_accept_buy_offer(&ctx.user1, &offer_id);
    assert_eq!(result, Err(Ok(Error::OfferNotActive)));
    let result = book.try_cancel_buy_offer(&ctx.user2, &offer_id);
    assert_eq!(result, Err(Ok(Error::OfferNotActive)));
    assert_eq!(native.balance(&ctx.user2), before);
}

#[test]
fn test_accept_buy_offer() {
    let ctx = setup_test();
    let book = ctx.book();
    let registry = ctx.registry();
    let native = ctx.native();
    let amount = 4 * SCALE;

    let offer_id = book.make_buy_offer(&ctx.user2, &ctx.registry_id, &ctx.token_id, &amount);

    // Owner has not authorized the offer book
    assert!(book.try_accept_buy_offer(&ctx.user1, &offer_id).is_err());
    assert!(book.get_offer(&offer_id).active);

    registry.set_approval_for_all(&ctx.user1, &ctx.book_id, &true);
    let seller_before = native.balance(&ctx.user1);

    book.accept_buy_offer(&ctx.user1, &offer_id);

    assert_eq!(registry.owner_of(&ctx.token_id), ctx.user2);
    assert_eq!(native.balance(&ctx.user1), seller_before + amount);
    assert_eq!(native.balance(&ctx.book_id), 0);

    let result = book.try_accept_buy_offer(&ctx.user1, &offer_id);
    assert_eq!(result, Err(Ok(Error::OfferNotActive)));

    let buyer_before = native.balance(&ctx.user2);
    let result = book.try_cancel_buy_offer(&ctx.user2, &offer_id);
    assert_eq!(result, Err(Ok(Error::OfferNotActive)));
    assert_eq!(native.balance(&ctx.user2), buyer_before);
    assert_eq!(native.balance(&ctx.book_id), 0);
}

#[test]
fn test_buy_offer_checks_current_owner() {
    let ctx = setup_test();
    let book = ctx.book();
    let registry = ctx.registry();

    let offer_id = book.make_buy_offer(&ctx.user2, &ctx.registry_id, &ctx.token_id, &SCALE);

    // Ownership changes after the offer was made
    registry.transfer(&ctx.user1, &ctx.user3, &ctx.token_id);
    registry.set_approval_for_all(&ctx.user1, &ctx.book_id, &true);
    assert!(book.try_accept_buy_offer(&ctx.user1, &offer_id).is_err());

    registry.set_approval_for_all(&ctx.user3, &ctx.book_id, &true);
    book.accept_buy_offer(&ctx.user3, &offer_id);
    assert_eq!(registry.owner_of(&ctx.token_id), ctx.user2);
}

#[test]
fn test_buy_offer_for_unissued_asset() {
    let ctx = setup_test();
    let book = ctx.book();

    let result = book.try_make_buy_offer(&ctx.user2, &ctx.registry_id, &99, &SCALE);
    assert!(result.is_err()); // registry NoSuchAsset
    assert_eq!(book.num_offers(), 0);
}

#[test]
fn test_wrong_offer_kind() {
    let ctx = setup_test();
    let book = ctx.book();

    ctx.registry()
        .set_approval_for_all(&ctx.user1, &ctx.book_id, &true);
    let sell_id = book.make_sell_offer(&ctx.user1, &ctx.registry_id, &ctx.token_id, &SCALE);
    let buy_id = book.make_buy_offer(&ctx.user2, &ctx.registry_id, &ctx.token_id, &SCALE);

    assert_eq!(book.try_accept_buy_offer(&ctx.user1, &sell_id), Err(Ok(Error::WrongOfferKind)));
    assert_eq!(book.try_cancel_buy_offer(&ctx.user1, &sell_id), Err(Ok(Error::WrongOfferKind)));
    assert_eq!(
        book.try_accept_sell_offer(&ctx.user3, &buy_id, &SCALE),
        Err(Ok(Error::WrongOfferKind))
    );
    assert_eq!(book.try_cancel_sell_offer(&ctx.user2, &buy_id), Err(Ok(Error::WrongOfferKind)));

    assert_eq!(book.try_cancel_buy_offer(&ctx.user2, &7), Err(Ok(Error::OfferNotFound)));
}

#[test]
fn test_offer_amounts_must_be_positive() {
    let ctx = setup_test();
    let book = ctx.book();

    let result = book.try_make_sell_offer(&ctx.user1, &ctx.registry_id, &ctx.token_id, &0);
    assert_eq!(result, Err(Ok(Error::InvalidAmount)));
    let result = book.try_make_buy_offer(&ctx.user2, &ctx.registry_id, &ctx.token_id, &-1);
    assert_eq!(result, Err(Ok(Error::InvalidAmount)));
}

#[test]
fn test_offer_records_and_index() {
    let ctx = setup_test();
    let book = ctx.book();

    let first = book.make_buy_offer(&ctx.user2, &ctx.registry_id, &ctx.token_id, &SCALE);
    let second = book.make_buy_offer(&ctx.user3, &ctx.registry_id, &ctx.token_id, &(2 * SCALE));
    book.cancel_buy_offer(&ctx.user2, &first);

    assert_eq!(book.num_offers(), 2);
    assert_eq!(
        book.active_offers_for_asset(&ctx.registry_id, &ctx.token_id),
        vec![&ctx.env, second]
    );

    let offer = book.get_offer(&second);
    assert_eq!(
        offer,
        Offer {
            kind: OfferKind::Buy,
            registry: ctx.registry_id.clone(),
            token_id: ctx.token_id,
            offeror: ctx.user3.clone(),
            amount: 2 * SCALE,
            active: true,
        }
    );
    assert!(!book.get_offer(&first).active);
}

#[test]
fn test_closed_offers_leave_the_index() {
    let ctx = setup_test();
    let book = ctx.book();

    for _ in 0..20 {
        let offer_id = book.make_buy_offer(&ctx.user2, &ctx.registry_id, &ctx.token_id, &1);
        book.cancel_buy_offer(&ctx.user2, &offer_id);
    }

    assert_eq!(book.num_offers(), 20);
    assert!(book
        .active_offers_for_asset(&ctx.registry_id, &ctx.token_id)
        .is_empty());

    let open = book.make_buy_offer(&ctx.user3, &ctx.registry_id, &ctx.token_id, &SCALE);
    assert_eq!(
        book.active_offers_for_asset(&ctx.registry_id, &ctx.token_id),
        vec![&ctx.env, open]
    );

    ctx.registry()
        .set_approval_for_all(&ctx.user1, &ctx.book_id, &true);
    book.accept_buy_offer(&ctx.user1, &open);
    assert!(book
        .active_offers_for_asset(&ctx.registry_id, &ctx.token_id)
        .is_empty());
}
