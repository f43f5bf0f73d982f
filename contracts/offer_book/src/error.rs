use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Only the party that made the offer may cancel it
    NotOfferor = 10,

    // ============================================
    // VALUE ERRORS (20-29)
    // ============================================
    /// Payment must match the asking price exactly
    IncorrectValue = 20,
    /// Amount must be positive
    InvalidAmount = 21,

    // ============================================
    // OFFER ERRORS (30-39)
    // ============================================
    /// Offer id never issued
    OfferNotFound = 30,
    /// Offer already accepted or cancelled
    OfferNotActive = 31,
    /// Sell operation on a buy offer or vice versa
    WrongOfferKind = 32,
}
