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
    /// Only the most recent minter may take the pot
    NotLastParticipant = 10,
    /// Caller does not own the asset
    NotOwner = 11,

    // ============================================
    // VALUE ERRORS (20-29)
    // ============================================
    /// Payment below the current mint price
    PaymentTooLow = 20,
    /// Amount must be positive / arithmetic overflow
    InvalidAmount = 21,

    // ============================================
    // REFERENTIAL ERRORS (30-39)
    // ============================================
    /// No seed recorded: token was never minted here
    TokenNotMinted = 30,
    /// Registry assigned an id other than the next sequence number
    RegistryOutOfSync = 31,

    // ============================================
    // TEMPORAL ERRORS (40-49)
    // ============================================
    /// Sale opening time not reached
    SaleNotOpen = 40,
    /// Less than 30 days since the last mint
    CooldownNotElapsed = 41,

    // ============================================
    // CONSTRAINT ERRORS (50-59)
    // ============================================
    /// Token name longer than 32 bytes
    NameTooLong = 50,
}
