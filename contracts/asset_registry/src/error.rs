use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Initialization errors
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Authorization errors
    /// Spender is neither owner, approved, nor operator-for-all
    NotAuthorized = 3,
    /// `from` does not own the asset
    NotOwner = 4,
    /// Caller is not a registered issuer
    NotOperator = 6,
    /// Approving yourself or transferring to yourself as operator
    InvalidApproval = 7,

    // Referential errors
    NoSuchAsset = 8,
}
