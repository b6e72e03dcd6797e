#![no_std]

use soroban_sdk::contracterror;

/// @title  ErrorCategory
/// @notice Groups bonding errors by how a caller should react to them.
/// @dev    Validation and State errors are deterministic: retrying with the
///         same arguments fails again. External errors come from a
///         collaborator contract and may clear on their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Contract setup errors (codes 1-99).
    Initialization,
    /// Bad arguments or unauthorized caller (codes 100-199).
    Validation,
    /// Operation not allowed in the current position/pool state (codes 200-299).
    State,
    /// Oracle or AMM pool could not service the call (codes 300-399).
    External,
    /// Checked fixed-point arithmetic failed (codes 400-499).
    Arithmetic,
}

/// @title  BondingError
/// @notice Canonical error enum for the liquidity bonding engine.
/// @dev    Codes are wire-stable. Never renumber a variant after deployment.
///         Append new variants at the end of their category block only.
///
/// Error Code Layout:
///   1  -  99  : Initialization
///   100 - 199 : Validation
///   200 - 299 : State
///   300 - 399 : External
///   400 - 499 : Arithmetic
#[contracterror]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u32)]
pub enum BondingError {
    // --- Initialization (1-99) ---
    /// Contract has not been initialized yet.
    NotInitialized = 1,

    /// Contract has already been initialized and cannot be re-initialized.
    AlreadyInitialized = 2,

    // --- Validation (100-199) ---
    /// Amount argument must be strictly positive.
    InvalidAmount = 100,

    /// Lock duration is outside the range accepted for direct deposits.
    InvalidDuration = 101,

    /// Lock duration exceeds the configured maximum number of weeks.
    MaxDurationExceeded = 102,

    /// Caller does not hold the capability required by the operation.
    Unauthorized = 103,

    /// Caller is not the owner of the bond position.
    NotOwner = 104,

    /// Configuration value is outside its allowed bounds.
    InvalidConfig = 105,

    /// Caller has not approved the engine for the full amount.
    InsufficientAllowance = 106,

    // --- State (200-299) ---
    /// Position has not reached its maturity block.
    NotMatured = 200,

    /// No position exists for the given id.
    PositionNotFound = 201,

    /// Legacy holder has already migrated.
    AlreadyMigrated = 202,

    /// Address has no legacy balance to migrate.
    NoLegacyBalance = 203,

    /// Requested amount exceeds the position principal.
    InsufficientPrincipal = 204,

    /// Migration window is closed.
    MigrationClosed = 205,

    /// Contract is paused.
    ContractPaused = 206,

    /// Contract is not paused.
    NotPaused = 207,

    /// Custodied liquidity is lower than the requested withdrawal.
    InsufficientCustody = 208,

    // --- External (300-399) ---
    /// Price oracle call failed.
    OracleUnavailable = 300,

    /// Price oracle returned a stale or non-positive sample.
    OracleStale = 301,

    /// AMM pool could not service a single-sided withdrawal.
    PoolWithdrawalFailed = 302,

    // --- Arithmetic (400-499) ---
    /// Integer overflow in checked arithmetic.
    Overflow = 400,

    /// Division by zero in checked arithmetic.
    DivisionByZero = 401,
}

/// @title  ErrorExt
/// @notice Provides category(), description() and is_retryable() on every
///         BondingError variant.
pub trait ErrorExt {
    /// @return The ErrorCategory bucket this error belongs to.
    fn category(&self) -> ErrorCategory;

    /// @return A static string description safe for logging or display.
    fn description(&self) -> &'static str;

    /// @return true when an identical retry may succeed.
    fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::External
    }
}

impl ErrorExt for BondingError {
    fn category(&self) -> ErrorCategory {
        match self {
            BondingError::NotInitialized | BondingError::AlreadyInitialized => {
                ErrorCategory::Initialization
            }

            BondingError::InvalidAmount
            | BondingError::InvalidDuration
            | BondingError::MaxDurationExceeded
            | BondingError::Unauthorized
            | BondingError::NotOwner
            | BondingError::InvalidConfig
            | BondingError::InsufficientAllowance => ErrorCategory::Validation,

            BondingError::NotMatured
            | BondingError::PositionNotFound
            | BondingError::AlreadyMigrated
            | BondingError::NoLegacyBalance
            | BondingError::InsufficientPrincipal
            | BondingError::MigrationClosed
            | BondingError::ContractPaused
            | BondingError::NotPaused
            | BondingError::InsufficientCustody => ErrorCategory::State,

            BondingError::OracleUnavailable
            | BondingError::OracleStale
            | BondingError::PoolWithdrawalFailed => ErrorCategory::External,

            BondingError::Overflow | BondingError::DivisionByZero => ErrorCategory::Arithmetic,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            BondingError::NotInitialized => "Contract has not been initialized",
            BondingError::AlreadyInitialized => "Contract has already been initialized",
            BondingError::InvalidAmount => "Amount must be strictly positive (> 0)",
            BondingError::InvalidDuration => "Lock duration is outside the allowed range",
            BondingError::MaxDurationExceeded => "Lock duration exceeds the maximum weeks",
            BondingError::Unauthorized => "Caller lacks the required capability",
            BondingError::NotOwner => "Caller is not the position owner",
            BondingError::InvalidConfig => "Configuration value is out of bounds",
            BondingError::InsufficientAllowance => "Allowance is below the requested amount",
            BondingError::NotMatured => "Position has not reached maturity",
            BondingError::PositionNotFound => "No position found for the given id",
            BondingError::AlreadyMigrated => "Legacy balance has already been migrated",
            BondingError::NoLegacyBalance => "Address has no legacy balance to migrate",
            BondingError::InsufficientPrincipal => "Amount exceeds the position principal",
            BondingError::MigrationClosed => "Migration is not open",
            BondingError::ContractPaused => "Contract is paused",
            BondingError::NotPaused => "Contract is not paused",
            BondingError::InsufficientCustody => "Custodied liquidity is insufficient",
            BondingError::OracleUnavailable => "Price oracle call failed",
            BondingError::OracleStale => "Price oracle sample is stale or invalid",
            BondingError::PoolWithdrawalFailed => "AMM pool rejected the single-sided withdrawal",
            BondingError::Overflow => "Integer overflow in checked arithmetic",
            BondingError::DivisionByZero => "Division by zero in checked arithmetic",
        }
    }
}
