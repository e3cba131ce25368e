/// Integer-cent money amounts.
pub mod money;

/// Transaction records, the per-account ledger and statement views over it.
pub mod transaction;

/// Daily withdrawal quota tracking.
pub mod policy;

/// Turns raw teller input into validated transaction commands, later
/// executed by [`account`].
pub mod command;

/// Account balance management.
/// State is modified using events, which are created by handling commands
pub mod account;

/// Clients, their identity and routing of transactions to owned accounts.
pub mod client;

/// Branch registry plus the [`bank::Teller`] entry point.
///
/// NOTE: the registry is single threaded; wrap it in a lock if several
/// tellers ever share one.
pub mod bank;

/// Bootstraps the core from a CSV journal. Kept in the library so the
/// integration tests can drive it.
pub mod bin_utils;
