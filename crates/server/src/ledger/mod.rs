mod activity_ledger;

pub use activity_ledger::ActivityLedger;
