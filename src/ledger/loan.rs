use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

use super::event::{CollectionEvent, Outcome};

/// Repayment terms applied to a new loan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanTerms {
    pub term_days: u32,
    pub daily_amount: u64,
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self {
            term_days: 60,
            daily_amount: 200,
        }
    }
}

/// One client loan as tracked by the field officer.
///
/// `total_paid` and `last_day_paid` are derived from the collection log and can
/// only change through [`crate::ledger::Ledger::record_collection`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanRecord {
    pub client_id: String,
    pub client_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub husband_name: Option<String>,
    pub staff_id: String,
    pub centre_id: String,
    pub loan_amount: u64,
    pub expected_daily_amount: u64,
    pub loan_term_days: u32,
    #[serde(default)]
    pub opening_paid: u64,
    #[serde(default)]
    pub opening_day: u32,
    total_paid: u64,
    last_day_paid: u32,
}

impl LoanRecord {
    pub fn new(
        client_id: impl Into<String>,
        client_name: impl Into<String>,
        staff_id: impl Into<String>,
        centre_id: impl Into<String>,
        loan_amount: u64,
        terms: LoanTerms,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_name: client_name.into(),
            husband_name: None,
            staff_id: staff_id.into(),
            centre_id: centre_id.into(),
            loan_amount,
            expected_daily_amount: terms.daily_amount,
            loan_term_days: terms.term_days,
            opening_paid: 0,
            opening_day: 0,
            total_paid: 0,
            last_day_paid: 0,
        }
    }

    pub fn with_husband(mut self, name: impl Into<String>) -> Self {
        self.husband_name = Some(name.into());
        self
    }

    /// Carries repayments made before the loan entered this ledger.
    pub fn with_opening_balance(mut self, paid: u64, last_day: u32) -> Self {
        self.opening_paid = paid;
        self.opening_day = last_day;
        self.total_paid = paid;
        self.last_day_paid = last_day;
        self
    }

    pub fn total_paid(&self) -> u64 {
        self.total_paid
    }

    pub fn last_day_paid(&self) -> u32 {
        self.last_day_paid
    }

    pub fn balance(&self) -> u64 {
        self.loan_amount.saturating_sub(self.total_paid)
    }

    pub fn is_closed(&self) -> bool {
        self.total_paid >= self.loan_amount
    }

    /// The period the next collection should be recorded against.
    pub fn next_day(&self) -> u32 {
        self.last_day_paid.saturating_add(1).min(self.loan_term_days)
    }

    /// The amount a collector should ask for today, never more than the balance.
    pub fn expected_amount_due(&self) -> u64 {
        self.expected_daily_amount.min(self.balance())
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(LedgerError::InvalidRecord("client id must not be empty".into()));
        }
        if self.staff_id.trim().is_empty() || self.centre_id.trim().is_empty() {
            return Err(LedgerError::InvalidRecord(format!(
                "client `{}` needs both a staff and a centre",
                self.client_id
            )));
        }
        if self.loan_term_days == 0 {
            return Err(LedgerError::InvalidRecord(format!(
                "client `{}` has a zero-day loan term",
                self.client_id
            )));
        }
        if self.total_paid > self.loan_amount {
            return Err(LedgerError::InvalidRecord(format!(
                "client `{}` has paid {} against a loan of {}",
                self.client_id, self.total_paid, self.loan_amount
            )));
        }
        if self.last_day_paid > self.loan_term_days {
            return Err(LedgerError::InvalidRecord(format!(
                "client `{}` is on day {} of a {}-day term",
                self.client_id, self.last_day_paid, self.loan_term_days
            )));
        }
        Ok(())
    }

    /// Resets derived fields to the opening balance, ready for a replay.
    pub(crate) fn rewound(&self) -> Self {
        let mut record = self.clone();
        record.total_paid = record.opening_paid;
        record.last_day_paid = record.opening_day;
        record
    }

    pub(crate) fn apply(&mut self, event: &CollectionEvent) {
        if event.outcome == Outcome::Paid {
            self.total_paid = self.total_paid.saturating_add(event.amount);
        }
        self.last_day_paid = self.last_day_paid.max(event.day_index);
    }
}
