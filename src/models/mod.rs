//! Database row types and their insert/update/filter companions.

mod account;
mod balance;
mod branch;
mod client;
mod company;

pub use account::{Account, AccountFilter, NewAccount, UpdateAccount};
pub use balance::{Balance, BalanceFilter, NewBalance};
pub use branch::{Branch, BranchFilter, NewBranch, UpdateBranch};
pub use client::{Client, ClientFilter, NewClient, UpdateClient};
pub use company::{Company, CompanyFilter, NewCompany, UpdateCompany};

/// One page of rows plus the unpaged total.
#[derive(Debug, Clone)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

impl<T> PageResult<T> {
    pub fn total_pages(&self) -> i64 {
        if self.limit <= 0 {
            return 0;
        }
        (self.total + self.limit - 1) / self.limit
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
        }
    }
}
