// Helper utilities for pool discovery integration tests
//
// This module provides:
// - Token-swap account fixtures encoded in the on-chain layout
// - An in-memory PoolDataSource with call counters and injected latency

#![allow(dead_code)]

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use swap_pool_discovery::{
    Address, MintMetadata, PoolDataSource, RawProgramAccount, SourceError, TokenAccountBalance,
};

pub const TOKEN_SWAP_ACCOUNT_LEN: usize = 324;

/// Addresses of one token-swap pool
#[derive(Debug, Clone, Copy)]
pub struct PoolFixture {
    pub address: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub token_pool: Pubkey,
    pub vault_a: Pubkey,
    pub vault_b: Pubkey,
}

impl PoolFixture {
    pub fn new() -> Self {
        Self {
            address: Pubkey::new_unique(),
            mint_a: Pubkey::new_unique(),
            mint_b: Pubkey::new_unique(),
            token_pool: Pubkey::new_unique(),
            vault_a: Pubkey::new_unique(),
            vault_b: Pubkey::new_unique(),
        }
    }

    pub fn with_mints(mint_a: Pubkey, mint_b: Pubkey) -> Self {
        Self {
            mint_a,
            mint_b,
            ..Self::new()
        }
    }

    pub fn mints(&self) -> [Pubkey; 3] {
        [self.mint_a, self.mint_b, self.token_pool]
    }

    /// Encode the pool in the SPL token-swap account layout
    pub fn account(&self) -> RawProgramAccount {
        let mut data = vec![0u8; TOKEN_SWAP_ACCOUNT_LEN];
        data[0] = 1; // version
        data[1] = 1; // is_initialized
        data[2] = 255; // bump seed
        data[3..35].copy_from_slice(spl_token::id().as_ref());
        data[35..67].copy_from_slice(self.vault_a.as_ref());
        data[67..99].copy_from_slice(self.vault_b.as_ref());
        data[99..131].copy_from_slice(self.token_pool.as_ref());
        data[131..163].copy_from_slice(self.mint_a.as_ref());
        data[163..195].copy_from_slice(self.mint_b.as_ref());
        data[195..227].copy_from_slice(Pubkey::new_unique().as_ref());
        data[227..235].copy_from_slice(&25u64.to_le_bytes());
        data[235..243].copy_from_slice(&10_000u64.to_le_bytes());
        RawProgramAccount::new(self.address, data)
    }
}

pub fn mint_metadata(address: Pubkey, decimals: u8) -> MintMetadata {
    MintMetadata {
        address,
        decimals,
        supply: 1_000_000_000,
        mint_authority: Some(Pubkey::new_unique()),
        freeze_authority: None,
        is_initialized: true,
    }
}

/// In-memory ledger with call counters
#[derive(Default)]
pub struct FakeSource {
    pub accounts: Vec<RawProgramAccount>,
    pub mints: HashMap<Pubkey, MintMetadata>,
    pub balances: HashMap<Pubkey, u64>,
    pub balance_delays: HashMap<Pubkey, Duration>,
    pub program_delay: Duration,
    pub fail_mint_batch: bool,

    pub program_calls: AtomicUsize,
    pub mint_batch_calls: AtomicUsize,
    pub balance_calls: AtomicUsize,
    pub balances_in_flight: AtomicUsize,
    pub peak_balances_in_flight: AtomicUsize,
    pub requested_mints: Mutex<Vec<Vec<Pubkey>>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pool with metadata for all its mints and the given balances
    pub fn add_pool(&mut self, pool: &PoolFixture, balance_a: u64, balance_b: u64) {
        self.accounts.push(pool.account());
        for mint in pool.mints() {
            self.mints.entry(mint).or_insert_with(|| mint_metadata(mint, 6));
        }
        self.balances.insert(pool.vault_a, balance_a);
        self.balances.insert(pool.vault_b, balance_b);
    }

    pub fn program_calls(&self) -> usize {
        self.program_calls.load(Ordering::SeqCst)
    }

    pub fn mint_batch_calls(&self) -> usize {
        self.mint_batch_calls.load(Ordering::SeqCst)
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    /// Most balance requests observed running at the same time
    pub fn peak_balances_in_flight(&self) -> usize {
        self.peak_balances_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PoolDataSource for FakeSource {
    async fn fetch_program_accounts(
        &self,
        _program_id: &Pubkey,
    ) -> Result<Vec<RawProgramAccount>, SourceError> {
        self.program_calls.fetch_add(1, Ordering::SeqCst);
        if !self.program_delay.is_zero() {
            tokio::time::sleep(self.program_delay).await;
        }
        Ok(self.accounts.clone())
    }

    async fn fetch_multiple_accounts(
        &self,
        addresses: &[Address],
    ) -> Result<HashMap<Address, MintMetadata>, SourceError> {
        self.mint_batch_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_mints.lock().unwrap().push(addresses.to_vec());

        if self.fail_mint_batch {
            return Err(SourceError::Rpc("getMultipleAccounts unavailable".to_string()));
        }

        Ok(addresses
            .iter()
            .filter_map(|address| self.mints.get(address).map(|m| (*address, m.clone())))
            .collect())
    }

    async fn fetch_token_account_balance(
        &self,
        address: &Address,
    ) -> Result<TokenAccountBalance, SourceError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.balances_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_balances_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        if let Some(delay) = self.balance_delays.get(address) {
            tokio::time::sleep(*delay).await;
        }
        self.balances_in_flight.fetch_sub(1, Ordering::SeqCst);

        self.balances
            .get(address)
            .map(|amount| TokenAccountBalance {
                amount: *amount,
                decimals: 6,
            })
            .ok_or(SourceError::NotFound(*address))
    }
}
