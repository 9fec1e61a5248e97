// Data model shared by the discovery pipeline.
//
// Mint metadata is resolved once per unique address and shared through `Arc`
// by every pool that references it. Balances belong to exactly one pool.

use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

/// Addresses on the ledger are plain public keys.
pub type Address = Pubkey;

/// The reserved "not set" address (`11111111111111111111111111111111`).
pub const SENTINEL_ADDRESS: Address = Pubkey::new_from_array([0u8; 32]);

/// Raw program account as delivered by the node.
#[derive(Debug, Clone)]
pub struct RawProgramAccount {
    pub address: Address,
    pub data: Option<Vec<u8>>,
}

impl RawProgramAccount {
    pub fn new(address: Address, data: Vec<u8>) -> Self {
        Self {
            address,
            data: Some(data),
        }
    }
}

/// Fee schedule of a token-swap pool, stored as fractions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapFees {
    pub trade_fee_numerator: u64,
    pub trade_fee_denominator: u64,
    pub owner_trade_fee_numerator: u64,
    pub owner_trade_fee_denominator: u64,
    pub owner_withdraw_fee_numerator: u64,
    pub owner_withdraw_fee_denominator: u64,
    pub host_fee_numerator: u64,
    pub host_fee_denominator: u64,
}

impl SwapFees {
    /// Trade fee as a fraction, 0.0 when the denominator is unset.
    pub fn trade_fee_rate(&self) -> f64 {
        if self.trade_fee_denominator == 0 {
            return 0.0;
        }
        self.trade_fee_numerator as f64 / self.trade_fee_denominator as f64
    }
}

/// Curve type and its raw parameters. Not interpreted here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapCurve {
    pub curve_type: u8,
    pub parameters: [u8; 32],
}

/// Decoded state of a token-swap program account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapState {
    pub version: u8,
    pub is_initialized: bool,
    pub bump_seed: u8,
    pub token_program_id: Address,
    pub token_account_a: Address,
    pub token_account_b: Address,
    pub token_pool: Address,
    pub mint_a: Address,
    pub mint_b: Address,
    pub fee_account: Address,
    pub fees: SwapFees,
    pub curve: SwapCurve,
}

impl SwapState {
    /// True when any of the referenced mints is the sentinel address.
    pub fn references_sentinel(&self) -> bool {
        self.mint_a == SENTINEL_ADDRESS
            || self.mint_b == SENTINEL_ADDRESS
            || self.token_pool == SENTINEL_ADDRESS
    }
}

/// A validated swap account: the pool address plus its decoded state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapDescriptor {
    pub address: Address,
    pub state: SwapState,
}

impl SwapDescriptor {
    pub fn mint_a(&self) -> Address {
        self.state.mint_a
    }

    pub fn mint_b(&self) -> Address {
        self.state.mint_b
    }

    pub fn token_pool(&self) -> Address {
        self.state.token_pool
    }

    pub fn token_account_a(&self) -> Address {
        self.state.token_account_a
    }

    pub fn token_account_b(&self) -> Address {
        self.state.token_account_b
    }

    /// Mint addresses in A, B, pool-token order.
    pub fn mint_addresses(&self) -> [Address; 3] {
        [self.mint_a(), self.mint_b(), self.token_pool()]
    }
}

/// Token mint metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintMetadata {
    pub address: Address,
    pub decimals: u8,
    pub supply: u64,
    pub mint_authority: Option<Address>,
    pub freeze_authority: Option<Address>,
    pub is_initialized: bool,
}

/// Balance held by a single token account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccountBalance {
    pub amount: u64,
    pub decimals: u8,
}

impl TokenAccountBalance {
    pub fn ui_amount(&self) -> f64 {
        self.amount as f64 / 10f64.powi(self.decimals as i32)
    }
}

/// Which of a descriptor's three mints a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintRole {
    MintA,
    MintB,
    TokenPool,
}

impl std::fmt::Display for MintRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MintRole::MintA => write!(f, "mint A"),
            MintRole::MintB => write!(f, "mint B"),
            MintRole::TokenPool => write!(f, "pool token mint"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MintTriplet {
    pub mint_a: Option<Arc<MintMetadata>>,
    pub mint_b: Option<Arc<MintMetadata>>,
    pub token_pool: Option<Arc<MintMetadata>>,
}

/// A descriptor together with whatever mint metadata could be resolved for it.
#[derive(Debug, Clone)]
pub struct EnrichedSwapRecord {
    pub descriptor: SwapDescriptor,
    pub mints: MintTriplet,
}

impl EnrichedSwapRecord {
    /// The three mints in A, B, pool-token order, or the first one missing.
    pub fn resolved_mints(
        &self,
    ) -> Result<(Arc<MintMetadata>, Arc<MintMetadata>, Arc<MintMetadata>), (MintRole, Address)> {
        let mint_a = self
            .mints
            .mint_a
            .clone()
            .ok_or((MintRole::MintA, self.descriptor.mint_a()))?;
        let mint_b = self
            .mints
            .mint_b
            .clone()
            .ok_or((MintRole::MintB, self.descriptor.mint_b()))?;
        let token_pool = self
            .mints
            .token_pool
            .clone()
            .ok_or((MintRole::TokenPool, self.descriptor.token_pool()))?;
        Ok((mint_a, mint_b, token_pool))
    }

    pub fn missing_mint(&self) -> Option<(MintRole, Address)> {
        self.resolved_mints().err()
    }
}

/// A fully resolved liquidity pool. Only ever built with every field present.
#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
    pub address: Address,
    pub token_a_info: Arc<MintMetadata>,
    pub token_b_info: Arc<MintMetadata>,
    pub pool_token_mint: Arc<MintMetadata>,
    pub swap_data: SwapDescriptor,
    pub token_a_balance: TokenAccountBalance,
    pub token_b_balance: TokenAccountBalance,
}

impl Pool {
    /// Both sides hold liquidity.
    pub fn is_active(&self) -> bool {
        self.token_a_balance.amount > 0 && self.token_b_balance.amount > 0
    }
}
