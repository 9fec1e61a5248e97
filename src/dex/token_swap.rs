// SPL Token Swap account codec and swap record parser
//
// Layout (324 bytes, little-endian):
//   0       version
//   1       is_initialized
//   2       bump_seed
//   3..35   token_program_id
//   35..67  token_account_a
//   67..99  token_account_b
//   99..131 token_pool (pool mint)
//   131..163 mint_a
//   163..195 mint_b
//   195..227 fee_account
//   227..291 fees (8 x u64)
//   291     curve_type
//   292..324 curve parameters

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::error::DecodeError;
use crate::types::{RawProgramAccount, SwapCurve, SwapDescriptor, SwapFees, SwapState};

pub const TOKEN_SWAP_ACCOUNT_LEN: usize = 324;

/// Turns raw account bytes into a [`SwapState`].
pub trait SwapAccountDecoder: Send + Sync {
    fn decode(&self, data: &[u8]) -> Result<SwapState, DecodeError>;
}

/// Decoder for the SPL token-swap program layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSwapDecoder;

impl SwapAccountDecoder for TokenSwapDecoder {
    fn decode(&self, data: &[u8]) -> Result<SwapState, DecodeError> {
        if data.len() != TOKEN_SWAP_ACCOUNT_LEN {
            return Err(DecodeError::InvalidLength {
                expected: TOKEN_SWAP_ACCOUNT_LEN,
                actual: data.len(),
            });
        }

        let is_initialized = match data[1] {
            0 => false,
            1 => true,
            other => {
                return Err(DecodeError::Unpack(format!(
                    "invalid is_initialized flag {}",
                    other
                )))
            }
        };

        let mut fee_fields = [0u64; 8];
        for (i, field) in fee_fields.iter_mut().enumerate() {
            *field = read_u64(data, 227 + i * 8)?;
        }

        let mut parameters = [0u8; 32];
        parameters.copy_from_slice(&data[292..324]);

        Ok(SwapState {
            version: data[0],
            is_initialized,
            bump_seed: data[2],
            token_program_id: read_pubkey(data, 3)?,
            token_account_a: read_pubkey(data, 35)?,
            token_account_b: read_pubkey(data, 67)?,
            token_pool: read_pubkey(data, 99)?,
            mint_a: read_pubkey(data, 131)?,
            mint_b: read_pubkey(data, 163)?,
            fee_account: read_pubkey(data, 195)?,
            fees: SwapFees {
                trade_fee_numerator: fee_fields[0],
                trade_fee_denominator: fee_fields[1],
                owner_trade_fee_numerator: fee_fields[2],
                owner_trade_fee_denominator: fee_fields[3],
                owner_withdraw_fee_numerator: fee_fields[4],
                owner_withdraw_fee_denominator: fee_fields[5],
                host_fee_numerator: fee_fields[6],
                host_fee_denominator: fee_fields[7],
            },
            curve: SwapCurve {
                curve_type: data[291],
                parameters,
            },
        })
    }
}

fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey, DecodeError> {
    Pubkey::try_from(&data[offset..offset + 32])
        .map_err(|e| DecodeError::Unpack(format!("pubkey at {}: {}", offset, e)))
}

fn read_u64(data: &[u8], offset: usize) -> Result<u64, DecodeError> {
    let bytes: [u8; 8] = data[offset..offset + 8]
        .try_into()
        .map_err(|e| DecodeError::Unpack(format!("u64 at {}: {:?}", offset, e)))?;
    Ok(u64::from_le_bytes(bytes))
}

/// Parse raw program accounts into valid swap descriptors.
///
/// Accounts without data, accounts that fail to decode and accounts that
/// reference the sentinel address for any mint are dropped. Output order
/// follows input order.
pub fn parse_swap_accounts<D>(accounts: Vec<RawProgramAccount>, decoder: &D) -> Vec<SwapDescriptor>
where
    D: SwapAccountDecoder + ?Sized,
{
    let total = accounts.len();

    let descriptors: Vec<SwapDescriptor> = accounts
        .into_iter()
        .filter_map(|account| {
            let data = account.data?;
            let state = match decoder.decode(&data) {
                Ok(state) => state,
                Err(e) => {
                    debug!("Skipping account {}: {}", account.address, e);
                    return None;
                }
            };
            if state.references_sentinel() {
                debug!("Skipping account {}: references sentinel mint", account.address);
                return None;
            }
            Some(SwapDescriptor {
                address: account.address,
                state,
            })
        })
        .collect();

    debug!("Parsed {} swap descriptors from {} accounts", descriptors.len(), total);
    descriptors
}
