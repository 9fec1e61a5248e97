use solana_sdk::pubkey::Pubkey;
use spl_token::solana_program::program_option::COption;
use spl_token::solana_program::program_pack::Pack;
use spl_token::state::Mint;

use crate::error::DecodeError;
use crate::types::MintMetadata;

/// Decode a mint account. Token-2022 mints carry extensions after the base
/// layout, so only the leading `Mint::LEN` bytes are read.
pub fn decode_mint(address: &Pubkey, data: &[u8]) -> Result<MintMetadata, DecodeError> {
    if data.len() < Mint::LEN {
        return Err(DecodeError::InvalidLength {
            expected: Mint::LEN,
            actual: data.len(),
        });
    }

    let mint = Mint::unpack(&data[..Mint::LEN]).map_err(|e| match e {
        spl_token::solana_program::program_error::ProgramError::UninitializedAccount => {
            DecodeError::Uninitialized
        }
        other => DecodeError::Unpack(other.to_string()),
    })?;

    Ok(MintMetadata {
        address: *address,
        decimals: mint.decimals,
        supply: mint.supply,
        mint_authority: into_option(mint.mint_authority),
        freeze_authority: into_option(mint.freeze_authority),
        is_initialized: mint.is_initialized,
    })
}

fn into_option(value: COption<Pubkey>) -> Option<Pubkey> {
    match value {
        COption::Some(key) => Some(key),
        COption::None => None,
    }
}
