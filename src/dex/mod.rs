pub mod mint;
pub mod token_swap;

pub use mint::decode_mint;
pub use token_swap::{parse_swap_accounts, SwapAccountDecoder, TokenSwapDecoder};
