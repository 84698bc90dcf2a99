//! Jupiter Adapter
//!
//! Token directory source backed by the Jupiter token list.

mod token_list;

pub use token_list::{
    parse_token_list, JupiterToken, JupiterTokenList, JupiterTokenListConfig,
    DEFAULT_TOKEN_LIST_URL,
};
