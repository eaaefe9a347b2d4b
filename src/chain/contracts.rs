//! Per-protocol contract clients.
//!
//! Each client is built once from a configured address and exposes only the
//! calls the adapters use. Calldata comes from `sol!` declarations; return
//! values are single words decoded by hand.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use super::client::{ChainClient, ChainError, TxReceipt, TxRequest};

sol! {
    interface IWrappedNative {
        function deposit() external payable;
        function withdraw(uint256 wad) external;
        function balanceOf(address owner) external view returns (uint256);
    }

    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    interface IUniswapV2Router {
        function swapExactETHForTokens(uint256 amountOutMin, address[] calldata path, address to, uint256 deadline)
            external payable returns (uint256[] memory amounts);
        function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline)
            external returns (uint256[] memory amounts);
    }

    interface ICounter {
        function count() external view returns (uint256);
        function increment() external;
    }
}

/// Decode a single `uint256` return word.
pub fn decode_word(data: &[u8]) -> Result<U256, ChainError> {
    if data.len() < 32 {
        return Err(ChainError::Decode(format!("expected 32 bytes, got {}", data.len())));
    }
    Ok(U256::from_be_slice(&data[..32]))
}

async fn read_word(chain: &dyn ChainClient, to: Address, input: Vec<u8>) -> Result<U256, ChainError> {
    let data = chain.call(to, Bytes::from(input)).await?;
    decode_word(&data)
}

/// Wrapped native token (deposit/withdraw).
#[derive(Clone)]
pub struct WrappedNative {
    chain: Arc<dyn ChainClient>,
    address: Address,
    gas_limit: u64,
}

impl WrappedNative {
    pub fn new(chain: Arc<dyn ChainClient>, address: Address, gas_limit: u64) -> Self {
        Self {
            chain,
            address,
            gas_limit,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn balance_of(&self, owner: Address) -> Result<U256, ChainError> {
        read_word(
            self.chain.as_ref(),
            self.address,
            IWrappedNative::balanceOfCall { owner }.abi_encode(),
        )
        .await
    }

    pub async fn deposit(&self, value: U256) -> Result<TxReceipt, ChainError> {
        let input = IWrappedNative::depositCall {}.abi_encode();
        self.chain
            .submit(TxRequest::call(self.address, input, self.gas_limit).with_value(value))
            .await
    }

    pub async fn withdraw(&self, wad: U256) -> Result<TxReceipt, ChainError> {
        let input = IWrappedNative::withdrawCall { wad }.abi_encode();
        self.chain
            .submit(TxRequest::call(self.address, input, self.gas_limit))
            .await
    }
}

/// ERC-20 token held by the signer.
#[derive(Clone)]
pub struct Erc20 {
    chain: Arc<dyn ChainClient>,
    address: Address,
}

impl Erc20 {
    pub fn new(chain: Arc<dyn ChainClient>, address: Address) -> Self {
        Self { chain, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn balance_of(&self, owner: Address) -> Result<U256, ChainError> {
        read_word(self.chain.as_ref(), self.address, IERC20::balanceOfCall { owner }.abi_encode()).await
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, ChainError> {
        read_word(
            self.chain.as_ref(),
            self.address,
            IERC20::allowanceCall { owner, spender }.abi_encode(),
        )
        .await
    }

    pub async fn approve(&self, spender: Address, amount: U256, gas_limit: u64) -> Result<TxReceipt, ChainError> {
        let input = IERC20::approveCall { spender, amount }.abi_encode();
        self.chain.submit(TxRequest::call(self.address, input, gas_limit)).await
    }
}

/// Uniswap V2 style router (native in / native out).
#[derive(Clone)]
pub struct V2Router {
    chain: Arc<dyn ChainClient>,
    address: Address,
    gas_limit: u64,
}

impl V2Router {
    pub fn new(chain: Arc<dyn ChainClient>, address: Address, gas_limit: u64) -> Self {
        Self {
            chain,
            address,
            gas_limit,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Swap `value` native for tokens along `path`, no minimum out.
    pub async fn swap_exact_native_for_tokens(
        &self,
        value: U256,
        path: Vec<Address>,
        to: Address,
        deadline: U256,
    ) -> Result<TxReceipt, ChainError> {
        let input = IUniswapV2Router::swapExactETHForTokensCall {
            amountOutMin: U256::ZERO,
            path,
            to,
            deadline,
        }
        .abi_encode();
        self.chain
            .submit(TxRequest::call(self.address, input, self.gas_limit).with_value(value))
            .await
    }

    /// Swap `amount_in` tokens back to native along `path`, no minimum out.
    pub async fn swap_exact_tokens_for_native(
        &self,
        amount_in: U256,
        path: Vec<Address>,
        to: Address,
        deadline: U256,
    ) -> Result<TxReceipt, ChainError> {
        let input = IUniswapV2Router::swapExactTokensForETHCall {
            amountIn: amount_in,
            amountOutMin: U256::ZERO,
            path,
            to,
            deadline,
        }
        .abi_encode();
        self.chain.submit(TxRequest::call(self.address, input, self.gas_limit)).await
    }
}
