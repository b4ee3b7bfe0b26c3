// 前端用到的两个合约接口，以可读 ABI 的形式编译进来

// CryptoDevToken：可铸造、可凭 NFT 领取的 ERC-20 代币
pub mod token {
    ethers::contract::abigen!(
        CryptoDevToken,
        r#"[
            function mint(uint256 amount) public payable
            function claim() public
            function balanceOf(address account) external view returns (uint256)
            function totalSupply() external view returns (uint256)
            function tokenIdsClaimed(uint256 tokenId) external view returns (bool)
            function maxTotalSupply() external view returns (uint256)
            function tokenPrice() external view returns (uint256)
            function tokensPerNFT() external view returns (uint256)
        ]"#
    );
}

// Crypto Devs NFT：只需要可枚举 ERC-721 的两个只读方法
pub mod nft {
    ethers::contract::abigen!(
        CryptoDevsNft,
        r#"[
            function balanceOf(address owner) external view returns (uint256)
            function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256)
        ]"#
    );
}

pub use nft::CryptoDevsNft;
pub use token::CryptoDevToken;
