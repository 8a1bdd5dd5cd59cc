//! Solidity bindings for the GiftVault contract.
//!
//! The vault holds gifted assets in escrow until their unlock timestamp and
//! keeps per-sender, per-recipient, and per-alias indexes of gift ids. The
//! four `create*` entrypoints share a common argument prefix (recipient,
//! unlock timestamp) and suffix (alias name, message) with the asset-specific
//! arguments in between.

use alloy_sol_types::sol;

sol! {
	/// Stored gift as returned by `getGift`.
	///
	/// A zeroed `sender` marks a slot that was never written; callers treat
	/// that as "no such gift" rather than an error.
	struct GiftView {
		uint256 id;
		address sender;
		address recipient;
		uint8 assetKind;
		address token;
		uint256 tokenId;
		uint256 amount;
		uint256 unlockTimestamp;
		string message;
		bool claimed;
	}

	interface IGiftVault {
		function createNativeGift(
			address recipient,
			uint256 unlockTimestamp,
			string aliasName,
			string message
		) external payable returns (uint256 giftId);

		function createTokenGift(
			address recipient,
			uint256 unlockTimestamp,
			address token,
			uint256 amount,
			string aliasName,
			string message
		) external returns (uint256 giftId);

		function createNftGift(
			address recipient,
			uint256 unlockTimestamp,
			address token,
			uint256 tokenId,
			string aliasName,
			string message
		) external returns (uint256 giftId);

		function createMultiNftGift(
			address recipient,
			uint256 unlockTimestamp,
			address token,
			uint256 tokenId,
			uint256 amount,
			string aliasName,
			string message
		) external returns (uint256 giftId);

		function claimGift(uint256 giftId) external;

		function getGift(uint256 giftId) external view returns (GiftView memory gift);

		function getSentGifts(address sender) external view returns (uint256[] memory giftIds);

		function getReceivedGifts(address recipient) external view returns (uint256[] memory giftIds);

		function getGiftsByAlias(string aliasName) external view returns (uint256[] memory giftIds);
	}

	/// Emitted by the vault for every successful `create*` call. The gift id
	/// in the first indexed topic is the handle for all later reads.
	event GiftCreated(
		uint256 indexed giftId,
		address indexed sender,
		address indexed recipient,
		uint8 assetKind,
		uint256 unlockTimestamp
	);

	/// Emitted when a recipient claims an unlocked gift.
	event GiftClaimed(uint256 indexed giftId, address indexed recipient);
}
