//! Message types registered by [`MsgRegistry::with_defaults`].
//!
//! Field layouts follow the cosmos-sdk and irismod protobuf definitions.
//! Anything else a chain emits is added by the caller through
//! [`MsgRegistry::register`].

use super::registry::MsgRegistry;

macro_rules! impl_name {
    ($msg:ty, $package:literal, $name:literal) => {
        impl ::prost::Name for $msg {
            const NAME: &'static str = $name;
            const PACKAGE: &'static str = $package;
        }
    };
}

pub mod bank {
    use serde::Serialize;

    use crate::msg::proto::Coin;

    #[derive(Clone, PartialEq, Serialize, ::prost::Message)]
    pub struct MsgSend {
        #[prost(string, tag = "1")]
        pub from_address: String,
        #[prost(string, tag = "2")]
        pub to_address: String,
        #[prost(message, repeated, tag = "3")]
        pub amount: Vec<Coin>,
    }
    impl_name!(MsgSend, "cosmos.bank.v1beta1", "MsgSend");

    #[derive(Clone, PartialEq, Serialize, ::prost::Message)]
    pub struct Input {
        #[prost(string, tag = "1")]
        pub address: String,
        #[prost(message, repeated, tag = "2")]
        pub coins: Vec<Coin>,
    }

    #[derive(Clone, PartialEq, Serialize, ::prost::Message)]
    pub struct Output {
        #[prost(string, tag = "1")]
        pub address: String,
        #[prost(message, repeated, tag = "2")]
        pub coins: Vec<Coin>,
    }

    #[derive(Clone, PartialEq, Serialize, ::prost::Message)]
    pub struct MsgMultiSend {
        #[prost(message, repeated, tag = "1")]
        pub inputs: Vec<Input>,
        #[prost(message, repeated, tag = "2")]
        pub outputs: Vec<Output>,
    }
    impl_name!(MsgMultiSend, "cosmos.bank.v1beta1", "MsgMultiSend");
}

pub mod staking {
    use serde::Serialize;

    use crate::msg::proto::Coin;

    #[derive(Clone, PartialEq, Serialize, ::prost::Message)]
    pub struct MsgDelegate {
        #[prost(string, tag = "1")]
        pub delegator_address: String,
        #[prost(string, tag = "2")]
        pub validator_address: String,
        #[prost(message, optional, tag = "3")]
        pub amount: Option<Coin>,
    }
    impl_name!(MsgDelegate, "cosmos.staking.v1beta1", "MsgDelegate");

    #[derive(Clone, PartialEq, Serialize, ::prost::Message)]
    pub struct MsgUndelegate {
        #[prost(string, tag = "1")]
        pub delegator_address: String,
        #[prost(string, tag = "2")]
        pub validator_address: String,
        #[prost(message, optional, tag = "3")]
        pub amount: Option<Coin>,
    }
    impl_name!(MsgUndelegate, "cosmos.staking.v1beta1", "MsgUndelegate");

    #[derive(Clone, PartialEq, Serialize, ::prost::Message)]
    pub struct MsgBeginRedelegate {
        #[prost(string, tag = "1")]
        pub delegator_address: String,
        #[prost(string, tag = "2")]
        pub validator_src_address: String,
        #[prost(string, tag = "3")]
        pub validator_dst_address: String,
        #[prost(message, optional, tag = "4")]
        pub amount: Option<Coin>,
    }
    impl_name!(MsgBeginRedelegate, "cosmos.staking.v1beta1", "MsgBeginRedelegate");
}

pub mod distribution {
    use serde::Serialize;

    #[derive(Clone, PartialEq, Serialize, ::prost::Message)]
    pub struct MsgWithdrawDelegatorReward {
        #[prost(string, tag = "1")]
        pub delegator_address: String,
        #[prost(string, tag = "2")]
        pub validator_address: String,
    }
    impl_name!(
        MsgWithdrawDelegatorReward,
        "cosmos.distribution.v1beta1",
        "MsgWithdrawDelegatorReward"
    );
}

pub mod nft {
    use serde::Serialize;

    #[derive(Clone, PartialEq, Serialize, ::prost::Message)]
    pub struct MsgIssueDenom {
        #[prost(string, tag = "1")]
        pub id: String,
        #[prost(string, tag = "2")]
        pub name: String,
        #[prost(string, tag = "3")]
        pub schema: String,
        #[prost(string, tag = "4")]
        pub sender: String,
        #[prost(string, tag = "5")]
        pub symbol: String,
        #[prost(bool, tag = "6")]
        pub mint_restricted: bool,
        #[prost(bool, tag = "7")]
        pub update_restricted: bool,
        #[prost(string, tag = "8")]
        pub description: String,
        #[prost(string, tag = "9")]
        pub uri: String,
        #[prost(string, tag = "10")]
        pub uri_hash: String,
        #[prost(string, tag = "11")]
        pub data: String,
    }
    impl_name!(MsgIssueDenom, "irismod.nft", "MsgIssueDenom");

    #[derive(Clone, PartialEq, Serialize, ::prost::Message)]
    pub struct MsgMintNFT {
        #[prost(string, tag = "1")]
        pub id: String,
        #[prost(string, tag = "2")]
        pub denom_id: String,
        #[prost(string, tag = "3")]
        pub name: String,
        #[prost(string, tag = "4")]
        pub uri: String,
        #[prost(string, tag = "5")]
        pub data: String,
        #[prost(string, tag = "6")]
        pub sender: String,
        #[prost(string, tag = "7")]
        pub recipient: String,
        #[prost(string, tag = "8")]
        pub uri_hash: String,
    }
    impl_name!(MsgMintNFT, "irismod.nft", "MsgMintNFT");

    #[derive(Clone, PartialEq, Serialize, ::prost::Message)]
    pub struct MsgEditNFT {
        #[prost(string, tag = "1")]
        pub id: String,
        #[prost(string, tag = "2")]
        pub denom_id: String,
        #[prost(string, tag = "3")]
        pub name: String,
        #[prost(string, tag = "4")]
        pub uri: String,
        #[prost(string, tag = "5")]
        pub data: String,
        #[prost(string, tag = "6")]
        pub sender: String,
        #[prost(string, tag = "7")]
        pub uri_hash: String,
    }
    impl_name!(MsgEditNFT, "irismod.nft", "MsgEditNFT");

    #[derive(Clone, PartialEq, Serialize, ::prost::Message)]
    pub struct MsgTransferNFT {
        #[prost(string, tag = "1")]
        pub id: String,
        #[prost(string, tag = "2")]
        pub denom_id: String,
        #[prost(string, tag = "3")]
        pub name: String,
        #[prost(string, tag = "4")]
        pub uri: String,
        #[prost(string, tag = "5")]
        pub data: String,
        #[prost(string, tag = "6")]
        pub sender: String,
        #[prost(string, tag = "7")]
        pub recipient: String,
        #[prost(string, tag = "8")]
        pub uri_hash: String,
    }
    impl_name!(MsgTransferNFT, "irismod.nft", "MsgTransferNFT");

    #[derive(Clone, PartialEq, Serialize, ::prost::Message)]
    pub struct MsgBurnNFT {
        #[prost(string, tag = "1")]
        pub id: String,
        #[prost(string, tag = "2")]
        pub denom_id: String,
        #[prost(string, tag = "3")]
        pub sender: String,
    }
    impl_name!(MsgBurnNFT, "irismod.nft", "MsgBurnNFT");
}

pub(super) fn register_all(registry: &mut MsgRegistry) {
    registry
        .register::<bank::MsgSend>()
        .register::<bank::MsgMultiSend>()
        .register::<staking::MsgDelegate>()
        .register::<staking::MsgUndelegate>()
        .register::<staking::MsgBeginRedelegate>()
        .register::<distribution::MsgWithdrawDelegatorReward>()
        .register::<nft::MsgIssueDenom>()
        .register::<nft::MsgMintNFT>()
        .register::<nft::MsgEditNFT>()
        .register::<nft::MsgTransferNFT>()
        .register::<nft::MsgBurnNFT>();
}
