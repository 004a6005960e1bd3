//! Modelos neutrales (Record, direcciones, contratos de IO).

pub mod address;
pub mod contract;
pub mod record;

pub use address::{Address, KeyPath};
pub use contract::{decode_contract, encode_contract, ContractSide, IoModel};
pub use record::{merge_json, Record, RecordMap};
