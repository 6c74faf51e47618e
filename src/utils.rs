//! Identifier minting for floor records

use bech32::Bech32m;
use uuid7::uuid7;

// mint a unique record id then encode using bech32
pub fn new_record_id(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}
