//! Id minting helpers

use bech32::Bech32m;
use uuid7::uuid7;

/// Mint a fresh uuid7 and encode it as bech32 under the given prefix. The
/// prefix doubles as the record's key namespace in the store ("prod_",
/// "order_", "user_").
pub fn mint_id(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encoded = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encoded)
}
