#![allow(unused_imports)]

use odra::prelude::*;

use cdp_market::{CdpMarket, PriceOracle};

fn main() {
    // One merged schema covering everything the deploy tooling can put on
    // chain: the market itself and the price feed it consults.
    let schema = CdpMarket::module_schema().merge(PriceOracle::module_schema());

    println!("{}", schema.as_json().expect("Failed to generate schema"));
}
