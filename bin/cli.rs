use odra::casper_types::U256;
use odra::host::HostEnv;
use odra::prelude::Addressable;

use odra_cli::{
    deploy::DeployScript,
    scenario::{Args, Error, Scenario, ScenarioMetadata},
    CommandArg, ContractProvider, DeployedContractsContainer, DeployerExt, OdraCli,
};

use cdp_market::market::CdpMarketInitArgs;
use cdp_market::oracle::PriceOracleInitArgs;
use cdp_market::{CdpMarket, PriceOracle};

/// Gas budget per deploy, generous for testnet.
const DEPLOY_GAS: u64 = 200_000_000_000;

/// Price the feed starts at: 3000 debt units per collateral unit, wad.
fn initial_price() -> U256 {
    U256::from(3_000u64) * U256::from(1_000_000_000_000_000_000u64)
}

/// Deploys the price feed, then the market wired against it.
pub struct MarketDeployScript;

impl DeployScript for MarketDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer,
    ) -> Result<(), odra_cli::deploy::Error> {
        println!("Deploying the price feed...");
        let oracle = PriceOracle::load_or_deploy(
            env,
            PriceOracleInitArgs {
                price: initial_price(),
            },
            container,
            DEPLOY_GAS,
        )?;
        println!("Price feed deployed at: {:?}", oracle.address());

        println!("Deploying the market...");
        let market = CdpMarket::load_or_deploy(
            env,
            CdpMarketInitArgs {
                price_feed: *oracle.address(),
                admin: env.get_account(0),
            },
            container,
            DEPLOY_GAS,
        )?;
        println!("Market deployed at: {:?}", market.address());

        Ok(())
    }
}

/// Prints the market admin, the per-second rate, and the live index.
pub struct MarketStatusScenario;

impl Scenario for MarketStatusScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args,
    ) -> Result<(), Error> {
        let market = container.contract_ref::<CdpMarket>(env)?;

        println!("Admin: {:?}", market.get_admin());
        println!("Rate per second (ray): {}", market.get_interest_rate());
        match market.get_interest_index() {
            Ok(index) => println!("Interest index (wad): {}", index),
            Err(err) => println!("Interest index unavailable: {}", err),
        }

        Ok(())
    }
}

impl ScenarioMetadata for MarketStatusScenario {
    const NAME: &'static str = "market-status";
    const DESCRIPTION: &'static str =
        "Prints the market admin, the interest rate, and the current index";
}

pub fn main() {
    OdraCli::new()
        .about("CLI tool for the collateralized debt market")
        .deploy(MarketDeployScript)
        .contract::<CdpMarket>()
        .contract::<PriceOracle>()
        .scenario(MarketStatusScenario)
        .build()
        .run();
}
