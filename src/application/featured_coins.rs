//! Featured-coin roster: a bounded, orderable list of coins the
//! dashboard tracks, with search backed by the market-data provider.

use crate::domain::errors::FeaturedCoinError;
use crate::domain::ports::MarketDataProvider;
use crate::domain::types::{CoinListing, FeaturedCoin};
use anyhow::Result;
use std::sync::{Arc, RwLock};
use tracing::info;

pub const DEFAULT_MAX_ACTIVE: usize = 10;

fn default_roster() -> Vec<FeaturedCoin> {
    let seed = [
        ("starknet", "STRK", "Starknet"),
        ("bitcoin", "BTC", "Bitcoin"),
        ("ethereum", "ETH", "Ethereum"),
        ("binancecoin", "BNB", "BNB"),
        ("cardano", "ADA", "Cardano"),
        ("solana", "SOL", "Solana"),
        ("dogecoin", "DOGE", "Dogecoin"),
        ("uniswap", "UNI", "Uniswap"),
        ("aptos", "APT", "Aptos"),
        ("sui", "SUI", "Sui"),
        ("near", "NEAR", "NEAR Protocol"),
        ("aave", "AAVE", "Aave"),
        ("render", "RENDER", "Render"),
        ("filecoin", "FIL", "Filecoin"),
        ("worldcoin", "WLD", "Worldcoin"),
    ];

    seed.iter()
        .map(|(id, symbol, name)| FeaturedCoin {
            id: (*id).to_string(),
            symbol: (*symbol).to_string(),
            name: (*name).to_string(),
            is_active: true,
        })
        .collect()
}

pub struct FeaturedCoinService {
    coins: RwLock<Vec<FeaturedCoin>>,
    max_active: usize,
    market_data: Arc<dyn MarketDataProvider>,
}

impl FeaturedCoinService {
    pub fn new(market_data: Arc<dyn MarketDataProvider>, max_active: usize) -> Self {
        Self {
            coins: RwLock::new(default_roster()),
            max_active,
            market_data,
        }
    }

    pub fn coins(&self) -> Vec<FeaturedCoin> {
        match self.coins.read() {
            Ok(coins) => coins.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn active_coins(&self) -> Vec<FeaturedCoin> {
        self.coins()
            .into_iter()
            .filter(|coin| coin.is_active)
            .collect()
    }

    /// Flip a coin's active flag. Activating past the cap is rejected so
    /// the dashboard never tracks more coins than it can refresh.
    pub fn toggle(&self, id: &str) -> Result<FeaturedCoin, FeaturedCoinError> {
        let mut coins = self.lock_write();
        let active_count = coins.iter().filter(|c| c.is_active).count();

        let coin = coins
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| FeaturedCoinError::NotFound { id: id.to_string() })?;

        if !coin.is_active && active_count >= self.max_active {
            return Err(FeaturedCoinError::MaxActiveCoins {
                max: self.max_active,
            });
        }

        coin.is_active = !coin.is_active;
        info!(coin = %coin.id, active = coin.is_active, "toggled featured coin");
        Ok(coin.clone())
    }

    /// Add a coin to the roster, inactive until toggled. Adding an
    /// existing id is a no-op.
    pub fn add(&self, listing: CoinListing) {
        let mut coins = self.lock_write();
        if coins.iter().any(|c| c.id == listing.id) {
            return;
        }

        info!(coin = %listing.id, "added featured coin");
        coins.push(FeaturedCoin {
            id: listing.id,
            symbol: listing.symbol,
            name: listing.name,
            is_active: false,
        });
    }

    pub fn remove(&self, id: &str) -> Result<(), FeaturedCoinError> {
        let mut coins = self.lock_write();
        let before = coins.len();
        coins.retain(|c| c.id != id);

        if coins.len() == before {
            return Err(FeaturedCoinError::NotFound { id: id.to_string() });
        }
        info!(coin = %id, "removed featured coin");
        Ok(())
    }

    /// Reorder the roster to match `ids`; coins not named keep their
    /// relative order after the named ones.
    pub fn reorder(&self, ids: &[String]) {
        let mut coins = self.lock_write();
        coins.sort_by_key(|coin| {
            ids.iter()
                .position(|id| *id == coin.id)
                .unwrap_or(usize::MAX)
        });
    }

    pub async fn search(&self, query: &str) -> Result<Vec<CoinListing>> {
        self.market_data.search(query).await
    }

    fn lock_write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<FeaturedCoin>> {
        match self.coins.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::MockMarketDataProvider;

    fn service() -> FeaturedCoinService {
        FeaturedCoinService::new(Arc::new(MockMarketDataProvider::flat(100.0)), DEFAULT_MAX_ACTIVE)
    }

    fn listing(id: &str) -> CoinListing {
        CoinListing {
            id: id.to_string(),
            symbol: id.to_uppercase(),
            name: id.to_string(),
        }
    }

    #[test]
    fn test_default_roster_has_fifteen_active_coins() {
        let service = service();
        assert_eq!(service.coins().len(), 15);
        assert_eq!(service.active_coins().len(), 15);
    }

    #[test]
    fn test_activation_past_cap_is_rejected() {
        let service = service();
        // Default roster starts over the cap, so trim to exactly the cap first.
        for id in ["near", "aave", "render", "filecoin", "worldcoin"] {
            service.toggle(id).unwrap();
        }
        assert_eq!(service.active_coins().len(), DEFAULT_MAX_ACTIVE);

        let err = service.toggle("near").unwrap_err();
        assert!(matches!(err, FeaturedCoinError::MaxActiveCoins { max: 10 }));
    }

    #[test]
    fn test_deactivation_always_allowed() {
        let service = service();
        let coin = service.toggle("bitcoin").unwrap();
        assert!(!coin.is_active);
        assert_eq!(service.active_coins().len(), 14);
    }

    #[test]
    fn test_add_is_idempotent_and_inactive() {
        let service = service();
        service.add(listing("monero"));
        service.add(listing("monero"));

        let coins = service.coins();
        assert_eq!(coins.len(), 16);
        let added = coins.iter().find(|c| c.id == "monero").unwrap();
        assert!(!added.is_active);
    }

    #[test]
    fn test_remove_unknown_coin_errors() {
        let service = service();
        assert!(service.remove("bitcoin").is_ok());
        assert!(matches!(
            service.remove("bitcoin"),
            Err(FeaturedCoinError::NotFound { .. })
        ));
    }

    #[test]
    fn test_reorder_moves_named_coins_first() {
        let service = service();
        service.reorder(&["solana".to_string(), "bitcoin".to_string()]);

        let coins = service.coins();
        assert_eq!(coins[0].id, "solana");
        assert_eq!(coins[1].id, "bitcoin");
        assert_eq!(coins.len(), 15);
    }
}
