use crate::cache::TtlCache;
use crate::error::FetchError;
use crate::fetch::addr::{compose_type, normalize_address, split_generic_types};
use crate::fetch::ticks::TickPager;
use crate::fetch::transport::LedgerTransport;
use crate::fetch::types::{
    FetchTicksResultDto, GlobalConfig, GlobalConfigDto, Pool, PoolIdentity, PoolResourceDto,
    RegistryDto, ResourceDto,
};
use crate::pool::snapshot::TickData;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// How long pool identities stay cached; they never change on-ledger.
pub const POOL_IDENTITY_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// How long mutable pool state stays cached.
pub const POOL_STATE_TTL: Duration = Duration::from_secs(5 * 60);
/// How long the global config stays cached.
pub const GLOBAL_CONFIG_TTL: Duration = Duration::from_secs(5 * 60);

const FACTORY_MODULE: &str = "factory";
const FACTORY_STRUCT: &str = "Pools";
const CONFIG_MODULE: &str = "config";
const CONFIG_STRUCT: &str = "GlobalConfig";
const POOL_MODULE: &str = "pool";
const POOL_STRUCT: &str = "Pool";

/// Where the CLMM deployment lives on the ledger.
#[derive(Debug, Clone)]
pub struct ClmmConfig {
    /// Account the CLMM modules are published under; also holds the
    /// factory registry resource.
    pub package: String,
    /// Account holding the `config::GlobalConfig` resource.
    pub global_config_address: String,
    /// Fully qualified view function that pages through pool ticks,
    /// e.g. `0x..::fetcher::fetch_ticks`.
    pub tick_fetcher: String,
}

/// Cached reader over the on-ledger CLMM state.
///
/// Owns its caches, so callers decide the sharing story; there is no
/// process-global state. `force_refresh` on the getters bypasses the
/// cache read but still refills it.
pub struct ClmmReader<T> {
    transport: T,
    config: ClmmConfig,
    identities: TtlCache<Vec<PoolIdentity>>,
    pools: TtlCache<Pool>,
    global_configs: TtlCache<GlobalConfig>,
}

impl<T: LedgerTransport> ClmmReader<T> {
    pub fn new(transport: T, config: ClmmConfig) -> Self {
        Self {
            transport,
            config,
            identities: TtlCache::new(),
            pools: TtlCache::new(),
            global_configs: TtlCache::new(),
        }
    }

    pub fn config(&self) -> &ClmmConfig {
        &self.config
    }

    /// Reads the protocol-wide config that gates every pool's pause flag.
    pub async fn get_global_config(
        &mut self,
        force_refresh: bool,
    ) -> Result<GlobalConfig, FetchError> {
        let address = normalize_address(&self.config.global_config_address)?;
        if !force_refresh {
            if let Some(config) = self.global_configs.get(&address) {
                debug!(%address, "global config cache hit");
                return Ok(config.clone());
            }
        }

        let resource_type = compose_type(
            &self.config.global_config_address,
            CONFIG_MODULE,
            CONFIG_STRUCT,
        );
        let value = self
            .transport
            .account_resource(&address, &resource_type)
            .await?
            .ok_or_else(|| FetchError::NotFound(resource_type.clone()))?;

        let envelope: ResourceDto = serde_json::from_value(value)?;
        let dto: GlobalConfigDto = serde_json::from_value(envelope.data)?;
        let config = GlobalConfig::try_from(dto)?;

        self.global_configs
            .put(address, config.clone(), GLOBAL_CONFIG_TTL);
        Ok(config)
    }

    /// Lists every pool the factory registry knows about.
    pub async fn list_pools(
        &mut self,
        force_refresh: bool,
    ) -> Result<Vec<PoolIdentity>, FetchError> {
        let package = normalize_address(&self.config.package)?;
        if !force_refresh {
            if let Some(identities) = self.identities.get(&package) {
                debug!(count = identities.len(), "pool registry cache hit");
                return Ok(identities.clone());
            }
        }

        let resource_type = compose_type(&self.config.package, FACTORY_MODULE, FACTORY_STRUCT);
        let value = self
            .transport
            .account_resource(&package, &resource_type)
            .await?
            .ok_or_else(|| FetchError::NotFound(resource_type.clone()))?;

        let envelope: ResourceDto = serde_json::from_value(value)?;
        let registry: RegistryDto = serde_json::from_value(envelope.data)?;

        let mut identities = Vec::with_capacity(registry.data.data.len());
        for entry in registry.data.data {
            identities.push(entry.into_identity()?);
        }
        debug!(count = identities.len(), "fetched pool registry");

        self.identities
            .put(package, identities.clone(), POOL_IDENTITY_TTL);
        Ok(identities)
    }

    /// Reads a pool's current state, folding the global pause flag into
    /// the pool's own.
    pub async fn get_pool(
        &mut self,
        pool_address: &str,
        force_refresh: bool,
    ) -> Result<Pool, FetchError> {
        let address = normalize_address(pool_address)?;
        if !force_refresh {
            if let Some(pool) = self.pools.get(&address) {
                debug!(%address, "pool state cache hit");
                return Ok(pool.clone());
            }
        }

        let global = self.get_global_config(force_refresh).await?;
        let resources = self.transport.account_resources(&address).await?;

        let mut pool_resource = None;
        for value in resources {
            let envelope: ResourceDto = serde_json::from_value(value)?;
            if is_pool_resource(&self.config.package, &envelope.resource_type) {
                pool_resource = Some(envelope);
                break;
            }
        }
        let envelope =
            pool_resource.ok_or_else(|| FetchError::NotFound(format!("pool at {address}")))?;

        let coin_types = split_generic_types(&envelope.resource_type)?;
        let [coin_type_a, coin_type_b]: [String; 2] = coin_types.try_into().map_err(|_| {
            FetchError::Malformed(format!(
                "pool type must have two coins: {}",
                envelope.resource_type
            ))
        })?;

        let dto: PoolResourceDto = serde_json::from_value(envelope.data)?;
        let pool = Pool::from_resource(
            address.clone(),
            envelope.resource_type,
            coin_type_a,
            coin_type_b,
            dto,
            global.is_pause,
        )?;
        debug!(%address, sqrt_price = pool.snapshot().current_sqrt_price, "fetched pool state");

        self.pools.put(address, pool.clone(), POOL_STATE_TTL);
        Ok(pool)
    }

    /// Pages through every initialized tick of `pool` via the fetcher
    /// view function. Not cached: tick state moves with every swap.
    pub async fn get_ticks(&mut self, pool: &Pool) -> Result<Vec<TickData>, FetchError> {
        let type_args = [
            pool.snapshot().coin_type_a.clone(),
            pool.snapshot().coin_type_b.clone(),
        ];

        let mut pager = TickPager::new();
        let mut ticks = Vec::new();
        let mut pages = 0u32;

        while let Some((index, offset)) = pager.next_cursor() {
            let args = [
                json!(pool.address),
                json!(index.to_string()),
                json!(offset.to_string()),
                json!(pager.page_size().to_string()),
            ];
            let value = self
                .transport
                .view(&self.config.tick_fetcher, &type_args, &args)
                .await?;

            let mut results: Vec<FetchTicksResultDto> = serde_json::from_value(value)?;
            if results.is_empty() {
                return Err(FetchError::Malformed(format!(
                    "{} returned no values",
                    self.config.tick_fetcher
                )));
            }
            let page = results.swap_remove(0);

            pages += 1;
            pager.record(page.ticks.len());
            for dto in page.ticks {
                ticks.push(TickData::try_from(dto)?);
            }
        }

        debug!(pool = %pool.address, pages, ticks = ticks.len(), "fetched tick pages");
        Ok(ticks)
    }
}

/// True when `resource_type` is this package's `pool::Pool<A, B>`
/// resource. Addresses are compared in canonical form so abbreviated and
/// padded spellings match.
fn is_pool_resource(package: &str, resource_type: &str) -> bool {
    let Some(open) = resource_type.find('<') else {
        return false;
    };
    let suffix = format!("::{POOL_MODULE}::{POOL_STRUCT}");
    let Some(address) = resource_type[..open].strip_suffix(suffix.as_str()) else {
        return false;
    };

    match (normalize_address(address), normalize_address(package)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Q64;
    use serde_json::Value;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PKG: &str = "0x1234";
    const CFG: &str = "0xc0ffee";
    const POOL_ADDR: &str = "0xbeef";

    // canned transport; resources are (account address, envelope) pairs
    #[derive(Default)]
    struct MockLedger {
        resources: Vec<(String, Value)>,
        view_pages: Mutex<Vec<Value>>,
        view_args: Mutex<Vec<Vec<Value>>>,
        resource_calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl LedgerTransport for MockLedger {
        async fn account_resource(
            &self,
            address: &str,
            resource_type: &str,
        ) -> Result<Option<Value>, FetchError> {
            self.resource_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .resources
                .iter()
                .find(|(account, envelope)| account == address && envelope["type"] == resource_type)
                .map(|(_, envelope)| envelope.clone()))
        }

        async fn account_resources(&self, address: &str) -> Result<Vec<Value>, FetchError> {
            let found: Vec<Value> = self
                .resources
                .iter()
                .filter(|(account, _)| account == address)
                .map(|(_, envelope)| envelope.clone())
                .collect();

            if found.is_empty() {
                return Err(FetchError::NotFound(format!("account {address}")));
            }
            Ok(found)
        }

        async fn view(
            &self,
            _function: &str,
            _type_args: &[String],
            args: &[Value],
        ) -> Result<Value, FetchError> {
            self.view_args.lock().unwrap().push(args.to_vec());

            let mut pages = self.view_pages.lock().unwrap();
            if pages.is_empty() {
                return Err(FetchError::Malformed("no scripted view page".to_string()));
            }
            Ok(pages.remove(0))
        }
    }

    fn reader_config() -> ClmmConfig {
        ClmmConfig {
            package: PKG.to_string(),
            global_config_address: CFG.to_string(),
            tick_fetcher: format!("{PKG}::fetcher::fetch_ticks"),
        }
    }

    fn global_config_envelope(is_pause: bool) -> (String, Value) {
        (
            normalize_address(CFG).unwrap(),
            json!({
                "type": format!("{CFG}::config::GlobalConfig"),
                "data": { "protocol_fee_rate": "2000", "is_pause": is_pause }
            }),
        )
    }

    fn pool_envelope(pool_pause: bool) -> (String, Value) {
        (
            normalize_address(POOL_ADDR).unwrap(),
            json!({
                "type": format!("{PKG}::pool::Pool<0x1::coin_a::A, 0x2::coin_b::B>"),
                "data": {
                    "coin_a": { "value": "500000" },
                    "coin_b": { "value": "600000" },
                    "tick_spacing": "60",
                    "fee_rate": "2500",
                    "liquidity": Q64.to_string(),
                    "current_sqrt_price": Q64.to_string(),
                    "current_tick_index": { "bits": "0" },
                    "fee_growth_global_a": "0",
                    "fee_growth_global_b": "0",
                    "fee_protocol_coin_a": "0",
                    "fee_protocol_coin_b": "0",
                    "is_pause": pool_pause
                }
            }),
        )
    }

    fn tick_json(index: u64) -> Value {
        json!({
            "index": { "bits": index.to_string() },
            "sqrt_price": (Q64 + index as u128).to_string(),
            "liquidity_net": { "bits": "1000" },
            "liquidity_gross": "1000",
            "fee_growth_outside_a": "0",
            "fee_growth_outside_b": "0",
            "rewarders_growth_outside": ["0"]
        })
    }

    fn tick_page(indexes: std::ops::Range<u64>) -> Value {
        json!([ { "ticks": indexes.map(tick_json).collect::<Vec<_>>() } ])
    }

    #[tokio::test]
    async fn global_config_is_cached_until_forced() {
        let transport = MockLedger {
            resources: vec![global_config_envelope(false)],
            ..MockLedger::default()
        };
        let mut reader = ClmmReader::new(transport, reader_config());

        let config = reader.get_global_config(false).await.unwrap();
        assert_eq!(config.protocol_fee_rate, 2000);
        assert!(!config.is_pause);
        assert_eq!(reader.transport.resource_calls.load(Ordering::SeqCst), 1);

        // second read is served from the cache
        reader.get_global_config(false).await.unwrap();
        assert_eq!(reader.transport.resource_calls.load(Ordering::SeqCst), 1);

        // force goes back to the ledger
        reader.get_global_config(true).await.unwrap();
        assert_eq!(reader.transport.resource_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn get_pool_builds_a_snapshot_from_the_resource() {
        let transport = MockLedger {
            resources: vec![global_config_envelope(false), pool_envelope(false)],
            ..MockLedger::default()
        };
        let mut reader = ClmmReader::new(transport, reader_config());

        let pool = reader.get_pool(POOL_ADDR, false).await.unwrap();

        assert_eq!(pool.address, normalize_address(POOL_ADDR).unwrap());
        assert!(!pool.is_pause);
        assert_eq!(pool.coin_amount_a, 500000);
        assert_eq!(pool.coin_amount_b, 600000);

        let snapshot = pool.snapshot();
        // coin types come from the resource's own type tag
        assert_eq!(snapshot.coin_type_a, "0x1::coin_a::A");
        assert_eq!(snapshot.coin_type_b, "0x2::coin_b::B");
        assert_eq!(snapshot.tick_spacing, 60);
        assert_eq!(snapshot.fee_rate, 2500);
        assert_eq!(snapshot.liquidity, Q64);
        assert_eq!(snapshot.current_sqrt_price, Q64);
        assert_eq!(snapshot.current_tick_index, 0);
        snapshot.validate().unwrap();
    }

    #[tokio::test]
    async fn get_pool_ors_the_global_pause_in() {
        let transport = MockLedger {
            resources: vec![global_config_envelope(true), pool_envelope(false)],
            ..MockLedger::default()
        };
        let mut reader = ClmmReader::new(transport, reader_config());

        let pool = reader.get_pool(POOL_ADDR, false).await.unwrap();
        assert!(pool.is_pause);
    }

    #[tokio::test]
    async fn get_pool_caches_and_force_refreshes() {
        let transport = MockLedger {
            resources: vec![global_config_envelope(false), pool_envelope(false)],
            ..MockLedger::default()
        };
        let mut reader = ClmmReader::new(transport, reader_config());

        reader.get_pool(POOL_ADDR, false).await.unwrap();
        let after_first = reader.transport.resource_calls.load(Ordering::SeqCst);

        // cache hit, no further transport traffic
        reader.get_pool(POOL_ADDR, false).await.unwrap();
        assert_eq!(
            reader.transport.resource_calls.load(Ordering::SeqCst),
            after_first
        );

        // force bypasses both the pool and the config cache
        reader.get_pool(POOL_ADDR, true).await.unwrap();
        assert!(reader.transport.resource_calls.load(Ordering::SeqCst) > after_first);
    }

    #[tokio::test]
    async fn get_pool_reports_missing_pools() {
        // the account exists but holds no pool resource
        let transport = MockLedger {
            resources: vec![
                global_config_envelope(false),
                (
                    normalize_address(POOL_ADDR).unwrap(),
                    json!({ "type": "0x1::coin::CoinStore<0x1::a::A>", "data": {} }),
                ),
            ],
            ..MockLedger::default()
        };
        let mut reader = ClmmReader::new(transport, reader_config());

        match reader.get_pool(POOL_ADDR, false).await {
            Err(FetchError::NotFound(what)) => assert!(what.contains("pool")),
            other => panic!("expected NotFound, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn get_pool_decodes_negative_tick_bits() {
        let (account, mut envelope) = pool_envelope(false);
        // 2^64 - 100, the pattern for tick -100
        envelope["data"]["current_tick_index"]["bits"] = json!("18446744073709551516");

        let transport = MockLedger {
            resources: vec![global_config_envelope(false), (account, envelope)],
            ..MockLedger::default()
        };
        let mut reader = ClmmReader::new(transport, reader_config());

        let pool = reader.get_pool(POOL_ADDR, false).await.unwrap();
        assert_eq!(pool.snapshot().current_tick_index, -100);
    }

    #[tokio::test]
    async fn get_ticks_pages_until_a_short_page() {
        let transport = MockLedger {
            resources: vec![global_config_envelope(false), pool_envelope(false)],
            view_pages: Mutex::new(vec![tick_page(0..512), tick_page(512..514)]),
            ..MockLedger::default()
        };
        let mut reader = ClmmReader::new(transport, reader_config());

        let pool = reader.get_pool(POOL_ADDR, false).await.unwrap();
        let ticks = reader.get_ticks(&pool).await.unwrap();

        assert_eq!(ticks.len(), 514);
        assert_eq!(ticks[0].index, 0);
        assert_eq!(ticks[513].index, 513);
        assert_eq!(ticks[513].sqrt_price, Q64 + 513);

        // cursor advanced by offset between the two calls
        let calls = reader.transport.view_args.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0][1], "0");
        assert_eq!(calls[0][2], "0");
        assert_eq!(calls[0][3], "512");
        assert_eq!(calls[1][2], "1");
    }

    #[tokio::test]
    async fn get_ticks_stops_on_an_empty_table() {
        let transport = MockLedger {
            resources: vec![global_config_envelope(false), pool_envelope(false)],
            view_pages: Mutex::new(vec![json!([ { "ticks": [] } ])]),
            ..MockLedger::default()
        };
        let mut reader = ClmmReader::new(transport, reader_config());

        let pool = reader.get_pool(POOL_ADDR, false).await.unwrap();
        let ticks = reader.get_ticks(&pool).await.unwrap();
        assert!(ticks.is_empty());
    }

    #[test]
    fn pool_resource_matching_normalizes_addresses() {
        // same package spelled short and padded
        assert!(is_pool_resource(
            "0x1234",
            "0x0000000000000000000000000000000000000000000000000000000000001234::pool::Pool<0x1::a::A, 0x2::b::B>"
        ));
        assert!(is_pool_resource(
            PKG,
            &format!("{PKG}::pool::Pool<0x1::a::A, 0x2::b::B>")
        ));

        // different package, wrong struct, no generics
        assert!(!is_pool_resource(
            "0x9999",
            &format!("{PKG}::pool::Pool<0x1::a::A, 0x2::b::B>")
        ));
        assert!(!is_pool_resource(
            PKG,
            &format!("{PKG}::position::Position<0x1::a::A, 0x2::b::B>")
        ));
        assert!(!is_pool_resource(PKG, &format!("{PKG}::pool::Pool")));
    }
}
