//! 跨 crate 集成测试：会话、配置提供者、按 trait 和名称注入

use boot_common::{BoxError, Component, DependencyError};
use boot_config::{CompositeConfigProvider, EnvironmentConfigProvider, MemoryConfigProvider};
use boot_di::{Exports, Fields, Injectable};
use boot_eventbus::EventBus;
use boot_session::{Session, SessionError};
use parking_lot::Mutex;
use std::sync::Arc;

trait Storage: Send + Sync {
    fn summary(&self) -> String;
}

#[derive(Default)]
struct SqlStorage {
    url: String,
    pool: u32,
}

impl Component for SqlStorage {}

impl Storage for SqlStorage {
    fn summary(&self) -> String {
        format!("sql {} x{}", self.url, self.pool)
    }
}

impl Injectable for SqlStorage {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .value::<String>("url", "config,key:DB_URL", |s| &mut s.url)
            .value::<u32>("pool", "config,key:DB_POOL,default:4", |s| &mut s.pool);
    }

    fn export(exports: &mut Exports<Self>) {
        exports.export::<dyn Storage>(|s| s as Arc<dyn Storage>);
    }
}

#[derive(Default)]
struct MemoryStorage;

impl Component for MemoryStorage {}

impl Storage for MemoryStorage {
    fn summary(&self) -> String {
        "memory".to_string()
    }
}

impl Injectable for MemoryStorage {
    fn export(exports: &mut Exports<Self>) {
        exports.export::<dyn Storage>(|s| s as Arc<dyn Storage>);
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Saved(String);

#[derive(Default)]
struct Service {
    primary: Option<Arc<dyn Storage>>,
    cache: Option<Arc<dyn Storage>>,
    bus: Option<Arc<EventBus>>,
}

impl Component for Service {
    fn init(&mut self) -> Result<(), BoxError> {
        let primary = self.primary.as_ref().ok_or("primary storage missing")?;
        let bus = self.bus.as_ref().ok_or("event bus missing")?;
        bus.publish(Saved(primary.summary()))?;
        Ok(())
    }
}

impl Injectable for Service {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .reference::<dyn Storage>("primary", "wire", |s, v| s.primary = Some(v))
            .reference::<dyn Storage>("cache", "wire,name:cache", |s, v| s.cache = Some(v))
            .reference::<EventBus>("bus", "wire", |s, v| s.bus = Some(v));
    }
}

#[derive(Default)]
struct Audit {
    bus: Option<Arc<EventBus>>,
    saved: Arc<Mutex<Vec<Saved>>>,
}

impl Component for Audit {
    fn init(&mut self) -> Result<(), BoxError> {
        let saved = Arc::clone(&self.saved);
        self.bus
            .as_ref()
            .ok_or("event bus missing")?
            .subscribe(move |event: &Saved| saved.lock().push(event.clone()));
        Ok(())
    }
}

impl Injectable for Audit {
    fn describe(fields: &mut Fields<Self>) {
        fields.reference::<EventBus>("bus", "wire", |s, v| s.bus = Some(v));
    }
}

fn config() -> CompositeConfigProvider {
    std::env::set_var("DI_IT_DB_POOL", "16");
    CompositeConfigProvider::new()
        .with_provider(EnvironmentConfigProvider::new().with_prefix("DI_IT_"))
        .with_provider(MemoryConfigProvider::new().with_value("DB_URL", "postgres://db"))
}

#[tokio::test]
async fn test_session_wires_traits_names_and_config() -> anyhow::Result<()> {
    let session = Session::new().with_config_provider(Arc::new(config()));
    session.register(SqlStorage::default)?;
    session.register_name("cache", || MemoryStorage)?;
    session.register(Audit::default)?;
    session.register(Service::default)?;

    session.run().await?;

    let service = session
        .lookup::<Service>("default")
        .ok_or_else(|| anyhow::anyhow!("service missing"))?;
    let primary = service.primary.as_ref().unwrap();
    assert_eq!(primary.summary(), "sql postgres://db x16");
    assert_eq!(service.cache.as_ref().unwrap().summary(), "memory");

    let audit = session.lookup::<Audit>("default").unwrap();
    assert_eq!(
        *audit.saved.lock(),
        vec![Saved("sql postgres://db x16".to_string())]
    );

    let storages: Vec<_> = session
        .registry()
        .entries()
        .into_iter()
        .filter(|entry| entry.exports::<dyn Storage>())
        .map(|entry| entry.name().to_string())
        .collect();
    assert_eq!(storages, vec!["default", "cache"]);
    Ok(())
}

#[tokio::test]
async fn test_ambiguous_trait_wiring_fails_boot() {
    let session = Session::new().with_config_provider(Arc::new(config()));
    session.register(SqlStorage::default).unwrap();
    session.register(MemoryStorage::default).unwrap();
    session.register_name("cache", || MemoryStorage).unwrap();
    session.register(Service::default).unwrap();

    let err = session.run().await.unwrap_err();
    let SessionError::Dependency(DependencyError::AmbiguousDependency { candidates, .. }) = err
    else {
        panic!("expected ambiguous dependency, got {err}");
    };
    assert_eq!(candidates.len(), 2);
}
