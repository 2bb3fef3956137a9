//! `#[derive(Injectable)]` 集成测试

use boot::testing::TestSession;
use boot::{
    BoxError, Component, DependencyError, EventBus, FieldKind, Flag, Injectable,
    MemoryConfigProvider, Runtime, SessionError, TypeInfo,
};
use std::sync::Arc;

trait Greeter: Send + Sync {
    fn greet(&self, who: &str) -> String;
}

#[derive(Default, Injectable)]
#[boot(export = "dyn Greeter")]
struct PoliteGreeter {
    #[boot("config,key:GREETING,default:hello")]
    greeting: String,
    #[boot("config,key:EXCLAIM")]
    exclaim: bool,
}

impl Component for PoliteGreeter {}

impl Greeter for PoliteGreeter {
    fn greet(&self, who: &str) -> String {
        let mark = if self.exclaim { "!" } else { "." };
        format!("{} {}{}", self.greeting, who, mark)
    }
}

#[derive(Default, Injectable)]
struct Reception {
    #[boot("wire")]
    greeter: Option<Arc<dyn Greeter>>,
    #[boot("wire")]
    runtime: Option<Arc<Runtime>>,
    #[boot("wire")]
    bus: Option<Arc<EventBus>>,
    #[boot("config,key:DESK,default:2")]
    desk: u16,
    welcome: String,
}

impl Component for Reception {
    fn init(&mut self) -> Result<(), BoxError> {
        let greeter = self.greeter.as_ref().ok_or("greeter missing")?;
        self.welcome = greeter.greet(&format!("desk {}", self.desk));
        Ok(())
    }
}

fn config() -> Arc<MemoryConfigProvider> {
    Arc::new(MemoryConfigProvider::new().with_value("EXCLAIM", "true"))
}

#[test]
fn test_derived_descriptors() {
    let registry = boot::ComponentRegistry::with_config_provider(config());
    let entry = registry
        .add("default", false, Reception::default())
        .unwrap();

    let fields: Vec<_> = entry.fields().iter().map(|f| (f.name, f.tag.as_str())).collect();
    assert_eq!(
        fields,
        vec![
            ("greeter", "wire"),
            ("runtime", "wire"),
            ("bus", "wire"),
            ("desk", "config,key:DESK,default:2"),
        ]
    );
    assert_eq!(
        entry.fields()[0].kind,
        FieldKind::Reference {
            target: TypeInfo::of::<dyn Greeter>()
        }
    );
    assert!(matches!(entry.fields()[3].kind, FieldKind::Value { .. }));

    let greeter = registry
        .add("default", false, PoliteGreeter::default())
        .unwrap();
    assert!(greeter.exports::<dyn Greeter>());
    assert!(greeter.exports::<PoliteGreeter>());
}

#[tokio::test]
async fn test_derived_components_run_in_session() {
    let test = TestSession::new().with_config_provider(config());
    test.register(PoliteGreeter::default).unwrap();
    test.register(Reception::default).unwrap();

    test.run().await.unwrap();

    let reception = test.session().lookup::<Reception>("default").unwrap();
    assert_eq!(reception.welcome, "hello desk 2!");
    assert!(reception.bus.is_some());
    assert!(reception.runtime.as_ref().unwrap().has_flag(Flag::UnitTest));
}

#[tokio::test]
async fn test_mocked_greeter() {
    let test = TestSession::new().with_config_provider(config());
    test.register(PoliteGreeter::default).unwrap();
    test.register(Reception::default).unwrap();
    test.mock(PoliteGreeter {
        greeting: "hi".to_string(),
        exclaim: false,
    })
    .unwrap();

    test.run().await.unwrap();

    let reception = test.session().lookup::<Reception>("default").unwrap();
    assert_eq!(reception.welcome, "hi desk 2!");
}

#[derive(Default, Injectable)]
struct Broken {
    #[boot("wire,name:'primary")]
    greeter: Option<Arc<dyn Greeter>>,
}

impl Component for Broken {}

#[tokio::test]
async fn test_tag_errors_surface_at_resolution() {
    let test = TestSession::new().with_config_provider(config());
    test.register(PoliteGreeter::default).unwrap();
    test.register(Broken::default).unwrap();

    let err = test.run().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Dependency(DependencyError::UnparsableTag { .. })
    ));
}
