//! 默认会话测试
//!
//! 默认会话是进程级的，只能运行一次，所以所有断言放在同一个测试中。

use boot::{async_trait, BoxError, Component, ComponentState, Injectable, Phase, Process};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Default, Injectable)]
struct Worker {
    #[boot("config,key:BOOT_FACADE_WORKER_NAME,default:facade-worker")]
    label: String,
    release: Notify,
    stopped: AtomicBool,
}

impl Component for Worker {
    fn as_process(self: Arc<Self>) -> Option<Arc<dyn Process>> {
        Some(self)
    }
}

#[async_trait]
impl Process for Worker {
    async fn start(&self) -> Result<(), BoxError> {
        self.release.notified().await;
        Ok(())
    }

    async fn stop(&self) -> Result<(), BoxError> {
        self.stopped.store(true, Ordering::SeqCst);
        self.release.notify_one();
        Ok(())
    }
}

#[tokio::test]
async fn test_default_session_lifecycle() {
    boot::register(Worker::default).unwrap();
    assert_eq!(boot::session().phase(), Phase::Initializing);

    let task = tokio::spawn(boot::run());
    let started = async {
        loop {
            if let Some(worker) = boot::session().lookup::<Worker>("default") {
                let entry = boot::session()
                    .registry()
                    .find(&boot::TypeInfo::of::<Worker>(), "default")
                    .unwrap();
                if entry.state() == ComponentState::Started {
                    return worker;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    let worker = tokio::time::timeout(Duration::from_secs(5), started)
        .await
        .expect("worker should be started");
    assert_eq!(worker.label, "facade-worker");

    boot::shutdown();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("default session should stop")
        .unwrap()
        .unwrap();

    assert!(worker.stopped.load(Ordering::SeqCst));
    assert_eq!(boot::session().phase(), Phase::Exiting);
    assert!(matches!(
        boot::register(Worker::default),
        Err(boot::SessionError::RegistrationClosed)
    ));
}
