//! # 示例应用程序
//!
//! 演示组件注册、标签注入、进程组件和事件总线。
//!
//! ```text
//! cargo run -p hello-boot -- --TICKS 3 --INTERVAL_MS 200
//! ```

use boot::{async_trait, BoxError, Component, EventBus, Injectable, LoggingConfig, Process};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{info, warn};

/// 计时事件
#[derive(Debug, Clone)]
struct Tick {
    count: u32,
}

/// 按固定间隔发布计时事件，达到次数后结束
#[derive(Default, Injectable)]
struct Ticker {
    #[boot("wire")]
    bus: Option<Arc<EventBus>>,
    #[boot("config,key:INTERVAL_MS,default:500")]
    interval_ms: u64,
    #[boot("config,key:TICKS,default:5")]
    ticks: u32,
    stop: Notify,
}

impl Component for Ticker {
    fn init(&mut self) -> Result<(), BoxError> {
        if self.ticks == 0 || self.interval_ms == 0 {
            return Err("TICKS 和 INTERVAL_MS 必须大于 0".into());
        }
        info!("计时器每 {}ms 触发一次，共 {} 次", self.interval_ms, self.ticks);
        Ok(())
    }

    fn as_process(self: Arc<Self>) -> Option<Arc<dyn Process>> {
        Some(self)
    }
}

#[async_trait]
impl Process for Ticker {
    async fn start(&self) -> Result<(), BoxError> {
        let bus = self.bus.as_ref().ok_or("事件总线未注入")?;
        let mut interval = tokio::time::interval(Duration::from_millis(self.interval_ms));
        interval.tick().await;

        for count in 1..=self.ticks {
            tokio::select! {
                _ = interval.tick() => bus.publish(Tick { count })?,
                _ = self.stop.notified() => {
                    info!("计时器在第 {} 次之前被停止", count);
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), BoxError> {
        self.stop.notify_one();
        Ok(())
    }
}

/// 订阅计时事件并记录日志
#[derive(Default, Injectable)]
struct TickLogger {
    #[boot("wire")]
    bus: Option<Arc<EventBus>>,
    #[boot("config,key:GREETING,default:'hello, boot'")]
    greeting: String,
    seen: Arc<AtomicU32>,
}

impl Component for TickLogger {
    fn init(&mut self) -> Result<(), BoxError> {
        let bus = self.bus.as_ref().ok_or("事件总线未注入")?;
        let greeting = self.greeting.clone();
        let seen = Arc::clone(&self.seen);
        bus.subscribe(move |tick: &Tick| {
            seen.fetch_add(1, Ordering::SeqCst);
            info!("{} #{}", greeting, tick.count);
        });
        bus.publish(Tick { count: 0 })?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    boot::init_logging(&LoggingConfig::default())?;

    info!("启动 hello-boot 示例应用");
    boot::register(Ticker::default)?;
    boot::register(TickLogger::default)?;

    boot::run().await?;

    match boot::session().lookup::<TickLogger>(boot::DEFAULT_NAME) {
        Some(logger) => info!("共收到 {} 个计时事件", logger.seen.load(Ordering::SeqCst)),
        None => warn!("未找到日志组件"),
    }
    info!("应用已关闭");
    Ok(())
}
