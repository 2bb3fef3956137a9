//! 会话

use crate::errors::{SessionError, SessionResult};
use crate::phase::Phase;
use crate::process::{self, ProcessManager};
use crate::runtime::{Flag, Runtime};
use boot_common::{DependencyResult, DEFAULT_NAME};
use boot_config::ConfigProvider;
use boot_di::{ComponentRegistry, Injectable};
use boot_eventbus::EventBus;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

type Factory = Box<dyn FnOnce(&ComponentRegistry) -> DependencyResult<()> + Send>;

/// 会话，管理组件从注册到退出的整个生命周期
///
/// 组件在 [`Phase::Initializing`] 阶段以工厂的形式注册，
/// 直到 [`run`](Session::run) 时才被创建。
pub struct Session {
    id: Uuid,
    phase: Mutex<Phase>,
    factories: Mutex<Vec<Factory>>,
    registry: Arc<ComponentRegistry>,
    bus: EventBus,
    runtime: Runtime,
    shutdown: Arc<Notify>,
}

impl Session {
    /// 以标准模式创建会话
    pub fn new() -> Self {
        Self::with_flags([Flag::Standard])
    }

    /// 以指定的运行时标志创建会话
    pub fn with_flags(flags: impl IntoIterator<Item = Flag>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            phase: Mutex::new(Phase::Initializing),
            factories: Mutex::new(Vec::new()),
            registry: Arc::new(ComponentRegistry::new()),
            bus: EventBus::new(),
            runtime: Runtime::new(flags),
            shutdown: Arc::new(Notify::new()),
        };

        let runtime = session.runtime.clone();
        session.enqueue(DEFAULT_NAME.to_string(), false, move || runtime);
        let bus = session.bus.clone();
        session.enqueue(DEFAULT_NAME.to_string(), false, move || bus);
        session
    }

    /// 替换配置提供者，只能在注册组件之前的构建阶段调用
    pub fn with_config_provider(mut self, provider: Arc<dyn ConfigProvider>) -> Self {
        self.registry = Arc::new(ComponentRegistry::with_config_provider(provider));
        self
    }

    /// 会话标识，记录在日志字段中
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 当前启动阶段
    pub fn phase(&self) -> Phase {
        *self.phase.lock()
    }

    /// 运行时标志
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// 组件注册表
    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// 当前生效的事件总线
    ///
    /// 组件创建之后，如果默认事件总线被覆盖，返回覆盖后的实例。
    pub fn event_bus(&self) -> EventBus {
        self.registry
            .lookup::<EventBus>(DEFAULT_NAME)
            .map(|bus| (*bus).clone())
            .unwrap_or_else(|| self.bus.clone())
    }

    /// 查找已初始化的组件
    pub fn lookup<U>(&self, name: &str) -> Option<Arc<U>>
    where
        U: ?Sized + Send + Sync + 'static,
    {
        self.registry.lookup::<U>(name)
    }

    /// 以默认名称注册组件工厂
    pub fn register<T, F>(&self, factory: F) -> SessionResult<()>
    where
        T: Injectable,
        F: FnOnce() -> T + Send + 'static,
    {
        self.register_factory(DEFAULT_NAME, false, factory)
    }

    /// 以指定名称注册组件工厂
    pub fn register_name<T, F>(&self, name: &str, factory: F) -> SessionResult<()>
    where
        T: Injectable,
        F: FnOnce() -> T + Send + 'static,
    {
        self.register_factory(name, false, factory)
    }

    /// 以默认名称注册组件工厂，替换同类型的已有注册
    pub fn override_component<T, F>(&self, factory: F) -> SessionResult<()>
    where
        T: Injectable,
        F: FnOnce() -> T + Send + 'static,
    {
        self.register_factory(DEFAULT_NAME, true, factory)
    }

    /// 以指定名称注册组件工厂，替换同类型同名称的已有注册
    pub fn override_name<T, F>(&self, name: &str, factory: F) -> SessionResult<()>
    where
        T: Injectable,
        F: FnOnce() -> T + Send + 'static,
    {
        self.register_factory(name, true, factory)
    }

    fn register_factory<T, F>(&self, name: &str, override_existing: bool, factory: F) -> SessionResult<()>
    where
        T: Injectable,
        F: FnOnce() -> T + Send + 'static,
    {
        if name.is_empty() {
            return Err(SessionError::InvalidRegistration);
        }
        let phase = self.phase.lock();
        if *phase != Phase::Initializing {
            return Err(SessionError::RegistrationClosed);
        }
        self.enqueue(name.to_string(), override_existing, factory);
        Ok(())
    }

    fn enqueue<T, F>(&self, name: String, override_existing: bool, factory: F)
    where
        T: Injectable,
        F: FnOnce() -> T + Send + 'static,
    {
        self.factories.lock().push(Box::new(move |registry: &ComponentRegistry| {
            registry
                .add(name, override_existing, factory())
                .map(|_| ())
        }));
    }

    /// 当前阶段为 `expected` 时进入下一阶段
    pub(crate) fn next_phase_after(&self, expected: Phase) -> SessionResult<Phase> {
        let mut phase = self.phase.lock();
        if *phase != expected {
            return Err(SessionError::PhaseMismatch {
                current: *phase,
                expected,
            });
        }
        let next = phase.next();
        debug!("启动阶段从 {} 切换到 {}", *phase, next);
        *phase = next;
        Ok(next)
    }

    /// 启动会话并阻塞到关闭
    ///
    /// 依次创建组件、解析依赖、启动进程、激活事件总线，
    /// 然后等待关闭请求或所有进程结束，最后按逆序停止进程。
    pub async fn run(&self) -> SessionResult<()> {
        self.next_phase_after(Phase::Initializing)?;
        info!(session = %self.id, "会话启动");

        self.create_components()?;
        let resolved = self.registry.resolve_all()?;

        self.next_phase_after(Phase::Booting)?;
        let processes = ProcessManager::new(resolved);
        let handles = processes.start();
        debug!("已启动 {} 个进程组件", processes.len());

        let shutdown = Arc::clone(&self.shutdown);
        let watcher = tokio::spawn(async move {
            debug!("等待所有进程组件结束");
            process::wait_all(handles).await;
            shutdown.notify_one();
        });

        match self.event_bus().activate() {
            Ok(()) => self.wait_for_shutdown().await,
            Err(e) => error!("事件总线激活失败，会话即将关闭: {}", e),
        }

        if let Err(e) = self.next_phase_after(Phase::Running) {
            error!("停止组件时阶段错误: {}", e);
        }
        processes.stop().await;
        watcher.abort();
        debug!("已停止 {} 个进程组件", processes.len());

        self.next_phase_after(Phase::Stopping)?;
        info!(session = %self.id, "会话结束");
        Ok(())
    }

    /// 请求关闭会话，效果等同于收到 SIGTERM
    pub fn shutdown(&self) {
        debug!(session = %self.id, "请求关闭");
        self.shutdown.notify_one();
    }

    fn create_components(&self) -> SessionResult<()> {
        let factories = std::mem::take(&mut *self.factories.lock());
        for create in factories {
            create(&self.registry)?;
        }
        debug!("已创建 {} 个组件", self.registry.len());
        Ok(())
    }

    async fn wait_for_shutdown(&self) {
        tokio::select! {
            _ = self.shutdown.notified() => debug!("收到关闭请求"),
            _ = interrupt() => warn!("捕获中断信号，开始优雅关闭"),
            _ = terminate() => debug!("收到 SIGTERM，开始关闭"),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("phase", &self.phase())
            .field("runtime", &self.runtime)
            .finish()
    }
}

async fn interrupt() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("无法监听中断信号: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            warn!("无法监听 SIGTERM: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
