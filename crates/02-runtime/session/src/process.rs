//! 进程管理
//!
//! 实现了 [`Process`] 的组件在初始化之后启动，在关闭时按初始化的逆序停止。
//! 每个进程运行在独立的 tokio 任务上，启动或停止中的 panic 只影响该组件的状态。

use boot_common::{panic_message, BoxError, ComponentState, Process};
use boot_di::ComponentEntry;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// 管理一组进程组件的启动和停止
pub struct ProcessManager {
    processes: Vec<(Arc<ComponentEntry>, Arc<dyn Process>)>,
}

impl ProcessManager {
    /// 从已解析的条目中挑出进程组件，保持初始化顺序
    pub fn new(entries: impl IntoIterator<Item = Arc<ComponentEntry>>) -> Self {
        let processes = entries
            .into_iter()
            .filter_map(|entry| entry.process().map(|process| (entry, process)))
            .collect();
        Self { processes }
    }

    /// 进程组件数量
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// 是否没有进程组件
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// 启动所有已初始化的进程，返回每个进程任务的句柄
    ///
    /// 任务在 `Process::start` 返回后结束。正常返回时组件进入 `Stopped`，
    /// 返回错误或 panic 时进入 `Failed`。
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(self.processes.len());
        for (entry, process) in &self.processes {
            if !entry.transition(ComponentState::Initialized, ComponentState::Started) {
                warn!("组件 {} 状态为 {}，跳过启动", entry.full_name(), entry.state());
                continue;
            }
            debug!("启动组件: {}", entry.full_name());

            let entry = Arc::clone(entry);
            let process = Arc::clone(process);
            handles.push(tokio::spawn(async move {
                match supervise(async move { process.start().await }).await {
                    Ok(()) => {
                        if entry.transition(ComponentState::Started, ComponentState::Stopped) {
                            info!("组件 {} 已结束运行", entry.full_name());
                        }
                    }
                    Err(message) => {
                        if entry.transition(ComponentState::Started, ComponentState::Failed) {
                            error!("组件 {} 运行失败: {}", entry.full_name(), message);
                        }
                    }
                }
            }));
        }
        handles
    }

    /// 按逆序停止所有仍处于 `Started` 状态的进程
    pub async fn stop(&self) {
        for (entry, process) in self.processes.iter().rev() {
            if entry.state() != ComponentState::Started {
                continue;
            }
            debug!("停止组件: {}", entry.full_name());

            let process = Arc::clone(process);
            match supervise(async move { process.stop().await }).await {
                Ok(()) => {
                    entry.transition(ComponentState::Started, ComponentState::Stopped);
                }
                Err(message) => {
                    error!("组件 {} 停止失败: {}", entry.full_name(), message);
                    entry.transition(ComponentState::Started, ComponentState::Failed);
                }
            }
        }
    }
}

/// 在独立任务中执行用户代码，把错误和 panic 统一为消息
async fn supervise<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    match tokio::spawn(future).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(join) if join.is_panic() => {
            Err(format!("发生 panic: {}", panic_message(&*join.into_panic())))
        }
        Err(join) => Err(join.to_string()),
    }
}

/// 等待所有进程任务结束
pub(crate) async fn wait_all(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if let Err(e) = handle.await {
            error!("进程任务异常结束: {}", e);
        }
    }
}
