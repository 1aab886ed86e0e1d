// 导出模块 - 把当前报告视图的快照落盘为 PDF 或 PNG
//
// 管线：前端栅格化快照 -> 解码校验 -> 编码器分发 -> 写入下载目录。
// 同一时间只允许一个导出在进行，新的请求直接忽略（无取消机制，
// 已开始的导出只能跑到结束或出错）。

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::event_bus::{AppEvent, EventBus};
use crate::models::{ExportFormat, ExportSettings};
use crate::snapshot::SnapshotPayload;

pub mod pdf;
pub mod png;

/// 进行中标志的作用域守卫
///
/// 持有守卫即持有唯一的导出权；Drop 时清除标志，
/// 成功、解码失败、编码失败等所有退出路径都会释放，
/// 应用不会卡死在"下载中"状态
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    /// 尝试占用导出权，已被占用时返回 None
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
            .then(|| Self { flag: flag.clone() })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// 导出管理器
pub struct ExportManager {
    /// 输出目录（下载目录）
    output_dir: PathBuf,
    /// 导出设置
    settings: ExportSettings,
    /// 进行中标志
    exporting: Arc<AtomicBool>,
    /// 事件总线（导出生命周期通知）
    event_bus: Arc<EventBus>,
}

impl ExportManager {
    pub fn new(output_dir: PathBuf, settings: ExportSettings, event_bus: Arc<EventBus>) -> Self {
        Self {
            output_dir,
            settings,
            exporting: Arc::new(AtomicBool::new(false)),
            event_bus,
        }
    }

    /// 是否有导出在进行中
    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::SeqCst)
    }

    /// 当前导出设置
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// 指定格式的输出文件路径（固定文件名，重复导出覆盖）
    pub fn output_path(&self, format: ExportFormat) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.settings.file_stem, format.extension()))
    }

    /// 执行一次导出
    ///
    /// # 返回
    /// - `Ok(Some(path))`: 导出完成，返回落盘路径
    /// - `Ok(None)`: 已有导出在进行中，本次请求被忽略（静默无操作）
    /// - `Err(_)`: 解码/编码/写盘失败（进行中标志已释放）
    pub async fn export(
        &self,
        payload: SnapshotPayload,
        format: ExportFormat,
    ) -> Result<Option<PathBuf>> {
        let Some(_guard) = InFlightGuard::acquire(&self.exporting) else {
            warn!("已有导出在进行中，忽略本次 {:?} 请求", format);
            return Ok(None);
        };

        info!(
            "开始导出 {:?}: 快照 {}x{} (倍率 {})",
            format, payload.width, payload.height, payload.scale
        );
        self.event_bus.publish(AppEvent::ExportStarted { format });

        match self.run(&payload, format).await {
            Ok(path) => {
                info!("导出完成: {:?}", path);
                self.event_bus.publish(AppEvent::ExportCompleted {
                    format,
                    path: path.clone(),
                });
                Ok(Some(path))
            }
            Err(e) => {
                error!("导出失败: {}", e);
                self.event_bus.publish(AppEvent::ExportFailed {
                    format,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
        // _guard 在此离开作用域，进行中标志随之清除
    }

    async fn run(&self, payload: &SnapshotPayload, format: ExportFormat) -> Result<PathBuf> {
        let img = payload.decode()?;

        let bytes = match format {
            ExportFormat::Pdf => pdf::encode(&img, self.settings.page_format)?,
            ExportFormat::Png => png::encode(&img)?,
        };

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_path(format);
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }
}
