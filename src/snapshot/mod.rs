// 快照模块 - 接收并校验前端栅格化的报告视图位图
//
// 报告视图由 webview 渲染；导出时前端把输出面板克隆到屏幕外、
// 按滚动尺寸整体栅格化（2倍超采样），再把 PNG 位图经 base64
// 传给后端。本模块负责解码和尺寸校验，管线的后半段
// （编码 PDF/PNG 并落盘）见 export 模块。

use anyhow::Result;
use base64::{engine::general_purpose, Engine as _};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 前端上送的快照负载
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPayload {
    /// PNG 位图的 base64 编码（允许携带 data URL 前缀）
    pub data: String,
    /// 位图像素宽度（已含超采样倍率）
    pub width: u32,
    /// 位图像素高度（已含超采样倍率）
    pub height: u32,
    /// 栅格化时使用的超采样倍率
    pub scale: f32,
}

impl SnapshotPayload {
    /// 解码为位图并校验尺寸
    ///
    /// 声明尺寸与实际解码尺寸不一致视为传输错误；
    /// 1×1 之类的退化快照（源节点尺寸为0时的产物）照常接受，
    /// 作为可接受的降级行为
    pub fn decode(&self) -> Result<DynamicImage> {
        let encoded = self
            .data
            .split_once("base64,")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.data);

        if encoded.is_empty() {
            anyhow::bail!("快照数据为空");
        }

        let bytes = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| anyhow::anyhow!("快照 base64 解码失败: {}", e))?;

        let img = image::load_from_memory(&bytes)
            .map_err(|e| anyhow::anyhow!("快照位图解码失败: {}", e))?;

        if img.width() != self.width || img.height() != self.height {
            anyhow::bail!(
                "快照尺寸不一致: 声明 {}x{}, 实际 {}x{}",
                self.width,
                self.height,
                img.width(),
                img.height()
            );
        }

        if img.width() <= 1 || img.height() <= 1 {
            warn!("捕获到退化快照 ({}x{})", img.width(), img.height());
        }

        debug!(
            "快照解码完成: {}x{} (倍率 {})",
            img.width(),
            img.height(),
            self.scale
        );
        Ok(img)
    }
}
