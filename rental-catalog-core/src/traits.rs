//! Seams between components

use async_trait::async_trait;

/// Something that can re-fetch its current view from the service.
///
/// Actions call this after an acknowledged mutation; it is the only way a
/// list reflects the change.
#[async_trait]
pub trait Refresh: Send + Sync {
    /// 按当前查询重新加载
    async fn refresh(&self);
}
