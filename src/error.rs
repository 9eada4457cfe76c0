use std::collections::TryReserveError;

use thiserror::Error;

/// 遍历与极大对枚举过程中的错误。
///
/// 任一回调返回错误都会立即终止整个遍历，已经写入 sink 的结果不会撤回。
#[derive(Debug, Error)]
pub enum EsaError {
    /// 输出端拒绝了一个极大对（例如写文件失败），原样向上传递
    #[error("pair sink failed: {0}")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 后缀/LCP 数据源给出了不一致的事件序列
    #[error("corrupt suffix array source: {0}")]
    CorruptSource(String),

    /// 位置表扩容失败
    #[error("position arena allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}

impl EsaError {
    pub fn sink<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        EsaError::Sink(err.into())
    }
}
