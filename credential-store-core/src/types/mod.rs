//! 类型定义模块

mod backend;
mod scalar;

pub use backend::BackendKind;
pub use scalar::{ScalarKind, ScalarValue};
