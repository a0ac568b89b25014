//! 缓存层
//!
//! `ObjectCache` 以字符串存取，JSON 序列化由 `get_json` / `insert_json` 负责。
//! 后端以插件形式在进程启动前（`ctor`）注册到 `register` 中。

pub mod object_cache;
pub mod register;
pub mod session;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明缓存插件：生成一个在程序启动前执行的注册函数
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::SchoolError::cache_connection)?;
                        Ok::<Box<dyn $crate::cache::ObjectCache>, $crate::errors::SchoolError>(
                            Box::new(cache),
                        )
                    })
                }),
            );
        }
    };
}
