//! Cafe Core - 点单核心
//!
//! # 架构概述
//!
//! 菜单浏览之后、下单支付之前的全部业务逻辑：
//!
//! - **菜单缓存** (`catalog`): 每个会话加载一次的菜单与配料
//! - **购物车** (`cart`): 自定义商品行，相同配置自动合并
//! - **计价** (`pricing`): 纯函数，Decimal 计算
//! - **状态** (`store`): 可观察的购物车 / 结账字段，redb 持久化
//! - **结账** (`checkout`): 校验、提交、支付状态轮询
//! - **配送位置** (`location`): 搜索防抖、GPS 反向地理编码
//!
//! # 模块结构
//!
//! ```text
//! cafe-core/src/
//! ├── core/          # 配置
//! ├── catalog/       # 菜单缓存
//! ├── cart/          # 购物车
//! ├── pricing/       # 计价
//! ├── store/         # 状态 + 持久化
//! ├── checkout/      # 结账流程
//! ├── location/      # 配送位置
//! └── utils/         # 日志
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod core;
pub mod location;
pub mod pricing;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use cart::{AddOutcome, CartLedger, LineSelection};
pub use catalog::{CatalogCache, CatalogSnapshot};
pub use checkout::{
    CheckoutError, CheckoutField, CheckoutOrchestrator, CheckoutSettings, CheckoutState,
    FieldErrors, PollConfig,
};
pub use core::Config;
pub use location::{LocationError, LocationResolver, PositionSource, SearchOutcome};
pub use pricing::Totals;
pub use store::{CafeStore, StateStorage, StoreEvent, StoreState};

// Re-export logger functions
pub use utils::logger::{init_from_config, init_logger, init_logger_with_file};

/// Open the configured store: redb-backed when `state_path` is set,
/// in-memory otherwise.
pub fn open_store(config: &Config) -> store::StorageResult<CafeStore> {
    match &config.state_path {
        Some(path) => {
            tracing::info!(path = %path, "Opening state storage");
            CafeStore::restore(StateStorage::open(path)?)
        }
        None => Ok(CafeStore::default()),
    }
}
