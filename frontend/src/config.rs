//! 编译期配置模块
//!
//! 所有部署相关的配置都在编译时通过环境变量注入（见 build.rs），
//! 未注入时使用本地开发默认值。

/// REST API 基地址
///
/// - 开发：`http://localhost:4000/api`（默认）
/// - 生产：通过 `MESA_API_BASE_URL` 注入
pub const API_BASE_URL: &str = match option_env!("MESA_API_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:4000/api",
};

/// Stripe 公钥（可发布密钥，非机密）
///
/// 支付页引导跳转 Stripe 时使用；默认为测试环境占位键。
pub const STRIPE_PUBLIC_KEY: &str = match option_env!("MESA_STRIPE_PUBLIC_KEY") {
    Some(key) => key,
    None => "pk_test_placeholder",
};

/// 所有请求的统一超时（毫秒）
pub const REQUEST_TIMEOUT_MS: u32 = 10_000;
