use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod protocol;
pub mod query;

pub use query::{ListQuery, Sort, SortDirection};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// 列表页默认每页条数
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// =========================================================
// 会话与用户 (Session & User)
// =========================================================

/// 已认证用户信息，由登录/注册/会话检查接口返回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// 认证接口响应：令牌 + 用户信息总是成对出现
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

// =========================================================
// 分页信封 (Pagination Envelope)
// =========================================================

/// 列表接口的响应信封
///
/// `items` 与分页元数据一起返回，是列表视图状态的唯一数据来源。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// 空结果集（首页，共 0 页）
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 0,
        }
    }
}

// =========================================================
// 预订 (Reservations)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Seated,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "待确认",
            Self::Confirmed => "已确认",
            Self::Seated => "已入座",
            Self::Completed => "已完成",
            Self::Cancelled => "已取消",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub customer_name: String,
    pub phone: String,
    pub party_size: u32,
    pub date: NaiveDate,
    /// "19:30" 格式的到店时间
    pub time: String,
    pub table: Option<String>,
    pub status: ReservationStatus,
    #[serde(default)]
    pub notes: String,
}

/// 创建/更新预订的请求体（无 id，由服务端分配）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDraft {
    pub customer_name: String,
    pub phone: String,
    pub party_size: u32,
    pub date: NaiveDate,
    pub time: String,
    pub table: Option<String>,
    pub status: ReservationStatus,
    pub notes: String,
}

// =========================================================
// 库存 (Inventory)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: f64,
    /// 计量单位，如 "kg"、"瓶"
    pub unit: String,
    /// 低于该值视为需补货
    pub reorder_level: f64,
    pub supplier: Option<String>,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.reorder_level
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemDraft {
    pub name: String,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    pub reorder_level: f64,
    pub supplier: Option<String>,
}

// =========================================================
// 后端服务配置 (Service Configuration)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub id: String,
    pub name: String,
    pub endpoint_url: String,
    pub environment: String,
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfigDraft {
    pub name: String,
    pub endpoint_url: String,
    pub environment: String,
    pub enabled: bool,
    pub description: String,
}

// =========================================================
// 第三方集成 (Integrations)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: String,
    /// 供应商标识，如 "stripe"、"s3"
    pub provider: String,
    pub display_name: String,
    pub enabled: bool,
    pub webhook_url: Option<String>,
    /// 服务端只回传掩码后的密钥尾部
    pub api_key_suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationDraft {
    pub provider: String,
    pub display_name: String,
    pub enabled: bool,
    pub webhook_url: Option<String>,
    /// 仅在创建/轮换时提交完整密钥
    pub api_key: Option<String>,
}

// =========================================================
// 部署 (Deployments)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    #[default]
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl DeploymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Queued => "排队中",
            Self::Running => "进行中",
            Self::Succeeded => "成功",
            Self::Failed => "失败",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    /// 被部署的应用名
    pub application: String,
    pub version: String,
    pub environment: String,
    pub status: DeploymentStatus,
    pub deployed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDraft {
    pub application: String,
    pub version: String,
    pub environment: String,
}

// =========================================================
// 支付 (Payments) —— 只读，创建走 Stripe
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Refunded,
    Failed,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "处理中",
            Self::Succeeded => "已支付",
            Self::Refunded => "已退款",
            Self::Failed => "失败",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub reservation_id: Option<String>,
    /// 以最小货币单位计（分）
    pub amount_cents: i64,
    pub currency: String,
    /// 支付方式，如 "card"、"cash"
    pub method: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// 格式化金额，如 12305 -> "123.05"
    pub fn amount_display(&self) -> String {
        format!("{}.{:02}", self.amount_cents / 100, self.amount_cents % 100)
    }
}

// =========================================================
// 报表 (Reports)
// =========================================================

/// 仪表盘汇总数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_reservations: u64,
    pub upcoming_reservations: u64,
    pub low_stock_items: u64,
    pub revenue_cents: i64,
    pub failed_deployments: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_envelope_parses_camel_case() {
        let json = r#"{"items":[{"id":"1","name":"John","email":"john@example.com"}],"currentPage":2,"totalPages":3}"#;
        let page: Page<UserInfo> = serde_json::from_str(json).unwrap();
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items[0].name, "John");
    }

    #[test]
    fn payment_amount_display() {
        let p = Payment {
            id: "p1".into(),
            reservation_id: None,
            amount_cents: 12305,
            currency: "EUR".into(),
            method: "card".into(),
            status: PaymentStatus::Succeeded,
            created_at: Utc::now(),
        };
        assert_eq!(p.amount_display(), "123.05");
    }

    #[test]
    fn low_stock_threshold_is_strict() {
        let mut item = InventoryItem {
            id: "i1".into(),
            name: "Olive oil".into(),
            category: "pantry".into(),
            quantity: 5.0,
            unit: "L".into(),
            reorder_level: 5.0,
            supplier: None,
        };
        assert!(!item.is_low_stock());
        item.quantity = 4.9;
        assert!(item.is_low_stock());
    }
}
