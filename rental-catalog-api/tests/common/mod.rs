//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use rental_catalog_api::{CreateCustomerRequest, HttpRentalApi, ListParams, RentalApi};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_server {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试邮箱
pub fn unique_test_email() -> String {
    let stamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("it-{stamp:x}@example.test")
}

/// 测试上下文 - 封装指向真实服务的客户端
pub struct TestContext {
    pub api: Arc<dyn RentalApi>,
}

impl TestContext {
    /// 从 `RENTAL_API_URL` 创建测试上下文
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("RENTAL_API_URL").ok()?;
        let api = HttpRentalApi::builder(base_url).max_retries(1).build().ok()?;
        Some(Self { api: Arc::new(api) })
    }

    /// 创建一个测试客户并返回其 id（通过邮箱反查）
    pub async fn create_test_customer(&self) -> Option<(u32, String)> {
        let email = unique_test_email();
        let request = CreateCustomerRequest {
            first_name: "Integration".to_string(),
            last_name: "Test".to_string(),
            email: email.clone(),
            store_id: Some(1),
        };
        self.api.create_customer(&request).await.ok()?;
        let id = self.find_customer_by_email(&email).await?;
        Some((id, email))
    }

    /// 按邮箱查找客户 id
    pub async fn find_customer_by_email(&self, email: &str) -> Option<u32> {
        let params = ListParams {
            query: email.to_string(),
            page: 1,
            limit: 10,
        };
        let page = self.api.list_customers(&params).await.ok()?;
        page.items
            .into_iter()
            .find(|c| c.email.as_deref() == Some(email))
            .map(|c| c.customer_id)
    }

    /// 清理测试客户
    pub async fn cleanup_customer(&self, customer_id: u32) {
        let _ = self.api.delete_customer(customer_id).await;
    }
}
