//! 管理端用户模型（/api/users 与 /api/dashboard/users 系列，snake_case 线格式）
//!
//! 注意与 [`crate::UserProfile`]（/auth 系列）不是同一张表的视图：
//! 管理端以手机号为主键视角，id 为数字。

use crate::RegistrationStage;
use serde::{Deserialize, Serialize};

/// 管理端用户行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_of_education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_description: Option<String>,
    #[serde(default)]
    pub registration_stage: RegistrationStage,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// 用户总览统计（/api/users/stats）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct UserStats {
    pub total_users: u64,
    pub active_users: u64,
    pub completed_registrations: u64,
    pub pending_registrations: u64,
    pub male_users: u64,
    pub female_users: u64,
    pub average_age: f64,
    pub registrations_today: u64,
    pub registrations_this_week: u64,
    pub registrations_this_month: u64,
}

/// 用户列表过滤条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatusFilter {
    All,
    Active,
    Inactive,
    Completed,
    Pending,
}

impl Default for UserStatusFilter {
    fn default() -> Self {
        UserStatusFilter::All
    }
}

impl UserStatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatusFilter::All => "all",
            UserStatusFilter::Active => "active",
            UserStatusFilter::Inactive => "inactive",
            UserStatusFilter::Completed => "completed",
            UserStatusFilter::Pending => "pending",
        }
    }
}

/// 管理端用户列表查询参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSearchParams {
    #[serde(default)]
    pub status: UserStatusFilter,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
}

impl Default for UserSearchParams {
    fn default() -> Self {
        Self {
            status: UserStatusFilter::All,
            search: String::new(),
            page: 1,
            per_page: 20,
        }
    }
}
