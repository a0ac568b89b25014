//! School Portal - 学校教务管理后端
//!
//! 基于 Actix Web 与 SeaORM，提供教师、学年、班级、科目、课程日志、
//! 课表、公告、通知与问询的管理接口。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis），缓存会话用户
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误类型
//! - `middlewares`: 认证、角色与限流中间件
//! - `models`: 请求、响应与业务实体
//! - `routes`: API 路由层
//! - `runtime`: 启动与关闭
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
