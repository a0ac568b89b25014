pub mod academic_years;

pub mod announcements;

pub mod auth;

pub mod classes;

pub mod dashboard;

pub mod files;

pub mod inquests;

pub mod lessons;

pub mod notifications;

pub mod schedules;

pub mod subjects;

pub mod system;

pub mod teachers;

#[cfg(test)]
pub(crate) mod test_support;

pub use academic_years::configure_academic_year_routes;
pub use announcements::configure_announcement_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use dashboard::configure_dashboard_routes;
pub use files::configure_file_routes;
pub use inquests::configure_inquest_routes;
pub use lessons::configure_lesson_routes;
pub use notifications::configure_notification_routes;
pub use schedules::configure_schedule_routes;
pub use subjects::configure_subject_routes;
pub use system::configure_system_routes;
pub use teachers::configure_teacher_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_teacher_routes)
        .configure(configure_academic_year_routes)
        .configure(configure_classes_routes)
        .configure(configure_subject_routes)
        .configure(configure_lesson_routes)
        .configure(configure_schedule_routes)
        .configure(configure_announcement_routes)
        .configure(configure_notification_routes)
        .configure(configure_inquest_routes)
        .configure(configure_file_routes)
        .configure(configure_dashboard_routes)
        .configure(configure_system_routes);
}
