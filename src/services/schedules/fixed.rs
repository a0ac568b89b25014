//! 固定课表
//!
//! 表头为 `day,period,start_time,end_time,class,subject,teacher,room`，
//! `teacher` 与 `room` 可省略。优先读取 `schedule.fixed_csv_path`，
//! 文件不存在时使用编译进二进制的 `assets/fixed-schedule.csv`。
//! 首次成功加载后缓存在进程内。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveTime;
use once_cell::sync::OnceCell;
use rust_embed::Embed;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolError};
use crate::models::schedules::entities::FixedScheduleRow;
use crate::models::schedules::responses::FixedScheduleResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::date::parse_weekday;

const EMBEDDED_FILE: &str = "fixed-schedule.csv";
const REQUIRED_COLUMNS: [&str; 6] = ["day", "period", "start_time", "end_time", "class", "subject"];

#[derive(Embed)]
#[folder = "assets/"]
struct ScheduleAssets;

static FIXED_SCHEDULE: OnceCell<Vec<FixedScheduleRow>> = OnceCell::new();

fn normalize_time(value: &str) -> Option<String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .ok()
        .map(|t| t.format("%H:%M").to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 解析 CSV；缺少必需列时报错，格式错误的行记录警告后跳过
pub fn parse_fixed_schedule<R: Read>(reader: R) -> Result<Vec<FixedScheduleRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header_map: HashMap<String, usize> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_ascii_lowercase(), i))
        .collect();

    let mut idx = [0usize; 6];
    for (slot, column) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = *header_map.get(column).ok_or_else(|| {
            SchoolError::csv_parse(format!("固定课表缺少必需列: {column}"))
        })?;
    }
    let [day_idx, period_idx, start_idx, end_idx, class_idx, subject_idx] = idx;
    let teacher_idx = header_map.get("teacher").copied();
    let room_idx = header_map.get("room").copied();

    let mut rows = Vec::new();
    for (row_num, result) in rdr.records().enumerate() {
        // 行号从 1 开始并跳过表头
        let line = row_num + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping fixed schedule line {}: {}", line, e);
                continue;
            }
        };
        let field = |i: usize| record.get(i).unwrap_or("").trim();

        let Some(day_of_week) = parse_weekday(field(day_idx)) else {
            tracing::warn!("Skipping fixed schedule line {}: invalid day", line);
            continue;
        };
        let Some(period) = field(period_idx).parse::<i32>().ok().filter(|p| *p >= 1) else {
            tracing::warn!("Skipping fixed schedule line {}: invalid period", line);
            continue;
        };
        let (Some(start_time), Some(end_time)) =
            (normalize_time(field(start_idx)), normalize_time(field(end_idx)))
        else {
            tracing::warn!("Skipping fixed schedule line {}: invalid time", line);
            continue;
        };
        if start_time >= end_time {
            tracing::warn!("Skipping fixed schedule line {}: start not before end", line);
            continue;
        }
        let class = field(class_idx);
        let subject = field(subject_idx);
        if class.is_empty() || subject.is_empty() {
            tracing::warn!("Skipping fixed schedule line {}: missing class or subject", line);
            continue;
        }

        rows.push(FixedScheduleRow {
            day_of_week,
            period,
            start_time,
            end_time,
            class: class.to_string(),
            subject: subject.to_string(),
            teacher: optional(teacher_idx.and_then(|i| record.get(i))),
            room: optional(room_idx.and_then(|i| record.get(i))),
        });
    }

    Ok(rows)
}

fn load_fixed_schedule() -> Result<Vec<FixedScheduleRow>> {
    let path = &AppConfig::get().schedule.fixed_csv_path;
    if !path.is_empty() && Path::new(path).exists() {
        tracing::info!("Loading fixed schedule from {}", path);
        let file = std::fs::File::open(path)?;
        return parse_fixed_schedule(file);
    }

    let embedded = ScheduleAssets::get(EMBEDDED_FILE)
        .ok_or_else(|| SchoolError::not_found("内置固定课表不存在"))?;
    tracing::info!("Loading embedded fixed schedule");
    parse_fixed_schedule(embedded.data.as_ref())
}

/// 固定课表（进程内缓存）
pub fn fixed_schedule() -> Result<&'static [FixedScheduleRow]> {
    FIXED_SCHEDULE
        .get_or_try_init(load_fixed_schedule)
        .map(Vec::as_slice)
}

fn fixed_schedule_response(rows: Result<&[FixedScheduleRow]>) -> HttpResponse {
    match rows {
        Ok(rows) => HttpResponse::Ok().json(ApiResponse::success(
            FixedScheduleResponse {
                items: rows.to_vec(),
            },
            "Fixed schedule retrieved successfully",
        )),
        Err(e) => {
            tracing::error!("Fixed schedule unavailable: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FixedScheduleUnavailable,
                "Fixed schedule is unavailable",
            ))
        }
    }
}

pub async fn get_fixed_schedule(_request: &HttpRequest) -> ActixResult<HttpResponse> {
    Ok(fixed_schedule_response(fixed_schedule()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let csv = "day,period,start_time,end_time,class,subject,teacher,room\n\
                   Monday,1,08:00,08:45,7A,Math,jdoe,A1\n\
                   tue,2,9:00,09:45,7B,Science,,\n";
        let rows = parse_fixed_schedule(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].day_of_week, 1);
        assert_eq!(rows[0].teacher.as_deref(), Some("jdoe"));
        assert_eq!(rows[1].day_of_week, 2);
        assert_eq!(rows[1].start_time, "09:00");
        assert_eq!(rows[1].teacher, None);
        assert_eq!(rows[1].room, None);
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let csv = "Class,Subject,Day,Period,Start_Time,End_Time\n7A,Art,5,3,10:00,10:45\n";
        let rows = parse_fixed_schedule(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].day_of_week, 5);
        assert_eq!(rows[0].class, "7A");
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let csv = "day,period,start_time,end_time,class,subject\n\
                   Someday,1,08:00,08:45,7A,Math\n\
                   Monday,zero,08:00,08:45,7A,Math\n\
                   Monday,1,09:00,08:00,7A,Math\n\
                   Monday,1,08:00,08:45,,Math\n\
                   Monday,1,08:00,08:45,7A,Math\n";
        let rows = parse_fixed_schedule(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_missing_column_fails() {
        let csv = "day,period,start_time,class,subject\nMonday,1,08:00,7A,Math\n";
        let err = parse_fixed_schedule(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("end_time"));
    }

    #[test]
    fn test_embedded_copy_parses() {
        let embedded = ScheduleAssets::get(EMBEDDED_FILE).unwrap();
        let rows = parse_fixed_schedule(embedded.data.as_ref()).unwrap();
        assert!(!rows.is_empty());
    }

    #[test]
    fn test_load_failure_is_internal_error() {
        let resp = fixed_schedule_response(Err(SchoolError::not_found("fixed-schedule.csv")));
        assert_eq!(resp.status(), actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);

        let ok = fixed_schedule_response(Ok(&[][..]));
        assert_eq!(ok.status(), actix_web::http::StatusCode::OK);
    }
}
