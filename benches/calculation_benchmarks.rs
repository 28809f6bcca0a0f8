//! Performance benchmarks for the payroll engine.
//!
//! Covers the pure pipeline over in-memory records at increasing attendance
//! volumes, the social-insurance lookup, and one full HTTP round trip
//! against the bundled configuration.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::hint::black_box;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveTime};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::{DeductionSchedule, DeductionTier, ScheduleBounds, calculate_wage};
use payroll_engine::config::ConfigLoader;
use payroll_engine::models::{AttendanceRecord, DateRange, Employee};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// The standard 44-tier table.
fn create_schedule() -> DeductionSchedule {
    let mut tiers = Vec::new();
    let mut lower = dec("3250");
    let mut amount = dec("157.50");
    while lower < dec("24750") {
        tiers.push(DeductionTier {
            lower_bound: lower,
            upper_bound: lower + dec("499.99"),
            amount,
        });
        lower += dec("500");
        amount += dec("22.50");
    }
    tiers.push(DeductionTier {
        lower_bound: dec("24750"),
        upper_bound: dec("24750"),
        amount: dec("1125"),
    });
    DeductionSchedule::new(tiers, ScheduleBounds::default())
}

fn create_employees(count: u32) -> Vec<Employee> {
    (0..count)
        .map(|i| Employee {
            employee_id: 10001 + i,
            hourly_rate: dec("357.14"),
            ..Default::default()
        })
        .collect()
}

/// One record per employee per day of 2024, alternating on-time and late starts.
fn create_attendance(employees: u32, days: i64) -> Vec<AttendanceRecord> {
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let on_time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
    let late = NaiveTime::from_hms_opt(8, 42, 0).unwrap();
    let out = NaiveTime::from_hms_opt(17, 30, 0).unwrap();

    (0..days)
        .flat_map(|d| {
            (0..employees).map(move |e| AttendanceRecord {
                employee_id: 10001 + e,
                date: first + Duration::days(d),
                time_in: if (d + i64::from(e)) % 2 == 0 { on_time } else { late },
                time_out: out,
            })
        })
        .collect()
}

fn bench_single_month(c: &mut Criterion) {
    let schedule = create_schedule();
    let employees = create_employees(10);
    let attendance = create_attendance(10, 30);
    let range = DateRange::month_range(2024, 1).unwrap();

    c.bench_function("single_month", |b| {
        b.iter(|| {
            calculate_wage(
                &schedule,
                &employees,
                &attendance,
                black_box(10003),
                black_box(&range),
            )
            .unwrap()
        })
    });
}

/// Whole-file scans dominate, so time grows with the attendance file size.
fn bench_scaling(c: &mut Criterion) {
    let schedule = create_schedule();
    let employees = create_employees(100);
    let range = DateRange::month_range(2024, 6).unwrap();

    let mut group = c.benchmark_group("attendance_scaling");
    for days in [30i64, 90, 180, 366] {
        let attendance = create_attendance(100, days);
        group.throughput(Throughput::Elements(attendance.len() as u64));
        group.bench_with_input(BenchmarkId::new("records", attendance.len()), &attendance, |b, records| {
            b.iter(|| calculate_wage(&schedule, &employees, records, 10050, &range).unwrap())
        });
    }
    group.finish();
}

fn bench_schedule_lookup(c: &mut Criterion) {
    let schedule = create_schedule();
    let wages: Vec<Decimal> = (0..100).map(|i| Decimal::new(2_000 + i * 250, 0)).collect();

    c.bench_function("schedule_lookup_100", |b| {
        b.iter(|| {
            wages
                .iter()
                .map(|w| schedule.apply(black_box(*w), 1).amount)
                .sum::<Decimal>()
        })
    });
}

fn bench_http_round_trip(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = ConfigLoader::load("./config").expect("Failed to load config");
    let router = create_router(AppState::new(config));
    let body = r#"{"employee_id": 10001, "month": "06"}"#;

    c.bench_function("http_wage_month", |b| {
        b.iter(|| {
            rt.block_on(async {
                let response = router
                    .clone()
                    .oneshot(
                        Request::builder()
                            .method("POST")
                            .uri("/wage")
                            .header("Content-Type", "application/json")
                            .body(Body::from(body))
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                black_box(response)
            })
        })
    });
}

criterion_group!(
    benches,
    bench_single_month,
    bench_scaling,
    bench_schedule_lookup,
    bench_http_round_trip,
);
criterion_main!(benches);
