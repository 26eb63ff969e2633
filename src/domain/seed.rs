// src/domain/seed.rs
// In-memory datasets the console starts with. Tourist timestamps are relative
// to `now` so the registry always looks live.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::audit_log::AuditLogEntry;
use super::incident::{Incident, IncidentKind, IncidentStatus, Severity};
use super::tourist::{Tourist, TouristStatus};
use super::user::{AccountStatus, OperatorAccount};
use super::zone::{AlertMode, RiskLevel, Zone, ZoneShape};
use crate::listing::value::parse_timestamp;

fn at(raw: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or_default()
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

struct TouristRow {
    name: &'static str,
    nationality: &'static str,
    document_type: &'static str,
    document_number: &'static str,
    location: &'static str,
    coordinates: (f64, f64),
    safety_score: f64,
    status: TouristStatus,
    checked_in_minutes_ago: i64,
    registered_days_ago: i64,
    hash: &'static str,
}

const TOURISTS: &[TouristRow] = &[
    TouristRow {
        name: "Sarah Johnson",
        nationality: "United States",
        document_type: "Passport",
        document_number: "US123456789",
        location: "India Gate, New Delhi",
        coordinates: (28.6129, 77.2295),
        safety_score: 85.0,
        status: TouristStatus::Active,
        checked_in_minutes_ago: 30,
        registered_days_ago: 3,
        hash: "0x1a2b3c4d5e6f7890abcdef1234567890",
    },
    TouristRow {
        name: "Raj Patel",
        nationality: "India",
        document_type: "Aadhaar",
        document_number: "1234 5678 9012",
        location: "Red Fort, New Delhi",
        coordinates: (28.6562, 77.2410),
        safety_score: 72.0,
        status: TouristStatus::Active,
        checked_in_minutes_ago: 60,
        registered_days_ago: 2,
        hash: "0x2b3c4d5e6f7890abcdef1234567890ab",
    },
    TouristRow {
        name: "Emma Wilson",
        nationality: "United Kingdom",
        document_type: "Passport",
        document_number: "UK987654321",
        location: "Chandni Chowk Market",
        coordinates: (28.6506, 77.2334),
        safety_score: 45.0,
        status: TouristStatus::Emergency,
        checked_in_minutes_ago: 120,
        registered_days_ago: 1,
        hash: "0x3c4d5e6f7890abcdef1234567890abcd",
    },
    TouristRow {
        name: "Michael Chen",
        nationality: "Canada",
        document_type: "Passport",
        document_number: "CA456789123",
        location: "Lotus Temple, New Delhi",
        coordinates: (28.5535, 77.2588),
        safety_score: 91.0,
        status: TouristStatus::Active,
        checked_in_minutes_ago: 15,
        registered_days_ago: 4,
        hash: "0x4d5e6f7890abcdef1234567890abcdef",
    },
    TouristRow {
        name: "Lisa Anderson",
        nationality: "Australia",
        document_type: "Passport",
        document_number: "AU789123456",
        location: "Qutub Minar, New Delhi",
        coordinates: (28.5245, 77.1855),
        safety_score: 67.0,
        status: TouristStatus::Inactive,
        checked_in_minutes_ago: 240,
        registered_days_ago: 5,
        hash: "0x5e6f7890abcdef1234567890abcdef12",
    },
    TouristRow {
        name: "David Kumar",
        nationality: "India",
        document_type: "Aadhaar",
        document_number: "9876 5432 1098",
        location: "Humayun's Tomb, New Delhi",
        coordinates: (28.5933, 77.2507),
        safety_score: 38.0,
        status: TouristStatus::Missing,
        checked_in_minutes_ago: 360,
        registered_days_ago: 6,
        hash: "0x6f7890abcdef1234567890abcdef1234",
    },
];

pub fn tourists(now: DateTime<Utc>) -> Vec<Tourist> {
    #[allow(unused_mut)]
    let mut tourists: Vec<Tourist> = TOURISTS
        .iter()
        .zip(1u32..)
        .map(|(row, id)| Tourist {
            id,
            digital_id: format!("TG-2025-{:06}", 1233 + id),
            name: row.name.to_string(),
            nationality: row.nationality.to_string(),
            document_type: row.document_type.to_string(),
            document_number: row.document_number.to_string(),
            current_location: row.location.to_string(),
            latitude: row.coordinates.0,
            longitude: row.coordinates.1,
            safety_score: row.safety_score,
            status: row.status,
            last_check_in: now - Duration::minutes(row.checked_in_minutes_ago),
            registered_at: now - Duration::days(row.registered_days_ago),
            blockchain_hash: row.hash.to_string(),
        })
        .collect();

    #[cfg(feature = "seed_extra_tourists")]
    tourists.extend(extra_tourists(now, tourists.len() as u32 + 1, 24));

    tourists
}

// Deterministic filler records so paging can be exercised with a real dataset.
#[cfg(feature = "seed_extra_tourists")]
fn extra_tourists(now: DateTime<Utc>, first_id: u32, count: u32) -> Vec<Tourist> {
    const STATUSES: [TouristStatus; 4] = [
        TouristStatus::Active,
        TouristStatus::Active,
        TouristStatus::Inactive,
        TouristStatus::Active,
    ];
    (first_id..first_id + count)
        .map(|id| {
            let template = &TOURISTS[id as usize % TOURISTS.len()];
            Tourist {
                id,
                digital_id: format!("TG-2025-{:06}", 1233 + id),
                name: format!("Visitor {:03}", id),
                nationality: template.nationality.to_string(),
                document_type: template.document_type.to_string(),
                document_number: format!("GEN{:09}", u64::from(id) * 7919),
                current_location: template.location.to_string(),
                latitude: template.coordinates.0,
                longitude: template.coordinates.1,
                safety_score: f64::from(35 + (id * 37) % 65),
                status: STATUSES[id as usize % STATUSES.len()],
                last_check_in: now - Duration::minutes(i64::from(id) * 17),
                registered_at: now - Duration::days(i64::from(id % 9) + 1),
                blockchain_hash: format!("0x{:032x}", u128::from(id) * 0x9e37_79b9_7f4a_7c15),
            }
        })
        .collect()
}

pub fn zones() -> Vec<Zone> {
    let zone = |id: &str,
                name: &str,
                shape: ZoneShape,
                risk_level: RiskLevel,
                alert_type: AlertMode,
                capacity: u32,
                is_active: bool,
                created_at: NaiveDate,
                tourist_count: u32| Zone {
        id: id.to_string(),
        name: name.to_string(),
        shape,
        risk_level,
        alert_type,
        capacity,
        is_active,
        created_at,
        tourist_count,
    };
    vec![
        zone("zone_1", "Red Fort Restricted Area", ZoneShape::Polygon, RiskLevel::High, AlertMode::Immediate, 50, true, day(2024, 1, 15), 23),
        zone("zone_2", "India Gate Security Zone", ZoneShape::Circle, RiskLevel::Moderate, AlertMode::Delayed, 200, true, day(2024, 2, 1), 156),
        zone("zone_3", "Lotus Temple Quiet Zone", ZoneShape::Polygon, RiskLevel::Low, AlertMode::Periodic, 100, true, day(2024, 1, 20), 45),
        zone("zone_4", "Chandni Chowk Traffic Zone", ZoneShape::Rectangle, RiskLevel::Moderate, AlertMode::Immediate, 300, false, day(2024, 2, 10), 0),
        zone("zone_5", "Qutub Minar Construction Zone", ZoneShape::Polygon, RiskLevel::High, AlertMode::Immediate, 10, true, day(2024, 2, 15), 3),
    ]
}

pub fn incidents() -> Vec<Incident> {
    let incident = |id: &str,
                    kind: IncidentKind,
                    tourist_name: &str,
                    location: &str,
                    severity: Severity,
                    status: IncidentStatus,
                    timestamp: &str,
                    priority_score: f64,
                    response_time: Option<&str>,
                    description: &str| Incident {
        id: id.to_string(),
        kind,
        tourist_name: tourist_name.to_string(),
        location: location.to_string(),
        severity,
        status,
        timestamp: at(timestamp),
        priority_score,
        response_time: response_time.map(str::to_string),
        description: description.to_string(),
    };
    vec![
        incident(
            "INC-2024-001",
            IncidentKind::MissingPerson,
            "Sarah Johnson",
            "Baga Beach, Goa",
            Severity::High,
            IncidentStatus::Investigating,
            "2024-03-18T14:30:00Z",
            85.0,
            Some("8 minutes"),
            "Tourist last seen at Baga Beach after being separated from a companion in a crowd. Search operations are underway.",
        ),
        incident(
            "INC-2024-002",
            IncidentKind::MedicalEmergency,
            "Rajesh Kumar",
            "Rohtang Pass, Himachal Pradesh",
            Severity::Critical,
            IncidentStatus::Resolved,
            "2024-03-17T11:45:00Z",
            95.0,
            Some("12 minutes"),
            "Altitude sickness at Rohtang Pass. Patient stabilized on site and transported to hospital.",
        ),
        incident(
            "INC-2024-003",
            IncidentKind::Theft,
            "Emma Wilson",
            "Hawa Mahal, Jaipur",
            Severity::Medium,
            IncidentStatus::Reported,
            "2024-03-18T16:20:00Z",
            65.0,
            None,
            "Handbag with passport and cash stolen in a crowded area. CCTV footage under review.",
        ),
        incident(
            "INC-2024-004",
            IncidentKind::Accident,
            "Michael Chen",
            "Alleppey Backwaters, Kerala",
            Severity::Low,
            IncidentStatus::Closed,
            "2024-03-16T10:15:00Z",
            35.0,
            Some("15 minutes"),
            "Minor boat accident during a backwater tour. Minor injuries treated locally; case closed.",
        ),
        incident(
            "INC-2024-005",
            IncidentKind::Harassment,
            "Lisa Anderson",
            "Laxman Jhula, Rishikesh",
            Severity::Medium,
            IncidentStatus::Investigating,
            "2024-03-18T18:45:00Z",
            70.0,
            Some("6 minutes"),
            "Harassment by local individuals near Laxman Jhula reported to local authorities.",
        ),
    ]
}

pub fn audit_logs() -> Vec<AuditLogEntry> {
    let entry = |id: u32,
                 timestamp: &str,
                 user: &str,
                 action: &str,
                 target: &str,
                 severity: &str,
                 ip_address: &str,
                 details: Option<&str>,
                 status: &str| AuditLogEntry {
        id,
        timestamp: at(timestamp),
        user: user.to_string(),
        action: action.to_string(),
        target: target.to_string(),
        severity: severity.to_string(),
        ip_address: ip_address.to_string(),
        details: details.map(str::to_string),
        status: status.to_string(),
    };
    vec![
        entry(1, "2025-01-11 10:25:15", "Anita Patel", "User Account Created", "mohammed.ali@tourism.gov.in", "info", "192.168.1.45", Some("New Entry Point Officer account created"), "success"),
        entry(2, "2025-01-11 10:20:32", "Rajesh Kumar", "Geo-fence Modified", "Red Fort Zone", "warning", "192.168.1.23", Some("Geo-fence radius changed from 300m to 500m"), "success"),
        entry(3, "2025-01-11 10:15:08", "System", "Emergency Alert Triggered", "Tourist ID: TG-2025-001234", "critical", "System", Some("Panic button activated near India Gate"), "resolved"),
        entry(4, "2025-01-11 10:10:45", "Priya Sharma", "Incident Report Generated", "INC-2025-0156", "high", "192.168.1.67", Some("E-FIR generated for missing person case"), "pending"),
        entry(5, "2025-01-11 10:05:22", "Anita Patel", "System Configuration Updated", "Alert Threshold Settings", "medium", "192.168.1.45", None, "success"),
        entry(6, "2025-01-11 09:58:17", "Mohammed Ali", "Tourist Registration", "Tourist ID: TG-2025-001235", "info", "192.168.1.89", None, "success"),
        entry(7, "2025-01-11 09:45:33", "System", "Failed Login Attempt", "admin@tourism.gov.in", "warning", "203.45.67.89", Some("Multiple failed attempts from unknown IP"), "blocked"),
        entry(8, "2025-01-11 09:30:12", "Suresh Reddy", "Data Export", "Tourist Records", "medium", "192.168.1.34", Some("Exported 500 tourist records for monthly report"), "success"),
    ]
}

pub fn operator_accounts() -> Vec<OperatorAccount> {
    let account = |id: u32,
                   name: &str,
                   email: &str,
                   role: &str,
                   department: &str,
                   status: AccountStatus,
                   last_login: &str,
                   permissions: &[&str]| OperatorAccount {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        department: department.to_string(),
        status,
        last_login: at(last_login),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
    };
    vec![
        account(1, "Rajesh Kumar", "rajesh.kumar@tourism.gov.in", "Tourism Officer", "Rajasthan Tourism", AccountStatus::Active, "2025-01-11 09:15:00", &["view_tourists", "manage_incidents", "generate_reports"]),
        account(2, "Priya Sharma", "priya.sharma@police.gov.in", "Police Administrator", "Delhi Police", AccountStatus::Active, "2025-01-11 08:45:00", &["view_tourists", "manage_incidents", "emergency_response", "system_admin"]),
        account(3, "Mohammed Ali", "mohammed.ali@tourism.gov.in", "Entry Point Officer", "Airport Authority", AccountStatus::Inactive, "2025-01-10 16:30:00", &["register_tourists", "view_tourists"]),
        account(4, "Anita Patel", "anita.patel@tourism.gov.in", "System Administrator", "IT Department", AccountStatus::Active, "2025-01-11 10:00:00", &["full_access", "system_config", "user_management", "audit_logs"]),
        account(5, "Suresh Reddy", "suresh.reddy@tourism.gov.in", "Tourism Officer", "Andhra Pradesh Tourism", AccountStatus::Suspended, "2025-01-09 14:20:00", &["view_tourists", "manage_incidents"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{Criteria, Criterion, ListController, ListQuery, SortSpec};

    fn now() -> DateTime<Utc> {
        at("2025-01-11 12:00:00")
    }

    fn base_tourists() -> Vec<Tourist> {
        tourists(now()).into_iter().take(TOURISTS.len()).collect()
    }

    fn names(view: &crate::listing::ListView<'_, Tourist>) -> Vec<String> {
        view.visible_records.iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn safety_score_minimum_keeps_the_four_safe_tourists() {
        let query = ListQuery {
            criteria: Criteria::new().with("safety_score", Criterion::AtLeast(60.0)),
            ..ListQuery::default()
        };
        let list = ListController::with_query(base_tourists(), query);
        let view = list.view();
        let scores: Vec<f64> = view.visible_records.iter().map(|t| t.safety_score).collect();
        assert_eq!(scores, vec![85.0, 72.0, 91.0, 67.0]);
        assert_eq!(view.total_filtered_count, 4);
    }

    #[test]
    fn location_search_is_case_insensitive() {
        let mut list = ListController::new(base_tourists());
        list.set_search("red fort");
        let view = list.view();
        assert_eq!(names(&view), vec!["Raj Patel"]);
        assert_eq!(view.visible_records[0].current_location, "Red Fort, New Delhi");
    }

    #[test]
    fn search_ignores_nationality_and_document_numbers() {
        let mut list = ListController::new(base_tourists());
        list.set_search("india");
        // only the India Gate location matches; Indian nationals do not
        assert_eq!(names(&list.view()), vec!["Sarah Johnson"]);
        list.set_search("US123456789");
        assert_eq!(list.view().total_filtered_count, 0);
    }

    #[test]
    fn check_in_sort_toggles_between_newest_and_oldest_first() {
        let mut list = ListController::new(base_tourists());
        list.set_sort(Some(SortSpec::descending("last_check_in")));
        let newest_first: Vec<u32> = list.view().visible_ids();
        assert_eq!(newest_first, vec![4, 1, 2, 3, 5, 6]);

        list.sort_by("last_check_in");
        assert_eq!(list.view().visible_ids(), vec![6, 5, 3, 2, 1, 4]);
    }

    #[test]
    fn default_page_size_fits_the_whole_registry() {
        let list = ListController::new(base_tourists());
        let view = list.view();
        assert_eq!(view.page_count, 1);
        assert_eq!(view.visible_records.len(), 6);
    }

    #[test]
    fn second_page_of_two_holds_the_third_and_fourth_records() {
        let query = ListQuery {
            sort: Some(SortSpec::descending("last_check_in")),
            page_size: 2,
            page: 2,
            ..ListQuery::default()
        };
        let list = ListController::with_query(base_tourists(), query);
        // newest first: 4, 1, 2, 3, 5, 6
        assert_eq!(list.view().visible_ids(), vec![2, 3]);
    }

    #[test]
    fn select_all_on_page_two_selects_only_that_page() {
        let query = ListQuery {
            page_size: 2,
            page: 2,
            ..ListQuery::default()
        };
        let mut list = ListController::with_query(base_tourists(), query);
        list.select_all_visible();
        assert_eq!(list.selected_ids(), vec![3, 4]);
        assert_eq!(list.selection().len(), 2);
    }

    #[test]
    fn page_9999_of_three_returns_the_last_page() {
        let query = ListQuery {
            page_size: 2,
            page: 9999,
            ..ListQuery::default()
        };
        let list = ListController::with_query(base_tourists(), query);
        let view = list.view();
        assert_eq!(view.current_page, 3);
        assert_eq!(view.visible_ids(), vec![5, 6]);
    }

    #[test]
    fn enum_fields_filter_on_lowercase_names() {
        let query = ListQuery {
            criteria: Criteria::new().with("status", Criterion::Equals(crate::listing::FieldValue::text("active"))),
            ..ListQuery::default()
        };
        let list = ListController::with_query(base_tourists(), query);
        assert_eq!(list.view().visible_ids(), vec![1, 2, 4]);
    }

    #[test]
    fn zone_flags_and_dates_are_exposed_to_the_pipeline() {
        let mut list = ListController::new(zones());
        list.set_criterion("is_active", Criterion::Equals(crate::listing::FieldValue::Flag(false)));
        assert_eq!(list.view().visible_ids(), vec!["zone_4".to_string()]);

        list.clear_criteria();
        list.set_sort(Some(SortSpec::ascending("created_at")));
        assert_eq!(
            list.view().visible_ids().first().map(String::as_str),
            Some("zone_1")
        );
    }

    #[test]
    fn incidents_sort_newest_first() {
        let mut list = ListController::new(incidents());
        list.set_sort(Some(SortSpec::descending("timestamp")));
        let ids = list.view().visible_ids();
        assert_eq!(ids.first().map(String::as_str), Some("INC-2024-005"));
        assert_eq!(ids.last().map(String::as_str), Some("INC-2024-004"));
    }

    #[test]
    fn seed_collections_have_the_documented_sizes() {
        assert_eq!(base_tourists().len(), 6);
        assert_eq!(zones().len(), 5);
        assert_eq!(incidents().len(), 5);
        assert_eq!(audit_logs().len(), 8);
        assert_eq!(operator_accounts().len(), 5);
    }
}
