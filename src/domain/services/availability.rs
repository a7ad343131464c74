use chrono::{Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use crate::domain::models::booking::Booking;
use crate::domain::models::event_type::EventType;
use std::cmp::{max, min};

const TOTAL_MINUTES: usize = 1440;

/// Computes bookable start times (RFC3339, UTC) for one local calendar day.
/// Walks the event type's weekday windows in its IANA timezone, steps by the
/// event duration and drops slots that are inside the minimum-notice window
/// or whose per-minute occupancy already reaches capacity.
pub fn calculate_slots(event_type: &EventType, date: NaiveDate, existing_bookings: &[Booking]) -> Vec<String> {
    let tz: Tz = event_type.timezone.parse().unwrap_or(chrono_tz::UTC);
    let schedule = event_type.schedule();

    let duration_min = event_type.duration_min as usize;
    if duration_min == 0 {
        return Vec::new();
    }

    let day_start_tz = match tz.from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap()).single() {
        Some(dt) => dt,
        None => return Vec::new(),
    };
    let day_end_tz = match tz.from_local_datetime(&date.and_hms_opt(23, 59, 59).unwrap()).single() {
        Some(dt) => dt,
        None => return Vec::new(),
    };

    let day_start_utc = day_start_tz.with_timezone(&Utc);
    let day_end_utc = day_end_tz.with_timezone(&Utc);

    // Occupancy per minute of the local day, clipped to its UTC bounds.
    let mut minute_counts = [0u8; TOTAL_MINUTES];
    for booking in existing_bookings {
        let b_start = max(booking.start_time, day_start_utc);
        let b_end = min(booking.end_time, day_end_utc);

        if b_start < b_end {
            let start_diff = b_start.timestamp() - day_start_utc.timestamp();
            let end_diff = b_end.timestamp() - day_start_utc.timestamp();

            let s_idx = max(0, min(start_diff / 60, TOTAL_MINUTES as i64)) as usize;
            let e_idx = max(0, min(end_diff / 60, TOTAL_MINUTES as i64)) as usize;

            for count in &mut minute_counts[s_idx..e_idx] {
                *count = count.saturating_add(1);
            }
        }
    }

    let cutoff = Utc::now() + Duration::minutes(event_type.min_notice_min as i64);

    let daily_windows = match date.weekday() {
        chrono::Weekday::Mon => &schedule.monday,
        chrono::Weekday::Tue => &schedule.tuesday,
        chrono::Weekday::Wed => &schedule.wednesday,
        chrono::Weekday::Thu => &schedule.thursday,
        chrono::Weekday::Fri => &schedule.friday,
        chrono::Weekday::Sat => &schedule.saturday,
        chrono::Weekday::Sun => &schedule.sunday,
    };

    let mut valid_slots = Vec::new();

    if let Some(windows) = daily_windows {
        for window in windows {
            if let (Ok(start), Ok(end)) = (
                NaiveTime::parse_from_str(&window.start, "%H:%M"),
                NaiveTime::parse_from_str(&window.end, "%H:%M"),
            ) {
                let win_start_idx = (start.hour() * 60 + start.minute()) as usize;
                let mut win_end_idx = (end.hour() * 60 + end.minute()) as usize;
                if win_end_idx == 1439 {
                    win_end_idx = 1440;
                }

                let mut cursor = win_start_idx;
                while cursor + duration_min <= win_end_idx {
                    let hour = (cursor / 60) as u32;
                    let minute = (cursor % 60) as u32;

                    if let Some(nt) = NaiveTime::from_hms_opt(hour, minute, 0) {
                        // Skipped or ambiguous local times (DST) produce no slot.
                        if let Some(slot_tz) = tz.from_local_datetime(&date.and_time(nt)).single() {
                            let slot_utc = slot_tz.with_timezone(&Utc);

                            let mut capacity_ok = true;
                            for i in cursor..(cursor + duration_min) {
                                if i < TOTAL_MINUTES && minute_counts[i] as i32 >= event_type.capacity {
                                    capacity_ok = false;
                                    break;
                                }
                            }

                            if slot_utc > cutoff && capacity_ok {
                                valid_slots.push(slot_utc.to_rfc3339());
                            }
                        }
                    }
                    cursor += duration_min;
                }
            }
        }
    }

    valid_slots.sort();
    valid_slots.dedup();
    valid_slots
}

/// UTC bounds of one local calendar day in the event type's timezone. `None`
/// when midnight does not resolve to a single instant (DST edge).
pub fn day_bounds_utc(event_type: &EventType, date: NaiveDate) -> Option<(chrono::DateTime<Utc>, chrono::DateTime<Utc>)> {
    let tz: Tz = event_type.timezone.parse().unwrap_or(chrono_tz::UTC);
    let start = tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single()?;
    let end = tz.from_local_datetime(&date.and_hms_opt(23, 59, 59)?).single()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Parses a local booking time ("HH:MM" or full RFC3339) on `date` in the
/// event type's timezone into a UTC instant.
pub fn parse_slot_start(event_type: &EventType, date: NaiveDate, time: &str) -> Option<chrono::DateTime<Utc>> {
    let tz: Tz = event_type.timezone.parse().unwrap_or(chrono_tz::UTC);

    let local_time = if time.contains('T') {
        chrono::DateTime::parse_from_rfc3339(time).ok()?.with_timezone(&tz).time()
    } else {
        NaiveTime::parse_from_str(time, "%H:%M").ok()?
    };

    tz.from_local_datetime(&date.and_time(local_time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::booking::{Booking, NewBookingParams};
    use crate::domain::models::event_type::{EventType, NewEventTypeParams, TimeWindow, WeekSchedule};
    use chrono::NaiveDate;

    fn schedule_with(day: &str, windows: Vec<TimeWindow>) -> WeekSchedule {
        let mut schedule = WeekSchedule::default();
        match day {
            "monday" => schedule.monday = Some(windows),
            "tuesday" => schedule.tuesday = Some(windows),
            _ => panic!("unexpected day in test"),
        }
        schedule
    }

    fn event_type(capacity: i32, duration: i32, tz: &str, schedule: WeekSchedule) -> EventType {
        EventType::new(NewEventTypeParams {
            workspace_id: "ws-1".to_string(),
            slug: "intro-call".to_string(),
            title: "Intro Call".to_string(),
            description: String::new(),
            duration_min: duration,
            timezone: tz.to_string(),
            location_kind: "IN_PERSON".to_string(),
            capacity,
            min_notice_min: 0,
            availability: schedule,
        })
    }

    fn booking_at(et: &EventType, start: chrono::DateTime<Utc>) -> Booking {
        Booking::new(NewBookingParams {
            workspace_id: et.workspace_id.clone(),
            event_type_id: et.id.clone(),
            contact_id: None,
            start,
            duration_min: et.duration_min,
            notes: None,
        })
    }

    // 2030-01-07 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 7).unwrap()
    }

    #[test]
    fn slots_follow_weekday_windows() {
        let et = event_type(1, 30, "UTC", schedule_with("monday", vec![
            TimeWindow { start: "09:00".into(), end: "10:00".into() },
        ]));

        let slots = calculate_slots(&et, monday(), &[]);
        assert_eq!(slots, vec![
            "2030-01-07T09:00:00+00:00",
            "2030-01-07T09:30:00+00:00",
        ]);
    }

    #[test]
    fn day_without_windows_has_no_slots() {
        let et = event_type(1, 30, "UTC", schedule_with("monday", vec![
            TimeWindow { start: "09:00".into(), end: "10:00".into() },
        ]));

        let tuesday = NaiveDate::from_ymd_opt(2030, 1, 8).unwrap();
        assert!(calculate_slots(&et, tuesday, &[]).is_empty());
    }

    #[test]
    fn full_slot_is_hidden_at_capacity_one() {
        let et = event_type(1, 30, "UTC", schedule_with("monday", vec![
            TimeWindow { start: "09:00".into(), end: "10:00".into() },
        ]));

        let taken = Utc.with_ymd_and_hms(2030, 1, 7, 9, 0, 0).unwrap();
        let slots = calculate_slots(&et, monday(), &[booking_at(&et, taken)]);
        assert_eq!(slots, vec!["2030-01-07T09:30:00+00:00"]);
    }

    #[test]
    fn capacity_two_keeps_slot_open_after_one_booking() {
        let et = event_type(2, 30, "UTC", schedule_with("monday", vec![
            TimeWindow { start: "09:00".into(), end: "10:00".into() },
        ]));

        let taken = Utc.with_ymd_and_hms(2030, 1, 7, 9, 0, 0).unwrap();
        let slots = calculate_slots(&et, monday(), &[booking_at(&et, taken)]);
        assert!(slots.contains(&"2030-01-07T09:00:00+00:00".to_string()));
    }

    #[test]
    fn slots_are_emitted_in_utc_for_local_timezone() {
        let et = event_type(1, 60, "Europe/Berlin", schedule_with("monday", vec![
            TimeWindow { start: "10:00".into(), end: "12:00".into() },
        ]));

        // January: Berlin is UTC+1, so local 10:00 is 09:00 UTC.
        let slots = calculate_slots(&et, monday(), &[]);
        assert_eq!(slots, vec![
            "2030-01-07T09:00:00+00:00",
            "2030-01-07T10:00:00+00:00",
        ]);
    }

    #[test]
    fn parse_slot_start_handles_local_and_iso_forms() {
        let et = event_type(1, 60, "Europe/Berlin", WeekSchedule::default());
        let date = monday();

        let from_local = parse_slot_start(&et, date, "10:00").unwrap();
        assert_eq!(from_local, Utc.with_ymd_and_hms(2030, 1, 7, 9, 0, 0).unwrap());

        let from_iso = parse_slot_start(&et, date, "2030-01-07T09:00:00+00:00").unwrap();
        assert_eq!(from_iso, from_local);
    }

    #[test]
    fn zero_duration_yields_nothing() {
        let et = event_type(1, 0, "UTC", schedule_with("monday", vec![
            TimeWindow { start: "09:00".into(), end: "17:00".into() },
        ]));
        assert!(calculate_slots(&et, monday(), &[]).is_empty());
    }
}
