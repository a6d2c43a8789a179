//! UTCTime (universal tag 23) and GeneralizedTime (universal tag 24).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Encodes a UTCTime value as `YYMMDDhhmm[ss]Z` or `YYMMDDhhmm[ss]±hhmm`.
/// Seconds are always emitted (this library's canonical form always carries
/// them); non-UTC offsets are emitted as `±hhmm` rather than normalized.
pub fn encode_utc(value: &DateTime<FixedOffset>) -> String {
    let year_2digit = value.format("%y").to_string();
    let rest = value.format("%m%d%H%M%S").to_string();
    format!("{year_2digit}{rest}{}", offset_suffix(value))
}

/// Parses a UTCTime string. The two-digit year is resolved per X.509/X.690
/// convention: `00..=49` -> `2000..=2049`, `50..=99` -> `1950..=1999`.
pub fn decode_utc(s: &str) -> Result<DateTime<FixedOffset>, String> {
    let (naive, offset_str) = split_offset(s)?;
    let datetime_part = match naive.len() {
        10 => format!("{naive}00"),
        12 => naive.to_string(),
        _ => return Err(format!("malformed UTCTime body {naive:?}")),
    };

    let yy: i32 = datetime_part[0..2]
        .parse()
        .map_err(|_| "invalid two-digit year".to_string())?;
    let year = if yy < 50 { 2000 + yy } else { 1900 + yy };
    let rest = &datetime_part[2..];

    let naive_dt = NaiveDateTime::parse_from_str(
        &format!("{year:04}{rest}"),
        "%Y%m%d%H%M%S",
    )
    .map_err(|e| e.to_string())?;

    apply_offset(naive_dt, &offset_str)
}

/// Encodes a GeneralizedTime value as `YYYYMMDDhh[mm[ss]][.fraction]Z`. The
/// canonical form emitted here is always UTC, with seconds, and fractional
/// seconds only when nonzero (`spec.md` §4.2).
pub fn encode_generalized(value: &DateTime<FixedOffset>) -> String {
    let utc = value.with_timezone(&Utc);
    let base = utc.format("%Y%m%d%H%M%S").to_string();
    let nanos = utc.timestamp_subsec_nanos();
    if nanos == 0 {
        format!("{base}Z")
    } else {
        let frac = format!("{:09}", nanos);
        let frac = frac.trim_end_matches('0');
        format!("{base}.{frac}Z")
    }
}

/// Parses a GeneralizedTime string of the form
/// `YYYYMMDDhh[mm[ss]][.fraction][Z|±hhmm]`. An offset-free string is
/// interpreted as local/unspecified time pinned to UTC, matching the
/// teacher's convention of treating naive timestamps as UTC.
pub fn decode_generalized(s: &str) -> Result<DateTime<FixedOffset>, String> {
    let (naive, offset_str) = split_offset(s)?;
    let (main, fraction) = match naive.split_once('.') {
        Some((m, f)) => (m, Some(f)),
        None => (naive.as_str(), None),
    };

    if main.len() < 10 {
        return Err(format!("GeneralizedTime body {main:?} too short"));
    }
    let year = &main[0..4];
    let month = &main[4..6];
    let day = &main[6..8];
    let hour = &main[8..10];
    let minute = main.get(10..12).unwrap_or("00");
    let second = main.get(12..14).unwrap_or("00");

    let date = NaiveDate::parse_from_str(&format!("{year}{month}{day}"), "%Y%m%d")
        .map_err(|e| e.to_string())?;
    let time = NaiveTime::parse_from_str(&format!("{hour}{minute}{second}"), "%H%M%S")
        .map_err(|e| e.to_string())?;
    let mut naive_dt = NaiveDateTime::new(date, time);

    if let Some(frac) = fraction {
        let digits: String = frac.chars().take(9).collect();
        let scale = 10u32.pow(9 - digits.len() as u32);
        let nanos: u32 = digits
            .parse::<u32>()
            .map_err(|e| e.to_string())?
            .saturating_mul(scale);
        naive_dt += chrono::Duration::nanoseconds(nanos as i64);
    }

    apply_offset(naive_dt, &offset_str)
}

fn offset_suffix(value: &DateTime<FixedOffset>) -> String {
    let offset = value.offset().local_minus_utc();
    if offset == 0 {
        "Z".to_string()
    } else {
        let sign = if offset < 0 { '-' } else { '+' };
        let total_minutes = offset.unsigned_abs() / 60;
        format!("{sign}{:02}{:02}", total_minutes / 60, total_minutes % 60)
    }
}

fn split_offset(s: &str) -> Result<(String, String), String> {
    if let Some(naive) = s.strip_suffix('Z') {
        return Ok((naive.to_string(), "Z".to_string()));
    }
    if s.len() > 5 {
        let (head, tail) = s.split_at(s.len() - 5);
        if (tail.starts_with('+') || tail.starts_with('-')) && tail[1..].chars().all(|c| c.is_ascii_digit())
        {
            return Ok((head.to_string(), tail.to_string()));
        }
    }
    Err(format!("{s:?} is missing a UTC designator or numeric offset"))
}

fn apply_offset(naive_dt: NaiveDateTime, offset_str: &str) -> Result<DateTime<FixedOffset>, String> {
    if offset_str == "Z" {
        return Ok(Utc.from_utc_datetime(&naive_dt).fixed_offset());
    }
    let sign = if offset_str.starts_with('-') { -1 } else { 1 };
    let hh: i32 = offset_str[1..3].parse().map_err(|_| "invalid offset hours".to_string())?;
    let mm: i32 = offset_str[3..5].parse().map_err(|_| "invalid offset minutes".to_string())?;
    let seconds = sign * (hh * 3600 + mm * 60);
    let offset = FixedOffset::east_opt(seconds).ok_or("offset out of range")?;
    offset
        .from_local_datetime(&naive_dt)
        .single()
        .ok_or_else(|| "ambiguous local datetime for offset".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn utc_time_round_trips() {
        let value = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 7, 31, 12, 30, 0)
            .unwrap();
        let encoded = encode_utc(&value);
        assert_eq!(encoded, "260731123000Z");
        assert_eq!(decode_utc(&encoded).unwrap(), value);
    }

    #[test]
    fn generalized_time_omits_zero_fraction() {
        let value = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(1999, 1, 2, 3, 4, 5)
            .unwrap();
        assert_eq!(encode_generalized(&value), "19990102030405Z");
    }

    #[test]
    fn generalized_time_round_trips_with_fraction() {
        let value = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 7, 31, 0, 0, 0)
            .unwrap()
            + chrono::Duration::milliseconds(500);
        let encoded = encode_generalized(&value);
        assert_eq!(encoded, "20260731000000.5Z");
        assert_eq!(decode_generalized(&encoded).unwrap(), value);
    }
}
