use time::{format_description::well_known::Rfc3339, OffsetDateTime, PrimitiveDateTime, UtcOffset};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn to_primitive_utc(value: OffsetDateTime) -> PrimitiveDateTime {
    let utc = value.to_offset(UtcOffset::UTC);
    PrimitiveDateTime::new(utc.date(), utc.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

/// Parse an RFC 3339 timestamp (with offset) into the naive-UTC form stored
/// in the database.
pub(crate) fn parse_rfc3339_to_primitive(value: &str) -> Result<PrimitiveDateTime, time::Error> {
    let parsed = OffsetDateTime::parse(value, &Rfc3339)?;
    Ok(to_primitive_utc(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Time};

    #[test]
    fn format_primitive_outputs_utc_z() {
        let date = Date::from_calendar_date(2025, time::Month::January, 2).unwrap();
        let time = Time::from_hms(10, 20, 30).unwrap();
        let value = PrimitiveDateTime::new(date, time);
        assert_eq!(format_primitive(value), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn parse_rfc3339_normalizes_offset_to_utc() {
        let parsed = parse_rfc3339_to_primitive("2025-06-01T12:00:00+03:00").unwrap();
        assert_eq!(format_primitive(parsed), "2025-06-01T09:00:00Z");
    }

    #[test]
    fn parse_rfc3339_rejects_garbage() {
        assert!(parse_rfc3339_to_primitive("tomorrow at noon").is_err());
    }
}
