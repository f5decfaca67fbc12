//! Boot time and load averages.

use super::{ProbeContext, ProbeError, ProbeResult};
use crate::report::{FamilyValue, UptimeInfo};
use chrono::{DateTime, Local};

/// Unsupported platforms omit the family; other failures are unavailable.
pub fn probe(ctx: &ProbeContext) -> ProbeResult {
    let resources = &ctx.sources.resources;
    let boot_time = format_boot_time(resources.boot_time()?)?;
    let (one, five, fifteen) = resources.load_average()?;

    Ok(FamilyValue::Uptime(UptimeInfo {
        boot_time,
        load_average: [one, five, fifteen],
    }))
}

/// Boot timestamp in local time
fn format_boot_time(secs: i64) -> Result<String, ProbeError> {
    let utc = DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| ProbeError::Unavailable(format!("invalid boot timestamp {}", secs)))?;
    Ok(utc
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::context;
    use crate::source::mock::{MockSource, Mocked};
    use chrono::NaiveDateTime;

    #[test]
    fn test_uptime_record() {
        let FamilyValue::Uptime(uptime) = probe(&context(MockSource::healthy())).unwrap() else {
            panic!("expected uptime record");
        };
        assert_eq!(uptime.load_average, [0.52, 0.58, 0.59]);

        let parsed = NaiveDateTime::parse_from_str(&uptime.boot_time, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_local_timezone(Local)
            .unwrap();
        assert_eq!(parsed.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_unsupported_load_average_is_omitted() {
        let mut source = MockSource::healthy();
        source.load_average = Mocked::Unsupported;
        assert!(matches!(
            probe(&context(source)),
            Err(ProbeError::Unsupported)
        ));
    }

    #[test]
    fn test_failed_read_is_unavailable() {
        let mut source = MockSource::healthy();
        source.boot_time = Mocked::Fail("missing btime".into());
        assert!(matches!(
            probe(&context(source)),
            Err(ProbeError::Unavailable(_))
        ));
    }
}
