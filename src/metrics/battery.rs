//! Battery charge and remaining time.

use super::{ProbeContext, ProbeError, ProbeResult};
use crate::report::{BatteryInfo, FamilyValue, TimeLeft};
use crate::source::SecsLeft;

pub fn probe(ctx: &ProbeContext) -> ProbeResult {
    let reading = ctx
        .sources
        .resources
        .battery()
        .map_err(ProbeError::unavailable)?
        .ok_or_else(|| ProbeError::unavailable("no battery present"))?;

    Ok(FamilyValue::Battery(BatteryInfo {
        percentage: reading.percent,
        plugged: reading.power_plugged,
        time_left: time_left(reading.secs_left),
    }))
}

fn time_left(secs_left: SecsLeft) -> TimeLeft {
    match secs_left {
        SecsLeft::Seconds(secs) => TimeLeft::Minutes(u32::try_from(secs / 60).unwrap_or(u32::MAX)),
        SecsLeft::Unlimited => TimeLeft::Unlimited,
        SecsLeft::Unknown => TimeLeft::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::context;
    use crate::source::mock::{MockSource, Mocked};
    use crate::source::BatteryReading;

    #[test]
    fn test_discharging_battery() {
        assert_eq!(
            probe(&context(MockSource::healthy())).unwrap(),
            FamilyValue::Battery(BatteryInfo {
                percentage: 81.0,
                plugged: false,
                time_left: TimeLeft::Minutes(90),
            })
        );
    }

    #[test]
    fn test_ac_power_is_unlimited() {
        let mut source = MockSource::healthy();
        source.battery = Mocked::Ok(Some(BatteryReading {
            percent: 100.0,
            power_plugged: true,
            secs_left: SecsLeft::Unlimited,
        }));

        let FamilyValue::Battery(battery) = probe(&context(source)).unwrap() else {
            panic!("expected battery record");
        };
        assert!(battery.plugged);
        assert_eq!(battery.time_left, TimeLeft::Unlimited);
    }

    #[test]
    fn test_minutes_round_down() {
        assert_eq!(time_left(SecsLeft::Seconds(119)), TimeLeft::Minutes(1));
        assert_eq!(time_left(SecsLeft::Seconds(59)), TimeLeft::Minutes(0));
    }

    #[test]
    fn test_no_battery_and_read_failure_look_the_same() {
        let mut absent = MockSource::healthy();
        absent.battery = Mocked::Ok(None);
        let mut failing = MockSource::healthy();
        failing.battery = Mocked::Fail("sensor file missing".into());

        assert!(matches!(probe(&context(absent)), Err(ProbeError::Unavailable(_))));
        assert!(matches!(probe(&context(failing)), Err(ProbeError::Unavailable(_))));
    }
}
