use chrono::{DateTime, Datelike, Timelike, Utc};

use super::*;

/// modification and access time carried by BGNLIB and BGNSTR
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    pub mod_year: i16,
    pub mod_month: i16,
    pub mod_day: i16,
    pub mod_hour: i16,
    pub mod_minute: i16,
    pub mod_second: i16,
    pub acc_year: i16,
    pub acc_month: i16,
    pub acc_day: i16,
    pub acc_hour: i16,
    pub acc_minute: i16,
    pub acc_second: i16,
}

impl Date {
    pub fn now() -> Self {
        Date::from_datetime(&Utc::now())
    }

    /// both stamps set to the given instant
    pub fn from_datetime(utc: &DateTime<Utc>) -> Self {
        // year, month, day
        let year = utc.year() as i16;
        let month = utc.month() as i16;
        let day = utc.day() as i16;

        // hour, minute, second
        let hour = utc.hour() as i16;
        let minute = utc.minute() as i16;
        let second = utc.second() as i16;

        Date {
            mod_year: year,
            mod_month: month,
            mod_day: day,
            mod_hour: hour,
            mod_minute: minute,
            mod_second: second,
            acc_year: year,
            acc_month: month,
            acc_day: day,
            acc_hour: hour,
            acc_minute: minute,
            acc_second: second,
        }
    }

    pub fn from_i16_array(date: &[i16]) -> GdsResult<Date> {
        let d: &[i16; 12] = match date.try_into() {
            Ok(d) => d,
            Err(_) => {
                return Err(validation_err!(
                    "gds date needs 12 values, got {}",
                    date.len()
                ))
            }
        };
        Ok(Date {
            mod_year: d[0],
            mod_month: d[1],
            mod_day: d[2],
            mod_hour: d[3],
            mod_minute: d[4],
            mod_second: d[5],
            acc_year: d[6],
            acc_month: d[7],
            acc_day: d[8],
            acc_hour: d[9],
            acc_minute: d[10],
            acc_second: d[11],
        })
    }

    pub fn to_i16_array(&self) -> [i16; 12] {
        [
            self.mod_year,
            self.mod_month,
            self.mod_day,
            self.mod_hour,
            self.mod_minute,
            self.mod_second,
            self.acc_year,
            self.acc_month,
            self.acc_day,
            self.acc_hour,
            self.acc_minute,
            self.acc_second,
        ]
    }
}
