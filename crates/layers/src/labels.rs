//! Human-readable text for the time and coordinate readouts.

use foundation::{HourOfWeek, Viewport};

/// `"Tuesday, 14:00 - 15:00"`.
pub fn time_label(time: HourOfWeek) -> String {
    let hour = time.hour_of_day();
    format!("{}, {}:00 - {}:00", time.day_name(), hour, hour + 1)
}

/// `"55.60, 12.60"`.
pub fn coordinate_label(viewport: &Viewport) -> String {
    format!("{:.2}, {:.2}", viewport.latitude, viewport.longitude)
}

#[cfg(test)]
mod tests {
    use super::{coordinate_label, time_label};
    use foundation::{HourOfWeek, Viewport};

    #[test]
    fn time_label_names_day_and_hour_window() {
        assert_eq!(time_label(HourOfWeek::new(62).unwrap()), "Tuesday, 14:00 - 15:00");
        assert_eq!(time_label(HourOfWeek::new(0).unwrap()), "Sunday, 0:00 - 1:00");
        assert_eq!(time_label(HourOfWeek::new(167).unwrap()), "Saturday, 23:00 - 24:00");
    }

    #[test]
    fn coordinate_label_uses_two_decimals() {
        assert_eq!(coordinate_label(&Viewport::new(55.6, 12.6, 10.0)), "55.60, 12.60");
        assert_eq!(coordinate_label(&Viewport::new(-33.8688, 151.2093, 3.0)), "-33.87, 151.21");
    }
}
