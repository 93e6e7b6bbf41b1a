/// Formats seconds as `m:ss`. Seconds are floored; minutes are not padded.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    let mins = total / 60;
    let secs = total % 60;
    format!("{}:{:02}", mins, secs)
}

/// What the progress bar and time labels show.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub fraction: f64,
    pub elapsed: String,
    pub remaining: String,
    pub total: String,
}

impl Default for Progress {
    fn default() -> Self {
        Self::compute(0.0, None)
    }
}

impl Progress {
    pub fn compute(current_time: f64, duration: Option<f64>) -> Self {
        let current_time = if current_time.is_finite() {
            current_time.max(0.0)
        } else {
            0.0
        };
        match duration {
            Some(duration) if duration > 0.0 => {
                let elapsed = current_time.min(duration);
                Self {
                    fraction: (elapsed / duration).clamp(0.0, 1.0),
                    elapsed: format_time(elapsed),
                    remaining: format_time(duration - elapsed),
                    total: format_time(duration),
                }
            }
            _ => Self {
                fraction: 0.0,
                elapsed: format_time(current_time),
                remaining: format_time(0.0),
                total: format_time(0.0),
            },
        }
    }

    pub fn percent(&self) -> f64 {
        self.fraction * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(59.999), "0:59");
        assert_eq!(format_time(3725.4), "62:05");
    }

    #[test]
    fn invalid_inputs_format_as_zero() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
        assert_eq!(format_time(-4.0), "0:00");
    }

    #[test]
    fn progress_tracks_fraction_and_remaining() {
        let p = Progress::compute(30.0, Some(120.0));
        assert_eq!(p.fraction, 0.25);
        assert_eq!(p.elapsed, "0:30");
        assert_eq!(p.remaining, "1:30");
        assert_eq!(p.total, "2:00");
        assert_eq!(p.percent(), 25.0);
    }

    #[test]
    fn unknown_duration_keeps_bar_empty() {
        let p = Progress::compute(7.0, None);
        assert_eq!(p.fraction, 0.0);
        assert_eq!(p.elapsed, "0:07");
        assert_eq!(p.total, "0:00");
    }

    #[test]
    fn time_past_end_is_capped() {
        let p = Progress::compute(130.0, Some(120.0));
        assert_eq!(p.fraction, 1.0);
        assert_eq!(p.remaining, "0:00");
    }
}
