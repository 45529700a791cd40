use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, Utc};

/// Candidate tick steps, smallest first.
const YEAR_STEPS: [i64; 7] = [1, 2, 5, 10, 20, 50, 100];
const SECOND_STEPS: [i64; 9] = [1, 5, 15, 30, 60, 300, 900, 1800, 3600];

/// Smallest step giving at most `max_ticks` aligned ticks across `span`.
fn pick_step(span: i64, candidates: &[i64], max_ticks: usize) -> i64 {
    let limit = max_ticks.max(1) as i64;
    // 對齊後最多產生 span / step + 1 個刻度
    if let Some(step) = candidates.iter().copied().find(|step| span / step < limit) {
        return step;
    }

    let largest = candidates[candidates.len() - 1];
    let needed = span / limit + 1;
    (needed + largest - 1) / largest * largest
}

pub fn year_start(year: i32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)
}

/// 將完賽時間放在 1970-01-01 當天，讓時間軸可以直接比較
pub fn time_of_day(time: TimeDelta) -> Option<NaiveDateTime> {
    DateTime::<Utc>::UNIX_EPOCH
        .naive_utc()
        .checked_add_signed(time)
}

fn millis(value: NaiveDateTime) -> f64 {
    value.and_utc().timestamp_millis() as f64
}

/// Linear mapping from a date-time domain onto a pixel range.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeScale {
    domain: (NaiveDateTime, NaiveDateTime),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (NaiveDateTime, NaiveDateTime), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn scale(&self, value: NaiveDateTime) -> f64 {
        let (d0, d1) = (millis(self.domain.0), millis(self.domain.1));
        let (r0, r1) = self.range;

        // 單一值的定義域沒有寬度，放在範圍中間
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }

        r0 + (millis(value) - d0) / (d1 - d0) * (r1 - r0)
    }

    fn bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        let (a, b) = self.domain;
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// January 1st ticks, at most `max_ticks` of them.
    pub fn year_ticks(&self, max_ticks: usize) -> Vec<NaiveDateTime> {
        let (lo, hi) = self.bounds();
        let span = i64::from(hi.year() - lo.year()).max(1);
        let step = i32::try_from(pick_step(span, &YEAR_STEPS, max_ticks)).unwrap_or(i32::MAX);

        let mut year = lo.year().div_euclid(step) * step;
        let mut ticks = Vec::new();
        while year <= hi.year() && ticks.len() < max_ticks {
            if let Some(tick) = year_start(year) {
                if tick >= lo && tick <= hi {
                    ticks.push(tick);
                }
            }
            match year.checked_add(step) {
                Some(next) => year = next,
                None => break,
            }
        }
        ticks
    }

    /// Ticks on whole-second boundaries, at most `max_ticks` of them.
    pub fn second_ticks(&self, max_ticks: usize) -> Vec<NaiveDateTime> {
        let (lo, hi) = self.bounds();
        let (start, end) = (lo.and_utc().timestamp(), hi.and_utc().timestamp());
        let span = (end - start).max(1);
        let step = pick_step(span, &SECOND_STEPS, max_ticks);

        let first = if start.rem_euclid(step) == 0 {
            start
        } else {
            start - start.rem_euclid(step) + step
        };

        (0..)
            .map(|i| first + i * step)
            .take_while(|secs| *secs <= end)
            .take(max_ticks)
            .filter_map(|secs| DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc()))
            .collect()
    }
}
