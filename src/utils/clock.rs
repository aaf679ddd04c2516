use chrono::{DateTime, Local, NaiveDate};

/// Represents an entity responsible for providing dates across application. This can allow it to
/// be used for testing
pub trait Clock: Sync + Send + 'static {
    fn now(&self) -> DateTime<Local>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
