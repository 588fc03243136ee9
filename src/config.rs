use crate::date::CalendarDate;

/// Which dates the picker presents as selectable
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Policy {
    pub disable_past_dates: bool,
    pub disable_holidays_and_shabbat: bool,
}

impl Policy {
    pub fn new() -> Policy {
        Policy::default()
    }

    pub fn disable_past_dates(mut self, flag: bool) -> Policy {
        self.disable_past_dates = flag;
        self
    }

    pub fn disable_holidays_and_shabbat(mut self, flag: bool) -> Policy {
        self.disable_holidays_and_shabbat = flag;
        self
    }
}

/// Settings supplied once when a picker is constructed
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PickerConfig {
    pub policy: Policy,
    /// Date selected (and shown) when the picker opens; defaults to today
    pub initial_date: Option<CalendarDate>,
}

impl PickerConfig {
    pub fn new() -> PickerConfig {
        PickerConfig::default()
    }

    pub fn policy(mut self, policy: Policy) -> PickerConfig {
        self.policy = policy;
        self
    }

    pub fn initial_date(mut self, date: CalendarDate) -> PickerConfig {
        self.initial_date = Some(date);
        self
    }
}
