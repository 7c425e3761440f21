use chrono::Weekday;

/// Weekday label table, indexed 0 = Sunday through 6 = Saturday.
///
/// All user-facing strings in the platform are PT-BR, but the label set is
/// carried as an explicit table rather than scattered literals so callers
/// (reports, calendar text) can inject a different one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayLabels {
    labels: [&'static str; 7],
}

/// Abbreviated PT-BR weekday labels.
pub const DAY_LABELS_PT: DayLabels = DayLabels {
    labels: ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"],
};

impl DayLabels {
    /// Builds a table from labels ordered Sunday first.
    #[must_use]
    pub fn new(labels: [&'static str; 7]) -> Self {
        Self { labels }
    }

    /// Label for a weekday.
    #[must_use]
    pub fn label(&self, weekday: Weekday) -> &'static str {
        self.labels[weekday.num_days_from_sunday() as usize]
    }

    /// All seven labels, Sunday first.
    #[must_use]
    pub fn as_array(&self) -> [&'static str; 7] {
        self.labels
    }
}

impl Default for DayLabels {
    fn default() -> Self {
        DAY_LABELS_PT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sunday_first() {
        assert_eq!(DAY_LABELS_PT.label(Weekday::Sun), "Dom");
        assert_eq!(DAY_LABELS_PT.label(Weekday::Mon), "Seg");
        assert_eq!(DAY_LABELS_PT.label(Weekday::Sat), "Sáb");
    }

    #[test]
    fn custom_table_is_injectable() {
        let en = DayLabels::new(["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
        assert_eq!(en.label(Weekday::Wed), "Wed");
        assert_eq!(DayLabels::default(), DAY_LABELS_PT);
    }
}
