//! Log Filter
//!
//! The event log table is seeded at startup and never grows. Two dropdowns
//! (event type and severity) decide which rows are shown.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Dropdown label that disables the event-type filter
pub const ALL_EVENTS: &str = "All Events";
/// Dropdown label that disables the severity filter
pub const ALL_SEVERITIES: &str = "All Severities";

/// A row of the event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub event_type: String,
    pub severity: String,
    pub source: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(timestamp: &str, event_type: &str, severity: &str, source: &str, message: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            event_type: event_type.to_string(),
            severity: severity.to_string(),
            source: source.to_string(),
            message: message.to_string(),
        }
    }
}

/// Selection of a single dropdown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterChoice {
    #[default]
    All,
    Exactly(String),
}

impl FilterChoice {
    /// Interpret a dropdown value, where `all_label` means "no filter"
    pub fn from_dropdown(value: &str, all_label: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == all_label {
            FilterChoice::All
        } else {
            FilterChoice::Exactly(value.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            FilterChoice::All => true,
            FilterChoice::Exactly(wanted) => wanted == value.trim(),
        }
    }

    /// Dropdown value for this choice
    pub fn to_dropdown(&self, all_label: &str) -> String {
        match self {
            FilterChoice::All => all_label.to_string(),
            FilterChoice::Exactly(v) => v.clone(),
        }
    }
}

/// Current state of the two log dropdowns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub event_type: FilterChoice,
    pub severity: FilterChoice,
}

impl LogFilter {
    pub fn from_dropdowns(event_type: &str, severity: &str) -> Self {
        Self {
            event_type: FilterChoice::from_dropdown(event_type, ALL_EVENTS),
            severity: FilterChoice::from_dropdown(severity, ALL_SEVERITIES),
        }
    }

    /// A row is shown iff it passes both dropdowns
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.event_type.matches(&entry.event_type) && self.severity.matches(&entry.severity)
    }

    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            event_type: self.event_type.to_dropdown(ALL_EVENTS),
            severity: self.severity.to_dropdown(ALL_SEVERITIES),
        }
    }
}

/// Dropdown values as shown to (and sent by) clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default = "default_event_selection")]
    pub event_type: String,
    #[serde(default = "default_severity_selection")]
    pub severity: String,
}

fn default_event_selection() -> String {
    ALL_EVENTS.to_string()
}

fn default_severity_selection() -> String {
    ALL_SEVERITIES.to_string()
}

impl From<&FilterSelection> for LogFilter {
    fn from(sel: &FilterSelection) -> Self {
        LogFilter::from_dropdowns(&sel.event_type, &sel.severity)
    }
}

/// Log table together with its filter
#[derive(Debug, Clone, Default)]
pub struct LogTable {
    entries: Vec<LogEntry>,
    filter: LogFilter,
}

impl LogTable {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self {
            entries,
            filter: LogFilter::default(),
        }
    }

    pub fn set_filter(&mut self, filter: LogFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Visibility flag for every row, in table order
    pub fn visibility(&self) -> Vec<bool> {
        self.entries.iter().map(|e| self.filter.matches(e)).collect()
    }

    pub fn visible(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| self.filter.matches(e))
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    /// Event-type dropdown options, "All Events" first
    pub fn event_options(&self) -> Vec<String> {
        options(ALL_EVENTS, self.entries.iter().map(|e| e.event_type.as_str()))
    }

    /// Severity dropdown options, "All Severities" first
    pub fn severity_options(&self) -> Vec<String> {
        options(ALL_SEVERITIES, self.entries.iter().map(|e| e.severity.as_str()))
    }
}

fn options<'a>(all_label: &str, values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let distinct: BTreeSet<&str> = values.collect();
    std::iter::once(all_label)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}

/// Log rows present when the dashboard starts
pub fn seed_entries() -> Vec<LogEntry> {
    vec![
        LogEntry::new("2024-01-15 14:32:15", "Voltage Sag", "Critical", "Feeder F-12", "Voltage dropped to 82% of nominal for 120 ms"),
        LogEntry::new("2024-01-15 14:28:03", "Harmonic Distortion", "Warning", "Substation S-3", "THD exceeded 5% threshold on phase B"),
        LogEntry::new("2024-01-15 13:55:41", "Frequency Deviation", "Warning", "PMU-07", "Frequency reached 49.82 Hz"),
        LogEntry::new("2024-01-15 13:12:09", "Power Factor", "Info", "Feeder F-04", "Power factor corrected to 0.97"),
        LogEntry::new("2024-01-15 12:47:30", "Voltage Swell", "Warning", "Feeder F-12", "Voltage rose to 112% of nominal for 80 ms"),
        LogEntry::new("2024-01-15 11:03:52", "Frequency Deviation", "Critical", "PMU-02", "Frequency reached 50.31 Hz"),
        LogEntry::new("2024-01-15 10:21:18", "Harmonic Distortion", "Info", "Substation S-1", "5th harmonic back within limits"),
        LogEntry::new("2024-01-15 09:14:44", "Voltage Sag", "Info", "Feeder F-07", "Minor sag to 94% of nominal, self-cleared"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LogTable {
        LogTable::new(seed_entries())
    }

    #[test]
    fn test_default_filter_shows_everything() {
        let t = table();
        assert_eq!(t.visible_count(), t.entries().len());
        assert!(t.visibility().iter().all(|v| *v));
    }

    #[test]
    fn test_visibility_rule_for_every_combination() {
        let mut t = table();
        let events = t.event_options();
        let severities = t.severity_options();

        for event in &events {
            for severity in &severities {
                t.set_filter(LogFilter::from_dropdowns(event, severity));
                for (entry, visible) in t.entries().iter().zip(t.visibility()) {
                    let expected = (event == ALL_EVENTS || entry.event_type == *event)
                        && (severity == ALL_SEVERITIES || entry.severity == *severity);
                    assert_eq!(visible, expected, "{} / {} on {:?}", event, severity, entry);
                }
            }
        }
    }

    #[test]
    fn test_specific_filter() {
        let mut t = table();
        t.set_filter(LogFilter::from_dropdowns("Voltage Sag", "Critical"));
        let visible: Vec<_> = t.visible().collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].source, "Feeder F-12");

        t.set_filter(LogFilter::from_dropdowns(ALL_EVENTS, "Warning"));
        assert_eq!(t.visible_count(), 3);
    }

    #[test]
    fn test_unknown_value_hides_all() {
        let mut t = table();
        t.set_filter(LogFilter::from_dropdowns("Blackout", ALL_SEVERITIES));
        assert_eq!(t.visible_count(), 0);
    }

    #[test]
    fn test_options() {
        let t = table();
        let events = t.event_options();
        assert_eq!(events[0], ALL_EVENTS);
        assert!(events.contains(&"Voltage Swell".to_string()));
        assert_eq!(events.len(), 1 + 5);
        assert_eq!(t.severity_options(), vec![ALL_SEVERITIES, "Critical", "Info", "Warning"]);
    }

    #[test]
    fn test_selection_roundtrip() {
        let filter = LogFilter::from_dropdowns("Voltage Sag", ALL_SEVERITIES);
        let sel = filter.selection();
        assert_eq!(sel.event_type, "Voltage Sag");
        assert_eq!(sel.severity, ALL_SEVERITIES);
        assert_eq!(LogFilter::from(&sel), filter);
    }
}
