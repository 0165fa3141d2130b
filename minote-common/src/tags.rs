//! Tag catalog
//!
//! The mood and activity labels offered to the user, with display color
//! (moods) and icon name (activities). Passed around as configuration;
//! there is no process-wide default list.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::MoodRecord;

/// Color used for moods with no catalog entry
pub const FALLBACK_MOOD_COLOR: &str = "#FFD700";
/// Icon used for activities with no catalog entry
pub const FALLBACK_ACTIVITY_ICON: &str = "star.fill";
/// Color given to user-created mood tags
pub const CUSTOM_MOOD_COLOR: &str = "#007AFF";
/// Icon given to user-created activity tags
pub const CUSTOM_ACTIVITY_ICON: &str = "star";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodTag {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTag {
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Mood and activity labels known to the journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCatalog {
    #[serde(default = "default_moods")]
    pub moods: Vec<MoodTag>,
    #[serde(default = "default_activities")]
    pub activities: Vec<ActivityTag>,
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self {
            moods: default_moods(),
            activities: default_activities(),
        }
    }
}

fn default_moods() -> Vec<MoodTag> {
    [
        ("开心", "#FFD700"),
        ("平静", "#87CEEB"),
        ("难过", "#708090"),
        ("激动", "#FF69B4"),
        ("疲惫", CUSTOM_MOOD_COLOR),
        ("其他", CUSTOM_MOOD_COLOR),
    ]
    .into_iter()
    .map(|(name, color)| MoodTag {
        name: name.to_string(),
        color: color.to_string(),
        is_default: true,
    })
    .collect()
}

fn default_activities() -> Vec<ActivityTag> {
    [
        ("工作", "briefcase.fill"),
        ("学习", "book.fill"),
        ("休息", "bed.double.fill"),
        ("娱乐", "gamecontroller.fill"),
        ("家务", CUSTOM_ACTIVITY_ICON),
        ("运动", "figure.run"),
        ("餐饮", "fork.knife"),
        ("旅行", CUSTOM_ACTIVITY_ICON),
        ("其他", CUSTOM_ACTIVITY_ICON),
    ]
    .into_iter()
    .map(|(name, icon)| ActivityTag {
        name: name.to_string(),
        icon: icon.to_string(),
        is_default: true,
    })
    .collect()
}

impl TagCatalog {
    /// Display color for a mood label
    pub fn color_for(&self, mood: &str) -> &str {
        self.moods
            .iter()
            .find(|t| t.name == mood)
            .map(|t| t.color.as_str())
            .unwrap_or(FALLBACK_MOOD_COLOR)
    }

    /// Icon name for an activity label
    pub fn icon_for(&self, activity: &str) -> &str {
        self.activities
            .iter()
            .find(|t| t.name == activity)
            .map(|t| t.icon.as_str())
            .unwrap_or(FALLBACK_ACTIVITY_ICON)
    }

    /// Register a user mood label; returns false if the name is taken or blank
    pub fn add_mood(&mut self, name: &str, color: Option<&str>) -> bool {
        let name = name.trim();
        if name.is_empty() || self.moods.iter().any(|t| t.name == name) {
            return false;
        }
        self.moods.push(MoodTag {
            name: name.to_string(),
            color: color.unwrap_or(CUSTOM_MOOD_COLOR).to_string(),
            is_default: false,
        });
        true
    }

    /// Register a user activity label; returns false if the name is taken or blank
    pub fn add_activity(&mut self, name: &str, icon: Option<&str>) -> bool {
        let name = name.trim();
        if name.is_empty() || self.activities.iter().any(|t| t.name == name) {
            return false;
        }
        self.activities.push(ActivityTag {
            name: name.to_string(),
            icon: icon.unwrap_or(CUSTOM_ACTIVITY_ICON).to_string(),
            is_default: false,
        });
        true
    }

    /// Register every label used by `records` that the catalog does not know yet
    ///
    /// Returns the number of tags added.
    pub fn ensure_tags_for<'a, I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = &'a MoodRecord>,
    {
        let mut added = 0;
        for record in records {
            if self.add_mood(&record.mood, None) {
                added += 1;
            }
            if let Some(activity) = record.activity.as_deref() {
                if self.add_activity(activity, None) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Remove user-created tags that no record uses
    ///
    /// Default tags are always kept. Returns the number of tags removed.
    pub fn prune_unused(&mut self, records: &[MoodRecord]) -> usize {
        let used_moods: HashSet<&str> = records.iter().map(|r| r.mood.as_str()).collect();
        let used_activities: HashSet<&str> =
            records.iter().filter_map(|r| r.activity.as_deref()).collect();

        let before = self.moods.len() + self.activities.len();
        self.moods
            .retain(|t| t.is_default || used_moods.contains(t.name.as_str()));
        self.activities
            .retain(|t| t.is_default || used_activities.contains(t.name.as_str()));
        let removed = before - (self.moods.len() + self.activities.len());

        if removed > 0 {
            tracing::info!(removed, "Pruned unused tags");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;

    fn record(mood: &str, activity: Option<&str>) -> MoodRecord {
        MoodRecord::new(
            parse_timestamp("2024-01-01 10:00:00").unwrap(),
            mood,
            activity.map(str::to_string),
            "",
        )
    }

    #[test]
    fn test_defaults_are_marked_default() {
        let catalog = TagCatalog::default();
        assert_eq!(catalog.moods.len(), 6);
        assert_eq!(catalog.activities.len(), 9);
        assert!(catalog.moods.iter().all(|t| t.is_default));
        assert!(catalog.activities.iter().all(|t| t.is_default));
    }

    #[test]
    fn test_lookup_with_fallbacks() {
        let catalog = TagCatalog::default();
        assert_eq!(catalog.color_for("平静"), "#87CEEB");
        assert_eq!(catalog.color_for("不存在"), FALLBACK_MOOD_COLOR);
        assert_eq!(catalog.icon_for("学习"), "book.fill");
        assert_eq!(catalog.icon_for("不存在"), FALLBACK_ACTIVITY_ICON);
    }

    #[test]
    fn test_add_rejects_duplicates_and_blanks() {
        let mut catalog = TagCatalog::default();
        assert!(catalog.add_mood("紧张", Some("#123456")));
        assert!(!catalog.add_mood("紧张", None));
        assert!(!catalog.add_mood("开心", None));
        assert!(!catalog.add_mood("   ", None));
        assert_eq!(catalog.color_for("紧张"), "#123456");

        assert!(catalog.add_activity("冥想", None));
        assert_eq!(catalog.icon_for("冥想"), CUSTOM_ACTIVITY_ICON);
    }

    #[test]
    fn test_ensure_tags_for_records() {
        let mut catalog = TagCatalog::default();
        let records = vec![
            record("开心", Some("学习")),
            record("紧张", Some("考试")),
            record("紧张", None),
        ];
        assert_eq!(catalog.ensure_tags_for(&records), 2);
        assert!(catalog.moods.iter().any(|t| t.name == "紧张" && !t.is_default));
        assert!(catalog.activities.iter().any(|t| t.name == "考试"));
    }

    #[test]
    fn test_prune_keeps_defaults_and_used_tags() {
        let mut catalog = TagCatalog::default();
        catalog.add_mood("紧张", None);
        catalog.add_mood("无聊", None);
        catalog.add_activity("考试", None);

        let records = vec![record("紧张", None)];
        assert_eq!(catalog.prune_unused(&records), 2);
        assert!(catalog.moods.iter().any(|t| t.name == "紧张"));
        assert!(!catalog.moods.iter().any(|t| t.name == "无聊"));
        assert!(!catalog.activities.iter().any(|t| t.name == "考试"));
        // defaults untouched even though unused
        assert_eq!(catalog.activities.len(), 9);
    }
}
