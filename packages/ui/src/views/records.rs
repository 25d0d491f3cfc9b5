use api::auth::Flash;
use api::{Record, UserInfo};
use dioxus::prelude::*;

use super::predict::{ScoreRow, ScoreTable};
use crate::Layout;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A record as shown in the list and on its own page.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    pub id: i64,
    pub image_url: String,
    pub created_at: String,
    pub notes: String,
    pub top: Option<String>,
    pub rows: Vec<ScoreRow>,
}

impl From<&Record> for RecordView {
    fn from(record: &Record) -> Self {
        // Stored predictions are validated on insert; an unreadable one shows as empty.
        let prediction = record.prediction().ok();
        RecordView {
            id: record.id,
            image_url: record.image_url(),
            created_at: record.created_at.format(DATE_FORMAT).to_string(),
            notes: record.notes.clone().unwrap_or_default(),
            top: prediction
                .as_ref()
                .and_then(|p| p.top())
                .map(|(label, _)| label.display_name().to_string()),
            rows: prediction
                .as_ref()
                .map(ScoreRow::from_prediction)
                .unwrap_or_default(),
        }
    }
}

#[component]
pub fn RecordsPage(user: Option<UserInfo>, flashes: Vec<Flash>, records: Vec<RecordView>) -> Element {
    rsx! {
        Layout {
            title: "Records",
            user: user,
            flashes: flashes,
            h1 { "Your records" }
            div {
                class: "record-grid",
                for record in records.iter() {
                    a {
                        key: "{record.id}",
                        class: "record-card",
                        href: "/record/{record.id}",
                        img { src: "{record.image_url}", alt: "Record {record.id}" }
                        div {
                            class: "record-meta",
                            if let Some(ref top) = record.top {
                                strong { "{top}" }
                            }
                            span { class: "muted", "{record.created_at}" }
                            p { "{record.notes}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn RecordPage(user: Option<UserInfo>, flashes: Vec<Flash>, record: RecordView) -> Element {
    rsx! {
        Layout {
            title: "{record.created_at} result",
            user: user,
            flashes: flashes,
            h1 { "Record from {record.created_at}" }
            if let Some(ref top) = record.top {
                p { class: "lead", "Most likely: " strong { "{top}" } }
            }
            figure {
                img { class: "upload", src: "{record.image_url}", alt: "Recorded image" }
            }
            ScoreTable { rows: record.rows.clone() }
            form {
                class: "card",
                method: "post",
                action: "/record/{record.id}/notes",
                label { r#for: "note", "Notes" }
                textarea { id: "note", name: "note", rows: "3", "{record.notes}" }
                button { r#type: "submit", "Update notes" }
            }
            form {
                class: "inline",
                method: "post",
                action: "/record/{record.id}/delete",
                button { class: "danger", r#type: "submit", "Delete record" }
            }
            p { a { href: "/records", "Back to records" } }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_record_view() {
        let record = Record {
            id: 7,
            image_name: "abc.png".to_string(),
            prediction: "[0, 0, 0, 0, 0.9, 0.1, 0]".to_string(),
            notes: None,
            created_at: Utc.with_ymd_and_hms(2024, 6, 14, 9, 30, 0).unwrap(),
            user_id: 1,
        };
        let view = RecordView::from(&record);
        assert_eq!(view.created_at, "2024-06-14 09:30:00");
        assert_eq!(view.top.as_deref(), Some("Sitting"));
        assert_eq!(view.image_url, "/static/images/records/abc.png");
        assert_eq!(view.rows.len(), 7);
        assert_eq!(view.notes, "");
    }
}
