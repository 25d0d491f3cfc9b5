use api::auth::Flash;
use api::UserInfo;
use dioxus::prelude::*;
use vision::{Detection, Prediction};

use crate::{Layout, NOTE_PLACEHOLDER};

/// One line of a score table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub label: String,
    pub name: String,
    pub percent: String,
    /// Bar width, 0..=100.
    pub width: u32,
}

impl ScoreRow {
    pub fn from_prediction(prediction: &Prediction) -> Vec<ScoreRow> {
        prediction
            .labelled()
            .into_iter()
            .map(|(label, score)| ScoreRow {
                label: label.as_str().to_string(),
                name: label.display_name().to_string(),
                percent: format!("{:.2}%", score * 100.0),
                width: (score.clamp(0.0, 1.0) * 100.0).round() as u32,
            })
            .collect()
    }
}

/// One localized object.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRow {
    pub label: String,
    pub confidence: String,
    pub bbox: String,
}

impl From<&Detection> for DetectionRow {
    fn from(d: &Detection) -> Self {
        DetectionRow {
            label: d.label.clone(),
            confidence: format!("{:.1}%", d.confidence * 100.0),
            bbox: format!(
                "({:.0}, {:.0}) – ({:.0}, {:.0})",
                d.bbox.x1, d.bbox.y1, d.bbox.x2, d.bbox.y2
            ),
        }
    }
}

/// Everything the result page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub image_name: String,
    pub image_url: String,
    /// Serialized prediction, posted back when saving a record.
    pub predicted: String,
    pub top: Option<String>,
    pub rows: Vec<ScoreRow>,
    pub localized_url: Option<String>,
    pub detections: Vec<DetectionRow>,
}

impl PredictionView {
    pub fn new(image_name: &str, image_url: String, prediction: &Prediction) -> Self {
        Self {
            image_name: image_name.to_string(),
            image_url,
            predicted: prediction.to_record_string(),
            top: prediction.top().map(|(label, _)| label.display_name().to_string()),
            rows: ScoreRow::from_prediction(prediction),
            localized_url: None,
            detections: Vec::new(),
        }
    }

    pub fn with_localization(mut self, url: String, detections: &[Detection]) -> Self {
        self.localized_url = Some(url);
        self.detections = detections.iter().map(DetectionRow::from).collect();
        self
    }
}

#[component]
pub fn ScoreTable(rows: Vec<ScoreRow>) -> Element {
    rsx! {
        table {
            class: "scores",
            thead {
                tr {
                    th { "Label" }
                    th { "Score" }
                    th {}
                }
            }
            tbody {
                for row in rows.iter() {
                    tr {
                        key: "{row.label}",
                        td { title: "{row.label}", "{row.name}" }
                        td { class: "score", "{row.percent}" }
                        td {
                            div { class: "bar", style: "width: {row.width}%" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn PredictPage(user: Option<UserInfo>, flashes: Vec<Flash>, result: PredictionView) -> Element {
    let logged_in = user.is_some();

    rsx! {
        Layout {
            title: "Image Prediction Result",
            user: user,
            flashes: flashes,
            h1 { "Prediction result" }
            if let Some(ref top) = result.top {
                p { class: "lead", "Most likely: " strong { "{top}" } }
            }
            div {
                class: "result",
                figure {
                    img { class: "upload", src: "{result.image_url}", alt: "Uploaded image" }
                    figcaption { "Uploaded image" }
                }
                if let Some(ref localized) = result.localized_url {
                    figure {
                        img { class: "upload", src: "{localized}", alt: "Localized image" }
                        figcaption { "{result.detections.len()} object(s) localized" }
                    }
                }
            }
            ScoreTable { rows: result.rows.clone() }
            if !result.detections.is_empty() {
                table {
                    class: "detections",
                    thead {
                        tr {
                            th { "Object" }
                            th { "Confidence" }
                            th { "Box" }
                        }
                    }
                    tbody {
                        for d in result.detections.iter() {
                            tr {
                                td { "{d.label}" }
                                td { "{d.confidence}" }
                                td { "{d.bbox}" }
                            }
                        }
                    }
                }
            }
            if logged_in {
                form {
                    class: "card",
                    method: "post",
                    action: "/record/new",
                    input { r#type: "hidden", name: "image_name", value: "{result.image_name}" }
                    input { r#type: "hidden", name: "predicted", value: "{result.predicted}" }
                    textarea { name: "note", rows: "3", placeholder: NOTE_PLACEHOLDER }
                    button { r#type: "submit", "Save record" }
                }
            } else {
                p {
                    a { href: "/login?next=/", "Log in" }
                    " to save results to your records."
                }
            }
            p { a { href: "/", "Try another image" } }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_rows() {
        let prediction = Prediction::new(vec![0.5, 0.25, 0.0, 0.25, 0.0, 0.0, 0.0]);
        let rows = ScoreRow::from_prediction(&prediction);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].label, "Diff_Direction");
        assert_eq!(rows[0].percent, "50.00%");
        assert_eq!(rows[0].width, 50);
    }

    #[test]
    fn test_prediction_view() {
        let prediction = Prediction::new(vec![0.1, 0.0, 0.0, 0.9, 0.0, 0.0, 0.0]);
        let view = PredictionView::new("a.png", "/static/images/records/a.png".into(), &prediction);
        assert_eq!(view.top.as_deref(), Some("Running"));
        assert_eq!(view.predicted, "[0.1, 0, 0, 0.9, 0, 0, 0]");
        assert!(view.localized_url.is_none());
    }
}
