use api::uploads::allowed_extension;
use api::{Folder, UploadError};
use axum::extract::{Multipart, State};
use axum::response::Html;
use dioxus::prelude::*;
use ui::views::{PredictPage, PredictionView, UPLOAD_FIELD};
use vision::annotate::annotate;
use vision::{preprocess, Detection, DynamicImage, Prediction};

use super::page;
use crate::error::AppResult;
use crate::extract::{flashes, MaybeUser};
use crate::AppState;

struct Analysis {
    image_name: String,
    prediction: Prediction,
    detections: Option<Vec<Detection>>,
}

pub async fn predict(
    State(state): State<AppState>,
    viewer: MaybeUser,
    mut multipart: Multipart,
) -> AppResult<Html<String>> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        upload = Some((filename, bytes));
    }

    let (filename, bytes) = upload
        .filter(|(name, bytes)| !name.is_empty() && !bytes.is_empty())
        .ok_or(UploadError::Empty)?;
    allowed_extension(&filename)?;

    let images = state.images.clone();
    let classifier = state.classifier.clone();
    let localizer = state.localizer.clone();

    let analysis = tokio::task::spawn_blocking(move || -> AppResult<Analysis> {
        let image = preprocess::decode(&bytes)?;
        let prediction = classifier.classify(&image)?;
        let localized = match localizer {
            Some(localizer) => {
                let detections = localizer.localize(&image)?;
                let annotated = DynamicImage::ImageRgb8(annotate(&image, &detections));
                Some((detections, annotated))
            }
            None => None,
        };

        // Nothing touches the disk until inference has succeeded.
        let image_name = images.save_raw(Folder::Records, &filename, &bytes)?;
        let detections = match localized {
            Some((detections, annotated)) => {
                if let Err(e) = images.save_image(Folder::Localized, &image_name, &annotated) {
                    images.remove(Folder::Records, &image_name);
                    return Err(e.into());
                }
                Some(detections)
            }
            None => None,
        };

        Ok(Analysis {
            image_name,
            prediction,
            detections,
        })
    })
    .await??;

    tracing::info!(
        image = %analysis.image_name,
        top = ?analysis.prediction.top().map(|(label, _)| label.as_str()),
        detections = analysis.detections.as_ref().map(Vec::len),
        "Classified upload"
    );

    let image_url = format!("/static/images/{}/{}", Folder::Records.as_str(), analysis.image_name);
    let mut result = PredictionView::new(&analysis.image_name, image_url, &analysis.prediction);
    if let Some(ref detections) = analysis.detections {
        let url = format!("/static/images/{}/{}", Folder::Localized.as_str(), analysis.image_name);
        result = result.with_localization(url, detections);
    }

    let flashes = flashes(&viewer.session).await;
    Ok(page(rsx! {
        PredictPage { user: viewer.user, flashes: flashes, result: result }
    }))
}
