//! Band raster persistence.
//!
//! Fetches both polarizations concurrently and writes the TIFFs under the
//! image-dump directory. Either both bands land on disk or the whole
//! operation fails; no partial pair is reported.

use std::path::Path;

use chrono::NaiveDate;
use floodwatch_core::models::Band;
use floodwatch_geo::ValidRing;
use floodwatch_imagery::{AccessToken, ImageryAcquisition};

use crate::error::ApiError;

/// Fetch VV and VH for one day and save both, returning the saved paths in
/// band order.
pub async fn save_band_pair(
    imagery: &dyn ImageryAcquisition,
    token: &AccessToken,
    ring: &ValidRing,
    date: NaiveDate,
    image_dir: &Path,
) -> Result<Vec<String>, ApiError> {
    let (vv, vh) = tokio::try_join!(
        imagery.fetch_band(token, ring, date, Band::Vv),
        imagery.fetch_band(token, ring, date, Band::Vh),
    )?;

    let vv_path = save_image(image_dir, Band::Vv, date, &vv).await?;
    let vh_path = save_image(image_dir, Band::Vh, date, &vh).await?;
    Ok(vec![vv_path, vh_path])
}

async fn save_image(
    image_dir: &Path,
    band: Band,
    date: NaiveDate,
    bytes: &[u8],
) -> Result<String, ApiError> {
    let dir = image_dir.join(band.as_str());
    tracing::info!(band = %band, date = %date, "saving band raster");

    tokio::fs::create_dir_all(&dir).await.map_err(|e| {
        ApiError::internal("Failed to save image").with_details(e.to_string())
    })?;

    let path = dir.join(format!("{date}_{band}_gamma0_terrain.tif"));
    tokio::fs::write(&path, bytes).await.map_err(|e| {
        ApiError::internal("Failed to save image").with_details(e.to_string())
    })?;

    tracing::debug!(path = %path.display(), "band raster saved");
    Ok(path.to_string_lossy().into_owned())
}
