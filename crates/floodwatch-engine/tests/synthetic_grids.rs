//! Mapping-service tests over synthetic pixel grids.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeDelta, Utc};
use floodwatch_core::error::{AuthError, CatalogError, ComputeError, ProcessingError};
use floodwatch_core::models::{Band, BoundingBox, DateWindow, Ring};
use floodwatch_engine::{
    CollectionSpec, Grid, GridBackend, GridSources, MappingService,
};
use floodwatch_geo::{validate, ValidRing};
use floodwatch_imagery::{AccessToken, ImageryAcquisition};

struct StubImagery {
    coverage: bool,
}

#[async_trait]
impl ImageryAcquisition for StubImagery {
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        Ok(AccessToken::new("tok", Utc::now() + TimeDelta::seconds(3600)))
    }

    async fn has_coverage(
        &self,
        _token: &AccessToken,
        _bbox: &BoundingBox,
        _window: &DateWindow,
    ) -> Result<bool, CatalogError> {
        Ok(self.coverage)
    }

    async fn fetch_band(
        &self,
        _token: &AccessToken,
        _ring: &ValidRing,
        _date: NaiveDate,
        _band: Band,
    ) -> Result<Vec<u8>, ProcessingError> {
        Ok(vec![])
    }
}

fn jakarta_ring() -> ValidRing {
    validate(&Ring::new(vec![
        [106.80, -6.31],
        [106.81, -6.31],
        [106.81, -6.30],
        [106.80, -6.30],
    ]))
    .unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn insert_flood_pair(
    sources: &mut GridSources,
    center: NaiveDate,
    before_db: f32,
    after_db: f32,
) {
    sources.insert_collection(
        CollectionSpec::sentinel1(Band::Vv, DateWindow::before(center, 5)).key(),
        Grid::filled(8, 8, before_db),
    );
    sources.insert_collection(
        CollectionSpec::sentinel1(Band::Vv, DateWindow::after(center, 5)).key(),
        Grid::filled(8, 8, after_db),
    );
}

#[tokio::test]
async fn change_mask_echoes_its_threshold() {
    let before = DateWindow::around(date("2020-01-10"), 5);
    let after = DateWindow::around(date("2020-01-20"), 5);

    let mut sources = GridSources::new();
    sources.insert_collection(
        CollectionSpec::sentinel1(Band::Vv, before).key(),
        Grid::filled(8, 8, -20.0),
    );
    sources.insert_collection(
        CollectionSpec::sentinel1(Band::Vv, after).key(),
        Grid::filled(8, 8, -17.0),
    );

    let backend = Arc::new(GridBackend::new(sources));
    let service = MappingService::new(
        Arc::new(StubImagery { coverage: true }),
        backend.clone(),
    );

    let overlay = service
        .compute_change_mask(&jakarta_ring(), before, after, Band::Vv, 1.5)
        .await
        .unwrap();

    assert!(!overlay.url.is_empty());
    assert_eq!(overlay.parameters.threshold_used, Some(1.5));
    assert_eq!(overlay.parameters.polarization, Some(Band::Vv));
    assert!(overlay.bounds.min_lon <= overlay.bounds.max_lon);

    // 3 dB brightening everywhere: every pixel is a change.
    assert_eq!(backend.last_rendered().unwrap().count_active(), 64);
}

#[tokio::test]
async fn missing_coverage_fails_before_any_render() {
    let backend = Arc::new(GridBackend::new(GridSources::new()));
    let service = MappingService::new(
        Arc::new(StubImagery { coverage: false }),
        backend.clone(),
    );

    let err = service
        .compute_change_mask(
            &jakarta_ring(),
            DateWindow::around(date("2020-01-10"), 5),
            DateWindow::around(date("2020-01-20"), 5),
            Band::Vv,
            1.5,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ComputeError::NoCoverage { .. }));
    assert_eq!(backend.rendered_count(), 0);
}

#[tokio::test]
async fn flood_difference_produces_three_overlays() {
    let date1 = date("2020-01-05");
    let date2 = date("2020-02-05");

    let mut sources = GridSources::new();
    // Nothing flooded around date1, everything flooded around date2.
    insert_flood_pair(&mut sources, date1, -20.0, -20.0);
    insert_flood_pair(&mut sources, date2, -20.0, -17.0);

    let backend = Arc::new(GridBackend::new(sources));
    let service = MappingService::new(
        Arc::new(StubImagery { coverage: true }),
        backend.clone(),
    );

    let difference = service
        .flood_difference(&jakarta_ring(), date1, date2)
        .await
        .unwrap();

    for overlay in [&difference.flood1, &difference.flood2, &difference.overflow] {
        assert!(overlay.url.starts_with("grid://overlay/"));
        assert_eq!(overlay.parameters.date_window_days, Some(5));
        assert_eq!(overlay.parameters.threshold_used, Some(1.5));
    }
    assert_eq!(backend.rendered_count(), 3);
}

#[tokio::test]
async fn overflow_marks_only_newly_flooded_pixels() {
    let date1 = date("2020-01-05");
    let date2 = date("2020-02-05");

    let mut sources = GridSources::new();
    insert_flood_pair(&mut sources, date1, -20.0, -20.0);
    insert_flood_pair(&mut sources, date2, -20.0, -17.0);

    let backend = Arc::new(GridBackend::new(sources));
    let service = MappingService::new(
        Arc::new(StubImagery { coverage: true }),
        backend.clone(),
    );

    let difference = service
        .flood_difference(&jakarta_ring(), date1, date2)
        .await
        .unwrap();

    // Overlays render in order: flood1, flood2, overflow. With no flooding
    // at date1 and full flooding at date2, every pixel is newly flooded.
    let overflow_index: usize = difference
        .overflow
        .url
        .rsplit('/')
        .next()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(overflow_index, 2);
    assert_eq!(backend.last_rendered().unwrap().count_active(), 64);
}

#[tokio::test]
async fn contour_lines_render_without_touching_the_catalog() {
    let ring = jakarta_ring();
    let bounds = ring.bounding_box();

    let mut sources = GridSources::new();
    sources.insert_elevation(
        floodwatch_engine::graph::ELEVATION_SOURCE,
        Grid::from_fn(16, 16, |x, _| x as f32 * 40.0).with_bounds(bounds),
    );

    let backend = Arc::new(GridBackend::new(sources));
    let service = MappingService::new(
        Arc::new(StubImagery { coverage: false }),
        backend.clone(),
    );

    let overlay = service.contour_lines(&ring).await.unwrap();

    assert!(overlay.url.starts_with("grid://overlay/"));
    assert_eq!(overlay.parameters.contour_interval, Some(100));
    assert_eq!(overlay.parameters.max_elevation, Some(5000));
    assert!(backend.last_rendered().unwrap().count_active() > 0);
}
