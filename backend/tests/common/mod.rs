//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use crop_advisor::config::PredictionConfig;
use crop_advisor::external::WeatherProvider;
use crop_advisor::ml::{Aggregation, Node, Pipeline, Preprocessor, Transformer, Tree, TreeEnsemble};
use crop_advisor::services::{AdvisoryService, DistrictRegistry};
use shared::{AreaUnits, ObservationSource, WeatherObservation, CROP_TABLE};

// ============================================================================
// Fixture Model
// ============================================================================

pub const DISTRICTS: &[&str] = &["Agra", "Kanpur Nagar", "Lucknow", "Varanasi"];

/// Transformed feature indices of the fixture model
pub mod idx {
    pub const YEAR: usize = 0;
    pub const AREA: usize = 1;
    pub const TEMP_AVG: usize = 2;
    pub const HUMIDITY: usize = 5;
    pub const RAINFALL: usize = 6;
    pub const LUCKNOW: usize = 9;
    pub const WHEAT: usize = 12;
    pub const SUGARCANE: usize = 14;
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// 7 scaled numeric columns, then district and crop indicators (33 features)
pub fn fixture_preprocessor() -> Preprocessor {
    let districts = DISTRICTS.iter().map(|d| d.to_lowercase()).collect();
    let crops = CROP_TABLE.iter().map(|c| c.name.to_uppercase()).collect();

    Preprocessor::new(vec![
        Transformer::StandardScaler {
            name: "num".to_string(),
            columns: strings(&[
                "Year",
                "Area (1000 ha)",
                "temp_avg",
                "temp_max",
                "temp_min",
                "humidity",
                "rainfall",
            ]),
            mean: vec![2005.0, 50.0, 26.0, 33.0, 19.0, 62.0, 90.0],
            scale: vec![10.0, 40.0, 3.0, 3.0, 3.0, 12.0, 60.0],
        },
        Transformer::OneHot {
            name: "cat".to_string(),
            columns: strings(&["Dist Name", "Crop"]),
            categories: vec![districts, crops],
        },
    ])
}

pub fn fixture_ensemble() -> TreeEnsemble {
    TreeEnsemble {
        base_score: 1500.0,
        aggregation: Aggregation::Sum,
        trees: vec![
            Tree {
                nodes: vec![
                    Node::split(idx::SUGARCANE, 0.5, 1, 2, 100.0),
                    Node::split(idx::RAINFALL, 0.0, 3, 4, 95.0),
                    Node::leaf(45000.0, 5.0),
                    Node::leaf(-200.0, 40.0),
                    Node::leaf(300.0, 55.0),
                ],
            },
            Tree {
                nodes: vec![
                    Node::split(idx::WHEAT, 0.5, 1, 2, 100.0),
                    Node::split(idx::TEMP_AVG, 0.3, 3, 4, 90.0),
                    Node::leaf(900.0, 10.0),
                    Node::leaf(150.0, 50.0),
                    Node::leaf(-120.0, 40.0),
                ],
            },
            Tree {
                nodes: vec![
                    Node::split(idx::LUCKNOW, 0.5, 1, 2, 100.0),
                    Node::split(idx::YEAR, 1.0, 3, 4, 75.0),
                    Node::leaf(220.0, 25.0),
                    Node::leaf(-60.0, 45.0),
                    Node::leaf(80.0, 30.0),
                ],
            },
            Tree {
                nodes: vec![
                    Node::split(idx::RAINFALL, 0.5, 1, 2, 100.0),
                    Node::split(idx::RAINFALL, -1.0, 3, 4, 60.0),
                    Node::split(idx::HUMIDITY, 0.0, 5, 6, 40.0),
                    Node::leaf(-90.0, 20.0),
                    Node::leaf(30.0, 40.0),
                    Node::leaf(60.0, 15.0),
                    Node::leaf(-10.0, 25.0),
                ],
            },
        ],
    }
}

pub fn fixture_pipeline() -> Arc<Pipeline> {
    let pipeline = Pipeline {
        name: "fixture-gbr".to_string(),
        preprocessor: fixture_preprocessor(),
        regressor: fixture_ensemble(),
    };
    pipeline.validate().expect("fixture pipeline is valid");
    Arc::new(pipeline)
}

/// Fixture model plus a tree splitting on scaled area between the hectare
/// value 2.0 (scaled -1.2) and its model-unit form 0.002 (scaled -1.24995)
pub fn area_sensitive_pipeline() -> Arc<Pipeline> {
    let mut regressor = fixture_ensemble();
    regressor.trees.push(Tree {
        nodes: vec![
            Node::split(idx::AREA, -1.22, 1, 2, 100.0),
            Node::leaf(-75.0, 60.0),
            Node::leaf(125.0, 40.0),
        ],
    });
    let pipeline = Pipeline {
        name: "fixture-gbr-area".to_string(),
        preprocessor: fixture_preprocessor(),
        regressor,
    };
    pipeline.validate().expect("area fixture pipeline is valid");
    Arc::new(pipeline)
}

/// Pipeline whose output is `value` for every input
pub fn constant_pipeline(value: f64) -> Arc<Pipeline> {
    Arc::new(Pipeline {
        name: "constant".to_string(),
        preprocessor: fixture_preprocessor(),
        regressor: TreeEnsemble {
            base_score: 0.0,
            aggregation: Aggregation::Sum,
            trees: vec![Tree {
                nodes: vec![Node::leaf(value, 1.0)],
            }],
        },
    })
}

// ============================================================================
// Weather and Service
// ============================================================================

/// The observation used by the end-to-end scenario
pub fn lucknow_weather() -> WeatherObservation {
    WeatherObservation {
        temp_avg: 27.0,
        temp_max: 33.0,
        temp_min: 21.0,
        humidity: 55.0,
        rainfall: 80.0,
        source: ObservationSource::OpenWeather,
    }
}

/// Weather provider returning a fixed observation and counting calls
pub struct StubWeather {
    observation: WeatherObservation,
    calls: AtomicUsize,
}

impl StubWeather {
    pub fn new(observation: WeatherObservation) -> Arc<Self> {
        Arc::new(Self {
            observation,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for StubWeather {
    async fn fetch(&self, _location: &str, _year: Option<i32>) -> WeatherObservation {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.observation.clone()
    }
}

pub fn registry() -> DistrictRegistry {
    DistrictRegistry::from_names(DISTRICTS)
}

pub fn prediction_config(area_units: AreaUnits) -> PredictionConfig {
    PredictionConfig {
        recommendation_count: 3,
        explanation_count: 3,
        area_units,
    }
}

pub fn service(weather: Arc<StubWeather>, area_units: AreaUnits) -> AdvisoryService {
    service_with(fixture_pipeline(), weather, area_units)
}

pub fn service_with(
    pipeline: Arc<Pipeline>,
    weather: Arc<StubWeather>,
    area_units: AreaUnits,
) -> AdvisoryService {
    AdvisoryService::new(
        pipeline,
        Arc::new(registry()),
        weather,
        &prediction_config(area_units),
    )
}
