//! Detector selection.

use serde::{Deserialize, Serialize};
use sigscan_core::error::DetectorError;
use sigscan_core::traits::PatternDetector;
use sigscan_core::types::{AnalyzedSeries, DetectorKind, Signal};

use crate::{
    BollingerCciDetector, DetectorSettings, MacdHistogramDetector, RsiLevelDetector,
    StochasticCrossDetector, SwingBreakoutDetector,
};

macro_rules! detectors {
    ($($variant:ident($detector:ty)),* $(,)?) => {
        /// The closed set of detectors, dispatched without boxing.
        #[derive(Debug, Clone)]
        pub enum Detector {
            $($variant($detector)),*
        }

        impl PatternDetector for Detector {
            #[inline]
            fn kind(&self) -> DetectorKind {
                match self {
                    $(Self::$variant(d) => d.kind()),*
                }
            }

            #[inline]
            fn min_bars(&self) -> usize {
                match self {
                    $(Self::$variant(d) => d.min_bars()),*
                }
            }

            #[inline]
            fn detect(
                &mut self,
                series: &AnalyzedSeries,
                index: usize,
            ) -> Result<Option<Signal>, DetectorError> {
                match self {
                    $(Self::$variant(d) => d.detect(series, index)),*
                }
            }

            fn reset(&mut self) {
                match self {
                    $(Self::$variant(d) => d.reset()),*
                }
            }
        }
    };
}

detectors! {
    SwingBreakout(SwingBreakoutDetector),
    BollingerCci(BollingerCciDetector),
    Rsi(RsiLevelDetector),
    Stochastic(StochasticCrossDetector),
    MacdHistogram(MacdHistogramDetector),
}

/// Information about a registered detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorInfo {
    pub kind: DetectorKind,
    pub description: String,
    /// Minimum bars before the pattern can match
    pub min_bars: usize,
}

/// Builds detectors from settings.
#[derive(Debug, Clone, Default)]
pub struct DetectorRegistry;

impl DetectorRegistry {
    pub fn new() -> Self {
        Self
    }

    /// List all available detectors.
    pub fn list(&self) -> Vec<DetectorInfo> {
        let settings = DetectorSettings::default();
        DetectorKind::all()
            .iter()
            .map(|&kind| DetectorInfo {
                kind,
                description: kind.description().to_string(),
                min_bars: Self::build(kind, &settings).min_bars(),
            })
            .collect()
    }

    /// Get detector info by name.
    pub fn get(&self, name: &str) -> Option<DetectorInfo> {
        let kind: DetectorKind = name.parse().ok()?;
        self.list().into_iter().find(|info| info.kind == kind)
    }

    /// Create the detector named by `settings.kind` after validating the settings.
    pub fn create(&self, settings: &DetectorSettings) -> Result<Detector, DetectorError> {
        settings.validate()?;
        Ok(Self::build(settings.kind, settings))
    }

    /// Create a detector by name with the rest of `settings`.
    pub fn create_named(
        &self,
        name: &str,
        settings: &DetectorSettings,
    ) -> Result<Detector, DetectorError> {
        let kind: DetectorKind = name.parse()?;
        self.create(&DetectorSettings {
            kind,
            ..settings.clone()
        })
    }

    fn build(kind: DetectorKind, settings: &DetectorSettings) -> Detector {
        let tp = settings.take_profit_ratio;
        match kind {
            DetectorKind::SwingBreakout => Detector::SwingBreakout(SwingBreakoutDetector::new(tp)),
            DetectorKind::BollingerCci => Detector::BollingerCci(BollingerCciDetector::new(
                settings.cci_average_period,
                tp,
            )),
            DetectorKind::Rsi => Detector::Rsi(RsiLevelDetector::new(settings.rsi.clone(), tp)),
            DetectorKind::Stochastic => {
                Detector::Stochastic(StochasticCrossDetector::new(settings.stochastic.clone(), tp))
            }
            DetectorKind::MacdHistogram => Detector::MacdHistogram(MacdHistogramDetector::new(tp)),
        }
    }
}
