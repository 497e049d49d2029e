//! Bull/bear trend regime from the SMA trio.

use sigscan_core::types::{IndicatorFrame, RegimeFlags};

/// Classifies each bar as bull, bear or neither.
///
/// Bull: the fast, mid and slow SMAs all rose since the previous bar and are
/// stacked fast > mid > slow. Bear mirrors it. Any missing SMA at `i` or `i - 1`
/// leaves both flags false.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegimeClassifier;

impl RegimeClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Flags for every frame, index-aligned.
    pub fn classify(&self, frames: &[IndicatorFrame]) -> Vec<RegimeFlags> {
        let mut flags = Vec::with_capacity(frames.len());
        if !frames.is_empty() {
            flags.push(RegimeFlags::NEUTRAL);
        }
        flags.extend(
            frames
                .windows(2)
                .map(|pair| self.classify_pair(&pair[0], &pair[1])),
        );
        flags
    }

    /// Flags for `current` given the frame before it.
    pub fn classify_pair(&self, previous: &IndicatorFrame, current: &IndicatorFrame) -> RegimeFlags {
        let (Some(fast), Some(mid), Some(slow)) = (current.sma21, current.sma50, current.sma200) else {
            return RegimeFlags::NEUTRAL;
        };
        let (Some(prev_fast), Some(prev_mid), Some(prev_slow)) =
            (previous.sma21, previous.sma50, previous.sma200)
        else {
            return RegimeFlags::NEUTRAL;
        };

        let rising = fast > prev_fast && mid > prev_mid && slow > prev_slow;
        let falling = fast < prev_fast && mid < prev_mid && slow < prev_slow;

        RegimeFlags {
            bull_condition: rising && fast > mid && mid > slow,
            bear_condition: falling && fast < mid && mid < slow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(fast: f64, mid: f64, slow: f64) -> IndicatorFrame {
        IndicatorFrame {
            sma21: Some(fast),
            sma50: Some(mid),
            sma200: Some(slow),
            ..IndicatorFrame::default()
        }
    }

    #[test]
    fn test_bull_and_bear() {
        let classifier = RegimeClassifier::new();

        let bull = classifier.classify_pair(&frame(12.0, 11.0, 10.0), &frame(12.5, 11.2, 10.1));
        assert_eq!(bull, RegimeFlags::BULL);

        let bear = classifier.classify_pair(&frame(8.0, 9.0, 10.0), &frame(7.5, 8.8, 9.9));
        assert_eq!(bear, RegimeFlags::BEAR);
    }

    #[test]
    fn test_rising_but_not_stacked_is_neutral() {
        let classifier = RegimeClassifier::new();
        let flags = classifier.classify_pair(&frame(10.0, 11.0, 9.0), &frame(10.5, 11.1, 9.1));
        assert_eq!(flags, RegimeFlags::NEUTRAL);
    }

    #[test]
    fn test_missing_sma_is_neutral() {
        let classifier = RegimeClassifier::new();
        let mut warm = frame(12.5, 11.2, 10.1);
        let cold = IndicatorFrame {
            sma200: None,
            ..frame(12.0, 11.0, 10.0)
        };
        assert_eq!(classifier.classify_pair(&cold, &warm), RegimeFlags::NEUTRAL);

        warm.sma50 = None;
        assert_eq!(classifier.classify_pair(&frame(12.0, 11.0, 10.0), &warm), RegimeFlags::NEUTRAL);
    }

    #[test]
    fn test_classify_is_aligned() {
        let frames = vec![frame(12.0, 11.0, 10.0), frame(12.5, 11.2, 10.1)];
        let flags = RegimeClassifier::new().classify(&frames);
        assert_eq!(flags, vec![RegimeFlags::NEUTRAL, RegimeFlags::BULL]);
        assert!(RegimeClassifier::new().classify(&[]).is_empty());
    }
}
