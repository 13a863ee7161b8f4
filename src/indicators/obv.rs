// =============================================================================
// On-Balance Volume (OBV)
// =============================================================================
//
// Running total of volume signed by the close-to-close direction:
//   close up   => + volume
//   close down => - volume
//   unchanged  => no change
// The first bar starts the total at 0.

use super::IndicatorSeries;
use crate::market_data::Bar;

pub fn calculate_obv(bars: &[Bar]) -> IndicatorSeries {
    let mut total = 0.0_f64;
    let mut out = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if let Some(prev) = i.checked_sub(1).map(|p| &bars[p]) {
            if bar.close > prev.close {
                total += bar.volume;
            } else if bar.close < prev.close {
                total -= bar.volume;
            }
        }
        out.push(Some(total));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::series::test_support::bar;

    fn cv(day: i64, close: f64, volume: f64) -> Bar {
        Bar {
            volume,
            ..bar(day, close)
        }
    }

    #[test]
    fn obv_accumulates_by_direction() {
        let bars = vec![
            cv(0, 10.0, 100.0),
            cv(1, 11.0, 200.0),
            cv(2, 10.5, 50.0),
            cv(3, 10.5, 999.0),
            cv(4, 12.0, 25.0),
        ];
        let obv = calculate_obv(&bars);
        assert_eq!(
            obv,
            vec![Some(0.0), Some(200.0), Some(150.0), Some(150.0), Some(175.0)]
        );
    }

    #[test]
    fn obv_empty() {
        assert!(calculate_obv(&[]).is_empty());
    }
}
