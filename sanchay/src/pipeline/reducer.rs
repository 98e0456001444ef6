//! Reduction of mapped values into a single cell.

use log::warn;

use crate::config::RANGE_EPSILON;
use crate::error::{CoregError, Result};
use crate::geometry::GeometryOps;
use crate::opaque::OpaqueData;

use super::AssociationRecord;

/// Everything a reducer may look at.
///
/// `records` is aligned with `values` for per-record mappers; `Lookup` relies
/// on that alignment to find the value of the closest record.
pub struct ReducerInput<'r, 'a> {
    pub values: &'r [OpaqueData],
    pub records: &'r [AssociationRecord<'a>],
    pub ops: &'r dyn GeometryOps,
}

/// Collapses mapped values into one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reducer {
    Min,
    Max,
    Mean,
    /// Element at index `n / 2` of the sorted values (upper median for even `n`).
    Median,
    /// Nearest-rank percentile, 0..=100.
    Percentile(u8),
    /// Most frequent stringified value; ties go to the lexicographically first.
    Vote,
    /// Not implemented.
    WeightedMean,
    /// Value of the record closest to the seed.
    Lookup,
    /// Always `Empty`.
    NoOp,
}

impl Reducer {
    pub fn name(&self) -> &'static str {
        match self {
            Reducer::Min => "min",
            Reducer::Max => "max",
            Reducer::Mean => "mean",
            Reducer::Median => "median",
            Reducer::Percentile(_) => "percentile",
            Reducer::Vote => "vote",
            Reducer::WeightedMean => "weighted_mean",
            Reducer::Lookup => "lookup",
            Reducer::NoOp => "no_op",
        }
    }

    /// Reduce mapped values.
    ///
    /// Empty input always yields `Empty`. Numeric reducers skip `Empty` cells
    /// and fail on cells that are not numbers.
    pub fn reduce(&self, input: &ReducerInput<'_, '_>) -> Result<OpaqueData> {
        if input.values.is_empty() {
            return Ok(OpaqueData::Empty);
        }

        match *self {
            Reducer::Min => {
                self.numeric(input.values, |v| v.iter().copied().fold(f64::INFINITY, f64::min))
            }
            Reducer::Max => {
                self.numeric(input.values, |v| v.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            }
            Reducer::Mean => {
                self.numeric(input.values, |v| v.iter().sum::<f64>() / v.len() as f64)
            }
            Reducer::Median => self.numeric(input.values, |v| {
                let mid = v.len() / 2;
                *v.select_nth_unstable_by(mid, f64::total_cmp).1
            }),
            Reducer::Percentile(p) => self.numeric(input.values, |v| {
                v.sort_by(f64::total_cmp);
                // Integer rank: p * n / 100 must not pick up float rounding
                let rank = (usize::from(p) * v.len()).div_ceil(100);
                v[rank.clamp(1, v.len()) - 1]
            }),
            Reducer::Vote => Ok(vote(input.values)),
            Reducer::WeightedMean => Err(CoregError::NotImplemented("weighted mean reducer")),
            Reducer::Lookup => Ok(lookup(input)),
            Reducer::NoOp => Ok(OpaqueData::Empty),
        }
    }

    /// Coerce non-empty cells to `f64` and apply `f` to the (non-empty) result.
    fn numeric(
        &self,
        values: &[OpaqueData],
        f: impl FnOnce(&mut [f64]) -> f64,
    ) -> Result<OpaqueData> {
        let mut numbers = values
            .iter()
            .filter(|v| !v.is_empty())
            .map(|v| v.to_f64(self.name()))
            .collect::<Result<Vec<f64>>>()?;

        if numbers.is_empty() {
            return Ok(OpaqueData::Empty);
        }
        Ok(OpaqueData::Double(f(&mut numbers)))
    }
}

fn vote(values: &[OpaqueData]) -> OpaqueData {
    let mut ballots: Vec<String> = values
        .iter()
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .collect();
    ballots.sort();

    let mut winner: Option<(&str, usize)> = None;
    for run in ballots.chunk_by(|a, b| a == b) {
        // Strictly greater keeps the first of equally popular values
        if winner.map_or(true, |(_, count)| run.len() > count) {
            winner = Some((run[0].as_str(), run.len()));
        }
    }

    winner.map_or(OpaqueData::Empty, |(value, _)| OpaqueData::String(value.to_string()))
}

fn lookup(input: &ReducerInput<'_, '_>) -> OpaqueData {
    let ReducerInput {
        values,
        records,
        ops,
    } = *input;

    if records.len() != values.len() {
        warn!(
            "[Reducer] lookup needs one value per association ({} values, {} records), using the first value",
            values.len(),
            records.len()
        );
        return values[0].clone();
    }

    let Some(closest) = records.iter().map(|r| r.distance).min_by(f64::total_cmp) else {
        return OpaqueData::Empty;
    };

    let tied: Vec<usize> = (0..records.len())
        .filter(|&i| (records[i].distance - closest).abs() <= RANGE_EPSILON)
        .collect();

    if tied.len() == 1 || closest > RANGE_EPSILON {
        return values[tied[0]].clone();
    }

    // Seed lies inside several overlapping geometries: prefer the smallest polygon
    let smallest = tied
        .iter()
        .filter_map(|&i| ops.area(&records[i].rfg.geometry).map(|area| (i, area)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    match smallest {
        Some((i, _)) => values[i].clone(),
        None => {
            warn!(
                "[Reducer] lookup: {} features at distance zero without polygon area, using {}",
                tied.len(),
                records[tied[0]].feature()
            );
            values[tied[0]].clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, PlanarGeometry, Point};
    use crate::source::{FeatureId, ReconstructedGeometry};
    use approx::assert_relative_eq;

    fn reduce(reducer: Reducer, values: &[OpaqueData]) -> Result<OpaqueData> {
        reducer.reduce(&ReducerInput {
            values,
            records: &[],
            ops: &PlanarGeometry,
        })
    }

    fn doubles(values: &[f64]) -> Vec<OpaqueData> {
        values.iter().map(|&v| OpaqueData::Double(v)).collect()
    }

    fn as_f64(data: OpaqueData) -> f64 {
        data.as_f64().unwrap()
    }

    const ALL: [Reducer; 9] = [
        Reducer::Min,
        Reducer::Max,
        Reducer::Mean,
        Reducer::Median,
        Reducer::Percentile(90),
        Reducer::Vote,
        Reducer::WeightedMean,
        Reducer::Lookup,
        Reducer::NoOp,
    ];

    #[test]
    fn test_empty_input_is_empty() {
        for reducer in ALL {
            assert_eq!(reduce(reducer, &[]).unwrap(), OpaqueData::Empty, "{:?}", reducer);
        }
    }

    #[test]
    fn test_single_element_numeric() {
        for reducer in [
            Reducer::Min,
            Reducer::Max,
            Reducer::Mean,
            Reducer::Median,
            Reducer::Percentile(0),
            Reducer::Percentile(50),
            Reducer::Percentile(100),
        ] {
            let result = reduce(reducer, &[OpaqueData::Int(42)]).unwrap();
            assert_relative_eq!(as_f64(result), 42.0);
        }
    }

    #[test]
    fn test_min_max_mean() {
        let values = doubles(&[4.0, -2.0, 10.0]);
        assert_relative_eq!(as_f64(reduce(Reducer::Min, &values).unwrap()), -2.0);
        assert_relative_eq!(as_f64(reduce(Reducer::Max, &values).unwrap()), 10.0);
        assert_relative_eq!(as_f64(reduce(Reducer::Mean, &values).unwrap()), 4.0);
    }

    #[test]
    fn test_median_upper_convention() {
        let values = doubles(&[7.0, 3.0, 9.0, 1.0]);
        assert_relative_eq!(as_f64(reduce(Reducer::Median, &values).unwrap()), 7.0);
        assert_relative_eq!(as_f64(reduce(Reducer::Median, &doubles(&[5.0])).unwrap()), 5.0);
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let values = doubles(&[15.0, 20.0, 35.0, 40.0, 50.0]);
        assert_relative_eq!(as_f64(reduce(Reducer::Percentile(30), &values).unwrap()), 20.0);
        assert_relative_eq!(as_f64(reduce(Reducer::Percentile(40), &values).unwrap()), 20.0);
        assert_relative_eq!(as_f64(reduce(Reducer::Percentile(50), &values).unwrap()), 35.0);
        assert_relative_eq!(as_f64(reduce(Reducer::Percentile(100), &values).unwrap()), 50.0);
        assert_relative_eq!(as_f64(reduce(Reducer::Percentile(0), &values).unwrap()), 15.0);
    }

    #[test]
    fn test_percentile_exact_rank_products() {
        // p * n / 100 lands exactly on an integer rank
        let hundred: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(
            reduce(Reducer::Percentile(7), &doubles(&hundred)).unwrap(),
            OpaqueData::Double(7.0)
        );

        let fifty: Vec<f64> = (1..=50).map(f64::from).collect();
        assert_eq!(
            reduce(Reducer::Percentile(14), &doubles(&fifty)).unwrap(),
            OpaqueData::Double(7.0)
        );

        let twenty_five: Vec<f64> = (1..=25).map(f64::from).collect();
        assert_eq!(
            reduce(Reducer::Percentile(28), &doubles(&twenty_five)).unwrap(),
            OpaqueData::Double(7.0)
        );
    }

    #[test]
    fn test_numeric_skips_empty_cells() {
        let values = vec![OpaqueData::Empty, OpaqueData::Int(3), OpaqueData::Empty];
        assert_relative_eq!(as_f64(reduce(Reducer::Mean, &values).unwrap()), 3.0);
        let all_empty = vec![OpaqueData::Empty, OpaqueData::Empty];
        assert_eq!(reduce(Reducer::Mean, &all_empty).unwrap(), OpaqueData::Empty);
    }

    #[test]
    fn test_non_numeric_is_error() {
        let values = vec![OpaqueData::Int(3), OpaqueData::from("granite")];
        let err = reduce(Reducer::Max, &values).unwrap_err();
        assert!(matches!(err, CoregError::NonNumeric { reducer: "max", .. }));
    }

    #[test]
    fn test_vote_tie_goes_to_first() {
        let values: Vec<OpaqueData> = ["b", "a", "a", "b", "c"].into_iter().map(Into::into).collect();
        assert_eq!(reduce(Reducer::Vote, &values).unwrap(), OpaqueData::from("a"));
    }

    #[test]
    fn test_vote_majority_and_mixed_types() {
        let values = vec![
            OpaqueData::Int(1),
            OpaqueData::from("1"),
            OpaqueData::from("z"),
            OpaqueData::Empty,
        ];
        assert_eq!(reduce(Reducer::Vote, &values).unwrap(), OpaqueData::from("1"));
    }

    #[test]
    fn test_weighted_mean_not_implemented() {
        let err = reduce(Reducer::WeightedMean, &doubles(&[1.0])).unwrap_err();
        assert!(matches!(err, CoregError::NotImplemented(_)));
    }

    fn square(id: u64, side: f64) -> ReconstructedGeometry {
        ReconstructedGeometry::new(
            FeatureId(id),
            Geometry::Polygon(vec![
                Point::new(-side, -side),
                Point::new(side, -side),
                Point::new(side, side),
                Point::new(-side, side),
            ]),
        )
    }

    fn point(id: u64) -> ReconstructedGeometry {
        ReconstructedGeometry::new(FeatureId(id), Geometry::Point(Point::ZERO))
    }

    #[test]
    fn test_lookup_closest() {
        let (a, b, c) = (point(1), point(2), point(3));
        let records = vec![
            AssociationRecord::new(&a, 12.0),
            AssociationRecord::new(&b, 3.0),
            AssociationRecord::new(&c, 7.0),
        ];
        let values = vec![OpaqueData::from("far"), OpaqueData::from("near"), OpaqueData::from("mid")];
        let result = Reducer::Lookup
            .reduce(&ReducerInput {
                values: &values,
                records: &records,
                ops: &PlanarGeometry,
            })
            .unwrap();
        assert_eq!(result, OpaqueData::from("near"));
    }

    #[test]
    fn test_lookup_zero_tie_prefers_smallest_polygon() {
        let (large, small) = (square(1, 10.0), square(2, 1.0));
        let records = vec![
            AssociationRecord::new(&large, 0.0),
            AssociationRecord::new(&small, 0.0),
        ];
        let values = vec![OpaqueData::from("large"), OpaqueData::from("small")];
        let result = Reducer::Lookup
            .reduce(&ReducerInput {
                values: &values,
                records: &records,
                ops: &PlanarGeometry,
            })
            .unwrap();
        assert_eq!(result, OpaqueData::from("small"));
    }

    #[test]
    fn test_lookup_zero_tie_without_area_uses_first() {
        let (a, b) = (point(1), point(2));
        let records = vec![AssociationRecord::new(&a, 0.0), AssociationRecord::new(&b, 0.0)];
        let values = vec![OpaqueData::Int(1), OpaqueData::Int(2)];
        let result = Reducer::Lookup
            .reduce(&ReducerInput {
                values: &values,
                records: &records,
                ops: &PlanarGeometry,
            })
            .unwrap();
        assert_eq!(result, OpaqueData::Int(1));
    }
}
