//! A chart over all spans of a sequence, filled bottom-up like a parser would.
//!
//! Every cell counts the binary bracketings of its span, which is the Catalan number of the span
//! length minus one. The chart is computed three times, through each of the access patterns a
//! dynamic program would use, and the results have to agree.
use std::ops::Mul;

use num_traits::{One, Zero};

use triangular_map::{Options, TriangularMap};
use triangular_map::index::size_from_width;

use crate::init;

const CATALAN: [u64; 10] = [1, 1, 2, 5, 14, 42, 132, 429, 1430, 4862];

/// One span at a time, through element access.
fn by_elements<T: Zero + One + Clone + Mul<Output=T>>(width: usize) -> TriangularMap<Vec<T>> {
    let mut chart = TriangularMap::filled(width, T::zero());
    if width == 0 {
        return chart;
    }
    chart.lslice_mut(1).unwrap().fill(T::one());

    for level in 2..=width {
        for start in 0..=width - level {
            let end = start + level;
            let mut total = T::zero();
            for split in start + 1..end {
                total = total + chart[(start, split)][0].clone() * chart[(split, end)][0].clone();
            }
            chart.set(start, end, &[total]).unwrap();
        }
    }

    chart
}

/// One row at a time, pairing start slices with end slices.
fn by_slices(width: usize) -> TriangularMap<Vec<u64>> {
    let mut chart = TriangularMap::filled(width, 0);
    chart.lslice_mut(1).unwrap().fill(1);

    for level in 2..=width {
        let row = (0..=width - level)
            .map(|start| {
                let end = start + level;
                let left = chart.sslice(start, ..level - 1).unwrap();
                let right = chart.eslice(end, start + 1..).unwrap();
                left.as_slice().iter().zip(right.as_slice()).map(|(l, r)| l * r).sum()
            })
            .collect::<Vec<u64>>();
        chart.lslice_mut(level).unwrap().copy_from_slice(&row);
    }

    chart
}

/// One row at a time, pairing the rows of a start block with those of an end block.
fn by_blocks(width: usize, options: Options) -> TriangularMap<Vec<u64>> {
    let mut chart = TriangularMap::with_options(vec![0; size_from_width(width)], &[], options).unwrap();
    chart.lslice_mut(1).unwrap().fill(1);

    for level in 2..=width {
        let left = chart.sblock(level, ..).unwrap();
        let right = chart.eblock(level, ..).unwrap();
        let row = (0..=width - level)
            .map(|column| (1..level).map(|r| left[[r, column]] * right[[level - r, column]]).sum())
            .collect::<Vec<u64>>();
        chart.lslice_mut(level).unwrap().copy_from_slice(&row);
    }

    chart
}

#[test]
fn catalan() {
    init();
    let chart = by_elements::<u64>(10);

    for (length, &expected) in (1..=10).zip(&CATALAN) {
        assert_eq!(chart.get(0, length), Ok(&[expected][..]));
        assert_eq!(chart.get(10 - length, 10), Ok(&[expected][..]));
    }
    assert!(chart.dslice(3).unwrap().iter().all(|&count| count == CATALAN[6]));
}

#[test]
fn generic_over_the_scalar() {
    let exact = by_elements::<u128>(30);
    let approximate = by_elements::<f64>(30);

    assert_eq!(exact.get(0, 30), Ok(&[1_002_242_216_651_368][..]));
    assert_eq!(approximate.get(0, 30), Ok(&[1_002_242_216_651_368_f64][..]));
    assert_eq!(by_elements::<u8>(0).size(), 0);
}

#[test]
fn access_patterns_agree() {
    init();
    let expected = by_elements::<u64>(12);

    assert_eq!(by_slices(12), expected);
    assert_eq!(by_blocks(12, Options::default()).into_storage(), expected.copy().into_storage());
    assert_eq!(
        by_blocks(12, Options::default().with_linearise_blocks(true)).into_storage(),
        expected.into_storage(),
    );
}

#[test]
fn windows_are_smaller_charts() {
    let chart = by_elements::<u64>(10);

    assert_eq!(chart.submap(3..8).unwrap(), by_elements(5));
    assert_eq!(chart.submap(0..10).unwrap(), chart);
    assert_eq!(chart.submap(9..10).unwrap().storage(), &vec![1]);
}

#[test]
fn flattened_by_start() {
    let chart = by_elements::<u64>(3);

    // Spans (0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3).
    assert_eq!(chart.flatten("+s+e").unwrap().as_slice(), &[1, 1, 2, 1, 1, 1]);
}
