use proptest::prelude::*;

use crate::error::Error;
use crate::index::{
    broadcast, size_from_width, sizes_from_widths, width_from_size, widths_from_sizes, Triangle,
};

#[test]
fn sizes() {
    assert_eq!(size_from_width(0), 0);
    assert_eq!(size_from_width(1), 1);
    assert_eq!(size_from_width(3), 6);
    assert_eq!(size_from_width(6), 21);

    assert_eq!(width_from_size(0), Ok(0));
    assert_eq!(width_from_size(21), Ok(6));
    assert_eq!(width_from_size(5), Err(Error::InvalidSize { size: 5 }));
    assert_eq!(width_from_size(2), Err(Error::InvalidSize { size: 2 }));
    assert_eq!(width_from_size(usize::MAX), Err(Error::InvalidSize { size: usize::MAX }));
}

#[test]
fn element_wise_sizes() {
    assert_eq!(sizes_from_widths(&[0, 1, 3, 6]), vec![0, 1, 6, 21]);
    assert_eq!(sizes_from_widths(&[]), Vec::<usize>::new());

    assert_eq!(widths_from_sizes(&[21, 0, 6]), Ok(vec![6, 0, 3]));
    assert_eq!(widths_from_sizes(&[1, 5, 2]), Err(Error::InvalidSize { size: 5 }));

    let triangle = Triangle::new(6);
    assert_eq!(triangle.levels_of_depths(&[0, 5, 2]), Ok(vec![6, 1, 4]));
    assert_eq!(triangle.levels_of_depths(&[1, 6]), Err(Error::InvalidDepth { depth: 6, width: 6 }));
}

#[test]
fn width_six() {
    let triangle = Triangle::new(6);

    assert_eq!(triangle.linear_index(0, 6), 0);
    assert_eq!(triangle.linear_index(0, 5), 1);
    assert_eq!(triangle.linear_index(1, 6), 2);
    assert_eq!(triangle.linear_index(2, 5), 8);
    assert_eq!(triangle.linear_index(5, 6), 20);
    assert_eq!(triangle.depth(0, 6), 0);
    assert_eq!(triangle.level_of_span(0, 6), 6);
    assert_eq!(triangle.depth(3, 4), 5);
    assert_eq!(triangle.level(5), 1);
}

#[test]
fn width_three_bottom_row() {
    let triangle = Triangle::new(3);

    assert_eq!(triangle.linear_index(0, 1), 3);
    assert_eq!(triangle.linear_index(1, 2), 4);
    assert_eq!(triangle.linear_index(2, 3), 5);
    assert_eq!(triangle.row(0), 0..1);
    assert_eq!(triangle.row(2), 3..6);
}

#[test]
fn validate() {
    let triangle = Triangle::new(4);

    assert!(triangle.validate(0, 4).is_ok());
    assert!(triangle.validate(3, 4).is_ok());
    assert_eq!(
        triangle.validate(2, 2),
        Err(Error::IndexRange { width: 4, spans: vec![(2, 2)] }),
    );
    assert!(triangle.validate(3, 2).is_err());
    assert!(triangle.validate(0, 5).is_err());

    assert!(Triangle::new(0).validate(0, 1).is_err());
}

#[test]
fn validate_all_reports_every_failure() {
    let triangle = Triangle::new(4);

    assert!(triangle.validate_all(&[0, 1, 2], &[1, 2, 4]).is_ok());
    assert_eq!(
        triangle.validate_all(&[0, 3, 2, 1], &[1, 3, 5, 2]),
        Err(Error::IndexRange { width: 4, spans: vec![(3, 3), (2, 5)] }),
    );
}

#[test]
fn vectorized() {
    let triangle = Triangle::new(6);

    assert_eq!(triangle.linear_indices(&[0, 5, 2], &[6, 6, 5]), Ok(vec![0, 20, 8]));
    assert_eq!(triangle.depths(&[0], &[6, 5, 4]), Ok(vec![0, 1, 2]));
    assert_eq!(triangle.levels(&[0, 1, 2], &[3]), Ok(vec![3, 2, 1]));
    assert_eq!(
        triangle.linear_indices(&[0, 1], &[2, 3, 4]),
        Err(Error::ShapeMismatch { left: 2, right: 3 }),
    );
    assert_eq!(triangle.linear_indices(&[], &[]), Ok(vec![]));
}

#[test]
fn broadcasting() {
    assert_eq!(broadcast(&[1], &[2, 3]).unwrap().collect::<Vec<_>>(), vec![(1, 2), (1, 3)]);
    assert_eq!(broadcast(&[0, 1], &[4]).unwrap().collect::<Vec<_>>(), vec![(0, 4), (1, 4)]);
    assert!(broadcast(&[0, 1], &[]).is_err());
}

#[test]
fn level_from_coordinates() {
    let triangle = Triangle::new(5);

    assert_eq!(triangle.level_from(&[1]), Ok(4));
    assert_eq!(triangle.level_from(&[1, 3]), Ok(2));
    assert_eq!(triangle.level_from(&[]), Err(Error::UnsupportedArgumentCount { got: 0 }));
    assert_eq!(triangle.level_from(&[0, 1, 2]), Err(Error::UnsupportedArgumentCount { got: 3 }));
    assert_eq!(triangle.level_from(&[5]), Err(Error::InvalidDepth { depth: 5, width: 5 }));
    assert!(triangle.level_from(&[3, 1]).is_err());
}

#[test]
fn spans_in_buffer_order() {
    let triangle = Triangle::new(3);

    assert_eq!(
        triangle.spans().collect::<Vec<_>>(),
        vec![(0, 3), (0, 2), (1, 3), (0, 1), (1, 2), (2, 3)],
    );
    assert_eq!(Triangle::new(0).spans().count(), 0);
}

proptest! {
    #[test]
    fn width_round_trip(n in 0usize..2_000) {
        prop_assert_eq!(width_from_size(size_from_width(n)), Ok(n));
    }

    #[test]
    fn depth_and_level_add_up(n in 1usize..200, a in 0usize..200, b in 0usize..200) {
        let (start, end) = (a % n, b % n + 1);
        prop_assume!(start < end);

        let triangle = Triangle::new(n);
        let depth = triangle.depth(start, end);
        prop_assert_eq!(depth + triangle.level(depth), n);
    }

    #[test]
    fn bijection(n in 1usize..300, seed in 0usize..usize::MAX) {
        let triangle = Triangle::new(n);
        let linear = seed % triangle.size();

        let (start, end) = triangle.span(linear);
        prop_assert!(triangle.contains(start, end));
        prop_assert_eq!(triangle.linear_index(start, end), linear);
    }
}

#[test]
fn bijection_is_total() {
    for n in 0..30 {
        let triangle = Triangle::new(n);
        let linear = triangle.spans()
            .map(|(start, end)| triangle.linear_index(start, end))
            .collect::<Vec<_>>();
        assert_eq!(linear, (0..triangle.size()).collect::<Vec<_>>());
    }
}
