use std::ptr;

use triangular_map::{Error, Order, PrettyOptions, TriangularMap, ValueFormat};

use crate::init;

fn spans(width: usize) -> TriangularMap<Vec<(usize, usize)>> {
    TriangularMap::from_fn(width, |start, end| (start, end))
}

#[test]
fn rows_share_memory() {
    init();
    let map = spans(6);

    let top = map.top(Some(4)).unwrap();
    for depth in 0..4 {
        let own = map.dslice(depth).unwrap();
        let borrowed = top.dslice(depth).unwrap();
        assert!(ptr::eq(own, borrowed));
    }
    assert_eq!(top.get(0, 4), Ok(&[(0, 6)][..]));
    assert_eq!(top.get(0, 3), Ok(&[(0, 5)][..]));
    assert_eq!(map.lslice(3).unwrap(), map.dslice(3).unwrap());
}

#[test]
fn nested_writes_reach_the_buffer() {
    let mut data = vec![0_i64; 21];
    let mut map = TriangularMap::new(&mut data[..]).unwrap();
    {
        let mut top = map.top_mut(Some(3)).unwrap();
        let mut tip = top.top_mut(Some(1)).unwrap();
        tip.set(0, 1, &[7]).unwrap();
        top.dslice_mut(2).unwrap().fill(3);
    }
    map.set_sslice(5, .., &[1]).unwrap();

    assert_eq!(data[0], 7);
    assert_eq!(&data[3..6], &[3, 3, 3]);
    assert_eq!(data[20], 1);
}

#[test]
fn copies_do_not_share_memory() {
    let mut map = spans(4);
    let start = map.sslice(0, ..).unwrap();
    let block = map.sblock(2, ..).unwrap();
    let window = map.submap(0..2).unwrap();

    for (_, value) in map.iter() {
        assert_ne!(value, &[(9, 9)]);
    }
    map.lslice_mut(1).unwrap().fill((9, 9));
    map.lslice_mut(2).unwrap().fill((9, 9));

    assert_eq!(start.as_slice(), &[(0, 1), (0, 2), (0, 3), (0, 4)]);
    assert_eq!(block[[1, 0]], (0, 1));
    assert_eq!(window.storage(), &vec![(0, 2), (0, 1), (1, 2)]);
}

#[test]
fn every_order_covers_every_span() {
    let orders = ["+s+e", "-s-e", "+e+s", "-e-s", "+l+s", "-l-s", "s-e", "l+s"];

    for width in 0..7 {
        let map = spans(width);
        for order in orders {
            let mut flat = map.flatten(order).unwrap().into_vec();
            assert_eq!(flat.len(), map.size());

            flat.sort_unstable();
            let mut all = map.storage().clone();
            all.sort_unstable();
            assert_eq!(flat, all);
        }
    }

    assert_eq!(map_error("+s+l"), "+s+l");
    assert_eq!(map_error("ll"), "+l+l");
}

fn map_error(order: &str) -> String {
    match order.parse::<Order>() {
        Err(Error::InvalidOrder { order, .. }) => order,
        other => panic!("expected an invalid order, got {other:?}"),
    }
}

#[test]
fn matrix_elements() {
    let data = (0..24).collect::<Vec<u32>>();
    let map = TriangularMap::with_value_shape(data, &[2, 2]).unwrap();
    assert_eq!(map.width(), 3);

    let values = map.gather(&[0, 2], &[3]).unwrap();
    assert_eq!(values.shape(), &[2, 2, 2]);
    assert_eq!(values[[0, 1, 0]], 2);
    assert_eq!(values[[1, 0, 1]], 21);

    let copy = map.eslice(2, 1usize).unwrap();
    assert_eq!(copy.shape(), &[2, 2]);
    assert_eq!(copy.as_slice(), &[16, 17, 18, 19]);
}

#[test]
fn boxed_storage() {
    let data: Box<[f64]> = vec![1.0; 10].into_boxed_slice();
    let mut map = TriangularMap::new(data).unwrap();

    map.set_eblock(2, (.., 0usize), &[0.5]).unwrap();
    assert_eq!(map.get(0, 2), Ok(&[0.5][..]));
    assert_eq!(map.get(1, 2), Ok(&[0.5][..]));
    assert_eq!(map.get(1, 3), Ok(&[1.0][..]));
}

#[test]
fn presentation() {
    let map = TriangularMap::new(vec![0.125, 1.0, 2.5, 10.0, 20.0, 30.0]).unwrap();

    assert_eq!(map.to_string(), "[0.125]\n[1 2.5]\n[10 20 30]");

    let options = PrettyOptions { cut: Some(2), format: ValueFormat::Rounded { decimals: 0 } };
    let expected = [
        "   ╱╲  ╱╲",
        "  ╱ 1╲╱ 2╲",
        " ╱╲  ╱╲  ╱╲",
        "╱10╲╱20╲╱30╲",
    ];
    assert_eq!(map.pretty(&options), expected.join("\n"));
}
