//! Class field container regression test
//!
//! Layout, accessors and shape validation of ClassMap and ClassVolume on
//! random probability fields.

use ctxfeat_core::{ClassMap, ClassVolume, Error};
use ctxfeat_test::{RegParams, random_class_map, random_class_volume};

#[test]
fn field_map_reg() {
    let mut rp = RegParams::new("field_map");

    let map = random_class_map(7, 5, 4, 3);
    rp.compare_values(7.0 * 5.0 * 4.0, map.data().len() as f64, 0.0);

    // Flat layout: ((x * ny + y) * nc + c)
    for x in 0..7 {
        for y in 0..5 {
            for c in 0..4 {
                let idx = ((x * 5 + y) * 4 + c) as usize;
                rp.compare_values(map.data()[idx], map.get(x, y, c).unwrap(), 0.0);
            }
            let sum: f64 = map.cell(x, y).iter().sum();
            rp.compare_values(1.0, sum, 1e-12);
        }
    }

    // Round trip through raw data
    let copy = ClassMap::from_data(7, 5, 4, map.data().to_vec()).unwrap();
    rp.compare_bool(true, copy == map);

    // Out-of-range access is reported, not clamped
    rp.compare_bool(
        true,
        matches!(map.get(7, 0, 0), Err(Error::IndexOutOfBounds { .. })),
    );
    rp.compare_bool(true, map.get(0, 0, 4).is_err());

    // Extreme coordinates are rejected and reported as given
    let err = map.get(u32::MAX, u32::MAX, u32::MAX);
    rp.compare_bool(
        true,
        matches!(err, Err(Error::IndexOutOfBounds { ref coord, .. }) if coord == &[u32::MAX; 3]),
    );

    assert!(rp.cleanup(), "field_map regression test failed");
}

#[test]
fn field_volume_reg() {
    let mut rp = RegParams::new("field_volume");

    let vol = random_class_volume(3, 4, 5, 2, 9);
    for x in 0..3 {
        for y in 0..4 {
            for z in 0..5 {
                for c in 0..2 {
                    let idx = (((x * 4 + y) * 5 + z) * 2 + c) as usize;
                    rp.compare_values(vol.data()[idx], vol.get(x, y, z, c).unwrap(), 0.0);
                }
            }
        }
    }

    let mut vol = vol;
    vol.set(2, 3, 4, 1, 0.75).unwrap();
    rp.compare_values(0.75, vol.cell(2, 3, 4)[1], 0.0);
    rp.compare_bool(true, vol.set(3, 0, 0, 0, 1.0).is_err());

    assert!(rp.cleanup(), "field_volume regression test failed");
}

#[test]
fn field_shape_reg() {
    let mut rp = RegParams::new("field_shape");

    rp.compare_bool(
        true,
        matches!(ClassMap::<f64>::new(0, 3, 2), Err(Error::InvalidShape(_))),
    );
    rp.compare_bool(true, ClassVolume::<f64>::new(2, 2, 2, 0).is_err());
    rp.compare_bool(
        true,
        ClassVolume::from_data(2, 2, 2, 2, vec![0.0f32; 15]).is_err(),
    );
    rp.compare_bool(true, ClassMap::from_data(2, 3, 1, vec![0.5f64; 6]).is_ok());

    assert!(rp.cleanup(), "field_shape regression test failed");
}
