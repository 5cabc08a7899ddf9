//! Integration tests for the volume and scene workflow
//!
//! Drives the connector end-to-end against a mock host: the worked
//! example (a (64, 64, 10) uint16 dataset addressed 1-based), geometry
//! accessors, and a detect-and-store spots pass.

mod common;

#[cfg(feature = "mock-host")]
use ndarray::Array3;
#[cfg(feature = "mock-host")]
use voxbridge::host::MockHost;
#[cfg(feature = "mock-host")]
use voxbridge::{Connector, IndexingBase, ObjectKind, SpotData, Volume, VoxBridgeError};

#[cfg(feature = "mock-host")]
fn example_connector() -> Connector {
    let (tag, sizes, bounds) = common::example_dataset();
    let host = MockHost::new().with_dataset(tag, sizes, bounds).with_scene();
    Connector::new(Box::new(host), IndexingBase::OneBased)
}

#[test]
#[cfg(feature = "mock-host")]
fn test_worked_example_one_based() {
    common::init_tracing();
    let mut connector = example_connector();

    // write zeros into (channel 1, timepoint 1), read them back
    let zeros = Volume::U16(Array3::zeros((64, 64, 10)));
    connector.write_volume(&zeros, 1, 1).unwrap();
    let read_back = connector.read_volume(1, 1, None).unwrap().unwrap();
    assert_eq!(read_back.dim(), (64, 64, 10));
    assert_eq!(read_back, zeros);

    // channel 5 with sizeC = 3 is out of bounds
    let err = connector.write_volume(&zeros, 5, 1).unwrap_err();
    assert!(matches!(
        err,
        VoxBridgeError::IndexOutOfBounds {
            what: "channel",
            index: 5,
            size: 3,
        }
    ));
}

#[test]
#[cfg(feature = "mock-host")]
fn test_patterned_roundtrip_and_row_major_view() {
    let mut connector = example_connector();

    let pattern = Volume::U16(Array3::from_shape_fn((64, 64, 10), |(x, y, z)| {
        (x + 64 * y + 4096 * z) as u16
    }));
    connector.write_volume(&pattern, 2, 2).unwrap();

    let plain = connector.read_volume(2, 2, None).unwrap().unwrap();
    let row_major = connector.read_volume_row_major(2, 2, None).unwrap().unwrap();
    assert_eq!(plain, pattern);
    assert_eq!(row_major, pattern.permute_xy());
}

#[test]
#[cfg(feature = "mock-host")]
fn test_geometry_accessors() {
    let connector = example_connector();

    let sizes = connector.dataset_sizes(None).unwrap().unwrap();
    assert_eq!(sizes.spatial(), (64, 64, 10));

    let voxel_sizes = connector.voxel_sizes(None).unwrap().unwrap();
    common::assert_float_eq(voxel_sizes[0], 2.0, 1e-5);
    common::assert_float_eq(voxel_sizes[1], 2.0, 1e-5);
    common::assert_float_eq(voxel_sizes[2], 5.0, 1e-5);

    // first voxel center maps to 1.0 under 1-based indexing
    let voxels = connector
        .map_units_to_voxels(&[[1.0, 1.0, 2.5]], None)
        .unwrap()
        .unwrap();
    common::assert_float_eq(voxels[0][0], 1.0, 1e-4);
    common::assert_float_eq(voxels[0][1], 1.0, 1e-4);
    common::assert_float_eq(voxels[0][2], 1.0, 1e-4);
}

#[test]
#[cfg(feature = "mock-host")]
fn test_detect_and_store_spots() {
    let mut connector = example_connector();

    let detected = SpotData {
        positions: vec![[10.0, 12.0, 5.0], [100.0, 80.0, 40.0]],
        timepoints: vec![0, 0],
        radii: vec![1.5, 2.0],
    };
    let handle = connector
        .create_spots("Detected nuclei", &detected, [0.0, 1.0, 0.0, 1.0])
        .unwrap()
        .unwrap();

    // the new object shows up in a filtered traversal
    let spots_objects = connector
        .scene_children(true, Some(ObjectKind::Spots))
        .unwrap();
    assert!(spots_objects.contains(&handle));
    assert_eq!(
        connector.object_name(handle).unwrap(),
        "Detected nuclei"
    );
    assert_eq!(connector.spots(handle).unwrap().unwrap(), detected);
}
