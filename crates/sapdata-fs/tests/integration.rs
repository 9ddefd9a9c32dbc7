use std::fs;

use sapdata_fs::{CopyOptions, copy_local, part_path, promote};
use tempfile::tempdir;

#[test]
fn test_copy_local_is_idempotent_without_overwrite() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("example_psf_image.npy");
    fs::write(&src, b"first").unwrap();
    let data_dir = dir.path().join("data");

    let first = copy_local(&src, &data_dir, CopyOptions::new()).unwrap();

    // A changed source must not leak into the managed copy on the second call.
    fs::write(&src, b"second").unwrap();
    let second = copy_local(&src, &data_dir, CopyOptions::new()).unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"first");
}

#[test]
fn test_copy_local_overwrite_replaces_destination() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("M31_128.fits");
    fs::write(&src, b"old").unwrap();
    let data_dir = dir.path().join("data");
    copy_local(&src, &data_dir, CopyOptions::new()).unwrap();

    fs::write(&src, b"new").unwrap();
    let dest = copy_local(&src, &data_dir, CopyOptions::new().overwrite(true)).unwrap();

    assert_eq!(fs::read(dest).unwrap(), b"new");
}

#[test]
fn test_promote_replaces_nothing_but_the_part_file() {
    let dir = tempdir().unwrap();
    let fin = dir.path().join("ngc2997.fits");
    let part = part_path(&fin);
    fs::write(&part, vec![7u8; 100]).unwrap();

    promote(&part, &fin).unwrap();

    assert!(!part.exists());
    assert_eq!(fs::read(&fin).unwrap().len(), 100);
}
