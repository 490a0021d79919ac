// VFS functionality tests

use super::*;
use crate::types::FAILURE_SENTINEL;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(5);

fn creating_fs() -> LocalFs {
    LocalFs::with_config(LocalFsConfig {
        create: true,
        ..LocalFsConfig::default()
    })
}

fn path_in(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_str().unwrap().to_string()
}

#[test]
fn test_window_range() {
    assert_eq!(window_range(0, 9, 10).unwrap(), 0..10);
    assert_eq!(window_range(0, 3, 10).unwrap(), 0..4);
    assert_eq!(window_range(0, -1, 10).unwrap(), 0..0);
    assert!(window_range(0, 10, 10).is_err());
    assert!(window_range(2, 0, 10).is_err());
}

#[test]
fn test_local_open_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let fs = LocalFs::new();

    assert_eq!(fs.open_file(&path_in(&temp_dir, "missing.txt")), FAILURE_SENTINEL);
    assert_eq!(fs.open_file("bad\0path"), FAILURE_SENTINEL);
}

#[test]
fn test_local_sync_write_and_read() {
    let temp_dir = TempDir::new().unwrap();
    let path = path_in(&temp_dir, "data.txt");
    let fs = creating_fs();

    let fd = fs.open_file(&path);
    assert!(fd >= 0);
    let data = b"Hello, VFS!";
    fs.sync_write_file(fd, data, 0, data.len() as isize - 1).unwrap();
    fs.close_file(fd);

    assert_eq!(std::fs::read(&path).unwrap(), data);

    let fd = fs.open_file(&path);
    let mut buf = [0u8; 32];
    let count = fs.sync_read_file(fd, &mut buf, 0, 31);
    assert_eq!(count, data.len() as isize);
    assert_eq!(&buf[..data.len()], data);

    // End of file
    assert_eq!(fs.sync_read_file(fd, &mut buf, 0, 31), 0);
    fs.close_file(fd);
}

#[test]
fn test_local_partial_window() {
    let temp_dir = TempDir::new().unwrap();
    let path = path_in(&temp_dir, "window.txt");
    std::fs::write(&path, b"abcdefgh").unwrap();
    let fs = LocalFs::new();

    let fd = fs.open_file(&path);
    let mut buf = [0u8; 8];
    assert_eq!(fs.sync_read_file(fd, &mut buf, 0, 2), 3);
    assert_eq!(&buf, b"abc\0\0\0\0\0");

    // Window that does not fit the storage is refused
    assert_eq!(fs.sync_read_file(fd, &mut buf, 0, 8), FAILURE_SENTINEL as isize);
    fs.close_file(fd);
}

#[test]
fn test_local_bad_descriptor() {
    let fs = LocalFs::new();
    let mut buf = [0u8; 4];

    assert_eq!(fs.sync_read_file(-5, &mut buf, 0, 3), FAILURE_SENTINEL as isize);
    let result = fs.sync_write_file(-5, &buf, 0, 3);
    assert!(matches!(result, Err(VfsError::BadDescriptor(-5))));
}

#[test]
fn test_local_read_only_rejects_writes() {
    let temp_dir = TempDir::new().unwrap();
    let path = path_in(&temp_dir, "ro.txt");
    std::fs::write(&path, b"frozen").unwrap();
    let fs = LocalFs::with_config(LocalFsConfig {
        read_only: true,
        ..LocalFsConfig::default()
    });

    let fd = fs.open_file(&path);
    assert!(fd >= 0);
    assert!(fs.sync_write_file(fd, b"thaw", 0, 3).is_err());
    fs.close_file(fd);
}

#[test]
fn test_local_unclassified_errno_keeps_os_error() {
    let temp_dir = TempDir::new().unwrap();
    let dir_path = temp_dir.path().to_str().unwrap().to_string();
    // Opening a directory read-write fails with EISDIR
    let fs = LocalFs::new();

    let err = fs.try_open(&dir_path).unwrap_err();
    assert!(matches!(err, VfsError::Os { op: "open", .. }));
    assert_eq!(err.raw_os_error(), Some(libc::EISDIR));
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(fs.open_file(&dir_path), FAILURE_SENTINEL);

    assert!(matches!(
        fs.try_open(&path_in(&temp_dir, "missing.txt")),
        Err(VfsError::NotFound(_))
    ));
    assert!(matches!(fs.try_open("bad\0path"), Err(VfsError::InvalidArgument(_))));
}

#[test]
fn test_vfs_error_display() {
    let err = VfsError::os("read", libc::EIO);
    assert!(err.to_string().starts_with("read failed: "));
    assert_eq!(err.raw_os_error(), Some(libc::EIO));

    let err = VfsError::BadDescriptor(9);
    assert_eq!(err.to_string(), "Bad descriptor: 9");
    assert_eq!(err.raw_os_error(), None);
    assert!(std::error::Error::source(&err).is_none());
}

#[test]
fn test_local_async_write_and_read() {
    let temp_dir = TempDir::new().unwrap();
    let path = path_in(&temp_dir, "async.txt");
    let fs = creating_fs();

    let fd = fs.open_file(&path);
    let (tx, rx) = mpsc::channel();
    let payload: Box<[u8]> = b"async payload".to_vec().into_boxed_slice();
    fs.async_write_file(
        fd,
        payload,
        0,
        12,
        Box::new(move |bytes| tx.send(bytes).unwrap()),
    );
    let returned = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(&returned[..], b"async payload");
    fs.close_file(fd);

    let fd = fs.open_file(&path);
    let (tx, rx) = mpsc::channel();
    fs.async_read_file(
        fd,
        vec![0u8; 64].into_boxed_slice(),
        0,
        63,
        Box::new(move |bytes, count| tx.send((bytes, count)).unwrap()),
    );
    let (bytes, count) = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(count, 13);
    assert_eq!(&bytes[..13], b"async payload");
    fs.close_file(fd);
}

#[test]
fn test_local_config_from_json() {
    let config = LocalFsConfig::from_json(r#"{"create": true, "mode": 384}"#).unwrap();
    assert!(config.create);
    assert!(!config.truncate);
    assert_eq!(config.mode, 0o600);

    assert!(LocalFsConfig::from_json("not json").is_err());
}

#[test]
fn test_mem_open_and_close() {
    let fs = MemFs::new();
    assert_eq!(fs.open_file("nothing.txt"), FAILURE_SENTINEL);

    fs.create_file("a.txt");
    let fd_a = fs.open_file("a.txt");
    let fd_b = fs.open_file("a.txt");
    assert!(fd_a >= 0);
    assert_ne!(fd_a, fd_b);
    assert_eq!(fs.open_count(), 2);

    fs.close_file(fd_a);
    fs.close_file(fd_b);
    // Unknown descriptor is ignored
    fs.close_file(fd_b);
    assert_eq!(fs.open_count(), 0);
}

#[test]
fn test_mem_cursor_per_descriptor() {
    let fs = MemFs::new();
    fs.insert_file("data.bin", vec![1, 2, 3, 4, 5, 6]);

    let fd = fs.open_file("data.bin");
    let mut buf = [0u8; 4];
    assert_eq!(fs.sync_read_file(fd, &mut buf, 0, 3), 4);
    assert_eq!(buf, [1, 2, 3, 4]);
    assert_eq!(fs.sync_read_file(fd, &mut buf, 0, 3), 2);
    assert_eq!(&buf[..2], &[5, 6]);
    assert_eq!(fs.sync_read_file(fd, &mut buf, 0, 3), 0);

    let other = fs.open_file("data.bin");
    assert_eq!(fs.sync_read_file(other, &mut buf, 0, 1), 2);
    assert_eq!(&buf[..2], &[1, 2]);
}

#[test]
fn test_mem_write_extends_file() {
    let fs = MemFs::new();
    fs.insert_file("log.txt", b"abc".to_vec());

    let fd = fs.open_file("log.txt");
    fs.sync_write_file(fd, b"XYZW", 0, 3).unwrap();
    assert_eq!(fs.contents("log.txt").unwrap(), b"XYZW");

    fs.sync_write_file(fd, b"12", 0, 1).unwrap();
    assert_eq!(fs.contents("log.txt").unwrap(), b"XYZW12");

    let result = fs.sync_write_file(99, b"12", 0, 1);
    assert!(matches!(result, Err(VfsError::BadDescriptor(99))));
}

#[test]
fn test_mem_deferred_completions() {
    let fs = Arc::new(MemFs::with_mode(CompletionMode::Deferred));
    fs.insert_file("slow.txt", b"hello".to_vec());
    let fd = fs.open_file("slow.txt");

    let (tx, rx) = mpsc::channel();
    let read_tx = tx.clone();
    fs.async_read_file(
        fd,
        vec![0u8; 8].into_boxed_slice(),
        0,
        7,
        Box::new(move |_, count| read_tx.send(format!("read {}", count)).unwrap()),
    );
    fs.async_write_file(
        fd,
        b"!".to_vec().into_boxed_slice(),
        0,
        0,
        Box::new(move |_| tx.send("write".to_string()).unwrap()),
    );

    assert_eq!(fs.pending_count(), 2);
    assert!(rx.try_recv().is_err());

    assert_eq!(fs.run_pending(), 2);
    assert_eq!(rx.try_recv().unwrap(), "read 5");
    assert_eq!(rx.try_recv().unwrap(), "write");
    assert_eq!(fs.contents("slow.txt").unwrap(), b"hello!");
    assert_eq!(fs.run_pending(), 0);
}
