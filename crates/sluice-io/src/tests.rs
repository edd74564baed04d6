//! Cross-module scenarios over real files.

use proptest::prelude::*;

use crate::{
    AnyStream, Buffer, Direction, Error, FileMode, MemoryStream, StandardAllocator, Stream,
    StreamExt, open_file, stream_print,
};

fn read_write_stream(dir: &tempfile::TempDir, name: &str) -> crate::FdStream {
    open_file(dir.path().join(name), FileMode::READ_WRITE | FileMode::CREATE).unwrap()
}

#[test]
fn append_then_read_back_hello() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.txt");

    let mut writer = open_file(
        &path,
        FileMode::CREATE | FileMode::WRITE_ONLY | FileMode::APPEND,
    )
    .unwrap();
    assert_eq!(writer.write_full(b"hello").unwrap(), 5);
    writer.close().unwrap();

    let mut reader = open_file(&path, FileMode::READ_ONLY).unwrap();
    let mut memory = [0u8; 5];
    assert_eq!(reader.read_full(&mut memory).unwrap(), 5);
    assert_eq!(&memory, b"hello");

    assert_eq!(reader.read_full(&mut memory), Err(Error::EndOfFile));
    reader.close().unwrap();
}

#[test]
fn write_seek_read_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut stream = read_write_stream(&dir, "round_trip.dat");

    let data: Vec<u8> = (0..=255).collect();
    stream.write_full(&data).unwrap();
    assert_eq!(stream.seek(0, Direction::START).unwrap(), 0);

    let mut read_back = vec![0u8; data.len()];
    stream.read_full(&mut read_back).unwrap();
    assert_eq!(read_back, data);
    assert_eq!(stream.tell().unwrap(), 256);
    stream.close().unwrap();
}

#[test]
fn empty_full_read_leaves_descriptor_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut stream = read_write_stream(&dir, "empty.dat");
    stream.write_full(b"abc").unwrap();
    stream.seek(1, Direction::START).unwrap();

    let mut memory = [0u8; 0];
    assert_eq!(stream.read_full(&mut memory), Err(Error::BufferFull));
    assert_eq!(stream.tell().unwrap(), 1);
}

#[test]
fn missing_access_mode_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let result = open_file(dir.path().join("x"), FileMode::CREATE);
    assert_eq!(result.unwrap_err(), Error::InvalidArgument);
}

#[test]
fn formatted_write_prints_rendered_length() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("formatted.txt");
    let mut stream = open_file(&path, FileMode::WRITE_ONLY | FileMode::CREATE).unwrap();

    let written = stream_print!(stream, "{}:{:04}", "id", 7).unwrap();
    assert_eq!(written, 7);
    stream.close().unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"id:0007");
}

#[test]
fn allocated_buffer_reads_a_window() {
    let dir = tempfile::tempdir().unwrap();
    let mut stream = read_write_stream(&dir, "window.dat");
    stream.write_full(b"0123456789").unwrap();
    stream.seek(0, Direction::START).unwrap();

    let mut buffer = Buffer::allocate(&StandardAllocator, 16).unwrap();
    buffer.set_window(2, 6).unwrap();
    stream.read_buffer_full(&mut buffer).unwrap();

    assert_eq!(buffer.position(), 6);
    assert_eq!(&buffer.memory()[2..6], b"0123");
    assert_eq!(stream.tell().unwrap(), 4);
    buffer.free(&StandardAllocator).unwrap();
}

#[test]
fn any_stream_dispatches_to_each_backend() {
    let dir = tempfile::tempdir().unwrap();
    let streams: Vec<AnyStream> = vec![
        read_write_stream(&dir, "any.dat").into(),
        MemoryStream::new().into(),
    ];

    for mut stream in streams {
        stream.write_full(b"payload").unwrap();
        assert_eq!(stream.seek(3, Direction::END).unwrap(), 4);

        let mut memory = [0u8; 3];
        stream.read_full(&mut memory).unwrap();
        assert_eq!(&memory, b"oad");
        stream.close().unwrap();
    }
}

#[test]
fn dyn_stream_runs_generic_algorithms() {
    let mut memory_stream = MemoryStream::new();
    let stream: &mut dyn Stream = &mut memory_stream;
    stream.write_full(b"dynamic").unwrap();
    assert_eq!(stream.tell().unwrap(), 7);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn file_round_trip_preserves_bytes(data in prop::collection::vec(any::<u8>(), 1..4096)) {
        let dir = tempfile::tempdir().unwrap();
        let mut stream = read_write_stream(&dir, "prop.dat");

        prop_assert_eq!(stream.write_full(&data).unwrap(), data.len());
        stream.seek(0, Direction::START).unwrap();

        let mut read_back = vec![0u8; data.len()];
        stream.read_full(&mut read_back).unwrap();
        prop_assert_eq!(&read_back, &data);
        prop_assert_eq!(stream.tell().unwrap(), data.len() as u64);
    }

    #[test]
    fn single_shot_reads_only_advance(
        data in prop::collection::vec(any::<u8>(), 0..64),
        start in 0usize..32,
        length in 0usize..32,
    ) {
        prop_assume!(start <= length);
        let mut stream = MemoryStream::with_contents(&data);
        let mut memory = [0u8; 32];
        let mut buffer = Buffer::with_window(&mut memory[..], start, length).unwrap();

        let before = buffer.position();
        let _ = stream.read_buffer(&mut buffer);
        prop_assert!(buffer.position() >= before);
        prop_assert_eq!(buffer.length(), length);
        prop_assert_eq!(buffer.capacity(), 32);
    }

    #[test]
    fn file_seek_to_reported_position(skip in 0u64..10_000) {
        let dir = tempfile::tempdir().unwrap();
        let mut stream = read_write_stream(&dir, "seek.dat");

        stream.seek(skip, Direction::SKIP).unwrap();
        let position = stream.tell().unwrap();
        stream.seek(0, Direction::START).unwrap();

        prop_assert_eq!(stream.seek(position, Direction::START).unwrap(), position);
        prop_assert_eq!(stream.tell().unwrap(), position);
    }
}
