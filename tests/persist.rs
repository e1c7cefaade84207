use skiplist_kv::*;

use std::io::{self, BufRead, Cursor, Read};

use quickcheck::quickcheck;

fn sample() -> SkipListMap<i32, String> {
    let mut list = SkipListMap::new(6);
    for (key, value) in [(9, "c"), (1, "a"), (3, "b")] {
        assert!(list.insert(key, value.to_string()).is_inserted());
    }
    list
}

#[test]
fn dump_format() {
    let list = sample();
    let mut out = Vec::new();
    assert_eq!(list.dump(&mut out).unwrap(), 3);
    assert_eq!(String::from_utf8(out).unwrap(), "1:a\n3:b\n9:c\n");
}

#[test]
fn dump_empty() {
    let list: SkipListMap<i32, String> = SkipListMap::new(6);
    let mut out = Vec::new();
    assert_eq!(list.dump(&mut out).unwrap(), 0);
    assert!(out.is_empty());
}

#[test]
fn round_trip() {
    let list = sample();
    let mut out = Vec::new();
    list.dump(&mut out).unwrap();

    let mut reloaded: SkipListMap<i32, String> = SkipListMap::new(6);
    let report = reloaded.load(Cursor::new(out)).unwrap();
    assert_eq!(
        report,
        LoadReport {
            inserted: 3,
            duplicates: 0,
            skipped: 0
        }
    );
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded.get(&1).map(String::as_str), Some("a"));
    assert_eq!(reloaded.get(&3).map(String::as_str), Some("b"));
    assert_eq!(reloaded.get(&9).map(String::as_str), Some("c"));
}

#[test]
fn load_skips_malformed_lines() {
    let input = "1:one\n\nno delimiter\n:novalue\nnokey:\nx:not a number key\n2:two:with colon\r\n3:three";
    let mut list: SkipListMap<u32, String> = SkipListMap::new(4);
    let report = list.load(input.as_bytes()).unwrap();

    assert_eq!(report.inserted, 3);
    assert_eq!(report.skipped, 5);
    assert_eq!(list.get(&1).map(String::as_str), Some("one"));
    assert_eq!(list.get(&2).map(String::as_str), Some("two:with colon"));
    assert_eq!(list.get(&3).map(String::as_str), Some("three"));
}

#[test]
fn load_follows_insert_policy_for_duplicates() {
    let mut list: SkipListMap<u32, String> = SkipListMap::new(4);
    assert!(list.insert(5, "kept".to_string()).is_inserted());

    let report = list.load("5:dropped\n6:first\n6:second\n".as_bytes()).unwrap();
    assert_eq!(report.inserted, 1);
    assert_eq!(report.duplicates, 2);
    assert_eq!(list.get(&5).map(String::as_str), Some("kept"));
    assert_eq!(list.get(&6).map(String::as_str), Some("first"));
}

struct FailingReader {
    served: bool,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.served {
            return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        }
        self.served = true;
        let data = b"1:a\n2:b\n";
        buf[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }
}

#[test]
fn load_failure_leaves_list_untouched() {
    let mut list: SkipListMap<u32, String> = SkipListMap::new(4);
    assert!(list.insert(7, "seven".to_string()).is_inserted());

    let source = io::BufReader::new(FailingReader { served: false });
    match list.load(source) {
        Err(Error::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::Other),
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(list.len(), 1);
    assert!(!list.contains_key(&1));
}

struct FailingWriter;

impl io::Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "no space"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn dump_failure_is_reported() {
    let list = sample();
    assert!(matches!(list.dump(FailingWriter), Err(Error::Io(_))));
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(STORE_FILE);

    let list: SkipList<i32, String> = SkipList::new(6);
    for (key, value) in [(1, "pppp"), (3, "cccc"), (7, "7777"), (8, "qqqq"), (9, "llll"), (19, "zzzz")] {
        assert!(list.insert(key, value.to_string()).is_inserted());
    }
    assert_eq!(list.dump_to_path(&path).unwrap(), 6);

    let reloaded: SkipList<i32, String> = SkipList::new(6);
    let report = reloaded.load_from_path(&path).unwrap();
    assert_eq!(report.inserted, 6);
    assert_eq!(reloaded.len(), 6);
    assert_eq!(reloaded.get(&19).as_deref(), Some("zzzz"));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 6);
    assert!(contents.starts_with("1:pppp\n"));
}

#[test]
fn dump_to_path_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store");
    std::fs::write(&path, "100:old\n200:old\n300:old\n").unwrap();

    let list: SkipListMap<u32, u32> = vec![(1, 1)].into_iter().collect();
    list.dump_to_path(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "1:1\n");
}

#[test]
fn load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing");

    let mut list: SkipListMap<u32, u32> = SkipListMap::new(4);
    match list.load_from_path(&path) {
        Err(Error::Open { path: failed, source }) => {
            assert_eq!(failed, path);
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert!(list.is_empty());
}

#[test]
fn dump_load_preserves_entries() {
    fn prop(entries: Vec<(u32, u64)>) -> bool {
        let list: SkipListMap<u32, u64> = entries.into_iter().collect();
        let mut out = Vec::new();
        list.dump(&mut out).unwrap();

        let mut reloaded: SkipListMap<u32, u64> = SkipListMap::new(12);
        reloaded.load(out.as_slice()).unwrap();
        reloaded.len() == list.len() && reloaded.iter().eq(list.iter())
    }

    quickcheck(prop as fn(Vec<(u32, u64)>) -> bool);
}

#[test]
fn dumped_lines_are_sorted() {
    let list: SkipListMap<i32, i32> = vec![(5, 0), (-3, 0), (12, 0), (0, 0)].into_iter().collect();
    let mut out = Vec::new();
    list.dump(&mut out).unwrap();

    let keys: Vec<i32> = out
        .as_slice()
        .lines()
        .map(|line| line.unwrap().split(DELIMITER).next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(keys, vec![-3, 0, 5, 12]);
}
