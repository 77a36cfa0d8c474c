//! End-to-end behavior through the file-like endpoint.

use nexus_modlist::{
    Config, Enumeration, Error, ModList, OpenFile, ReadMode, ShortString, Step, UserSink,
};

fn list(mode: ReadMode) -> ModList<i64> {
    ModList::new(Config::default().with_read_mode(mode))
}

fn echo<V: nexus_modlist::Value>(list: &ModList<V>, command: &str) -> Result<usize, Error> {
    list.open().write(command)
}

fn cat<V: nexus_modlist::Value>(list: &ModList<V>) -> String {
    let mut file: OpenFile<'_, V> = list.open();
    let mut out = Vec::new();
    while file.read(&mut out).unwrap() > 0 {}
    if out.last() == Some(&0) {
        out.pop();
    }
    String::from_utf8(out).unwrap()
}

#[test]
fn documented_scenario_bulk() {
    let list = list(ReadMode::Bulk);

    echo(&list, "add 1\n").unwrap();
    echo(&list, "add 2\n").unwrap();
    echo(&list, "add 3\n").unwrap();
    assert_eq!(cat(&list), "1\n2\n3\n");

    echo(&list, "remove 2\n").unwrap();
    assert_eq!(cat(&list), "1\n3\n");

    echo(&list, "cleanup\n").unwrap();
    assert_eq!(cat(&list), "");

    assert_eq!(echo(&list, "remove 9\n"), Err(Error::NotFound));
    assert_eq!(list.len(), 0);
}

#[test]
fn documented_scenario_paginated() {
    let list = list(ReadMode::Paginated);

    for v in 1..=3 {
        echo(&list, &format!("add {v}\n")).unwrap();
    }
    assert_eq!(cat(&list), "1\n2\n3\n");

    echo(&list, "remove 2\n").unwrap();
    assert_eq!(cat(&list), "1\n3\n");

    echo(&list, "cleanup\n").unwrap();
    assert_eq!(cat(&list), "");
}

#[test]
fn append_count_matches_records() {
    let list = list(ReadMode::Bulk);
    for v in 0..40 {
        echo(&list, &format!("add {v}\n")).unwrap();
    }

    assert_eq!(list.len(), 40);
    let dump = cat(&list);
    let records: Vec<i64> = dump.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(records, (0..40).collect::<Vec<_>>());
}

#[test]
fn duplicate_removal_takes_earliest() {
    let list = list(ReadMode::Bulk);
    for v in [7, 1, 7, 2, 7] {
        list.add(v).unwrap();
    }

    echo(&list, "remove 7\n").unwrap();
    assert_eq!(cat(&list), "1\n7\n2\n7\n");
}

#[test]
fn errors_carry_distinct_codes() {
    let list = list(ReadMode::Bulk);

    let oversized = "x".repeat(600);
    let err = echo(&list, &oversized).unwrap_err();
    assert_eq!(err.errno(), 27);

    let err = echo(&list, "frobnicate\n").unwrap_err();
    assert_eq!(err.errno(), 22);

    let err = echo(&list, "remove 1\n").unwrap_err();
    assert_eq!(err.errno(), 2);
}

#[test]
fn allocation_failure_surfaces_through_endpoint() {
    let list: ModList<i64> = ModList::new(Config::default().with_node_capacity(Some(1)));
    echo(&list, "add 1\n").unwrap();

    let err = echo(&list, "add 2\n").unwrap_err();
    assert_eq!(err, Error::AllocationFailure);
    assert_eq!(err.errno(), 12);
    assert_eq!(list.len(), 1);
}

#[test]
fn string_domain_end_to_end() {
    let list: ModList<ShortString> =
        ModList::new(Config::default().with_read_mode(ReadMode::Paginated));

    echo(&list, "add kiwi\n").unwrap();
    echo(&list, "add fig\n").unwrap();
    echo(&list, "add kiwi\n").unwrap();
    echo(&list, "remove kiwi\n").unwrap();
    assert_eq!(cat(&list), "fig\nkiwi\n");

    assert_eq!(echo(&list, "remove plum\n"), Err(Error::NotFound));
    assert!(matches!(
        echo(&list, "add two words\n"),
        Err(Error::MalformedCommand(_))
    ));
}

#[test]
fn paginated_session_runs_exactly_count_cycles() {
    let list = list(ReadMode::Paginated);
    for v in 0..25 {
        list.add(v).unwrap();
    }

    let mut seq = Enumeration::new(&list);
    let mut out = String::new();
    let mut cycles = 0;

    assert_eq!(seq.start(0), Step::Continue);
    while seq.step() == Step::Continue {
        assert!(seq.render(&mut out));
        cycles += 1;
    }
    seq.stop();

    assert_eq!(cycles, 25);
    assert_eq!(out.lines().count(), 25);
}

/// Accepts at most `chunk` bytes per read, like a short user buffer.
struct Chunked {
    out: Vec<u8>,
    chunk: usize,
}

impl UserSink for Chunked {
    fn capacity(&self) -> usize {
        self.chunk
    }

    fn copy_from(&mut self, src: &[u8]) -> nexus_modlist::Result<()> {
        assert!(src.len() <= self.chunk);
        self.out.extend_from_slice(src);
        Ok(())
    }
}

#[test]
fn paginated_read_resumes_across_calls() {
    let list = list(ReadMode::Paginated);
    for v in 100..110 {
        list.add(v).unwrap();
    }

    let mut file = list.open();
    let mut sink = Chunked {
        out: Vec::new(),
        chunk: 3,
    };
    let mut calls = 0;
    while file.read(&mut sink).unwrap() > 0 {
        calls += 1;
    }

    assert_eq!(calls, 14);
    let expected: String = (100..110).map(|v| format!("{v}\n")).collect();
    assert_eq!(String::from_utf8(sink.out).unwrap(), expected);
}
