//! End-to-end batch tests: schedule table on disk, a directory of
//! declaration files in, a mirrored directory of corrected files out.

use std::fs;
use std::path::Path;

use previred_rs::{
    FileOutcome, Rates, Record, RunContext, ScheduleTable, layout, process_dir,
};

const CAP: u64 = 2_460_000;

/// Build one declaration line with the given key fields; filler bytes are
/// lowercase markers so passthrough corruption would be visible.
fn line(id: &str, indicator: &str, movement: &str, taxable: u64, declared: u64, unemployment: u64) -> String {
    let mut r = Record::from_bytes(vec![b'x'; layout::RECORD_LEN]);
    r.replace(&layout::WORKER_ID, id).unwrap();
    r.replace(&layout::LINE_INDICATOR, indicator).unwrap();
    r.replace(&layout::MOVEMENT_CODE, movement).unwrap();
    r.set_number(&layout::TAXABLE_INCOME, taxable).unwrap();
    r.set_number(&layout::PENSION_CONTRIBUTION, declared).unwrap();
    r.set_number(&layout::UNEMPLOYMENT_TAXABLE, 123).unwrap();
    r.set_number(&layout::WORK_SCHEDULE, 0).unwrap();
    r.set_number(&layout::LIFE_EXPECTANCY_CONTRIBUTION, 0).unwrap();
    r.set_number(&layout::UNEMPLOYMENT_INCOME, unemployment).unwrap();
    String::from_utf8(r.into_bytes()).unwrap()
}

fn write_schedules(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("jornadasTrabajadores.csv");
    fs::write(&path, "rut;jornada\n12345678-9;1\n7654321-K;2\n").unwrap();
    path
}

fn run(dir: &Path) -> Vec<previred_rs::FileReport> {
    let schedules = write_schedules(dir);
    let ctx = RunContext {
        table: ScheduleTable::load(&schedules).unwrap(),
        rates: Rates::with_cap(CAP),
    };
    process_dir(&dir.join("in"), &dir.join("out"), &ctx).unwrap()
}

fn field(line: &str, spec: &previred_rs::FieldSpec) -> String {
    line[spec.start..spec.start + spec.len].to_string()
}

#[test]
fn known_worker_without_subsidy_gets_schedule_code_only() {
    // Scenario: table has 12345678-9;1, record carries a non-subsidy
    // movement code. The schedule field is set, unemployment-taxable is not.
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("in")).unwrap();
    let input = line("000123456789", "00", "00", 500_000, 50_000, 800_000);
    fs::write(dir.path().join("in/decl.txt"), format!("{input}\n")).unwrap();

    let reports = run(dir.path());
    assert!(reports[0].outcome.is_success());

    let out = fs::read_to_string(dir.path().join("out/decl.txt")).unwrap();
    let out_line = out.lines().next().unwrap();
    assert_eq!(field(out_line, &layout::WORK_SCHEDULE), "00000001");
    assert_eq!(
        field(out_line, &layout::UNEMPLOYMENT_TAXABLE),
        field(&input, &layout::UNEMPLOYMENT_TAXABLE),
    );
}

#[test]
fn unknown_worker_fails_file_with_no_artifact() {
    // Scenario: 11111111-1 is absent from the table.
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("in")).unwrap();
    let input = line("000111111111", "00", "00", 500_000, 50_000, 0);
    fs::write(dir.path().join("in/decl.txt"), format!("{input}\n")).unwrap();

    let reports = run(dir.path());
    match &reports[0].outcome {
        FileOutcome::Failure { record, error } => {
            assert_eq!(*record, Some(1));
            assert!(error.to_string().contains("11111111-1"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!dir.path().join("out/decl.txt").exists());
}

#[test]
fn subsidized_record_recomputes_unemployment_fields() {
    // Scenario: movement code 03 with non-zero amounts; the
    // unemployment-taxable field must change from its source value.
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("in")).unwrap();
    let input = line("000123456789", "00", "03", 500_000, 0, 800_000);
    fs::write(dir.path().join("in/decl.txt"), format!("{input}\n")).unwrap();

    let reports = run(dir.path());
    assert!(reports[0].outcome.is_success());

    let out = fs::read_to_string(dir.path().join("out/decl.txt")).unwrap();
    let out_line = out.lines().next().unwrap();
    assert_eq!(field(out_line, &layout::UNEMPLOYMENT_TAXABLE), "00800000");
    assert_ne!(
        field(out_line, &layout::UNEMPLOYMENT_TAXABLE),
        field(&input, &layout::UNEMPLOYMENT_TAXABLE),
    );
    assert_eq!(
        field(out_line, &layout::LIFE_EXPECTANCY_CONTRIBUTION),
        "00011700"
    );
}

#[test]
fn passthrough_bytes_survive_the_whole_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("in")).unwrap();
    let main = line("000123456789", "00", "06", 1_000_000, 10_000, 500_000);
    let continuation = line("000123456789", "01", "00", 0, 0, 0);
    fs::write(
        dir.path().join("in/decl.txt"),
        format!("{main}\n{continuation}\n"),
    )
    .unwrap();

    let reports = run(dir.path());
    match &reports[0].outcome {
        FileOutcome::Success { records, rewritten } => {
            assert_eq!(*records, 2);
            assert_eq!(*rewritten, 1);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let out = fs::read_to_string(dir.path().join("out/decl.txt")).unwrap();
    let lines: Vec<&str> = out.lines().collect();

    // Continuation line is byte-identical.
    assert_eq!(lines[1], continuation);

    // Main line: length invariant, and every byte outside the four target
    // fields is unchanged.
    assert_eq!(lines[0].len(), main.len());
    let targets = [
        &layout::PENSION_CONTRIBUTION,
        &layout::UNEMPLOYMENT_TAXABLE,
        &layout::WORK_SCHEDULE,
        &layout::LIFE_EXPECTANCY_CONTRIBUTION,
    ];
    for (i, (a, b)) in main.bytes().zip(lines[0].bytes()).enumerate() {
        if !targets.iter().any(|s| i >= s.start && i < s.start + s.len) {
            assert_eq!(a, b, "byte {i} outside target fields changed");
        }
    }
}

#[test]
fn batch_reports_per_file_and_keeps_going() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("in")).unwrap();
    fs::write(
        dir.path().join("in/alpha.txt"),
        format!("{}\n", line("000123456789", "00", "00", 100, 0, 0)),
    )
    .unwrap();
    fs::write(
        dir.path().join("in/bravo.TXT"),
        format!("{}\n", line("000111111111", "00", "00", 100, 0, 0)),
    )
    .unwrap();
    fs::write(
        dir.path().join("in/charlie.txt"),
        format!("{}\n", line("00007654321K", "00", "00", 100, 0, 0)),
    )
    .unwrap();

    let reports = run(dir.path());
    assert_eq!(reports.len(), 3);
    let ok = reports.iter().filter(|r| r.outcome.is_success()).count();
    assert_eq!(ok, 2);

    assert!(dir.path().join("out/alpha.txt").exists());
    assert!(!dir.path().join("out/bravo.TXT").exists());
    assert!(dir.path().join("out/charlie.txt").exists());
}
