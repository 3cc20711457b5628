//! End-to-end runs over on-disk inputs: config, state table, raw poll file,
//! history store and the formatted projection.

use std::fs;
use std::path::Path;

use ppolls::app::pipeline::{load_polls, open_inputs};
use ppolls::config::Settings;
use ppolls::domain::Leader;
use ppolls::report::{all_series, format_projection, format_state_report, project, state_report};

const STATE_TABLE: &str = "\
# code votes category
PA 19 B
GA 16 B
CA 54 D
TX 40 G
";

const POLLS: &str = "\
# state dem gop ind start end pollster
PA 47 46 0 Jul 8 Jul 12 Emerson College
PA 48 45 0 Jul 1 Jul 5 Quinnipiac University
PA 46 47 0 Jun 20 Jun 24 Marist College
PA 40 50 0 May 1 May 3 Too Old Polling
GA 44 50 0 Jul 9 Jul 11 Fox News
TX 45 46 0 Jul 2 Jul 6 Siena College
";

fn write_fixture(root: &Path, policy: u8) -> Settings {
    let table = root.join("state_table.txt");
    fs::write(&table, STATE_TABLE).unwrap();
    fs::create_dir_all(root.join("csv")).unwrap();
    fs::write(root.join("csv").join("president_poll.txt"), POLLS).unwrap();

    let config = format!(
        r#"
date_threshold = "2024-06-01"
award_policy = {policy}
poll_history_limit = 5
tossup_threshold = 3.0
label_a = "Dem"
label_b = "Gop"
dir_csv = "{csv}"
dir_database = "{db}"
dir_plots = "{plots}"
dir_temp = "{temp}"
state_table_file = "{table}"
"#,
        csv = root.join("csv").display(),
        db = root.join("database").display(),
        plots = root.join("plots").display(),
        temp = root.join("temp").display(),
        table = table.display(),
    );
    let path = root.join("config.toml");
    fs::write(&path, config).unwrap();
    Settings::load(&path).unwrap()
}

#[test]
fn load_then_project_all_states() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = write_fixture(tmp.path(), 2);

    let summary = load_polls(&settings).unwrap();
    assert_eq!(summary.polls_loaded, 6);
    assert_eq!(summary.history_rows, 6);

    // Loading the same file again replaces rows rather than duplicating them.
    assert_eq!(load_polls(&settings).unwrap().history_rows, 6);

    let inputs = open_inputs(&settings, false).unwrap();
    let report = project(&inputs.table, &inputs.store, &inputs.engine).unwrap();

    assert_eq!(report.total_weight(), inputs.table.total_weight());
    // PA: window drops the May poll; means 47 / 46 -> tossup.
    assert_eq!(report.rows[0].outcome.leader, Leader::Tossup);
    assert_eq!(report.rows[0].aggregate.sample_count, 3);
    // GA: 44 vs 50 -> B.
    assert_eq!(report.rows[1].outcome.leader, Leader::B);
    // CA has no polls: fallback to its category.
    assert_eq!(report.rows[2].outcome.leader, Leader::A);
    assert!(!report.rows[2].aggregate.has_data());
    // TX: 45 vs 46 is within the threshold.
    assert_eq!(report.rows[3].outcome.leader, Leader::Tossup);

    assert_eq!(report.bucket(Leader::A).weight, 54);
    assert_eq!(report.bucket(Leader::B).weight, 16);
    assert_eq!(report.bucket(Leader::Tossup).weight, 59);

    let text = format_projection(&report, &settings.labels, &inputs.engine);
    assert!(text.contains("CA  54  no data"), "{text}");
    assert!(text.contains("TOSSUP EV:  59, states: ( 2) PA TX"), "{text}");
}

#[test]
fn battleground_projection_and_state_listing() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = write_fixture(tmp.path(), 1);
    load_polls(&settings).unwrap();

    let inputs = open_inputs(&settings, true).unwrap();
    let report = project(&inputs.table, &inputs.store, &inputs.engine).unwrap();
    let codes: Vec<&str> = report.rows.iter().map(|r| r.aggregate.code.as_str()).collect();
    assert_eq!(codes, vec!["PA", "GA"]);

    let pa = inputs.table.get("pa").unwrap();
    let listing = state_report(pa, &inputs.store, &inputs.engine).unwrap();
    assert_eq!(listing.series.len(), 3);
    assert_eq!(
        listing.series.samples[0].end_date,
        chrono::NaiveDate::from_ymd_opt(2024, 7, 12).unwrap()
    );
    let text = format_state_report(&listing, &settings.labels);
    assert!(text.contains("Emerson College"));
    assert!(!text.contains("Too Old Polling"));

    let series = all_series(&inputs.table, &inputs.store, &inputs.engine).unwrap();
    assert_eq!(series.iter().filter(|s| s.points.is_empty()).count(), 1);
}

#[test]
fn malformed_poll_file_fails_the_load() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = write_fixture(tmp.path(), 3);
    fs::write(
        settings.dir_csv.join(&settings.poll_file_name),
        "PA 47 46 0 Jul 8 Jly 12 Emerson College\n",
    )
    .unwrap();

    let err = load_polls(&settings).unwrap_err();
    assert_eq!(err.exit_code(), ppolls::error::EXIT_FETCH);
    assert!(err.message().contains("line 1"), "{err}");
}
