//! Behaviour-driven step definitions driving the score CLI scenarios.

use super::helpers::{StubStoreOpener, write_utf8};
use super::*;
use crate::score::run_score_with;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;

#[derive(Debug)]
struct ScoreWorld {
    _tmp: TempDir,
    database: Utf8PathBuf,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl ScoreWorld {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            _tmp: tmp,
            database: root.join("grids.db"),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn run(&self, extra: &[&str]) {
        let mut argv = vec![
            "gapmap".to_owned(),
            "score".to_owned(),
            format!("--{ARG_DATABASE}"),
            self.database.as_str().to_owned(),
        ];
        argv.extend(extra.iter().map(|arg| (*arg).to_owned()));
        let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
        let outcome = parsed.and_then(|cli| match cli.command {
            Command::Score(args) => {
                let mut buffer = self.stdout.borrow_mut();
                run_score_with(args, &StubStoreOpener::default(), &mut *buffer)
            }
            Command::Explain(_) => panic!("expected score command"),
        });
        self.result.replace(Some(outcome));
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> ScoreWorld {
    ScoreWorld::new()
}

#[given("a grid database exists on disk")]
fn database_exists(#[from(world)] world: &ScoreWorld) {
    write_utf8(&world.database, b"grids");
}

#[when("I run the score command for gyms")]
fn score_gyms(#[from(world)] world: &ScoreWorld) {
    world.run(&["--category", "Gym"]);
}

#[when("I run the score command without a category")]
fn score_without_category(#[from(world)] world: &ScoreWorld) {
    world.run(&[]);
}

#[when("I run the score command for bakeries")]
fn score_bakeries(#[from(world)] world: &ScoreWorld) {
    world.run(&["--category", "Bakery"]);
}

#[then("the command succeeds and prints the best grid first")]
fn command_prints_best_grid(#[from(world)] world: &ScoreWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let rows: serde_json::Value = serde_json::from_str(&stdout).expect("output should be JSON");
    assert_eq!(rows[0]["grid_id"], "grid_a");
    assert_eq!(rows[0]["category"], "Gym");
}

#[then("the command fails because the category is missing")]
fn command_fails_missing_category(#[from(world)] world: &ScoreWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_CATEGORY),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the category is unknown")]
fn command_fails_unknown_category(#[from(world)] world: &ScoreWorld) {
    match &*world.error() {
        CliError::InvalidCategory(err) => assert!(err.to_string().contains("Bakery")),
        other => panic!("expected InvalidCategory, found {other:?}"),
    }
}

#[then("the command fails because the database is missing")]
fn command_fails_missing_database(#[from(world)] world: &ScoreWorld) {
    match &*world.error() {
        CliError::MissingSourceFile { field, .. } => assert_eq!(*field, ARG_DATABASE),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[scenario(path = "tests/features/score_command.feature", index = 0)]
fn scoring_prints_ranked_json(world: ScoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/score_command.feature", index = 1)]
fn missing_category_is_reported(world: ScoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/score_command.feature", index = 2)]
fn unknown_category_is_rejected(world: ScoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/score_command.feature", index = 3)]
fn missing_database_is_reported(world: ScoreWorld) {
    let _ = world;
}
