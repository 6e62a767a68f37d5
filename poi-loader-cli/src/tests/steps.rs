//! Behaviour-driven step definitions driving the `loadpoi` CLI scenarios.

use super::helpers::{LayerOverrides, merge_layers};
use super::*;
use crate::loadpoi::LoadConfig;
use camino::Utf8PathBuf;
use clap::error::ErrorKind;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// Aggregates `loadpoi` scenario state so each step only needs a single world
/// argument.
#[derive(Debug, Default)]
struct LoadWorld {
    cli_args: RefCell<Vec<String>>,
    cli_result: RefCell<Option<Result<LoadConfig, CliError>>>,
    config_layer: RefCell<Option<LayerOverrides>>,
    env_layer: RefCell<Option<LayerOverrides>>,
}

impl LoadWorld {
    fn config(&self) -> LoadConfig {
        let borrowed = self.cli_result.borrow();
        match borrowed.as_ref().expect("result recorded") {
            Ok(config) => config.clone(),
            Err(err) => panic!("expected success, got {err:?}"),
        }
    }
}

#[fixture]
fn world() -> LoadWorld {
    LoadWorld::default()
}

#[given("I pass the path {path}")]
fn cli_path(#[from(world)] world: &LoadWorld, path: String) {
    world.cli_args.borrow_mut().push(path);
}

#[given("I pass the batch size flag {size}")]
fn cli_batch_size(#[from(world)] world: &LoadWorld, size: String) {
    world
        .cli_args
        .borrow_mut()
        .extend([format!("--{ARG_BATCH_SIZE}"), size]);
}

#[given("the configuration file sets batch size {size} and database {database}")]
fn config_file_layer(#[from(world)] world: &LoadWorld, size: usize, database: String) {
    world.config_layer.replace(Some(LayerOverrides {
        batch_size: Some(size),
        database: Some(Utf8PathBuf::from(database)),
    }));
}

#[given("the environment sets database {database}")]
fn env_layer(#[from(world)] world: &LoadWorld, database: String) {
    world.env_layer.replace(Some(LayerOverrides {
        database: Some(Utf8PathBuf::from(database)),
        ..LayerOverrides::default()
    }));
}

#[when("I configure the loadpoi command")]
fn configure_load(#[from(world)] world: &LoadWorld) {
    let mut invocation = vec!["poi-loader".to_owned(), "loadpoi".to_owned()];
    invocation.extend(world.cli_args.borrow().iter().cloned());
    let file_layer = world.config_layer.borrow().clone();
    let env_layer = world.env_layer.borrow().clone();
    let outcome = Cli::try_parse_from(invocation)
        .map_err(CliError::ArgumentParsing)
        .and_then(|cli| match cli.command {
            Command::Loadpoi(args) => merge_layers(args, file_layer, env_layer),
        });
    world.cli_result.replace(Some(outcome));
}

#[then("the plan uses batch size {size} and database {database}")]
fn plan_uses(#[from(world)] world: &LoadWorld, size: usize, database: String) {
    let config = world.config();
    assert_eq!(config.batch_size.get(), size);
    assert_eq!(config.database, Utf8PathBuf::from(database));
    assert_eq!(config.paths, vec![Utf8PathBuf::from("pois.csv")]);
}

#[then("the CLI reports that the batch size must be positive")]
fn reports_zero_batch(#[from(world)] world: &LoadWorld) {
    let borrowed = world.cli_result.borrow();
    match borrowed.as_ref().expect("result recorded") {
        Err(CliError::InvalidBatchSize { field, .. }) => assert_eq!(*field, ARG_BATCH_SIZE),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[then("the CLI reports that a path is required")]
fn reports_missing_path(#[from(world)] world: &LoadWorld) {
    let borrowed = world.cli_result.borrow();
    match borrowed.as_ref().expect("result recorded") {
        Err(CliError::ArgumentParsing(err)) => {
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

macro_rules! register_load_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/loadpoi_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: LoadWorld) {
            let _ = world;
        }
    };
}

register_load_scenario!(default_settings, "using default settings");
register_load_scenario!(rejecting_zero_batch, "rejecting a zero batch size");
register_load_scenario!(rejecting_missing_paths, "rejecting missing paths");
register_load_scenario!(
    layering_cli_config_env,
    "layering CLI, config file, and environment values"
);
